//! dif-ranker: Drug ranking over resolved druggable interactors.
//!
//! Each drug earns points per criterion: how its action on an interactor
//! combines with the interactor's effect on the target, expired patents,
//! approved generics and clinical trials. Interactors are annotated with
//! bioassay and causal edge counts.

pub mod bioassay_provider;
pub mod enrichment;
pub mod metadata;
pub mod patents;
pub mod points;
pub mod products;
pub mod ranker;
pub mod relationships;
pub mod summary;
pub mod trials;

pub use bioassay_provider::{BioassayProvider, MockBioassayProvider, PubChemBioassayProvider};
pub use metadata::{DrugMetadata, DrugMetadataBundle};
pub use points::{Points, RankingSettings};
pub use ranker::{rank_target, Ranker, RankerDeps, Stage};
pub use summary::{pivot_by_interactor, InteractorSummary, SummaryRow};
