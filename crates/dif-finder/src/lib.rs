//! dif-finder: Resolves the interactors and druggable interactors of a target.

pub mod finder;

pub use finder::{
    drug_interactor_pairs, unique_drugs, unique_interactors, InteractorFinder, InteractorRow,
    TargetQuery,
};
