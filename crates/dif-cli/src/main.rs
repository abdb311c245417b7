//! `dif`: find druggable interactors of a target and rank them.

mod export;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dif_common::{DifConfig, DifError, RelationFilter};
use dif_db::{BioassayCache, CacheRepository, SqliteCache};
use dif_finder::{InteractorFinder, TargetQuery};
use dif_graph::RestGraphStore;
use dif_ranker::{
    pivot_by_interactor, rank_target, Points, PubChemBioassayProvider, RankerDeps, RankingSettings,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dif")]
#[command(about = "Druggable interactor finder", long_about = None, version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify interactors of a target
    Find {
        /// Gene symbol of the target node
        symbol: String,
        /// Target node type
        #[arg(short, long, default_value = "protein")]
        node: String,
        /// Interactor/target relation: a category, a relation name, or `E` for all
        #[arg(short, long, default_value = "causal")]
        edge: String,
        /// Comma separated target protein modifications
        #[arg(short = 'm', long, value_delimiter = ',')]
        pmods: Vec<String>,
        /// Only interactors targeted by a drug
        #[arg(short, long)]
        druggable: bool,
        /// Print the graph query before searching
        #[arg(short, long)]
        sql: bool,
        /// Write results to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print results to stdout
        #[arg(short, long)]
        verbose: bool,
    },
    /// Rank drug/interactor combinations for a target
    Rank {
        /// Gene symbol of the target node
        symbol: String,
        /// Comma separated target protein modifications
        #[arg(short = 'm', long, value_delimiter = ',')]
        pmods: Vec<String>,
        /// Points for meeting a criterion
        #[arg(short, long, allow_negative_numbers = true)]
        reward: Option<i64>,
        /// Points for failing a criterion
        #[arg(short, long, allow_negative_numbers = true)]
        penalty: Option<i64>,
        /// Summarize per interactor instead of per drug/interactor pair
        #[arg(short = 't', long)]
        pivot: bool,
        /// Write the summary to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the summary to stdout
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Handles opened at start-up and dropped on exit.
struct Session {
    config: DifConfig,
    finder: InteractorFinder,
    deps: RankerDeps,
}

impl Session {
    fn open(config: DifConfig) -> anyhow::Result<Self> {
        let db_path = config.cache.database_path();
        let store = SqliteCache::open(&db_path)
            .with_context(|| format!("opening cache at {}", db_path.display()))?;
        let cache = CacheRepository::new(Arc::new(store));
        let graph = Arc::new(RestGraphStore::new(&config.graphstore)?);
        info!(endpoint = graph.endpoint(), cache = %db_path.display(), "Session opened");

        let deps = RankerDeps {
            graph: graph.clone(),
            cache: cache.clone(),
            bioassay_cache: BioassayCache::new(config.cache.bioassay_path()),
            bioassays: Arc::new(PubChemBioassayProvider::new(&config.bioassay)?),
        };
        Ok(Self {
            finder: InteractorFinder::new(graph, cache),
            deps,
            config,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dif=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DifConfig::load()?;
    let session = Session::open(config)?;

    match cli.command {
        Commands::Find {
            symbol,
            node,
            edge,
            pmods,
            druggable,
            sql,
            output,
            verbose,
        } => {
            let relation: RelationFilter = edge.parse()?;
            let query = TargetQuery::new(symbol)
                .with_target_type(node)
                .with_relation(relation)
                .with_pmods(clean_pmods(pmods));

            if sql {
                if druggable {
                    let queries = query.druggable_sql();
                    println!("{}\n\n{}", queries.pure, queries.capsule);
                } else {
                    println!("{}", query.interactor_sql());
                }
            }

            if druggable {
                let rows = session.finder.resolve_druggable(&query).await?;
                info!(rows = rows.len(), "Druggable interactors resolved");
                export::emit(&rows, output.as_deref(), verbose)?;
            } else {
                let rows = session.finder.resolve_interactors(&query).await?;
                info!(rows = rows.len(), "Interactors resolved");
                export::emit(&rows, output.as_deref(), verbose)?;
            }
        }
        Commands::Rank {
            symbol,
            pmods,
            reward,
            penalty,
            pivot,
            output,
            verbose,
        } => {
            let mut settings = RankingSettings::from_config(&session.config.scoring);
            let points = Points::new(
                reward.unwrap_or(settings.points.reward),
                penalty.unwrap_or(settings.points.penalty),
            );
            settings = settings.with_points(points);
            let query = TargetQuery::new(symbol).with_pmods(clean_pmods(pmods));

            let summary = match rank_target(&session.finder, &query, session.deps.clone(), settings).await {
                Ok(summary) => summary,
                Err(DifError::NoResults(reason)) => {
                    warn!(%reason, "Nothing to rank");
                    Vec::new()
                }
                Err(e) => return Err(e.into()),
            };
            if pivot {
                export::emit(&pivot_by_interactor(&summary), output.as_deref(), verbose)?;
            } else {
                export::emit(&summary, output.as_deref(), verbose)?;
            }
        }
    }
    Ok(())
}

fn clean_pmods(pmods: Vec<String>) -> Vec<String> {
    pmods
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
