//! Configuration loading for DIF.
//! Reads dif.toml from the current directory or the path in the DIF_CONFIG env var.
//! A missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DifError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifConfig {
    #[serde(default)]
    pub graphstore: GraphStoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub bioassay: BioassayConfig,
}

// ── Graph store ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStoreConfig {
    #[serde(default = "default_graphstore_url")]
    pub url: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_graphstore_url() -> String { "https://graphstore.scai.fraunhofer.de".to_string() }
fn default_database()       -> String { "pharmacome".to_string() }
fn default_timeout_secs()   -> u64    { 300 }

impl Default for GraphStoreConfig {
    fn default() -> Self {
        Self {
            url: default_graphstore_url(),
            database: default_database(),
            user: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── Cache ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_database_file")]
    pub database_file: String,
    #[serde(default = "default_bioassay_file")]
    pub bioassay_file: String,
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dif")
        .join("cache")
}
fn default_database_file() -> String { "dif.db".to_string() }
fn default_bioassay_file() -> String { "bioassays.json".to_string() }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            database_file: default_database_file(),
            bioassay_file: default_bioassay_file(),
        }
    }
}

impl CacheConfig {
    pub fn database_path(&self) -> PathBuf {
        self.dir.join(&self.database_file)
    }

    pub fn bioassay_path(&self) -> PathBuf {
        self.dir.join(&self.bioassay_file)
    }
}

// ── Scoring ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_reward")]
    pub reward: i64,
    #[serde(default = "default_penalty")]
    pub penalty: i64,
    #[serde(default = "default_disease_keyword")]
    pub disease_keyword: String,
    #[serde(default)]
    pub similar_diseases: Vec<String>,
}

fn default_reward()          -> i64    { 1 }
fn default_penalty()         -> i64    { -1 }
fn default_disease_keyword() -> String { "Alzheimer Disease".to_string() }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reward: default_reward(),
            penalty: default_penalty(),
            disease_keyword: default_disease_keyword(),
            similar_diseases: Vec::new(),
        }
    }
}

// ── Bioassay API ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioassayConfig {
    /// URL template; `{}` is replaced with the UniProt accession.
    #[serde(default = "default_bioassay_url")]
    pub api_url: String,
}

fn default_bioassay_url() -> String {
    "https://pubchem.ncbi.nlm.nih.gov/rest/pug/assay/target/accession/{}/aids/TXT".to_string()
}

impl Default for BioassayConfig {
    fn default() -> Self {
        Self { api_url: default_bioassay_url() }
    }
}

impl DifConfig {
    /// Load configuration from dif.toml.
    /// Checks DIF_CONFIG env var first, then the current directory.
    pub fn load() -> Result<Self> {
        let path = std::env::var("DIF_CONFIG").unwrap_or_else(|_| "dif.toml".to_string());
        let mut config = Self::from_path(Path::new(&path))?;
        config.apply_env();
        Ok(config)
    }

    /// Parse a config file. A missing file is not an error.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DifError::Config(e.to_string()))
    }

    /// Credentials from the environment win over the file.
    pub fn apply_env(&mut self) {
        if let Ok(user) = std::env::var("DIF_GRAPHSTORE_USER") {
            self.graphstore.user = Some(user);
        }
        if let Ok(password) = std::env::var("DIF_GRAPHSTORE_PASSWORD") {
            self.graphstore.password = Some(password);
        }
    }
}
