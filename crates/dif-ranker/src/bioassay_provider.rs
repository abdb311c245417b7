//! Trait for bioassay count access.
//!
//! The ranker asks "how many assays target this UniProt accession" without
//! knowing where the answer comes from.

use async_trait::async_trait;
use dif_common::config::BioassayConfig;
use dif_common::{DifError, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Implementations:
/// - PubChem assay-by-target endpoint (remote)
/// - Mock data (testing)
#[async_trait]
pub trait BioassayProvider: Send + Sync {
    /// Number of assays recorded for a UniProt accession.
    ///
    /// Service failures are returned as errors and never retried.
    async fn count_assays(&self, accession: &str) -> Result<u64>;
}

/// Assay ids in a plain-text listing: every non-empty line after the header.
pub fn count_assay_lines(body: &str) -> u64 {
    let lines = body.lines().filter(|l| !l.trim().is_empty()).count() as u64;
    lines.saturating_sub(1)
}

// ── PubChem ─────────────────────────────────────────────────────────────────

pub struct PubChemBioassayProvider {
    client: Client,
    url_template: String,
}

impl PubChemBioassayProvider {
    /// `config.api_url` holds a `{}` placeholder for the accession.
    pub fn new(config: &BioassayConfig) -> Result<Self> {
        if !config.api_url.contains("{}") {
            return Err(DifError::Config(format!(
                "bioassay api_url has no accession placeholder: {}",
                config.api_url
            )));
        }
        Ok(Self {
            client: Client::builder().build()?,
            url_template: config.api_url.clone(),
        })
    }

    pub fn url_for(&self, accession: &str) -> String {
        self.url_template.replacen("{}", accession, 1)
    }
}

#[async_trait]
impl BioassayProvider for PubChemBioassayProvider {
    #[instrument(skip(self))]
    async fn count_assays(&self, accession: &str) -> Result<u64> {
        let url = self.url_for(accession);
        let body = self.client.get(&url).send().await?.error_for_status()?.text().await?;
        let count = count_assay_lines(&body);
        debug!(count, "Bioassays counted");
        Ok(count)
    }
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Mock provider with fixed counts. Unknown accessions have no assays.
pub struct MockBioassayProvider {
    counts: HashMap<String, u64>,
    calls: Mutex<Vec<String>>,
}

impl MockBioassayProvider {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, accession: &str, count: u64) -> Self {
        self.counts.insert(accession.to_string(), count);
        self
    }

    /// Accessions asked for, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for MockBioassayProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BioassayProvider for MockBioassayProvider {
    async fn count_assays(&self, accession: &str) -> Result<u64> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(accession.to_string());
        }
        Ok(self.counts.get(accession).copied().unwrap_or(0))
    }
}
