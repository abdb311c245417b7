//! Target symbol normalisation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A target symbol as typed by the user.
///
/// Cache keys always use [`TargetName::canonical`]; graph queries match every
/// spelling in [`TargetName::variants`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetName(String);

impl TargetName {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into().trim().to_string())
    }

    pub fn canonical(&self) -> String {
        self.0.to_uppercase()
    }

    /// As given, upper case, lower case and capitalised, without duplicates.
    pub fn variants(&self) -> Vec<String> {
        let lower = self.0.to_lowercase();
        let mut chars = lower.chars();
        let capitalised = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };

        let mut out: Vec<String> = Vec::with_capacity(4);
        for v in [self.0.clone(), self.canonical(), lower, capitalised] {
            if !out.contains(&v) {
                out.push(v);
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
