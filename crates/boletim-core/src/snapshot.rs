use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Most recent known case and death counts for one geography.
///
/// Fetched fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CovidSnapshot {
    /// Two-letter state code, or `None` for the country aggregate.
    pub state: Option<String>,
    pub confirmed: u64,
    pub deaths: u64,
    /// Date the upstream attached to the record, when it sent one.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl CovidSnapshot {
    /// Human-readable geography label for logs and CLI output.
    pub fn label(&self) -> &str {
        self.state.as_deref().unwrap_or("BR")
    }
}
