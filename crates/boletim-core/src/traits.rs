use crate::{error::SkillError, snapshot::CovidSnapshot};
use async_trait::async_trait;

/// Source of COVID-19 statistics.
///
/// The HTTP client in `boletim-data` implements this; handlers only see the
/// trait, so tests can swap in canned data.
#[async_trait]
pub trait CovidSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Fetch the current snapshot for a spoken state name, or for the whole
    /// country when `state` is `None`.
    ///
    /// Performs exactly one upstream call. Connection failures surface as
    /// `SkillError::Network`; an empty result as `SkillError::NoDataAvailable`.
    async fn fetch_snapshot(&self, state: Option<&str>) -> Result<CovidSnapshot, SkillError>;

    /// Check whether the upstream endpoints answer at all.
    async fn is_available(&self) -> bool;
}
