//! HTTP client for the two upstream COVID-19 datasets.
//!
//! The country aggregate comes from covid19api (a JSON array of daily
//! snapshots since day one); per-state figures come from the brasil.io
//! `caso` dataset filtered to the latest record.

use async_trait::async_trait;
use boletim_core::{
    config::DataConfig, error::SkillError, snapshot::CovidSnapshot, traits::CovidSource,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::states::{region_for, Region, COUNTRY_CODE};

/// Upstream client. Cheap to clone; shares one connection pool.
#[derive(Clone)]
pub struct CovidClient {
    client: reqwest::Client,
    country_url: String,
    states_url: String,
    api_token: Option<String>,
}

impl CovidClient {
    /// Create from config values.
    pub fn from_config(cfg: &DataConfig) -> Result<Self, SkillError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("boletim/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SkillError::Config(format!("failed to build http client: {e}")))?;
        let api_token = Some(cfg.api_token.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Ok(Self {
            client,
            country_url: cfg.country_url.clone(),
            states_url: cfg.states_url.clone(),
            api_token,
        })
    }

    /// Latest country snapshot: the last element of the day-one series.
    pub async fn fetch_country(&self) -> Result<CovidSnapshot, SkillError> {
        debug!("covid19api: GET {}", self.country_url);

        let resp = self
            .client
            .get(&self.country_url)
            .send()
            .await
            .map_err(network_error)?;
        let resp = check_status(resp, "covid19api").await?;

        let series: Vec<CountryDay> = resp
            .json()
            .await
            .map_err(|e| SkillError::Upstream(format!("covid19api: failed to parse response: {e}")))?;

        let last = series
            .into_iter()
            .last()
            .ok_or_else(|| SkillError::NoDataAvailable(COUNTRY_CODE.to_string()))?;

        Ok(CovidSnapshot {
            state: None,
            confirmed: last.confirmed.unwrap_or_default(),
            deaths: last.deaths.unwrap_or_default(),
            as_of: last.date.map(|d| d.date_naive()),
        })
    }

    /// Latest snapshot for one state, by code (or raw spoken text).
    pub async fn fetch_state(&self, code: &str) -> Result<CovidSnapshot, SkillError> {
        debug!("brasil.io: GET {} state={code}", self.states_url);

        let resp = self
            .states_request()
            .query(&[("state", code)])
            .send()
            .await
            .map_err(network_error)?;
        let resp = check_status(resp, "brasil.io").await?;

        let page: StatesPage = resp
            .json()
            .await
            .map_err(|e| SkillError::Upstream(format!("brasil.io: failed to parse response: {e}")))?;

        page.results
            .into_iter()
            .next()
            .map(StateRecord::into_snapshot)
            .ok_or_else(|| SkillError::NoDataAvailable(code.to_string()))
    }

    /// Latest snapshot of every state, in upstream order.
    pub async fn latest_by_state(&self) -> Result<Vec<CovidSnapshot>, SkillError> {
        debug!("brasil.io: GET {} (all states)", self.states_url);

        let resp = self.states_request().send().await.map_err(network_error)?;
        let resp = check_status(resp, "brasil.io").await?;

        let page: StatesPage = resp
            .json()
            .await
            .map_err(|e| SkillError::Upstream(format!("brasil.io: failed to parse response: {e}")))?;

        if page.results.is_empty() {
            return Err(SkillError::NoDataAvailable("all states".to_string()));
        }
        Ok(page
            .results
            .into_iter()
            .map(StateRecord::into_snapshot)
            .collect())
    }

    /// Base state-endpoint request: latest record per state, JSON.
    fn states_request(&self) -> reqwest::RequestBuilder {
        let req = self.client.get(&self.states_url).query(&[
            ("place_type", "state"),
            ("is_last", "True"),
            ("format", "json"),
        ]);
        match self.api_token {
            Some(ref token) => req.header("Authorization", format!("Token {token}")),
            None => req,
        }
    }

    async fn probe(&self, req: reqwest::RequestBuilder, name: &str) -> bool {
        match req.send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("{name} not available: status {}", resp.status());
                false
            }
            Err(e) => {
                warn!("{name} not available: {e}");
                false
            }
        }
    }
}

// --- Serde types ---

/// One day of the covid19api country series.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CountryDay {
    #[serde(default)]
    confirmed: Option<u64>,
    #[serde(default)]
    deaths: Option<u64>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct StatesPage {
    #[serde(default)]
    results: Vec<StateRecord>,
}

/// One row of the brasil.io `caso` dataset.
#[derive(Deserialize)]
struct StateRecord {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    confirmed: Option<u64>,
    #[serde(default)]
    deaths: Option<u64>,
    #[serde(default)]
    date: Option<NaiveDate>,
}

impl StateRecord {
    fn into_snapshot(self) -> CovidSnapshot {
        CovidSnapshot {
            state: self.state,
            confirmed: self.confirmed.unwrap_or_default(),
            deaths: self.deaths.unwrap_or_default(),
            as_of: self.date,
        }
    }
}

fn network_error(e: reqwest::Error) -> SkillError {
    if e.is_timeout() {
        SkillError::Network(format!("request timed out: {e}"))
    } else {
        SkillError::Network(format!("request failed: {e}"))
    }
}

async fn check_status(resp: reqwest::Response, name: &str) -> Result<reqwest::Response, SkillError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(SkillError::Upstream(format!("{name} returned {status}: {text}")))
}

#[async_trait]
impl CovidSource for CovidClient {
    fn name(&self) -> &str {
        "brasil.io+covid19api"
    }

    async fn fetch_snapshot(&self, state: Option<&str>) -> Result<CovidSnapshot, SkillError> {
        match region_for(state) {
            Region::Country => self.fetch_country().await,
            Region::State { code, known } => {
                if !known {
                    warn!(
                        "state '{code}' not in the state table, passing it through as the query value"
                    );
                }
                self.fetch_state(&code).await
            }
        }
    }

    async fn is_available(&self) -> bool {
        let country = self
            .probe(self.client.get(&self.country_url), "covid19api")
            .await;
        let states = self
            .probe(self.states_request().query(&[("state", "SP")]), "brasil.io")
            .await;
        info!("upstream availability: covid19api={country} brasil.io={states}");
        country && states
    }
}
