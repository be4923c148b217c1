use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, LINK};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use crate::app::ports::FlightSourcePort;
use crate::config::{ApiConfig, ApiCredentials};
use crate::error::{PipelineError, Result};
use crate::observability::metrics;
use crate::pipeline::processing::normalize::{select_operated_flights, RawFlight};

static LAST_PAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"page=(\d+)>; rel="last""#).expect("valid last-page regex"));

/// One page of the public-flights `/flights` endpoint
#[derive(Debug, Default, Deserialize)]
pub struct FlightPage {
    #[serde(default)]
    pub flights: Vec<Value>,
}

/// Paginated client for the Schiphol public-flights API.
pub struct SchipholFlightSource {
    client: reqwest::Client,
    config: ApiConfig,
    credentials: ApiCredentials,
}

impl SchipholFlightSource {
    pub fn new(config: ApiConfig, credentials: ApiCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    fn flights_url(&self) -> String {
        format!("{}/flights", self.config.base_url.trim_end_matches('/'))
    }

    /// Fetch one page; returns its flights and the last page index, if advertised.
    async fn fetch_page(&self, date: NaiveDate, page: u32) -> Result<(FlightPage, Option<u32>)> {
        let response = self
            .client
            .get(self.flights_url())
            .header(ACCEPT, "application/json")
            .header("resourceversion", &self.config.resource_version)
            .header("app_id", &self.credentials.app_id)
            .header("app_key", &self.credentials.app_key)
            .query(&[
                ("scheduleDate", date.format("%Y-%m-%d").to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::upstream(format!("page {}: {}", page, e)))?;

        let status = response.status();
        let last_page = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(last_page_from_link);

        if status == StatusCode::NO_CONTENT {
            return Ok((FlightPage::default(), last_page));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::upstream(format!(
                "page {}: HTTP {}: {}",
                page,
                status.as_u16(),
                body
            )));
        }

        let page_body: FlightPage = response
            .json()
            .await
            .map_err(|e| PipelineError::upstream(format!("page {}: invalid body: {}", page, e)))?;
        Ok((page_body, last_page))
    }
}

#[async_trait]
impl FlightSourcePort for SchipholFlightSource {
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    async fn fetch_flights(&self, date: NaiveDate) -> Result<Vec<RawFlight>> {
        let started = Instant::now();
        let (first_page, last_page) = self.fetch_page(date, 0).await?;
        let last_page = last_page.unwrap_or(0);
        info!("Fetching {} page(s) of flights for {}", last_page + 1, date);

        let mut all_flights = Vec::new();
        collect_page(first_page, &mut all_flights);

        for page in 1..=last_page {
            tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
            let (page_body, _) = self.fetch_page(date, page).await?;
            collect_page(page_body, &mut all_flights);
            debug!("Fetched page {}/{}", page, last_page);
        }

        metrics::extract::duration(started.elapsed().as_secs_f64());
        info!("Fetched {} operated flights for {}", all_flights.len(), date);
        Ok(all_flights)
    }
}

fn collect_page(page: FlightPage, into: &mut Vec<RawFlight>) {
    let fetched = page.flights.len();
    let operated = select_operated_flights(page.flights);
    metrics::extract::page_fetched(operated.len(), fetched - operated.len());
    into.extend(operated);
}

/// Last page index from a `Link` header (`<...page=12>; rel="last"`).
pub fn last_page_from_link(link: &str) -> Option<u32> {
    LAST_PAGE_RE
        .captures(link)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
