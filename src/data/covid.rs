//! COVID Tracking Project API integration.
//!
//! Two read-only endpoints are consumed, each a JSON array of per-day
//! records ordered newest first:
//!
//! - `us/daily.json` — nationwide daily records
//! - `states/daily.json` — per-state daily records

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{DailyRecord, NATIONAL_REGION, RegionIndex, Series};
use crate::error::AppError;

const BASE_URL: &str = "https://api.covidtracking.com/v1";
const NATIONAL_ENDPOINT: &str = "us/daily.json";
const STATES_ENDPOINT: &str = "states/daily.json";

/// The feed's single timestamp format. Trailing zone designators are ignored.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT_LEN: usize = 19;

#[derive(Clone)]
pub struct CovidClient {
    client: Client,
    base_url: String,
}

impl CovidClient {
    /// Build a client, honoring a `COVID_API_BASE_URL` override from the
    /// environment (`.env` supported).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("COVID_API_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch the nationwide daily series.
    pub fn fetch_national(&self) -> Result<Series, AppError> {
        let records = self.fetch_daily(NATIONAL_ENDPOINT)?;
        Ok(Series::from_unordered(records))
    }

    /// Fetch the per-state daily records and group them by region.
    pub fn fetch_regional(&self) -> Result<RegionIndex, AppError> {
        let records = self.fetch_daily(STATES_ENDPOINT)?;
        Ok(RegionIndex::from_records(records))
    }

    fn fetch_daily(&self, endpoint: &str) -> Result<Vec<DailyRecord>, AppError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::data(format!("Request to {endpoint} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data(format!(
                "Request to {endpoint} failed with status {}.",
                resp.status()
            )));
        }

        let rows: Vec<RawDaily> = resp
            .json()
            .map_err(|e| AppError::data(format!("Failed to parse {endpoint} response: {e}")))?;

        Ok(parse_daily(rows))
    }
}

/// Raw feed row. Counts may be absent or negative in the source data; both
/// are normalized during parsing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDaily {
    date_checked: Option<String>,
    positive_increase: Option<i64>,
    negative_increase: Option<i64>,
    death_increase: Option<i64>,
    state: Option<String>,
}

/// Convert raw rows to records, oldest first.
///
/// Rows with a missing or undecodable timestamp are skipped. National rows
/// carry no `state` field and are tagged with the `US` region identifier.
fn parse_daily(rows: Vec<RawDaily>) -> Vec<DailyRecord> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows.into_iter().rev() {
        let Some(date) = row.date_checked.as_deref().and_then(parse_date) else {
            continue;
        };
        out.push(DailyRecord {
            date,
            new_positive: clamp_count(row.positive_increase),
            new_negative: clamp_count(row.negative_increase),
            new_deaths: clamp_count(row.death_increase),
            region: row.state.unwrap_or_else(|| NATIONAL_REGION.to_string()),
        });
    }
    out
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let head = trimmed.get(..DATE_FORMAT_LEN).unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(head, DATE_FORMAT)
        .ok()
        .map(|dt| dt.date())
}

/// Daily increases are non-negative by contract; the feed occasionally
/// reports revisions as negative values, which clamp to zero.
fn clamp_count(raw: Option<i64>) -> u32 {
    raw.unwrap_or(0).clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_single_format() {
        assert_eq!(
            parse_date("2021-03-07T00:00:00"),
            NaiveDate::from_ymd_opt(2021, 3, 7)
        );
        // Trailing zone designator ignored.
        assert_eq!(
            parse_date("2021-03-07T20:00:00Z"),
            NaiveDate::from_ymd_opt(2021, 3, 7)
        );
        assert_eq!(parse_date("2021-03-07"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn clamp_count_normalizes_missing_and_negative() {
        assert_eq!(clamp_count(None), 0);
        assert_eq!(clamp_count(Some(-42)), 0);
        assert_eq!(clamp_count(Some(1234)), 1234);
    }

    #[test]
    fn parse_daily_reverses_to_oldest_first_and_skips_undated_rows() {
        let body = r#"[
            {"dateChecked":"2021-03-07T00:00:00Z","positiveIncrease":2,"negativeIncrease":20,"deathIncrease":1,"state":"WA"},
            {"dateChecked":null,"positiveIncrease":99,"negativeIncrease":99,"deathIncrease":99,"state":"WA"},
            {"dateChecked":"2021-03-06T00:00:00Z","positiveIncrease":9,"negativeIncrease":90,"deathIncrease":4,"state":"WA"},
            {"dateChecked":"2021-03-05T00:00:00Z","positiveIncrease":5,"negativeIncrease":-3,"deathIncrease":0}
        ]"#;

        let rows: Vec<RawDaily> = serde_json::from_str(body).unwrap();
        let records = parse_daily(rows);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2021, 3, 5).unwrap());
        assert_eq!(records[2].date, NaiveDate::from_ymd_opt(2021, 3, 7).unwrap());
        // Row without a state field is tagged as national.
        assert_eq!(records[0].region, NATIONAL_REGION);
        assert_eq!(records[0].new_negative, 0);
        assert_eq!(records[1].new_positive, 9);
        assert_eq!(records[2].new_positive, 2);
    }
}
