//! Rate-history provider integration.
//!
//! The provider exposes an HTTP timeseries endpoint taking
//! `{start_date, end_date, base, symbols}` and returning
//! `{ "rates": { "<date>": { "<symbol>": <number>, ... }, ... } }`.
//! We only depend on that shape; everything else in the response is ignored.

use std::collections::HashMap;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::RatePoint;
use crate::error::AppError;

const BASE_URL: &str = "https://api.exchangerate.host/timeseries";

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    /// Absent when the provider rejects the request or has no data.
    rates: Option<HashMap<String, HashMap<String, f64>>>,
}

pub struct RateClient {
    client: Client,
}

impl RateClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Fetch daily rates for `base`/`quote` over an inclusive date range,
    /// sorted ascending by date.
    pub fn fetch_series(
        &self,
        base: &str,
        quote: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RatePoint>, AppError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("start_date", start.to_string().as_str()),
                ("end_date", end.to_string().as_str()),
                ("base", base),
                ("symbols", quote),
            ])
            .send()
            .map_err(|e| AppError::data(format!("Rate provider request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data(format!(
                "Rate provider request failed with status {}.",
                resp.status()
            )));
        }

        let body: TimeseriesResponse = resp
            .json()
            .map_err(|e| AppError::data(format!("Failed to parse provider response: {e}")))?;

        series_from_response(body, quote)
    }
}

impl Default for RateClient {
    fn default() -> Self {
        Self::new()
    }
}

fn series_from_response(
    body: TimeseriesResponse,
    quote: &str,
) -> Result<Vec<RatePoint>, AppError> {
    let rates = body
        .rates
        .ok_or_else(|| AppError::data("Provider response has no rate table."))?;

    series_from_rates(&rates, quote)
}

/// Turn the provider's date→symbol→rate table into an ascending series.
///
/// Days whose entry lacks the requested symbol are skipped (the provider
/// omits symbols on some days); if nothing survives that is a data error.
fn series_from_rates(
    rates: &HashMap<String, HashMap<String, f64>>,
    quote: &str,
) -> Result<Vec<RatePoint>, AppError> {
    let mut out = Vec::with_capacity(rates.len());
    for (raw_date, by_symbol) in rates {
        let Some(&rate) = by_symbol.get(quote) else {
            continue;
        };
        if !(rate.is_finite() && rate > 0.0) {
            return Err(AppError::data(format!(
                "Invalid rate {rate} for {quote} on {raw_date}."
            )));
        }
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|e| AppError::data(format!("Invalid provider date '{raw_date}': {e}")))?;
        out.push(RatePoint { date, rate });
    }

    if out.is_empty() {
        return Err(AppError::data(format!(
            "Provider returned no usable rates for {quote}."
        )));
    }

    out.sort_by_key(|p| p.date);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(json: &str) -> TimeseriesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_rate_table_is_a_data_error() {
        let body = parse(r#"{"success": false}"#);
        let err = series_from_response(body, "USD").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn series_is_sorted_ascending_by_date() {
        let body = parse(
            r#"{"rates": {
                "2026-03-02": {"USD": 1.07},
                "2026-03-01": {"USD": 1.05},
                "2026-03-03": {"USD": 1.06}
            }}"#,
        );
        let series = series_from_response(body, "USD").unwrap();
        let dates: Vec<String> = series.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2026-03-01", "2026-03-02", "2026-03-03"]);
        assert_eq!(series[0].rate, 1.05);
    }

    #[test]
    fn days_without_the_symbol_are_skipped() {
        let body = parse(
            r#"{"rates": {
                "2026-03-01": {"USD": 1.05},
                "2026-03-02": {"GBP": 0.84},
                "2026-03-03": {"USD": 1.06}
            }}"#,
        );
        let series = series_from_response(body, "USD").unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn all_days_missing_the_symbol_is_a_data_error() {
        let body = parse(r#"{"rates": {"2026-03-01": {"GBP": 0.84}}}"#);
        let err = series_from_response(body, "USD").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn unparsable_date_is_a_data_error() {
        let body = parse(r#"{"rates": {"03/01/2026": {"USD": 1.05}}}"#);
        let err = series_from_response(body, "USD").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }
}
