//! Firebase Realtime Database reading store (REST API).
//!
//! Records live under a single path, keyed by push ids, each carrying a
//! numeric `timestamp` child that the queries order by. Queries use the REST
//! filtering parameters, which require string values to be JSON-quoted:
//! `orderBy="timestamp"&startAt=<a>&endAt=<b>`.

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::Reading;

// ---

#[derive(Debug, Clone)]
pub struct FirebaseStore {
    client: reqwest::Client,
    base_url: String,
    path: String,
}

impl FirebaseStore {
    pub fn new(client: reqwest::Client, base_url: &str, path: &str) -> Self {
        FirebaseStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            path: path.trim_matches('/').to_string(),
        }
    }

    /// REST endpoint for the readings path, e.g. `https://db.example/test.json`.
    fn endpoint(&self) -> String {
        format!("{}/{}.json", self.base_url, self.path)
    }

    pub async fn readings_between(&self, start: i64, end: i64) -> Result<Vec<Reading>> {
        // ---
        let query = [
            ("orderBy", "\"timestamp\"".to_string()),
            ("startAt", start.to_string()),
            ("endAt", end.to_string()),
        ];
        let body = self.get(&query).await?;
        Ok(parse_records(&body))
    }

    pub async fn latest(&self) -> Result<Option<Reading>> {
        // ---
        let query = [
            ("orderBy", "\"timestamp\"".to_string()),
            ("limitToLast", "1".to_string()),
        ];
        let body = self.get(&query).await?;
        Ok(parse_records(&body)
            .into_iter()
            .max_by_key(|r| r.timestamp))
    }

    async fn get(&self, query: &[(&str, String)]) -> Result<Value> {
        // ---
        let url = self.endpoint();
        tracing::debug!("Querying Firebase: {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("Firebase request to '{}' failed: {}", url, e))?;

        if !response.status().is_success() {
            return Err(anyhow!("Firebase API error: {}", response.status()));
        }

        Ok(response.json().await?)
    }
}

/// Extract readings from a Firebase query body.
///
/// The body is `null` when nothing matches, an object keyed by push id
/// otherwise, or an array when the keys happen to be small integers.
/// Entries that do not parse as a [`Reading`] are skipped.
fn parse_records(body: &Value) -> Vec<Reading> {
    // ---
    let entries: Vec<(String, &Value)> = match body {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::debug!("Unexpected Firebase body, ignoring: {}", other);
            Vec::new()
        }
    };

    entries
        .into_iter()
        .filter_map(|(key, item)| match serde_json::from_value::<Reading>(item.clone()) {
            Ok(reading) => Some(reading),
            Err(e) => {
                tracing::debug!("Failed to parse record {}: {} - Raw item: {}", key, e, item);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keyed_object() {
        // ---
        let body = json!({
            "-NxA1": {"timestamp": 1714564800, "ph": 7.2, "temperature": 25.1, "tds": 140, "turbidity": 2.5},
            "-NxA2": {"timestamp": 1714565100, "ph": 7.0},
            "-NxA3": {"ph": 6.9},
            "-NxA4": "garbage"
        });

        let mut readings = parse_records(&body);
        readings.sort_by_key(|r| r.timestamp);

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].tds, Some(140.0));
        assert_eq!(readings[1].temperature, None);
    }

    #[test]
    fn test_malformed_field_keeps_rest_of_record() {
        // ---
        let body = json!({
            "-a": {"timestamp": 1714564800, "ph": "n/a", "temperature": 25.0},
            "-b": {"timestamp": 1714565100.0, "tds": 120}
        });

        let mut readings = parse_records(&body);
        readings.sort_by_key(|r| r.timestamp);

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].ph, None);
        assert_eq!(readings[0].temperature, Some(25.0));
        assert_eq!(readings[1].timestamp, 1_714_565_100);
        assert_eq!(readings[1].tds, Some(120.0));
    }

    #[test]
    fn test_parse_null_and_array_bodies() {
        // ---
        assert!(parse_records(&Value::Null).is_empty());

        let body = json!([null, {"timestamp": 10, "turbidity": 4.0}]);
        let readings = parse_records(&body);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].turbidity, Some(4.0));
    }

    #[test]
    fn test_endpoint_normalizes_slashes() {
        // ---
        let store = FirebaseStore::new(
            reqwest::Client::new(),
            "https://water.example.firebasedatabase.app/",
            "/test/",
        );
        assert_eq!(
            store.endpoint(),
            "https://water.example.firebasedatabase.app/test.json"
        );
    }
}
