//! `OpenCage` reverse-geocoding client.
//!
//! Queries the `OpenCage` Data API with a `"{lat}+{lng}"` query and takes
//! the top-ranked result. An empty `results` array means "no data", not
//! an error.
//!
//! See <https://opencagedata.com/api>

use async_trait::async_trait;

use crate::{GeocodeError, ProviderAddress, ReverseGeocoder};

/// Public `OpenCage` API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// Reverse-geocoding client for the `OpenCage` Data API.
#[derive(Debug, Clone)]
pub struct OpenCageClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenCageClient {
    /// Creates a client for the given endpoint and API key.
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl ReverseGeocoder for OpenCageClient {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<ProviderAddress>, GeocodeError> {
        let query = format!("{lat}+{lng}");
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query.as_str()),
                ("key", self.api_key.as_str()),
                ("language", "en"),
                ("pretty", "1"),
            ])
            .send()
            .await?;

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Parses an `OpenCage` JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<ProviderAddress>, GeocodeError> {
    let results = body["results"]
        .as_array()
        .ok_or_else(|| GeocodeError::Parse {
            message: "OpenCage response has no results array".to_string(),
        })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let formatted = first["formatted"]
        .as_str()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing formatted address in OpenCage response".to_string(),
        })?
        .to_string();

    let components = first
        .get("components")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| GeocodeError::Parse {
            message: format!("Bad components in OpenCage response: {e}"),
        })?
        .unwrap_or_default();

    let confidence = first["confidence"]
        .as_u64()
        .and_then(|v| u8::try_from(v.min(10)).ok())
        .unwrap_or(5);

    Ok(Some(ProviderAddress {
        formatted,
        components,
        confidence,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_opencage_result() {
        let body = serde_json::json!({
            "results": [{
                "formatted": "Connaught Place, New Delhi, Delhi 110001, India",
                "components": {
                    "neighbourhood": "Connaught Place",
                    "city": "New Delhi",
                    "postcode": "110001",
                    "country": "India"
                },
                "confidence": 8
            }]
        });
        let result = parse_response(&body).unwrap().unwrap();
        assert_eq!(
            result.formatted,
            "Connaught Place, New Delhi, Delhi 110001, India"
        );
        assert_eq!(
            result.components.neighbourhood.as_deref(),
            Some("Connaught Place")
        );
        assert_eq!(result.confidence, 8);
    }

    #[test]
    fn parses_opencage_empty() {
        let body = serde_json::json!({"results": []});
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn missing_results_is_parse_error() {
        let body = serde_json::json!({"status": {"code": 402, "message": "quota exceeded"}});
        assert!(parse_response(&body).is_err());
    }

    #[test]
    fn ignores_unknown_component_keys() {
        let body = serde_json::json!({
            "results": [{
                "formatted": "Rohini, Delhi, India",
                "components": {
                    "neighbourhood": "Rohini",
                    "ISO_3166-1_alpha-2": "IN",
                    "_category": "place"
                },
                "confidence": 9
            }]
        });
        let result = parse_response(&body).unwrap().unwrap();
        assert_eq!(result.components.neighbourhood.as_deref(), Some("Rohini"));
    }

    #[test]
    fn clamps_out_of_range_confidence() {
        let body = serde_json::json!({
            "results": [{"formatted": "Delhi, India", "confidence": 200}]
        });
        let result = parse_response(&body).unwrap().unwrap();
        assert_eq!(result.confidence, 10);
    }

    #[test]
    fn defaults_missing_confidence() {
        let body = serde_json::json!({
            "results": [{"formatted": "Delhi, India"}]
        });
        let result = parse_response(&body).unwrap().unwrap();
        assert_eq!(result.confidence, 5);
    }
}
