use crate::types::{AssetRef, BoundingBox, FetchError, FetchResult, Polarization, SceneRecord};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

/// Default STAC endpoint hosting the public Sentinel-1 GRD collection
pub const EARTH_SEARCH_URL: &str = "https://earth-search.aws.element84.com/v1";

/// Client for a STAC-style catalog search endpoint
pub struct StacClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl StacClient {
    /// Create a client for the given catalog endpoint
    pub fn new(endpoint: &str) -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("sarfetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Processing(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Search one collection within a spatial box and closed time interval.
    ///
    /// Issues a single search request and materializes every returned item
    /// eagerly into a [`SceneRecord`]. An unreachable catalog or a malformed
    /// payload is terminal for the call; nothing is retried here.
    pub fn search(
        &self,
        collection: &str,
        bbox: &BoundingBox,
        interval: (DateTime<Utc>, DateTime<Utc>),
        limit: usize,
    ) -> FetchResult<Vec<SceneRecord>> {
        let url = format!("{}/search", self.endpoint);
        let body = json!({
            "collections": [collection],
            "bbox": bbox.to_array(),
            "datetime": format!(
                "{}/{}",
                interval.0.format("%Y-%m-%dT%H:%M:%SZ"),
                interval.1.format("%Y-%m-%dT%H:%M:%SZ")
            ),
            "limit": limit,
        });
        log::debug!("catalog search: {} {}", url, body);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| FetchError::CatalogUnavailable(format!("search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::CatalogUnavailable(format!(
                "search returned HTTP {}",
                status.as_u16()
            )));
        }

        let payload = response
            .text()
            .map_err(|e| FetchError::CatalogUnavailable(format!("failed to read search response: {}", e)))?;

        parse_item_collection(&payload)
    }
}

#[derive(Deserialize)]
struct ItemCollection {
    features: Vec<Item>,
}

#[derive(Deserialize)]
struct Item {
    id: String,
    #[serde(default)]
    properties: ItemProperties,
    #[serde(default)]
    assets: HashMap<String, Asset>,
}

#[derive(Deserialize, Default)]
struct ItemProperties {
    datetime: Option<String>,
}

#[derive(Deserialize)]
struct Asset {
    href: String,
}

/// Decode a catalog item collection into scene records.
///
/// Asset keys outside the recognized polarization set are dropped here, so a
/// record's asset map only ever holds `vv`/`vh` entries.
fn parse_item_collection(payload: &str) -> FetchResult<Vec<SceneRecord>> {
    let collection: ItemCollection = serde_json::from_str(payload)
        .map_err(|e| FetchError::CatalogUnavailable(format!("malformed search response: {}", e)))?;

    let records = collection
        .features
        .into_iter()
        .map(|item| {
            let acquired = item
                .properties
                .datetime
                .as_deref()
                .and_then(|value| parse_acquisition(&item.id, value));

            let mut assets = HashMap::new();
            for (key, asset) in item.assets {
                if let Some(pol) = Polarization::from_asset_key(&key) {
                    assets.insert(pol, AssetRef { href: asset.href });
                }
            }

            SceneRecord {
                id: item.id,
                acquired,
                assets,
            }
        })
        .collect();

    Ok(records)
}

/// Parse an item timestamp, requiring an explicit UTC offset.
///
/// A timestamp without timezone information is rejected: the record keeps no
/// acquisition instant instead of being silently coerced to UTC.
fn parse_acquisition(id: &str, value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            log::warn!("item {}: unusable datetime {:?}: {}", id, value, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "id": "S1A_IW_GRDH_1SDV_20230602T012345",
                "properties": {"datetime": "2023-06-02T01:23:45Z"},
                "assets": {
                    "vv": {"href": "s3://sentinel-s1-l1c/GRD/vv.tiff"},
                    "vh": {"href": "s3://sentinel-s1-l1c/GRD/vh.tiff"},
                    "thumbnail": {"href": "https://example.com/thumb.png"}
                }
            },
            {
                "id": "S1A_IW_GRDH_1SDV_20230528T000000",
                "properties": {"datetime": "2023-05-28T00:00:00"},
                "assets": {
                    "vv": {"href": "https://example.com/vv.tiff"}
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_items_into_records() {
        let records = parse_item_collection(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.id, "S1A_IW_GRDH_1SDV_20230602T012345");
        assert_eq!(
            first.acquired,
            Some(Utc.with_ymd_and_hms(2023, 6, 2, 1, 23, 45).unwrap())
        );
        assert_eq!(
            first.asset(Polarization::VV).unwrap().href,
            "s3://sentinel-s1-l1c/GRD/vv.tiff"
        );
        assert!(first.asset(Polarization::VH).is_some());
        // unrecognized asset keys never enter the record
        assert_eq!(first.assets.len(), 2);
    }

    #[test]
    fn test_naive_timestamp_is_rejected() {
        let records = parse_item_collection(SAMPLE).unwrap();
        let second = &records[1];
        assert_eq!(second.acquired, None);
        assert!(second.asset(Polarization::VH).is_none());
    }

    #[test]
    fn test_offset_timestamp_normalizes_to_utc() {
        let payload = r#"{"features": [{
            "id": "S1A_OFFSET",
            "properties": {"datetime": "2023-06-02T10:23:45+09:00"},
            "assets": {}
        }]}"#;
        let records = parse_item_collection(payload).unwrap();
        assert_eq!(
            records[0].acquired,
            Some(Utc.with_ymd_and_hms(2023, 6, 2, 1, 23, 45).unwrap())
        );
    }

    #[test]
    fn test_malformed_payload_is_catalog_unavailable() {
        let err = parse_item_collection("not json at all").unwrap_err();
        assert!(matches!(err, FetchError::CatalogUnavailable(_)));

        // a JSON document without a feature list is just as unusable
        let err = parse_item_collection("{}").unwrap_err();
        assert!(matches!(err, FetchError::CatalogUnavailable(_)));
    }

    #[test]
    fn test_empty_feature_list() {
        let records = parse_item_collection(r#"{"features": []}"#).unwrap();
        assert!(records.is_empty());
    }
}
