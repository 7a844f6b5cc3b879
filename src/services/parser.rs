// src/services/parser.rs

//! Alert feed decoding.
//!
//! The feed is a GeoJSON `FeatureCollection`. Only `features[].id` and a
//! handful of `properties` are read; everything else is ignored.

use serde::Deserialize;

use crate::error::ParseError;
use crate::models::AlertRecord;

#[derive(Deserialize)]
struct FeedDocument {
    #[serde(default)]
    features: Option<Vec<Feature>>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct Properties {
    id: Option<String>,
    event: Option<String>,
    headline: Option<String>,
    description: Option<String>,
    area_desc: Option<String>,
    severity: Option<String>,
    urgency: Option<String>,
    certainty: Option<String>,
    sender_name: Option<String>,
    effective: Option<String>,
    expires: Option<String>,
}

impl Feature {
    fn into_record(self) -> Option<AlertRecord> {
        let props = self.properties.unwrap_or_default();

        // The feature id and properties.id carry the same URN in NWS data
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .or(props.id)
            .filter(|id| !id.trim().is_empty())?;

        Some(AlertRecord {
            id,
            event: props.event.unwrap_or_default(),
            headline: props.headline.unwrap_or_default(),
            description: props.description.unwrap_or_default(),
            area_desc: props.area_desc.unwrap_or_default(),
            severity: props.severity.unwrap_or_default(),
            urgency: props.urgency.unwrap_or_default(),
            certainty: props.certainty.unwrap_or_default(),
            sender_name: props.sender_name.unwrap_or_default(),
            effective: props.effective.unwrap_or_default(),
            expires: props.expires.unwrap_or_default(),
        })
    }
}

/// Decode a feed document into alert records.
///
/// An empty or missing `features` list is zero active alerts. Features
/// without any identifier cannot be deduplicated and are skipped.
pub fn parse(bytes: &[u8]) -> Result<Vec<AlertRecord>, ParseError> {
    let document: FeedDocument =
        serde_json::from_slice(bytes).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let mut alerts = Vec::new();
    for feature in document.features.unwrap_or_default() {
        match feature.into_record() {
            Some(alert) => alerts.push(alert),
            None => log::warn!("Skipping alert feature without an id"),
        }
    }

    Ok(alerts)
}
