// src/models/alert.rs

//! Alert data structure.

/// A single active alert from the feed.
///
/// Built by the parser once per cycle and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertRecord {
    /// Feed-wide unique identifier (a URN for NWS alerts)
    pub id: String,

    /// Event name, e.g. "Tornado Warning"
    pub event: String,

    pub headline: String,

    /// Free-text description, may be long
    pub description: String,

    /// Human-readable list of affected areas
    pub area_desc: String,

    /// Extreme, Severe, Moderate, Minor or Unknown
    pub severity: String,

    pub urgency: String,

    pub certainty: String,

    /// Issuing office
    pub sender_name: String,

    /// RFC 3339 timestamp the alert takes effect
    pub effective: String,

    /// RFC 3339 timestamp the alert expires
    pub expires: String,
}

impl AlertRecord {
    /// Title used for notifications: `"<event> - <severity>"`.
    pub fn title(&self) -> String {
        format!("{} - {}", self.event, self.severity)
    }
}
