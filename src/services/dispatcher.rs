// src/services/dispatcher.rs

//! Alert formatting and delivery.

use std::sync::Arc;

use chrono::DateTime;

use crate::error::DispatchError;
use crate::models::AlertRecord;
use crate::notify::{Embed, EmbedField, MessageSender};

/// Maximum characters of description shown in the Details field.
pub const DETAILS_LIMIT: usize = 1000;

const COLOR_EXTREME: u32 = 0xFF0000;
const COLOR_SEVERE: u32 = 0xFF8C00;
const COLOR_MODERATE: u32 = 0xFFA500;
const COLOR_MINOR: u32 = 0xFFFF00;
const COLOR_DEFAULT: u32 = 0x0099FF;

/// Accent color for a severity level (case-insensitive).
pub fn severity_color(severity: &str) -> u32 {
    match severity.trim().to_lowercase().as_str() {
        "extreme" => COLOR_EXTREME,
        "severe" => COLOR_SEVERE,
        "moderate" => COLOR_MODERATE,
        "minor" => COLOR_MINOR,
        _ => COLOR_DEFAULT,
    }
}

/// Render an RFC 3339 timestamp as `MM/DD/YYYY h:mm AM/PM`.
///
/// The timestamp's own offset is kept. Empty input renders as `N/A`;
/// anything unparsable is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    if raw.is_empty() {
        return "N/A".to_string();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.format("%m/%d/%Y %-I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Discord rejects field values longer than this.
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Cut `text` to at most `limit` characters, marking the cut with `...`.
fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some(_) => {
            let keep = limit.saturating_sub(3);
            let cut = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
            format!("{}...", &text[..cut])
        }
        None => text.to_string(),
    }
}

/// Value for an always-present field: `N/A` when blank, capped at
/// [`FIELD_VALUE_LIMIT`] characters otherwise.
pub fn field_value(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        "N/A".to_string()
    } else {
        truncate_chars(value, FIELD_VALUE_LIMIT)
    }
}

/// Details text: the description cut to [`DETAILS_LIMIT`] characters with a
/// trailing `...`, or `None` for an empty description.
pub fn details_text(description: &str) -> Option<String> {
    if description.trim().is_empty() {
        return None;
    }
    match description.char_indices().nth(DETAILS_LIMIT) {
        Some((cut, _)) => Some(format!("{}...", &description[..cut])),
        None => Some(description.to_string()),
    }
}

/// Build the notification payload for an alert.
pub fn build_embed(alert: &AlertRecord) -> Embed {
    let timing = format!(
        "Effective: {}\nExpires: {}",
        format_timestamp(&alert.effective),
        format_timestamp(&alert.expires)
    );

    let mut fields = vec![
        EmbedField::block("Area", field_value(&alert.area_desc)),
        EmbedField::inline("Timing", timing),
        EmbedField::inline("Urgency", field_value(&alert.urgency)),
        EmbedField::inline("Source", field_value(&alert.sender_name)),
    ];

    if let Some(details) = details_text(&alert.description) {
        fields.push(EmbedField::block("Details", details));
    }

    Embed {
        title: alert.title(),
        description: alert.headline.clone(),
        color: severity_color(&alert.severity),
        fields,
    }
}

/// Delivers formatted alerts through the injected messaging capability.
#[derive(Clone)]
pub struct Dispatcher {
    sender: Arc<dyn MessageSender>,
}

impl Dispatcher {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self { sender }
    }

    /// Send one alert to one channel.
    pub async fn dispatch(
        &self,
        alert: &AlertRecord,
        channel_id: &str,
    ) -> Result<(), DispatchError> {
        let embed = build_embed(alert);
        self.sender
            .send_embed(channel_id, &embed)
            .await
            .map_err(|e| DispatchError::send(channel_id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::SendError;

    fn sample_alert() -> AlertRecord {
        AlertRecord {
            id: "X1".to_string(),
            event: "Tornado Warning".to_string(),
            headline: "Tornado Warning issued May 6".to_string(),
            description: "A confirmed tornado".to_string(),
            area_desc: "Polk, IA".to_string(),
            severity: "Extreme".to_string(),
            urgency: "Immediate".to_string(),
            certainty: "Observed".to_string(),
            sender_name: "NWS Des Moines IA".to_string(),
            effective: "2025-05-06T14:05:00-05:00".to_string(),
            expires: "2025-05-06T09:45:00-05:00".to_string(),
        }
    }

    #[test]
    fn test_severity_color() {
        assert_eq!(severity_color("Extreme"), 0xFF0000);
        assert_eq!(severity_color("EXTREME"), 0xFF0000);
        assert_eq!(severity_color("severe"), 0xFF8C00);
        assert_eq!(severity_color("Moderate"), 0xFFA500);
        assert_eq!(severity_color("Minor"), 0xFFFF00);
        assert_eq!(severity_color("Unknown"), 0x0099FF);
        assert_eq!(severity_color(""), 0x0099FF);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2025-05-06T14:05:00-05:00"),
            "05/06/2025 2:05 PM"
        );
        assert_eq!(format_timestamp("2025-12-01T00:30:00Z"), "12/01/2025 12:30 AM");
        assert_eq!(format_timestamp(""), "N/A");
        assert_eq!(format_timestamp("tomorrow-ish"), "tomorrow-ish");
    }

    #[test]
    fn test_details_truncation() {
        let long = "a".repeat(1500);
        let details = details_text(&long).unwrap();
        assert_eq!(details, format!("{}...", "a".repeat(1000)));

        let exact = "b".repeat(1000);
        assert_eq!(details_text(&exact).unwrap(), exact);

        assert_eq!(details_text(""), None);
    }

    #[test]
    fn test_details_truncation_counts_characters() {
        let long = "é".repeat(1200);
        let details = details_text(&long).unwrap();
        assert_eq!(details.chars().count(), 1003);
        assert!(details.ends_with("..."));
    }

    #[test]
    fn test_build_embed() {
        let embed = build_embed(&sample_alert());

        assert_eq!(embed.title, "Tornado Warning - Extreme");
        assert_eq!(embed.description, "Tornado Warning issued May 6");
        assert_eq!(embed.color, 0xFF0000);

        let names: Vec<_> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Area", "Timing", "Urgency", "Source", "Details"]);

        assert!(!embed.field("Area").unwrap().inline);
        assert!(embed.field("Timing").unwrap().inline);
        assert_eq!(
            embed.field("Timing").unwrap().value,
            "Effective: 05/06/2025 2:05 PM\nExpires: 05/06/2025 9:45 AM"
        );
        assert_eq!(embed.field("Source").unwrap().value, "NWS Des Moines IA");
        assert!(!embed.field("Details").unwrap().inline);
    }

    #[test]
    fn test_build_embed_without_description() {
        let alert = AlertRecord {
            description: String::new(),
            effective: String::new(),
            ..sample_alert()
        };
        let embed = build_embed(&alert);

        assert!(embed.field("Details").is_none());
        assert!(
            embed
                .field("Timing")
                .unwrap()
                .value
                .starts_with("Effective: N/A\n")
        );
    }

    #[test]
    fn test_field_value_caps_length_and_fills_blanks() {
        assert_eq!(field_value(""), "N/A");
        assert_eq!(field_value("   "), "N/A");
        assert_eq!(field_value("Polk, IA"), "Polk, IA");

        let exact = "c".repeat(FIELD_VALUE_LIMIT);
        assert_eq!(field_value(&exact), exact);

        let long = "é".repeat(FIELD_VALUE_LIMIT + 1);
        let value = field_value(&long);
        assert_eq!(value.chars().count(), FIELD_VALUE_LIMIT);
        assert!(value.ends_with("..."));
    }

    #[test]
    fn test_build_embed_respects_field_limits() {
        let alert = AlertRecord {
            area_desc: "Some County, OK; ".repeat(80),
            urgency: String::new(),
            sender_name: String::new(),
            ..sample_alert()
        };
        let embed = build_embed(&alert);

        let area = &embed.field("Area").unwrap().value;
        assert!(area.chars().count() <= FIELD_VALUE_LIMIT);
        assert!(area.ends_with("..."));
        assert_eq!(embed.field("Urgency").unwrap().value, "N/A");
        assert_eq!(embed.field("Source").unwrap().value, "N/A");
        for field in &embed.fields {
            let len = field.value.chars().count();
            assert!((1..=FIELD_VALUE_LIMIT).contains(&len), "{} has {len} chars", field.name);
        }
    }

    struct FailingSender {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageSender for FailingSender {
        async fn send_embed(&self, channel_id: &str, _embed: &Embed) -> Result<(), SendError> {
            self.calls.lock().unwrap().push(channel_id.to_string());
            Err(SendError::Other("Unknown Channel".to_string()))
        }
    }

    #[tokio::test]
    async fn test_dispatch_maps_send_failure() {
        let sender = Arc::new(FailingSender {
            calls: Mutex::new(Vec::new()),
        });
        let dispatcher = Dispatcher::new(sender.clone());

        let err = dispatcher.dispatch(&sample_alert(), "42").await.unwrap_err();
        assert!(matches!(err, DispatchError::SendFailure { ref channel, .. } if channel == "42"));
        assert_eq!(*sender.calls.lock().unwrap(), vec!["42".to_string()]);
    }
}
