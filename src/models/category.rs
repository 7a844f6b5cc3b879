// src/models/category.rs

//! Alert categories and the event-name classifier.

use std::fmt;

/// Routing bucket for an alert.
///
/// "Unclassified" is not a variant: [`classify`] returns `None` for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Tornado,
    SevereThunderstorm,
    Winter,
    SpecialWeatherStatement,
}

/// Keywords that mark an event as winter weather.
const WINTER_KEYWORDS: &[&str] = &[
    "winter",
    "blizzard",
    "ice storm",
    "snow",
    "freezing",
    "wind chill",
    "frost",
    "cold",
];

impl Category {
    /// All routable categories, in classification priority order.
    pub const ALL: [Category; 4] = [
        Category::Tornado,
        Category::SevereThunderstorm,
        Category::Winter,
        Category::SpecialWeatherStatement,
    ];

    /// Key used in the persisted channel configuration.
    pub fn config_key(&self) -> &'static str {
        match self {
            Category::Tornado => "tornado",
            Category::SevereThunderstorm => "svrstorm",
            Category::Winter => "winter",
            Category::SpecialWeatherStatement => "sws",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Tornado => "Tornado",
            Category::SevereThunderstorm => "Severe Thunderstorm",
            Category::Winter => "Winter",
            Category::SpecialWeatherStatement => "Special Weather Statement",
        }
    }

    fn matches(&self, event: &str) -> bool {
        match self {
            Category::Tornado => event.contains("tornado"),
            Category::SevereThunderstorm => event.contains("severe thunderstorm"),
            Category::Winter => WINTER_KEYWORDS.iter().any(|kw| event.contains(kw)),
            Category::SpecialWeatherStatement => event.contains("special weather"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Classify an event name into a category.
///
/// Case-insensitive substring match; the first category in [`Category::ALL`]
/// that matches wins, so "Tornado ... Winter" is a tornado alert.
pub fn classify(event: &str) -> Option<Category> {
    let event = event.to_lowercase();
    Category::ALL.into_iter().find(|c| c.matches(&event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_events() {
        assert_eq!(classify("Tornado Warning"), Some(Category::Tornado));
        assert_eq!(classify("Tornado Watch"), Some(Category::Tornado));
        assert_eq!(
            classify("Severe Thunderstorm Warning"),
            Some(Category::SevereThunderstorm)
        );
        assert_eq!(classify("Winter Storm Warning"), Some(Category::Winter));
        assert_eq!(classify("Blizzard Warning"), Some(Category::Winter));
        assert_eq!(classify("Extreme Cold Warning"), Some(Category::Winter));
        assert_eq!(classify("Frost Advisory"), Some(Category::Winter));
        assert_eq!(
            classify("Special Weather Statement"),
            Some(Category::SpecialWeatherStatement)
        );
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("TORNADO WARNING"), Some(Category::Tornado));
        assert_eq!(classify("ice STORM warning"), Some(Category::Winter));
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("Tornado and Winter Event"), Some(Category::Tornado));
        assert_eq!(
            classify("Severe Thunderstorm with Snow"),
            Some(Category::SevereThunderstorm)
        );
        assert_eq!(
            classify("Special Weather Statement: freezing fog"),
            Some(Category::Winter)
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("Flood Warning"), None);
        assert_eq!(classify(""), None);
        // "severe" alone is not a thunderstorm
        assert_eq!(classify("Severe Weather Outlook"), None);
    }

    #[test]
    fn test_config_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            Category::ALL.iter().map(|c| c.config_key()).collect();
        assert_eq!(keys.len(), 4);
    }
}
