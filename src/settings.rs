//! Engine settings
//!
//! Read once at mount from an inline JSON block and the URL query string.
//! Nothing is written back; every visit starts from the same defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Star pool size for this preset
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 2000,
            QualityPreset::Medium => 6000,
            QualityPreset::High => 10000,
        }
    }

    /// Whether to fly decorative ships through the field
    pub fn ships_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Whether to render the wireframe planet
    pub fn planet_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// How stars are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StarStyle {
    /// Round points
    #[default]
    Points,
    /// Line segments stretched by current speed
    Streaks,
}

impl StarStyle {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "points" | "dots" => Some(StarStyle::Points),
            "streaks" | "trails" | "lines" => Some(StarStyle::Streaks),
            _ => None,
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Star rendering style
    pub star_style: StarStyle,
    /// Content shake driven by scroll
    pub screen_shake: bool,
    /// Reduced motion (no shake, no canvas blur)
    pub reduced_motion: bool,
    /// Fixed RNG seed; random per visit when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            star_style: StarStyle::Points,
            screen_shake: true,
            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse a JSON config block; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Query keys `load()` reads from the URL
    pub const QUERY_KEYS: [&'static str; 5] = ["quality", "style", "reduced_motion", "shake", "seed"];

    /// Apply one already-decoded query override
    ///
    /// Unknown keys and unparsable values are ignored. Values are trimmed, so
    /// `+`/`%20` padding decoded to spaces still matches.
    pub fn apply_override(&mut self, key: &str, value: &str) {
        let value = value.trim();
        match key {
            "quality" => {
                if let Some(q) = QualityPreset::from_str(value) {
                    self.quality = q;
                }
            }
            "style" => {
                if let Some(s) = StarStyle::from_str(value) {
                    self.star_style = s;
                }
            }
            "reduced_motion" => self.reduced_motion = parse_flag(value),
            "shake" => self.screen_shake = parse_flag(value),
            "seed" => {
                if let Ok(seed) = value.parse() {
                    self.seed = Some(seed);
                }
            }
            _ => log::debug!("Ignoring unknown setting '{}'", key),
        }
    }

    /// Apply decoded `(key, value)` pairs in order
    pub fn apply_overrides<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in pairs {
            self.apply_override(key, value);
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective canvas blur during warp (respects reduced_motion)
    pub fn effective_warp_filter(&self) -> bool {
        !self.reduced_motion
    }

    /// Star pool size
    pub fn star_count(&self) -> usize {
        self.quality.star_count()
    }

    /// Id of the inline JSON config element (used only in wasm32)
    #[allow(dead_code)]
    const CONFIG_ELEMENT_ID: &'static str = "warpfield-config";

    /// Load settings from the page (WASM only)
    ///
    /// Config block first, then query overrides, then the OS reduced-motion preference.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };

        let mut settings = window
            .document()
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content())
            .map(|json| match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                    settings
                }
                Err(e) => {
                    log::warn!("{}; using defaults", e);
                    Self::default()
                }
            })
            .unwrap_or_default();

        // UrlSearchParams percent-decodes keys and values
        if let Ok(params) = window
            .location()
            .search()
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search))
        {
            let found: Vec<(&str, String)> = Self::QUERY_KEYS
                .iter()
                .filter_map(|&key| params.get(key).map(|value| (key, value)))
                .collect();
            settings.apply_overrides(found.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let prefers_reduced = window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .map(|mq| mq.matches())
            .unwrap_or(false);
        if prefers_reduced {
            settings.reduced_motion = true;
        }

        log::info!(
            "Settings: quality={}, style={:?}, reduced_motion={}",
            settings.quality.as_str(),
            settings.star_style,
            settings.reduced_motion
        );
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value, "" | "1" | "true" | "on" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.star_count(), 6000);
        assert!(settings.effective_screen_shake());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"quality":"low","star_style":"streaks"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.star_style, StarStyle::Streaks);
        assert!(settings.screen_shake);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = Settings::from_json("{quality:").unwrap_err();
        assert!(matches!(err, crate::WarpError::Config(_)));
    }

    #[test]
    fn test_query_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides([
            ("quality", "HIGH"),
            ("style", "trails"),
            ("reduced_motion", ""),
            ("seed", "42"),
            ("bogus", "1"),
        ]);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.star_style, StarStyle::Streaks);
        assert!(settings.reduced_motion);
        assert_eq!(settings.seed, Some(42));
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_warp_filter());
    }

    #[test]
    fn test_decoded_padding_still_matches() {
        // `?st%79le=+streaks%20&quality=%20low` as decoded by UrlSearchParams
        let mut settings = Settings::default();
        settings.apply_overrides([("style", " streaks "), ("quality", " low")]);
        assert_eq!(settings.star_style, StarStyle::Streaks);
        assert_eq!(settings.quality, QualityPreset::Low);
    }

    #[test]
    fn test_query_keys_are_all_understood() {
        let mut settings = Settings::default();
        for key in Settings::QUERY_KEYS {
            settings.apply_override(key, "1");
        }
        assert!(settings.reduced_motion);
        assert!(settings.screen_shake);
        assert_eq!(settings.seed, Some(1));
    }

    #[test]
    fn test_query_ignores_bad_values() {
        let mut settings = Settings::default();
        settings.apply_overrides([("quality", "ultra"), ("seed", "abc"), ("shake", "0")]);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.seed, None);
        assert!(!settings.screen_shake);
    }

    #[test]
    fn test_low_preset_drops_decorations() {
        let low = Settings::from_preset(QualityPreset::Low);
        assert!(!low.quality.ships_enabled());
        assert!(!low.quality.planet_enabled());
        assert!(QualityPreset::High.ships_enabled());
    }
}
