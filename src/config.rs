//! Tunables for the letter book.
//!
//! `TypingConfig` holds the typewriter timing; `BookConfig` adds the DOM hooks the
//! browser glue looks up on the page. Both default to the values the card markup
//! ships with, so `mount_letter_book()` needs no arguments.

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Timing of the typewriter reveal. All durations are milliseconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct TypingConfig {
    pub char_stagger_ms: f64,       // offset between consecutive character fades
    pub char_fade_ms: f64,          // opacity 0 -> 1 per character (linear)
    pub line_gap_ms: f64,           // pause between finishing one line and starting the next
    pub scroll_margin_px: f64,      // room left above a line scrolled into view
    pub scroll_after_progress: f64, // progress-driven scrolling starts past this fraction
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            char_stagger_ms: 80.0,
            char_fade_ms: 50.0,
            line_gap_ms: 300.0,
            scroll_margin_px: 20.0,
            scroll_after_progress: 0.2,
        }
    }
}

/// Page hooks used by the DOM glue plus the nested typing timing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct BookConfig {
    pub guide_id: String,
    pub content_id: String,
    pub card_selector: String,
    pub scroll_container_selector: String,
    pub shown_class: String,
    pub hidden_class: String,
    pub opened_class: String,
    /// Global object on `window` carrying the letter text.
    pub content_global: String,
    pub content_field: String,
    pub typing: TypingConfig,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            guide_id: "guideInfo".into(),
            content_id: "messageContent".into(),
            card_selector: ".card".into(),
            scroll_container_selector: ".details".into(),
            shown_class: "show".into(),
            hidden_class: "hidden".into(),
            opened_class: "book-opened".into(),
            content_global: "apiData".into(),
            content_field: "letterContent".into(),
            typing: TypingConfig::default(),
        }
    }
}

#[cfg(feature = "serde_json")]
impl BookConfig {
    /// Parse a (possibly partial) JSON config; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
