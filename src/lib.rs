//! Letter Book core crate.
//!
//! A greeting card that, on hover, opens a book and types a short letter out line
//! by line, character by character. The typing engine (`typing`, `timeline`,
//! `segment`) is plain Rust and runs under `cargo test`; `dom` binds it to the page
//! through web-sys and is what the JS side mounts.

use wasm_bindgen::prelude::*;

pub mod book;
pub mod config;
pub mod content;
pub mod dom;
pub mod logging;
pub mod scroll;
pub mod segment;
pub mod timeline;
pub mod typing;

pub use book::{GuideState, LetterBook};
pub use config::{BookConfig, TypingConfig};
pub use content::{ContentError, ContentSource, LetterField, resolve_lines};
pub use segment::{CharSpan, WordSpan, segment_by_char, segment_by_word};
pub use timeline::Timeline;
pub use typing::{BookSurface, TypingController, TypingSession};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Letter typed when the page provides no content field at all.
pub const DEFAULT_MESSAGE: &[&str] = &["с новым годом", "принцесса"];

// -----------------------------------------------------------------------------
// Entry points
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn mount_letter_book() -> Result<(), JsValue> {
    dom::mount(BookConfig::default())
}

/// Mount with a JSON config; keys left out keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn mount_letter_book_with_config(json: &str) -> Result<(), JsValue> {
    let cfg = BookConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    dom::mount(cfg)
}
