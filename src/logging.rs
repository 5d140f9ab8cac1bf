//! `log` backend that writes to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

struct ConsoleLogger;

/// Console method a record is written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sink {
    Error,
    Warn,
    Log,
}

fn sink(level: Level) -> Sink {
    match level {
        Level::Error => Sink::Error,
        Level::Warn => Sink::Warn,
        Level::Info | Level::Debug | Level::Trace => Sink::Log,
    }
}

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match sink(record.level()) {
            Sink::Error => web_sys::console::error_1(&msg),
            Sink::Warn => web_sys::console::warn_1(&msg),
            Sink::Log => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Safe to call more than once.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
