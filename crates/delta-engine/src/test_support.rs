//! Helpers shared by unit tests.

use std::sync::Mutex;

/// `log::Log` that keeps every record in memory.
pub(crate) struct Capture(Mutex<Vec<(log::Level, String)>>);

impl Capture {
    /// Number of records at `level` whose message contains `needle`.
    pub(crate) fn count(&self, level: log::Level, needle: &str) -> usize {
        self.0
            .lock()
            .map(|lines| {
                lines
                    .iter()
                    .filter(|(l, msg)| *l == level && msg.contains(needle))
                    .count()
            })
            .unwrap_or(0)
    }
}

impl log::Log for Capture {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        if let Ok(mut lines) = self.0.lock() {
            lines.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

/// Installs the capturing logger (first call only) and returns it.
///
/// Records are shared by all tests in the process, so assertions should match
/// on messages unique to the test.
pub(crate) fn capture_logs() -> &'static Capture {
    let _ = log::set_logger(&CAPTURE);
    log::set_max_level(log::LevelFilter::Trace);
    &CAPTURE
}
