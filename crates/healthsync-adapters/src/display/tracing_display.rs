use healthsync_core::DisplaySink;
use tracing::info;

#[derive(Debug, Default)]
pub struct TracingDisplay;

impl DisplaySink for TracingDisplay {
    fn show(&self, text: &str) {
        for line in text.lines() {
            info!(target: "healthsync::display", "{}", line);
        }
    }
}
