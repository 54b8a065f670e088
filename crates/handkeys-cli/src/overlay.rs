use handkeys_core::audit::AuditLog;
use handkeys_core::pipeline::{FrameReport, Overlay};

/// Prints each triggered action as it happens.
///
/// With `json`, every line is a JSON-encoded audit record instead.
pub struct TerminalOverlay {
    json: bool,
}

impl TerminalOverlay {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Overlay for TerminalOverlay {
    fn render(&mut self, report: &FrameReport, _log: &AuditLog) {
        let Some(record) = &report.record else {
            return;
        };
        if self.json {
            match serde_json::to_string(record) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to encode audit record"),
            }
        } else {
            println!("{record}");
        }
    }
}
