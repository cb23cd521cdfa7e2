//! Span helpers for a single CLI invocation.

use tracing::Span;

/// Root span for one invocation, carrying the command label and trace id.
///
/// The same trace id is sent to the server as `x-request-id`, so log lines and
/// server-side request logs can be correlated.
#[must_use]
pub fn command_span(command: &str, trace_id: &str) -> Span {
    tracing::info_span!("apictl", command = %command, trace_id = %trace_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{LogFormat, LoggingConfig, init_logging};

    #[test]
    fn command_span_can_be_entered_under_a_scoped_subscriber() -> anyhow::Result<()> {
        let _logging = init_logging(&LoggingConfig {
            level: "info",
            format: LogFormat::Pretty,
        })?;
        let span = command_span("read", "trace-1");
        let _entered = span.enter();
        tracing::info!("inside command span");
        Ok(())
    }
}
