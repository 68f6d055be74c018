use std::fmt;
use std::io;
use std::sync::Once;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

static INIT: Once = Once::new();

/// Install the process-wide subscriber: stderr, INFO by default, DEBUG when
/// `verbose` is set. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let level = if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };

        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(false)
            .event_format(LogLineFormat)
            .with_filter(level);

        let _ = Registry::default().with(stderr_layer).try_init();
    });

    if verbose {
        tracing::debug!("Verbose logging enabled.");
    }
}

/// `2026-10-18 09:41:07,512 - INFO - message`
pub struct LogLineFormat;

impl LogLineFormat {
    fn level_name(level: &Level) -> &'static str {
        match level.as_str() {
            "WARN" => "WARNING",
            other => other,
        }
    }
}

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            Self::level_name(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(level: LevelFilter, emit: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .event_format(LogLineFormat)
            .with_filter(level);
        tracing::subscriber::with_default(Registry::default().with(layer), emit);
        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn line_layout() {
        let out = capture(LevelFilter::INFO, || tracing::info!("hello there"));
        let line = out.strip_suffix('\n').unwrap();
        let parts: Vec<&str> = line.splitn(3, " - ").collect();
        assert_eq!(parts.len(), 3);
        // YYYY-MM-DD HH:MM:SS,mmm
        assert_eq!(parts[0].len(), 23);
        assert_eq!(&parts[0][19..20], ",");
        assert_eq!(parts[1], "INFO");
        assert_eq!(parts[2], "hello there");
    }

    #[test]
    fn level_names() {
        let out = capture(LevelFilter::DEBUG, || {
            tracing::warn!("w");
            tracing::error!("e");
            tracing::debug!("d");
        });
        assert!(out.contains(" - WARNING - w\n"));
        assert!(out.contains(" - ERROR - e\n"));
        assert!(out.contains(" - DEBUG - d\n"));
    }

    #[test]
    fn info_filter_drops_debug() {
        let out = capture(LevelFilter::INFO, || {
            tracing::debug!("hidden");
            tracing::info!("shown");
        });
        assert!(!out.contains("hidden"));
        assert!(out.contains("shown"));
    }

    #[test]
    fn structured_fields_follow_message() {
        let out = capture(LevelFilter::DEBUG, || tracing::debug!(bytes = 8, "Read sample"));
        assert!(out.contains(" - DEBUG - Read sample bytes=8\n"));
    }

    #[test]
    fn no_escape_codes() {
        let out = capture(LevelFilter::DEBUG, || {
            tracing::debug!(bytes = 82, truncated = false, "Read signature sample")
        });
        assert!(!out.contains('\x1b'));
        assert!(out.ends_with(" - DEBUG - Read signature sample bytes=82 truncated=false\n"));
    }
}
