use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Custom formatter that wraps each field in brackets for better readability
/// Format: [TIMESTAMP] [LEVEL] [SPAN] [TARGET: FILE:LINE]: MESSAGE
///
/// SPAN is the innermost active span, e.g. `split_class{class=Cat}`, or the
/// last segment of the target when no span is active.
pub struct BracketedFormatter;

impl<S, N> FormatEvent<S, N> for BracketedFormatter
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
        let metadata = event.metadata();

        let now = chrono::Local::now();
        write!(writer, "[{}]  ", now.format("%Y-%m-%dT%H:%M:%S%.6f"))?;

        write!(writer, "[{:5}] ", metadata.level())?;

        match ctx.event_scope().and_then(|scope| scope.from_root().last()) {
            Some(span) => {
                write!(writer, "[{}", span.name())?;
                let ext = span.extensions();
                if let Some(fields) = ext.get::<tracing_subscriber::fmt::FormattedFields<N>>() {
                    if !fields.fields.is_empty() {
                        write!(writer, "{{{}}}", fields)?;
                    }
                }
                write!(writer, "] ")?;
            }
            None => {
                let short = metadata.target().rsplit("::").next().unwrap_or("unknown");
                write!(writer, "[{}] ", short)?;
            }
        }

        if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
            write!(writer, "[{}: {}:{}]: ", metadata.target(), file, line)?;
        } else {
            write!(writer, "[{}]: ", metadata.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

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

    fn capture(f: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(BracketedFormatter)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_bracketed_line_layout() {
        let out = capture(|| tracing::info!("Copied {} files", 3));

        assert!(out.contains("[INFO ] "));
        assert!(out.contains("[tests] "));
        assert!(out.contains("formatter.rs:"));
        assert!(out.trim_end().ends_with("Copied 3 files"));
    }

    #[test]
    fn test_span_name_and_fields() {
        let out = capture(|| {
            let _span = tracing::info_span!("split_class", class = %"Cat").entered();
            tracing::warn!("Skipped 2 non-.jpg files");
        });

        assert!(out.contains("[WARN ] "));
        assert!(out.contains("[split_class{class=Cat}] "));
    }
}
