use std::io::Write;

use nu_ansi_term::Color::{Blue, DarkGray, Red, Yellow};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{
        self,
        format::{FmtSpan, Writer},
        FmtContext, FormatEvent, FormatFields, MakeWriter,
    },
    registry::LookupSpan,
};

use crate::{cli::Args, utils::Colored};

/// Collects the message and, separately, the structured fields of an event.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}

fn level_prefix(level: Level) -> Option<Colored<&'static str>> {
    match level {
        Level::INFO => None,
        Level::WARN => Some(Colored(Yellow, "[WARN]")),
        Level::ERROR => Some(Colored(Red, "[ERROR]")),
        Level::DEBUG | Level::TRACE => Some(Colored(Blue, "[DEBUG]")),
    }
}

/// Plain output for INFO; other levels get a prefix and their fields.
pub struct CustomFormatter;

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let level = *event.metadata().level();

        if let Some(prefix) = level_prefix(level) {
            write!(writer, "{prefix} ")?;
        }
        write!(writer, "{}", visitor.message.unwrap_or_default())?;
        if level != Level::INFO && !visitor.fields.is_empty() {
            write!(writer, " {}", Colored(DarkGray, visitor.fields.join(" ")))?;
        }
        writeln!(writer)
    }
}

/// Sends INFO events to stdout and everything else to stderr.
struct StdioWriter;

enum Stdio {
    Out(std::io::Stdout),
    Err(std::io::Stderr),
}

impl Write for Stdio {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Stdio::Out(out) => out.write(buf),
            Stdio::Err(err) => err.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Stdio::Out(out) => out.flush(),
            Stdio::Err(err) => err.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for StdioWriter {
    type Writer = Stdio;

    fn make_writer(&'a self) -> Self::Writer {
        Stdio::Out(std::io::stdout())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        if meta.level() == &Level::INFO {
            Stdio::Out(std::io::stdout())
        } else {
            Stdio::Err(std::io::stderr())
        }
    }
}

fn filter_level(args: &Args) -> Level {
    if args.quiet {
        Level::ERROR
    } else if args.verbose >= 2 {
        Level::TRACE
    } else if args.verbose == 1 {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

pub fn setup_logging(args: &Args) {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(format!("minishop={}", filter_level(args)))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(StdioWriter)
        .compact()
        .without_time();

    let subscriber: Box<dyn Subscriber + Send + Sync> = if args.json {
        Box::new(builder.json().flatten_event(true).finish())
    } else {
        Box::new(builder.event_format(CustomFormatter).finish())
    };

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use clap::Parser;
    use tracing::{debug, info, warn};
    use tracing_subscriber::util::SubscriberInitExt;

    use super::*;
    use crate::utils::COLOR;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_formatter_prefixes_and_fields() {
        *COLOR.write().unwrap() = false;
        let captured = Captured::default();
        let subscriber = fmt::Subscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(captured.clone())
            .event_format(CustomFormatter)
            .finish();

        {
            let _guard = subscriber.set_default();
            info!(order_id = 7, "Cancelled order 7");
            debug!(order_id = 7, lines = 2, "order placed");
            warn!("Config file missing");
        }

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            output,
            "Cancelled order 7\n\
             [DEBUG] order placed order_id=7 lines=2\n\
             [WARN] Config file missing\n"
        );
    }

    #[test]
    fn test_filter_level_from_flags() {
        let level = |argv: &[&str]| filter_level(&Args::parse_from(argv));

        assert_eq!(level(&["minishop", "env"]), Level::INFO);
        assert_eq!(level(&["minishop", "-v", "env"]), Level::DEBUG);
        assert_eq!(level(&["minishop", "-vv", "env"]), Level::TRACE);
        assert_eq!(level(&["minishop", "-q", "-vv", "env"]), Level::ERROR);
    }
}
