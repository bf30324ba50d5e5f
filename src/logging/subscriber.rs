//! Tracing subscriber setup: console formatter and initialisation.

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Render one console line for an event.
fn render_line(level: tracing::Level, target: &str, msg: &str) -> String {
    match level {
        tracing::Level::ERROR => format!("\x1b[31mERROR\x1b[0m {msg}"),
        tracing::Level::WARN => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        tracing::Level::INFO if target == "sym::stage" => {
            format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
        }
        tracing::Level::INFO if target == "sym::dry_run" => {
            format!("  \x1b[33m[SIMULATE]\x1b[0m {msg}")
        }
        tracing::Level::INFO => format!("  {msg}"),
        _ => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits sym-style console
/// output.
struct SymFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for SymFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{}",
            render_line(*metadata.level(), metadata.target(), &extractor.message)
        )
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout.  `verbose`
/// lowers the console level to `DEBUG`; `RUST_LOG` overrides both.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(SymFormatter)
        .with_writer(make_writer)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_lines_get_arrow() {
        let line = render_line(tracing::Level::INFO, "sym::stage", "Linking vim");
        assert!(line.contains("==>"));
        assert!(line.contains("Linking vim"));
    }

    #[test]
    fn dry_run_lines_are_tagged() {
        let line = render_line(tracing::Level::INFO, "sym::dry_run", "would link a -> b");
        assert!(line.contains("[SIMULATE]"));
        assert!(line.ends_with("would link a -> b"));
    }

    #[test]
    fn plain_info_is_indented() {
        assert_eq!(render_line(tracing::Level::INFO, "sym", "hello"), "  hello");
    }

    #[test]
    fn errors_and_warnings_are_labelled() {
        assert!(render_line(tracing::Level::ERROR, "sym", "x").contains("ERROR"));
        assert!(render_line(tracing::Level::WARN, "sym", "x").contains("WARN"));
    }

    #[test]
    fn debug_lines_are_dimmed() {
        assert_eq!(
            render_line(tracing::Level::DEBUG, "sym", "detail"),
            "  \x1b[2mdetail\x1b[0m"
        );
    }
}
