use crate::config::{LoggingConfig, LoggingLevel};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Layer, Registry};

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type FormatLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Handle to the installed subscriber, used to apply the loaded config.
pub struct LoggingHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    format: reload::Handle<FormatLayer, FilteredRegistry>,
}

impl LoggingHandle {
    /// Switch to the configured level and output format.
    pub fn apply(&self, config: &LoggingConfig) -> Result<(), reload::Error> {
        self.filter.reload(build_filter(config.level))?;
        self.format.reload(format_layer(config.json))
    }
}

/// Install the global subscriber at the default level.
///
/// Returns `None` when a subscriber is already installed (tests, embedding
/// callers).
pub fn init() -> Option<LoggingHandle> {
    let (filter, filter_handle) = reload::Layer::new(build_filter(LoggingLevel::default()));
    let (format, format_handle) = reload::Layer::new(format_layer(false));

    Registry::default()
        .with(filter)
        .with(format)
        .try_init()
        .ok()?;

    Some(LoggingHandle {
        filter: filter_handle,
        format: format_handle,
    })
}

/// `RUST_LOG` plus a `volsecrets=<level>` directive for this crate.
pub fn build_filter(level: LoggingLevel) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("volsecrets={}", level.as_filter()).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn format_layer(json: bool) -> FormatLayer {
    if json {
        Box::new(fmt::layer().json().with_writer(std::io::stderr))
    } else {
        Box::new(fmt::layer().with_writer(std::io::stderr))
    }
}
