use tracing_subscriber::EnvFilter;

use crate::args::LogFormat;

/// Install the global subscriber. `RUST_LOG` wins over the `info` default.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if let Err(e) = result {
        eprintln!("WARN: tracing subscriber already installed: {e}");
    }
}
