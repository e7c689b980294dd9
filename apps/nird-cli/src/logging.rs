use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over the verbosity flag.
///
/// Calling it twice is harmless: the second install is ignored.
pub fn init_logging(verbose: bool, json: bool) {
    let level = if verbose { "debug" } else { "info" };
    let default = format!("nird_core={level},nird_text={level},nird_cli={level},tower_http={level}");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let _ = if json { builder.json().try_init() } else { builder.try_init() };
}
