use tracing_subscriber::EnvFilter;

/// Initialize console logging for the binary.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug-level
/// output and the default is info. Libraries in this workspace never
/// install a subscriber themselves.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
