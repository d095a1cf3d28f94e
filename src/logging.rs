use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "HOSTLIT_LOG";

/// Setup logging of events reported by hostlit.
///
/// The filter is read from `HOSTLIT_LOG`, falling back to `RUST_LOG`. Events
/// go to stderr so they never mix with decorated output.
///
/// E.g. to see every host that reads differently in the two dialects:
///   HOSTLIT_LOG=warn
///
/// Or to trace each classified host:
///   HOSTLIT_LOG=hostlit=debug
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::from_default_env());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .ok();
}
