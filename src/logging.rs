use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Installs the global subscriber. Logs go to stderr: stdout carries the IPC
/// responses. Safe to call more than once; later calls are ignored.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!(
            "invalid log filter {:?} ({}), falling back to info",
            config.log_filter, e
        );
        EnvFilter::new("info")
    });

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
