use tracing_subscriber::EnvFilter;

/// Environment variable holding the `tracing` filter, e.g.
/// `IR_FACTS_LOG=ir_facts::extractor=debug`.
pub const LOG_ENV: &str = "IR_FACTS_LOG";

/// Installs a stderr subscriber when [`LOG_ENV`] is set.
///
/// Returns whether a subscriber was installed; an unset variable or an
/// already-installed global subscriber leaves logging untouched.
pub fn init() -> bool {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return false;
    };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("tracing initialized");
    }
    installed
}
