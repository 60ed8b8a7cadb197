use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_quiet_mode(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

fn default_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the stderr log subscriber and record the quiet flag.
///
/// `RUST_LOG` takes precedence over the flags when set. Calling this twice
/// is harmless; the second subscriber is ignored.
pub fn init(quiet: bool, verbose: bool) {
    set_quiet_mode(quiet);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// User-facing output on stdout, suppressed in quiet mode.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::logger::is_quiet() {
            println!($($arg)*);
        }
    };
}
