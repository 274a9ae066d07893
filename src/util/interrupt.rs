use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Exit status after Ctrl-C, matching a shell's 128 + SIGINT.
pub const EXIT_INTERRUPTED: i32 = 130;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Route Ctrl-C into a flag polled between stages and inside the benchmark
/// loop, so scratch files are dropped before the process exits.
pub fn install() {
    if let Err(e) = ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "cannot install Ctrl-C handler");
    }
}

pub fn flag() -> &'static AtomicBool {
    &INTERRUPTED
}

pub fn requested() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
