use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

pub(crate) fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| std::env::var("QR_DEBUG").is_ok())
}

/// Emits a debug trace line to stderr when `QR_DEBUG` is set in the
/// environment *and* the crate is built in debug mode. Mirrors the
/// teacher's detector-side tracing convention (`cfg!(debug_assertions) &&`
/// gating `QR_DEBUG`), applied here to the decode pipeline's own
/// checkpoints (mirrored-retry decision, per-block RS correction,
/// segment-mode dispatch).
macro_rules! qr_trace {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) && crate::debug::debug_enabled() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use qr_trace;
