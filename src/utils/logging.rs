//! Conditional logging macros gated on a module-level `ENABLE_LOGS` const.
//!
//! The loop modules are chatty at every tick; flipping one const silences a
//! module without touching the global log filter. Each module using these
//! macros must define:
//!
//! ```rust
//! const ENABLE_LOGS: bool = true;
//! ```

/// Info-level logging, checked against the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level logging, checked against the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error-level logging, checked against the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
