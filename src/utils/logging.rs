//! Conditional logging macros gated on a module-level `ENABLE_LOGS` flag,
//! for call sites that would otherwise flood the log (the tick loop fires
//! every 10 ms).
//!
//! Each module that uses these must define the flag:
//! ```rust
//! const ENABLE_LOGS: bool = false;
//! ```

/// Debug logging, compiled against the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

/// Info logging, compiled against the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Error logging, compiled against the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
