//! Level-tagged log macros.
//!
//! Output goes through `esp-println` when the `esp32-log` feature is enabled.
//! Without it the macros still type-check their arguments but emit nothing.

macro_rules! emit {
    ($level:literal, $($arg:tt)*) => {{
        #[cfg(feature = "esp32-log")]
        esp_println::println!("[{}] {}", $level, format_args!($($arg)*));
        #[cfg(not(feature = "esp32-log"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::logging::emit!("DEBUG", $($arg)*) };
}

macro_rules! log_info {
    ($($arg:tt)*) => { $crate::logging::emit!("INFO", $($arg)*) };
}

macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::logging::emit!("WARN", $($arg)*) };
}

macro_rules! log_error {
    ($($arg:tt)*) => { $crate::logging::emit!("ERROR", $($arg)*) };
}

pub(crate) use {emit, log_debug, log_error, log_info, log_warn};
