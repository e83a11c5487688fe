//! Minimal level-gated stderr logging, in the style of a kernel `printk`.
//!
//! # Environment variables
//!
//! - `TEAM_LOG_LEVEL=<level>` — `off`/`error`/`warn`/`info`/`debug`/`trace`
//!   (or the matching `0`..`5`). Defaults to `warn`.
//!
//! # Output format
//!
//! `[LEVEL] message`

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    fn from_env(val: &str) -> Self {
        match val.to_lowercase().as_str() {
            "off" | "0" => LogLevel::Off,
            "error" | "1" => LogLevel::Error,
            "info" | "3" => LogLevel::Info,
            "debug" | "4" => LogLevel::Debug,
            "trace" | "5" => LogLevel::Trace,
            _ => LogLevel::Warn,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

static LOG_LEVEL: OnceLock<AtomicU8> = OnceLock::new();

fn level_cell() -> &'static AtomicU8 {
    LOG_LEVEL.get_or_init(|| {
        let level = std::env::var("TEAM_LOG_LEVEL")
            .map(|v| LogLevel::from_env(&v))
            .unwrap_or(LogLevel::Warn);
        AtomicU8::new(level as u8)
    })
}

#[inline]
fn level_enabled(level: LogLevel) -> bool {
    level as u8 <= level_cell().load(Ordering::Relaxed)
}

/// Set the log level programmatically, overriding `TEAM_LOG_LEVEL`.
pub fn set_log_level(level: LogLevel) {
    level_cell().store(level as u8, Ordering::Relaxed);
}

#[doc(hidden)]
pub fn _log_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    eprintln!("{} {}", level.prefix(), args);
}

#[macro_export]
macro_rules! tlog_error {
    ($($arg:tt)*) => {
        $crate::log::_log_impl($crate::log::LogLevel::Error, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! tlog_warn {
    ($($arg:tt)*) => {
        $crate::log::_log_impl($crate::log::LogLevel::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! tlog_info {
    ($($arg:tt)*) => {
        $crate::log::_log_impl($crate::log::LogLevel::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! tlog_debug {
    ($($arg:tt)*) => {
        $crate::log::_log_impl($crate::log::LogLevel::Debug, format_args!($($arg)*))
    };
}
