use chrono::Local;
use lazy_static::lazy_static;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

/// Initialize the log file
pub fn init_logger() -> anyhow::Result<()> {
    let log_path = get_log_path();

    // Create parent directory if it doesn't exist
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let mut log_file = LOG_FILE
        .lock()
        .map_err(|_| anyhow::anyhow!("log file lock poisoned"))?;
    *log_file = Some(file);

    // Write session start marker
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    if let Some(ref mut f) = *log_file {
        let _ = writeln!(f, "\n=== LeaseBot Session Started at {} ===\n", timestamp);
    }

    Ok(())
}

/// A second handle on the log file, for routing `tracing` output there
pub fn tracing_writer() -> Option<File> {
    LOG_FILE
        .lock()
        .ok()
        .and_then(|guard| guard.as_ref().and_then(|f| f.try_clone().ok()))
}

/// Also write DEBUG lines
pub fn set_debug_mode(enabled: bool) {
    DEBUG_MODE.store(enabled, Ordering::Relaxed);
}

pub fn is_debug_mode() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

/// Get the log file path
fn get_log_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("leasebot").join("leasebot.log")
    } else {
        PathBuf::from("leasebot.log")
    }
}

/// Log a message to file
pub fn log(level: &str, message: &str) {
    if level == "DEBUG" && !is_debug_mode() {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let formatted = format!("[{}] {}: {}", timestamp, level, message);

    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(ref mut f) = *log_file {
            let _ = writeln!(f, "{}", formatted);
            let _ = f.flush();
        }
    }
}

/// Macros for easier logging
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::log("INFO", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::log("DEBUG", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::log("WARN", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::log("ERROR", &format!($($arg)*));
    };
}

/// Get the current log file path for display
pub fn get_log_path_display() -> String {
    get_log_path().display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_is_app_specific() {
        assert!(get_log_path_display().ends_with("leasebot.log"));
    }

    #[test]
    fn test_log_without_file_is_noop() {
        // Nothing initialized in this process; must not panic
        log("INFO", "no file yet");
        crate::log_warn!("still {}", "fine");
    }
}
