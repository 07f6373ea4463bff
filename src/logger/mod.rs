//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Startup announcement
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to stdout
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => eprintln!("{message}"),
    }
}

/// The two startup lines announcing the port and a browser URL
pub fn startup_lines(port: u16) -> [String; 2] {
    [
        format!("Serving HTTP on port: {port}"),
        format!("Open http://localhost:{port} in your browser"),
    ]
}

pub fn log_server_start(port: u16) {
    for line in startup_lines(port) {
        write_info(&line);
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_lines() {
        let [port_line, url_line] = startup_lines(8886);
        assert_eq!(port_line, "Serving HTTP on port: 8886");
        assert_eq!(url_line, "Open http://localhost:8886 in your browser");
    }
}
