//! Request handler module
//!
//! Responsible for request dispatch, static file serving and the header hooks
//! applied to every response.

pub mod hooks;
pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
