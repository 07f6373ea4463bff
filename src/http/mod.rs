//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from request handling.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_501_response, build_html_response,
    build_redirect_response, ResponseBody,
};
