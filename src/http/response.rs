//! HTTP response building module
//!
//! Provides builders for the responses a static file server sends, decoupled
//! from request handling. Header hooks run on the result afterwards.

use futures_util::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::{Response, StatusCode};
use std::io;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

const HTML_UTF8: &str = "text/html; charset=utf-8";

/// Body of every response: buffered pages or a file streamed from disk
pub type ResponseBody = BoxBody<Bytes, io::Error>;

/// Buffered body
pub fn full(chunk: impl Into<Bytes>) -> ResponseBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty() -> ResponseBody {
    full(Bytes::new())
}

/// File contents read chunk by chunk as hyper writes them
fn stream_file(file: File) -> ResponseBody {
    StreamBody::new(ReaderStream::new(file).map_ok(Frame::data)).boxed()
}

/// Build 200 response streaming a file with its validators
///
/// `file` is `None` for HEAD, `Content-Length` still carries the file size.
pub fn build_file_response(
    file: Option<File>,
    content_length: u64,
    content_type: &str,
    etag: &str,
    last_modified: Option<&str>,
) -> Response<ResponseBody> {
    let body = file.map_or_else(empty, stream_file);

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);
    if let Some(modified) = last_modified {
        builder = builder.header("Last-Modified", modified);
    }

    builder.header("ETag", etag).body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(empty())
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, last_modified: Option<&str>) -> Response<ResponseBody> {
    let mut builder = Response::builder().status(304).header("ETag", etag);
    if let Some(modified) = last_modified {
        builder = builder.header("Last-Modified", modified);
    }

    builder.body(empty()).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(empty())
    })
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(empty())
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", HTML_UTF8)
        .header("Content-Length", content_length)
        .body(full(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(empty())
        })
}

/// Build an HTML error page for `status`
pub fn build_error_response(
    status: StatusCode,
    message: &str,
    is_head: bool,
) -> Response<ResponseBody> {
    let page = error_page(status, message);
    let content_length = page.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(page)
    };

    Response::builder()
        .status(status)
        .header("Content-Type", HTML_UTF8)
        .header("Content-Length", content_length)
        .body(full(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(empty())
        })
}

/// Build 404 Not Found response
pub fn build_404_response(message: &str, is_head: bool) -> Response<ResponseBody> {
    build_error_response(StatusCode::NOT_FOUND, message, is_head)
}

/// Build 501 Not Implemented response for methods other than GET/HEAD
pub fn build_501_response(method: &str) -> Response<ResponseBody> {
    build_error_response(
        StatusCode::NOT_IMPLEMENTED,
        &format!("Unsupported method ('{method}')"),
        false,
    )
}

fn error_page(status: StatusCode, message: &str) -> String {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let message = crate::http::path::escape_html(message);
    format!(
        r#"<!DOCTYPE HTML>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Error response</title>
</head>
<body>
<h1>Error response</h1>
<p>Error code: {code}</p>
<p>Message: {message}.</p>
<p>Error code explanation: {code} - {reason}.</p>
</body>
</html>
"#
    )
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
