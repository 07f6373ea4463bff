//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, header finalization hooks and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::header::CONTENT_LENGTH;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Request target as received, path plus optional query
    pub target: &'a str,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

impl<'a> RequestContext<'a> {
    pub(crate) fn from_request<B>(req: &'a Request<B>) -> Self {
        let uri = req.uri();
        Self {
            target: uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str()),
            path: uri.path(),
            query: uri.query(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header_string(req, "if-none-match"),
            if_modified_since: header_string(req, "if-modified-since"),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let req = req.map(drop);
    let ctx = RequestContext::from_request(&req);

    let response = match req.method() {
        &Method::GET | &Method::HEAD => static_files::serve(&ctx, &state).await,
        method => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            http::build_501_response(method.as_str())
        }
    };

    // Every response passes through the hooks before hyper writes its headers
    let response = state.hooks.finalize(ctx.target, response);

    if state.access_log() {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            req.method().to_string(),
            ctx.path.to_string(),
        );
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = version_str(req.version()).to_string();
        entry.status = response.status().as_u16();
        // File bodies are streamed, the declared length is what gets sent
        entry.body_bytes = if ctx.is_head {
            0
        } else {
            response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        };
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_support::TempRoot;
    use http_body_util::BodyExt;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn state_for(root: &TempRoot) -> Arc<AppState> {
        let mut config = Config::default();
        config.server.root_dir = root.path().display().to_string();
        config.logging.access_log = false;
        Arc::new(AppState::new(config).unwrap())
    }

    async fn get(state: &Arc<AppState>, method: Method, target: &str) -> Response<ResponseBody> {
        let req = Request::builder().method(method).uri(target).body(()).unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    #[tokio::test]
    async fn test_js_gets_override() {
        let root = TempRoot::new("router-js");
        root.write("app.js", "console.log(1);");
        let state = state_for(&root);

        let res = get(&state, Method::GET, "/app.js").await;
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["content-type"], "application/javascript");
        assert_eq!(res.headers()["server"], "devserve/0.1");
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, "console.log(1);");
    }

    #[tokio::test]
    async fn test_query_suffix_keeps_guessed_type() {
        let root = TempRoot::new("router-js-query");
        root.write("app.js", "1");
        let state = state_for(&root);

        let res = get(&state, Method::GET, "/app.js?v=2").await;
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["content-type"], "text/javascript");
    }

    #[tokio::test]
    async fn test_html_untouched() {
        let root = TempRoot::new("router-html");
        root.write("page.html", "<p>hi</p>");
        let state = state_for(&root);

        let res = get(&state, Method::GET, "/page.html").await;
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["content-type"], "text/html");
    }

    #[tokio::test]
    async fn test_missing_js_still_hooked() {
        let root = TempRoot::new("router-missing-js");
        let state = state_for(&root);

        let res = get(&state, Method::GET, "/missing.js").await;
        assert_eq!(res.status(), 404);
        assert_eq!(res.headers()["content-type"], "application/javascript");
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let root = TempRoot::new("router-post");
        let state = state_for(&root);

        let res = get(&state, Method::POST, "/").await;
        assert_eq!(res.status(), 501);
        assert_eq!(res.headers()["server"], "devserve/0.1");
    }

    #[test]
    fn test_context_from_request() {
        let req = Request::builder()
            .uri("/libs/a.js?x=1")
            .header("If-None-Match", "\"abc\"")
            .body(())
            .unwrap();
        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.target, "/libs/a.js?x=1");
        assert_eq!(ctx.path, "/libs/a.js");
        assert_eq!(ctx.query, Some("x=1"));
        assert!(!ctx.is_head);
        assert_eq!(ctx.if_none_match.as_deref(), Some("\"abc\""));
        assert!(ctx.if_modified_since.is_none());
    }
}
