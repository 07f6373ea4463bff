//! Response header hooks
//!
//! Hooks mutate the header map of a finished response just before it is handed
//! back to hyper. Hyper writes the header section (and its terminating blank
//! line) once per response after the service future resolves, so every hook
//! runs strictly before header finalization.

use crate::config::{ContentTypeRule, HttpConfig};
use hyper::header::{HeaderMap, HeaderValue, InvalidHeaderValue, CONTENT_TYPE, SERVER};
use hyper::Response;

/// A mutation applied to the pending headers of a response
pub trait HeaderHook: Send + Sync {
    /// `target` is the request target exactly as received (path and query)
    fn apply(&self, target: &str, headers: &mut HeaderMap);
}

/// Forces `Content-Type` when the request target ends with a suffix
#[derive(Debug, Clone)]
pub struct ContentTypeOverride {
    suffix: String,
    content_type: HeaderValue,
}

impl ContentTypeOverride {
    pub fn new(suffix: &str, content_type: &str) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            suffix: suffix.to_string(),
            content_type: HeaderValue::from_str(content_type)?,
        })
    }

    fn from_rule(rule: &ContentTypeRule) -> Result<Self, InvalidHeaderValue> {
        Self::new(&rule.suffix, &rule.content_type)
    }
}

impl HeaderHook for ContentTypeOverride {
    fn apply(&self, target: &str, headers: &mut HeaderMap) {
        if target.ends_with(&self.suffix) {
            headers.insert(CONTENT_TYPE, self.content_type.clone());
        }
    }
}

/// Stamps the `Server` header
#[derive(Debug, Clone)]
pub struct ServerName(HeaderValue);

impl HeaderHook for ServerName {
    fn apply(&self, _target: &str, headers: &mut HeaderMap) {
        headers.insert(SERVER, self.0.clone());
    }
}

/// Ordered hook chain
#[derive(Default)]
pub struct HeaderHooks {
    hooks: Vec<Box<dyn HeaderHook>>,
}

impl HeaderHooks {
    /// Server name first, then every content type override in config order
    pub fn from_config(http: &HttpConfig) -> Result<Self, InvalidHeaderValue> {
        let mut hooks = Self::default();
        hooks.push(ServerName(HeaderValue::from_str(&http.server_name)?));
        for rule in &http.content_type_overrides {
            hooks.push(ContentTypeOverride::from_rule(rule)?);
        }
        Ok(hooks)
    }

    pub fn push(&mut self, hook: impl HeaderHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Run every hook over the response headers
    pub fn finalize<B>(&self, target: &str, mut response: Response<B>) -> Response<B> {
        let headers = response.headers_mut();
        for hook in &self.hooks {
            hook.apply(target, headers);
        }
        response
    }
}
