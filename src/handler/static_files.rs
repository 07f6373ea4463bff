//! Static file serving module
//!
//! Maps request targets onto the served root, resolves directory indexes and
//! builds file responses with cache validators.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, path, ResponseBody};
use crate::logger;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

const FILE_NOT_FOUND: &str = "File not found";

/// Serve whatever the request target resolves to below the root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let resolved = path::translate_path(&state.root, ctx.target);

    let Ok(metadata) = fs::metadata(&resolved.fs_path).await else {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    };

    if metadata.is_dir() {
        return serve_directory(ctx, state, &resolved.fs_path).await;
    }

    // "/file.txt/" names a directory that does not exist
    if resolved.trailing_slash {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    }

    serve_file(ctx, state, &resolved.fs_path).await
}

/// Redirect to the slash form, then serve an index file or a listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<ResponseBody> {
    if !ctx.path.ends_with('/') {
        let location = match ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    if let Some(index) = find_index_file(dir, &state.config.http.index_files).await {
        return serve_file(ctx, state, &index).await;
    }

    if within_root(&state.root, dir, ctx.path).await.is_none() {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    }
    listing::serve_listing(ctx, dir).await
}

/// First configured index name that exists as a regular file in `dir`
pub async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

/// Serve a single file with `ETag`/`Last-Modified` validation
async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    file_path: &Path,
) -> Response<ResponseBody> {
    let Some(canonical) = within_root(&state.root, file_path, ctx.path).await else {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    };

    let metadata = match fs::metadata(&canonical).await {
        Ok(m) => m,
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to stat file '{}': {e}",
                canonical.display()
            ));
            return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
        }
    };
    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);
    let etag = cache::generate_etag(metadata.len(), modified);

    if cache::is_not_modified(
        ctx.if_none_match.as_deref(),
        ctx.if_modified_since.as_deref(),
        &etag,
        modified,
    ) {
        return http::build_304_response(&etag, last_modified.as_deref());
    }

    // HEAD never opens the file, the length comes from the metadata
    let file = if ctx.is_head {
        None
    } else {
        match fs::File::open(&canonical).await {
            Ok(f) => Some(f),
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to open file '{}': {e}",
                    canonical.display()
                ));
                return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
            }
        }
    };

    http::response::build_file_response(
        file,
        metadata.len(),
        mime::guess_for_path(file_path),
        &etag,
        last_modified.as_deref(),
    )
}

/// Canonicalize `target` and ensure it did not leave `root` through a symlink
async fn within_root(root: &Path, target: &Path, request_path: &str) -> Option<PathBuf> {
    // File not found is common (404), no need to log at warning level
    let canonical = fs::canonicalize(target).await.ok()?;
    if canonical.starts_with(root) {
        Some(canonical)
    } else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            canonical.display()
        ));
        None
    }
}
