//! Static file serving module
//!
//! Serves the index page and `/static/<path>` assets from the static directory.

use crate::http::{self, cache, mime};
use crate::http::response::{build_cached_response, HttpResponse};
use crate::logger;
use std::path::Path;
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Serve `index.html` from the static directory
pub async fn serve_index(static_dir: &Path, if_none_match: Option<&str>) -> HttpResponse {
    serve_asset(static_dir, INDEX_FILE, if_none_match).await
}

/// Serve a file below the static directory, relative path without leading slash
pub async fn serve_asset(
    static_dir: &Path,
    relative_path: &str,
    if_none_match: Option<&str>,
) -> HttpResponse {
    match load_asset(static_dir, relative_path).await {
        Some((content, content_type)) => {
            let etag = cache::generate_etag(&content);
            if cache::check_etag_match(if_none_match, &etag) {
                return http::build_304_response(&etag);
            }
            build_cached_response(content, content_type, &etag)
        }
        None => http::build_404_response(),
    }
}

/// Load a file, refusing anything that resolves outside `static_dir`
pub async fn load_asset(static_dir: &Path, relative_path: &str) -> Option<(Vec<u8>, &'static str)> {
    let relative_path = relative_path.trim_start_matches('/');
    if relative_path.is_empty() {
        return None;
    }

    let static_dir_canonical = match static_dir.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{}': {e}",
                static_dir.display()
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let Ok(file_path) = static_dir.join(relative_path).canonicalize() else {
        return None;
    };
    if !file_path.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative_path} -> {}",
            file_path.display()
        ));
        return None;
    }
    if !file_path.is_file() {
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}
