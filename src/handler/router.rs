//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body size
//! check, route matching, dispatch and access logging.

use crate::config::AppState;
use crate::db::Subcommand;
use crate::handler::{commands, schema, static_files};
use crate::http::{self, response::HttpResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::{Method, Request};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const STATIC_PREFIX: &str = "/static/";

/// Every path the gateway answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Index,
    SelectAll,
    Insert,
    Update,
    Delete,
    Export,
    Schema,
    /// Path below `/static/`
    Static(&'a str),
    NotFound,
}

impl<'a> Route<'a> {
    pub fn from_path(path: &'a str) -> Self {
        match path {
            "/" => Self::Index,
            "/select_all" => Self::SelectAll,
            "/insert" => Self::Insert,
            "/update" => Self::Update,
            "/delete" => Self::Delete,
            "/export" => Self::Export,
            "/schema" => Self::Schema,
            _ => path
                .strip_prefix(STATIC_PREFIX)
                .map_or(Self::NotFound, Self::Static),
        }
    }

    /// Subcommand the route forwards to, if any
    pub const fn subcommand(self) -> Option<Subcommand> {
        match self {
            Self::SelectAll => Some(Subcommand::Select),
            Self::Insert => Some(Subcommand::Insert),
            Self::Update => Some(Subcommand::Update),
            Self::Delete => Some(Subcommand::Delete),
            Self::Export => Some(Subcommand::Export),
            Self::Index | Self::Schema | Self::Static(_) | Self::NotFound => None,
        }
    }
}

/// Main entry point for HTTP request handling
///
/// This function:
/// 1. Rejects methods other than GET/HEAD/OPTIONS with 405
/// 2. Rejects a `Content-Length` above `http.max_body_size` with 413
/// 3. Dispatches the route, awaiting its database command if it has one
/// 4. Strips the body for HEAD and adds the `Server`/CORS headers
/// 5. Writes the access log entry
///
/// Generic over the body type: no route reads a request body.
///
/// # Arguments
///
/// * `req` - The incoming request
/// * `state` - Shared application state (config and database backend)
/// * `remote_addr` - Client address, recorded in the access log
///
/// # Returns
///
/// Always `Ok`; every failure is expressed as an HTTP response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let http_config = &state.config.http;
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let is_head = method == Method::HEAD;
    let route = Route::from_path(&path);

    // 1. Check HTTP method, 2. check body size, 3. dispatch
    let response = if let Some(resp) = check_http_method(&method, http_config.enable_cors) {
        resp
    } else if let Some(resp) = check_body_size(&req, http_config.max_body_size) {
        resp
    } else {
        let if_none_match = header_value(&req, "if-none-match");
        route_request(route, query.as_deref(), if_none_match.as_deref(), &state).await
    };

    let mut response = if is_head {
        http::response::strip_body(response)
    } else {
        response
    };
    http::response::apply_common_headers(
        &mut response,
        &http_config.server_name,
        http_config.enable_cors,
    );

    if state.config.logging.access_log {
        let mut entry =
            AccessLogEntry::new(remote_addr.ip().to_string(), method.to_string(), path.clone());
        entry.query = query;
        entry.http_version = http_version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length(&response);
        entry.user_agent = header_value(&req, "user-agent");
        entry.db_command = route.subcommand().map(Subcommand::as_str);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<HttpResponse> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Dispatch a matched route
async fn route_request(
    route: Route<'_>,
    query: Option<&str>,
    if_none_match: Option<&str>,
    state: &AppState,
) -> HttpResponse {
    let static_dir = &state.config.database.static_dir;
    match route {
        Route::Index => static_files::serve_index(static_dir, if_none_match).await,
        Route::Static(relative) => {
            static_files::serve_asset(static_dir, relative, if_none_match).await
        }
        Route::SelectAll => commands::select_all(state).await,
        Route::Insert => commands::insert(state, &http::parse_query(query)).await,
        Route::Update => commands::update(state, &http::parse_query(query)).await,
        Route::Delete => commands::delete(state, &http::parse_query(query)).await,
        Route::Export => commands::export(state).await,
        Route::Schema => schema::serve_schema(state).await,
        Route::NotFound => http::build_404_response(),
    }
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

fn content_length(response: &HttpResponse) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
