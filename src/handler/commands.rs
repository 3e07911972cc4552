//! Database command routes
//!
//! Each route turns its query parameters into an argv tail, runs one
//! subcommand and wraps whatever the program printed in a `<pre>` block.

use crate::config::AppState;
use crate::db::{self, ArgsError, CommandOutput, DbError, Subcommand};
use crate::http::mime;
use crate::http::response::{
    build_attachment_response, build_html_response, build_text_response, HttpResponse,
};
use crate::logger;
use hyper::StatusCode;
use std::path::Path;

type Params = [(String, String)];

/// `GET /select_all`
pub async fn select_all(state: &AppState) -> HttpResponse {
    run_and_render(state, Subcommand::Select, &[]).await
}

/// `GET /insert?k1=v1&k2=v2...`
pub async fn insert(state: &AppState, params: &Params) -> HttpResponse {
    let args = db::insert_args(params);
    run_and_render(state, Subcommand::Insert, &args).await
}

/// `GET /update?match_col=..&match_val=..&k=v...`
pub async fn update(state: &AppState, params: &Params) -> HttpResponse {
    match db::update_args(params) {
        Ok(args) => run_and_render(state, Subcommand::Update, &args).await,
        Err(e) => missing_params(&e, state.config.http.strict_status),
    }
}

/// `GET /delete?col=..&val=..`
pub async fn delete(state: &AppState, params: &Params) -> HttpResponse {
    match db::delete_args(params) {
        Ok(args) => run_and_render(state, Subcommand::Delete, &args).await,
        Err(e) => missing_params(&e, state.config.http.strict_status),
    }
}

/// `GET /export`
///
/// The exit code of `export` is ignored unless strict status is on; whatever
/// is at the export path afterwards is sent as a download.
pub async fn export(state: &AppState) -> HttpResponse {
    let database = &state.config.database;
    let args = [database.export_file.clone()];

    match state.backend.run(Subcommand::Export, &args).await {
        Ok(output) if !output.success() && state.config.http.strict_status => {
            return render_output(&output, true);
        }
        Ok(_) => {}
        Err(e) => return launch_failed(&e),
    }

    let path = database.export_path();
    match tokio::fs::read(&path).await {
        Ok(data) => {
            let extension = Path::new(&database.export_file)
                .extension()
                .and_then(|e| e.to_str());
            let content_type = mime::get_content_type(extension);
            build_attachment_response(data, content_type, &database.export_download_name())
        }
        Err(e) => {
            logger::log_error(&format!(
                "Export file '{}' not readable: {e}",
                path.display()
            ));
            build_text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "500 Internal Server Error: export file not available",
            )
        }
    }
}

async fn run_and_render(state: &AppState, subcommand: Subcommand, args: &[String]) -> HttpResponse {
    match state.backend.run(subcommand, args).await {
        Ok(output) => render_output(&output, state.config.http.strict_status),
        Err(e) => launch_failed(&e),
    }
}

/// `<pre>stdout</pre>` on success, `<pre>Error: stdout+stderr</pre>` otherwise
///
/// Failures keep status 200 unless `strict` is set.
pub fn render_output(output: &CommandOutput, strict: bool) -> HttpResponse {
    if output.success() {
        return build_html_response(
            StatusCode::OK,
            format!("<pre>{}</pre>", escape_html(&output.stdout)),
        );
    }

    let status = if strict {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    build_html_response(
        status,
        format!("<pre>Error: {}</pre>", escape_html(&output.combined())),
    )
}

fn missing_params(err: &ArgsError, strict: bool) -> HttpResponse {
    let status = if strict {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    build_text_response(status, &err.to_string())
}

fn launch_failed(err: &DbError) -> HttpResponse {
    logger::log_error(&err.to_string());
    build_text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error: database command could not be started",
    )
}

/// Escape text for embedding inside `<pre>`
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
