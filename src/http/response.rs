//! HTTP response building module
//!
//! Builders for every response the gateway emits. Builders never panic: a
//! header that fails to encode is logged and an empty response is returned.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Response, StatusCode};
use serde::Serialize;

pub type HttpResponse = Response<Full<Bytes>>;

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> HttpResponse {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build plain-text response
pub fn build_text_response(status: StatusCode, text: &str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", text.len())
        .body(Full::new(Bytes::from(text.to_owned())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build generic HTML response
pub fn build_html_response(status: StatusCode, content: String) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content.len())
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build compact JSON response
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from(r#"{"error":"Internal server error"}"#)))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())));
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Content-Length", json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build file download response (`Content-Disposition: attachment`)
pub fn build_attachment_response(data: Vec<u8>, content_type: &str, filename: &str) -> HttpResponse {
    let safe_name: String = filename
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{safe_name}\""),
        )
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| {
            log_build_error("attachment", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build static asset response with `ETag` cache validation
pub fn build_cached_response(data: Vec<u8>, content_type: &str, etag: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Drop the body of a response, keeping status and headers (HEAD requests)
pub fn strip_body(response: HttpResponse) -> HttpResponse {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Add `Server` and CORS headers shared by every response
pub fn apply_common_headers(response: &mut HttpResponse, server_name: &str, enable_cors: bool) {
    if let Ok(value) = server_name.parse::<HeaderValue>() {
        response.headers_mut().insert("Server", value);
    }
    if enable_cors {
        response
            .headers_mut()
            .insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response() {
        let resp = build_text_response(StatusCode::OK, "Missing delete parameters");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(resp.headers()["Content-Length"], "25");
    }

    #[test]
    fn test_attachment_sanitizes_filename() {
        let resp = build_attachment_response(b"a,b\n".to_vec(), "text/csv", "da\"ta\n.csv");
        assert_eq!(
            resp.headers()["Content-Disposition"],
            "attachment; filename=\"data.csv\""
        );
        assert_eq!(resp.headers()["Content-Length"], "4");
    }

    #[test]
    fn test_strip_body_keeps_headers() {
        let resp = strip_body(build_html_response(StatusCode::OK, "<pre>x</pre>".to_string()));
        assert_eq!(resp.headers()["Content-Length"], "12");
    }

    #[test]
    fn test_common_headers() {
        let mut resp = build_404_response();
        apply_common_headers(&mut resp, "dbgate", true);
        assert_eq!(resp.headers()["Server"], "dbgate");
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_options_without_cors() {
        let resp = build_options_response(false);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
    }
}
