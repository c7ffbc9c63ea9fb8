// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::types::{Message, ValidationErrors};
use crate::config::HttpConfig;
use crate::error::ApiError;
use crate::logger;

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return server_error();
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build plain-text response
pub fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from_static(body.as_bytes())))
        })
}

/// 500 with the generic message; details only go to the log
pub fn server_error() -> Response<Full<Bytes>> {
    text_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
}

pub fn health() -> Response<Full<Bytes>> {
    text_response(StatusCode::OK, "ok")
}

/// 404 Not Found response
pub fn not_found() -> Response<Full<Bytes>> {
    json_response(StatusCode::NOT_FOUND, &Message::new("Not Found"))
}

/// 405 Method Not Allowed response
pub fn method_not_allowed(allow: &str) -> Response<Full<Bytes>> {
    let mut response = json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &Message::new("Method Not Allowed"),
    );
    if let Ok(value) = allow.parse() {
        response.headers_mut().insert("Allow", value);
    }
    response
}

/// Build OPTIONS response (preflight request)
pub fn options_response(allow: &str, enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", allow);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", allow)
            .header("Access-Control-Allow-Headers", "Content-Type, x-auth-token")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Map a handler error onto its status and body
pub fn error_response(err: &ApiError) -> Response<Full<Bytes>> {
    match err {
        ApiError::Validation(errors) => json_response(
            StatusCode::BAD_REQUEST,
            &ValidationErrors {
                errors: errors.clone(),
            },
        ),
        ApiError::NotFound(msg) | ApiError::BadRequest(msg) => {
            json_response(StatusCode::BAD_REQUEST, &Message::new(msg.as_str()))
        }
        ApiError::MalformedId(_) => {
            json_response(StatusCode::BAD_REQUEST, &Message::new("Profile not found"))
        }
        ApiError::PayloadTooLarge => {
            text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
        }
        ApiError::Unauthorized(msg) => {
            json_response(StatusCode::UNAUTHORIZED, &Message::new(msg.as_str()))
        }
        ApiError::Internal(e) => {
            logger::log_error(&e.to_string());
            server_error()
        }
    }
}

/// Headers every response carries
pub fn decorate(response: &mut Response<Full<Bytes>>, http: &HttpConfig) {
    let headers = response.headers_mut();
    if let Ok(value) = http.server_name.parse() {
        headers.insert("Server", value);
    }
    if http.enable_cors {
        headers.insert(
            "Access-Control-Allow-Origin",
            hyper::header::HeaderValue::from_static("*"),
        );
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}
