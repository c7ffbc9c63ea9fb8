// API module entry
// Profile REST routes mounted at /api/profile

mod handlers;
pub mod response;
pub mod routes;
pub mod types;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::error::{ApiError, ApiResult};
use crate::logger::{self, AccessLogEntry};
use crate::model::UserId;
use routes::{Resolution, Route};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// API route handler
///
/// Resolves the route, authenticates when the route requires it, runs the
/// handler and maps any error onto its response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let (mut response, caller) = dispatch(req, &state).await;
    response::decorate(&mut response, &state.config.http);

    let status = response.status().as_u16();
    logger::log_api_request(&method, &path, status);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(remote_addr.ip().to_string(), method, path);
        entry.status = status;
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.user = caller.map(|u| u.to_string());
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch<B>(req: Request<B>, state: &AppState) -> (Response<Full<Bytes>>, Option<UserId>)
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let route = match routes::resolve(req.method(), req.uri().path()) {
        Resolution::Matched(route) => route,
        Resolution::Preflight(allow) => {
            return (
                response::options_response(&allow, state.config.http.enable_cors),
                None,
            )
        }
        Resolution::MethodNotAllowed(allow) => {
            logger::log_warning(&format!(
                "Method not allowed: {} {}",
                req.method(),
                req.uri().path()
            ));
            return (response::method_not_allowed(&allow), None);
        }
        Resolution::NotFound => return (response::not_found(), None),
    };

    let caller = if route.requires_auth() {
        match state.auth.authenticate(req.headers()) {
            Ok(user) => Some(user),
            Err(e) => return (response::error_response(&e), None),
        }
    } else {
        None
    };

    let response = match run_route(route, caller, req, state).await {
        Ok(response) => response,
        Err(e) => response::error_response(&e),
    };
    (response, caller)
}

async fn run_route<B>(
    route: Route,
    caller: Option<UserId>,
    req: Request<B>,
    state: &AppState,
) -> ApiResult<Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    match (route, caller) {
        (Route::Health, _) => Ok(response::health()),
        (Route::ListProfiles, _) => Ok(ok(&handlers::list_profiles(state).await?)),
        (Route::ProfileByUser(id), _) => Ok(ok(&handlers::profile_by_user(state, &id).await?)),
        (Route::CurrentProfile, Some(user)) => {
            Ok(ok(&handlers::current_profile(state, user).await?))
        }
        (Route::UpsertProfile, Some(user)) => {
            let form = read_json(req, state).await?;
            Ok(ok(&handlers::upsert_profile(state, user, form).await?))
        }
        (Route::DeleteAccount, Some(user)) => Ok(ok(&handlers::delete_account(state, user).await?)),
        (Route::AddExperience, Some(user)) => {
            let form = read_json(req, state).await?;
            Ok(ok(&handlers::add_experience(state, user, form).await?))
        }
        (Route::DeleteExperience(id), Some(user)) => {
            Ok(ok(&handlers::delete_experience(state, user, &id).await?))
        }
        (Route::AddEducation, Some(user)) => {
            let form = read_json(req, state).await?;
            Ok(ok(&handlers::add_education(state, user, form).await?))
        }
        (Route::DeleteEducation(id), Some(user)) => {
            Ok(ok(&handlers::delete_education(state, user, &id).await?))
        }
        (_, None) => Err(ApiError::Unauthorized(
            "No token, authorization denied".to_string(),
        )),
    }
}

/// Collect and decode a JSON body, enforcing `http.max_body_size`
///
/// An empty body decodes as `{}` so missing fields surface as validation errors.
async fn read_json<T, B>(req: Request<B>, state: &AppState) -> ApiResult<T>
where
    T: DeserializeOwned,
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    if content_length(&req).is_some_and(|len| len > limit) {
        return Err(ApiError::PayloadTooLarge);
    }

    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => return Err(ApiError::PayloadTooLarge),
        Err(e) => return Err(ApiError::BadRequest(format!("Failed to read request body: {e}"))),
    };

    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &bytes
    };
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {e}")))
}

fn content_length<B>(req: &Request<B>) -> Option<usize> {
    req.headers()
        .get(hyper::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn ok<T: Serialize>(body: &T) -> Response<Full<Bytes>> {
    response::json_response(StatusCode::OK, body)
}

#[cfg(test)]
mod tests;
