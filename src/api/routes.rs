//! Route matching module
//!
//! Maps a method and path onto one of the profile routes.

use hyper::Method;

/// Mount point of the profile API
pub const API_PREFIX: &str = "/api/profile";

/// Liveness probe path
pub const HEALTH_PATH: &str = "/healthz";

/// A matched route, with any raw path parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Health,
    CurrentProfile,
    UpsertProfile,
    ListProfiles,
    ProfileByUser(String),
    DeleteAccount,
    AddExperience,
    DeleteExperience(String),
    AddEducation,
    DeleteEducation(String),
}

impl Route {
    /// Whether the caller must be authenticated
    pub const fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Health | Self::ListProfiles | Self::ProfileByUser(_)
        )
    }
}

/// Outcome of matching a request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(Route),
    /// `OPTIONS` on a known path; carries the `Allow` header value
    Preflight(String),
    /// Known path, unsupported method; carries the `Allow` header value
    MethodNotAllowed(String),
    NotFound,
}

/// Find the route for a request line
pub fn resolve(method: &Method, path: &str) -> Resolution {
    let candidates = match candidates(path) {
        Some(c) => c,
        None => return Resolution::NotFound,
    };

    if let Some((_, route)) = candidates
        .iter()
        .find(|(m, _)| m == method || (*method == Method::HEAD && *m == Method::GET))
    {
        return Resolution::Matched(route.clone());
    }

    let allow = candidates
        .iter()
        .map(|(m, _)| m.as_str())
        .chain(std::iter::once("OPTIONS"))
        .collect::<Vec<_>>()
        .join(", ");

    if *method == Method::OPTIONS {
        Resolution::Preflight(allow)
    } else {
        Resolution::MethodNotAllowed(allow)
    }
}

/// Routes served at `path`, keyed by method
fn candidates(path: &str) -> Option<Vec<(Method, Route)>> {
    if path == HEALTH_PATH {
        return Some(vec![(Method::GET, Route::Health)]);
    }

    let rest = path.strip_prefix(API_PREFIX)?.trim_end_matches('/');
    let segments: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.strip_prefix('/')?.split('/').collect()
    };

    let routes = match segments.as_slice() {
        [] => vec![
            (Method::GET, Route::ListProfiles),
            (Method::POST, Route::UpsertProfile),
            (Method::DELETE, Route::DeleteAccount),
        ],
        ["me"] => vec![(Method::GET, Route::CurrentProfile)],
        ["user", id] if !id.is_empty() => {
            vec![(Method::GET, Route::ProfileByUser((*id).to_string()))]
        }
        ["experience"] => vec![(Method::PUT, Route::AddExperience)],
        ["experience", id] if !id.is_empty() => {
            vec![(Method::DELETE, Route::DeleteExperience((*id).to_string()))]
        }
        ["education"] => vec![(Method::PUT, Route::AddEducation)],
        ["education", id] if !id.is_empty() => {
            vec![(Method::DELETE, Route::DeleteEducation((*id).to_string()))]
        }
        _ => return None,
    };
    Some(routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_methods() {
        assert_eq!(
            resolve(&Method::GET, "/api/profile"),
            Resolution::Matched(Route::ListProfiles)
        );
        assert_eq!(
            resolve(&Method::POST, "/api/profile/"),
            Resolution::Matched(Route::UpsertProfile)
        );
        assert_eq!(
            resolve(&Method::DELETE, "/api/profile"),
            Resolution::Matched(Route::DeleteAccount)
        );
    }

    #[test]
    fn test_path_parameters() {
        assert_eq!(
            resolve(&Method::GET, "/api/profile/user/abc"),
            Resolution::Matched(Route::ProfileByUser("abc".to_string()))
        );
        assert_eq!(
            resolve(&Method::DELETE, "/api/profile/experience/42"),
            Resolution::Matched(Route::DeleteExperience("42".to_string()))
        );
        assert_eq!(
            resolve(&Method::DELETE, "/api/profile/education/7"),
            Resolution::Matched(Route::DeleteEducation("7".to_string()))
        );
    }

    #[test]
    fn test_head_follows_get() {
        assert_eq!(
            resolve(&Method::HEAD, "/api/profile/me"),
            Resolution::Matched(Route::CurrentProfile)
        );
    }

    #[test]
    fn test_wrong_method() {
        assert_eq!(
            resolve(&Method::POST, "/api/profile/experience"),
            Resolution::MethodNotAllowed("PUT, OPTIONS".to_string())
        );
        assert_eq!(
            resolve(&Method::OPTIONS, "/api/profile"),
            Resolution::Preflight("GET, POST, DELETE, OPTIONS".to_string())
        );
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(resolve(&Method::GET, "/api/profiles"), Resolution::NotFound);
        assert_eq!(resolve(&Method::GET, "/api/profile/user"), Resolution::NotFound);
        assert_eq!(
            resolve(&Method::GET, "/api/profile/user/a/b"),
            Resolution::NotFound
        );
        assert_eq!(resolve(&Method::GET, "/"), Resolution::NotFound);
    }

    #[test]
    fn test_auth_requirements() {
        assert!(!Route::ListProfiles.requires_auth());
        assert!(!Route::ProfileByUser(String::new()).requires_auth());
        assert!(!Route::Health.requires_auth());
        assert!(Route::CurrentProfile.requires_auth());
        assert!(Route::DeleteAccount.requires_auth());
        assert!(Route::AddEducation.requires_auth());
    }
}
