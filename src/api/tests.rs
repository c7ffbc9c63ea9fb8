use super::*;
use crate::auth::{TokenAuthenticator, TOKEN_HEADER};
use crate::config::Config;
use crate::model::User;
use crate::store::{DocumentStore, ProfileStore};
use hyper::Method;
use serde_json::{json, Value};

const TOKEN: &str = "token-ada";
const OTHER_TOKEN: &str = "token-bob";

struct Harness {
    state: Arc<AppState>,
    store: Arc<DocumentStore>,
    ada: User,
    bob: User,
}

async fn harness() -> Harness {
    let store = Arc::new(DocumentStore::in_memory());
    let ada = User::new(UserId::new(), "Ada", "ada@example.com");
    let bob = User::new(UserId::new(), "Bob", "bob@example.com");
    store.insert_user(ada.clone()).await.unwrap();
    store.insert_user(bob.clone()).await.unwrap();

    let mut auth = TokenAuthenticator::new();
    auth.insert(TOKEN, ada.id);
    auth.insert(OTHER_TOKEN, bob.id);

    let mut config = Config::for_tests();
    config.logging.access_log = true;
    config.http.max_body_size = 2048;

    let state = Arc::new(AppState::new(config, store.clone(), Arc::new(auth)));
    Harness {
        state,
        store,
        ada,
        bob,
    }
}

impl Harness {
    async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        let body = body.map(|b| b.to_string()).unwrap_or_default();
        let req = builder.body(Full::new(Bytes::from(body))).unwrap();
        self.send(req).await
    }

    async fn send(&self, req: Request<Full<Bytes>>) -> (StatusCode, Value) {
        let remote = "127.0.0.1:40000".parse().unwrap();
        let response = handle_request(req, Arc::clone(&self.state), remote)
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn create_profile(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, "/api/profile", Some(token), Some(body))
            .await
    }
}

fn experience(title: &str) -> Value {
    json!({ "title": title, "company": "Acme", "from": "2018-01-01", "current": true })
}

fn education(school: &str) -> Value {
    json!({ "school": school, "degree": "BSc", "fieldofstudy": "CS", "from": "2010-09-01" })
}

#[tokio::test]
async fn test_create_requires_status_and_skills() {
    let h = harness().await;
    let (status, body) = h
        .create_profile(TOKEN, json!({ "status": "", "skills": "" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["param"], "status");
    assert_eq!(errors[0]["msg"], "Status is required");
    assert_eq!(errors[1]["param"], "skills");
    assert_eq!(errors[1]["msg"], "Skills is required");
    assert!(h.store.list_profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_then_update_keeps_one_record() {
    let h = harness().await;
    let (status, first) = h
        .create_profile(
            TOKEN,
            json!({
                "status": "Junior",
                "skills": "go, c",
                "company": "Initech",
                "bio": "hi",
                "githubusername": "ada",
                "twitter": "https://t.co/ada"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["user"]["name"], "Ada");
    assert_eq!(first["skills"], json!(["go", "c"]));

    let (status, second) = h
        .create_profile(
            TOKEN,
            json!({ "status": "Senior", "skills": "rust", "company": "", "location": "Lisbon" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["_id"], first["_id"]);
    assert_eq!(second["status"], "Senior");
    assert_eq!(second["skills"], json!(["rust"]));
    assert_eq!(second["location"], "Lisbon");
    // Fields left out (or blank) keep their stored values
    assert_eq!(second["company"], "Initech");
    assert_eq!(second["bio"], "hi");
    assert_eq!(second["githubusername"], "ada");
    // Social links are replaced as a whole
    assert!(second["social"].get("twitter").is_none());

    let profiles = h.store.list_profiles().await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].status, "Senior");
}

#[tokio::test]
async fn test_me_without_profile_is_400() {
    let h = harness().await;
    let (status, body) = h.call(Method::GET, "/api/profile/me", Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "There is no profile for this user");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let h = harness().await;
    let (status, body) = h.call(Method::GET, "/api/profile/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "No token, authorization denied");

    let (status, body) = h
        .call(Method::DELETE, "/api/profile", Some("forged"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Token is not valid");
}

#[tokio::test]
async fn test_public_routes() {
    let h = harness().await;
    h.create_profile(TOKEN, json!({ "status": "Dev", "skills": "rust" }))
        .await;
    h.create_profile(OTHER_TOKEN, json!({ "status": "Ops", "skills": "bash" }))
        .await;

    let (status, body) = h.call(Method::GET, "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["user"]["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Ada", "Bob"]);

    let path = format!("/api/profile/user/{}", h.bob.id);
    let (status, body) = h.call(Method::GET, &path, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Ops");
}

#[tokio::test]
async fn test_profile_by_unknown_or_malformed_id_is_400() {
    let h = harness().await;
    let path = format!("/api/profile/user/{}", UserId::new());
    let (status, body) = h.call(Method::GET, &path, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "There is no profile for this user");

    let (status, body) = h
        .call(Method::GET, "/api/profile/user/not-an-id", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Profile not found");
}

#[tokio::test]
async fn test_experience_prepend_and_remove() {
    let h = harness().await;
    h.create_profile(TOKEN, json!({ "status": "Dev", "skills": "rust" }))
        .await;

    for title in ["first", "second", "third"] {
        let (status, body) = h
            .call(Method::PUT, "/api/profile/experience", Some(TOKEN), Some(experience(title)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["msg"], "Experience added");

        let profile = h.store.find_profile(h.ada.id).await.unwrap().unwrap();
        assert_eq!(profile.experience[0].title, title);
    }

    let profile = h.store.find_profile(h.ada.id).await.unwrap().unwrap();
    let middle = profile.experience[1].id;
    let path = format!("/api/profile/experience/{middle}");
    let (status, _) = h.call(Method::DELETE, &path, Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);

    let profile = h.store.find_profile(h.ada.id).await.unwrap().unwrap();
    let titles: Vec<_> = profile.experience.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["third", "first"]);

    // Unknown ids leave the list alone
    let path = format!("/api/profile/experience/{}", crate::model::EntryId::new());
    let (status, body) = h.call(Method::DELETE, &path, Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Experience removed");
    let profile = h.store.find_profile(h.ada.id).await.unwrap().unwrap();
    assert_eq!(profile.experience.len(), 2);
}

#[tokio::test]
async fn test_experience_validation_and_missing_profile() {
    let h = harness().await;
    let (status, body) = h
        .call(Method::PUT, "/api/profile/experience", Some(TOKEN), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let params: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["param"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(params, ["title", "company", "from"]);

    let (status, body) = h
        .call(Method::PUT, "/api/profile/experience", Some(TOKEN), Some(experience("x")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Profile not found");
}

#[tokio::test]
async fn test_education_prepend_and_remove() {
    let h = harness().await;
    h.create_profile(TOKEN, json!({ "status": "Dev", "skills": "rust" }))
        .await;

    for school in ["MIT", "ETH"] {
        let (status, body) = h
            .call(Method::PUT, "/api/profile/education", Some(TOKEN), Some(education(school)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["msg"], "Education added");
    }

    let (_, me) = h.call(Method::GET, "/api/profile/me", Some(TOKEN), None).await;
    assert_eq!(me["education"][0]["school"], "ETH");
    assert_eq!(me["education"][1]["school"], "MIT");

    let eth = me["education"][0]["_id"].as_str().unwrap().to_string();
    let path = format!("/api/profile/education/{eth}");
    let (status, body) = h.call(Method::DELETE, &path, Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Education removed");

    let (_, me) = h.call(Method::GET, "/api/profile/me", Some(TOKEN), None).await;
    assert_eq!(me["education"].as_array().unwrap().len(), 1);
    assert_eq!(me["education"][0]["school"], "MIT");
}

#[tokio::test]
async fn test_education_validation() {
    let h = harness().await;
    let (status, body) = h
        .call(
            Method::PUT,
            "/api/profile/education",
            Some(TOKEN),
            Some(json!({ "school": "MIT", "from": "2010-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msgs: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["msg"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(msgs, ["Degree is required", "Field of study is required"]);
}

#[tokio::test]
async fn test_delete_entry_with_malformed_id() {
    let h = harness().await;
    h.create_profile(TOKEN, json!({ "status": "Dev", "skills": "rust" }))
        .await;
    let (status, body) = h
        .call(Method::DELETE, "/api/profile/education/42", Some(TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Profile not found");
}

#[tokio::test]
async fn test_delete_account_removes_profile_and_user() {
    let h = harness().await;
    h.create_profile(TOKEN, json!({ "status": "Dev", "skills": "rust" }))
        .await;
    h.create_profile(OTHER_TOKEN, json!({ "status": "Ops", "skills": "bash" }))
        .await;

    let (status, body) = h.call(Method::DELETE, "/api/profile", Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "User deleted");

    assert!(h.store.find_profile(h.ada.id).await.unwrap().is_none());
    assert!(h.store.find_user(h.ada.id).await.unwrap().is_none());
    assert!(h.store.find_profile(h.bob.id).await.unwrap().is_some());
    assert!(h.store.find_user(h.bob.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_invalid_json_is_400() {
    let h = harness().await;
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/profile")
        .header(TOKEN_HEADER, TOKEN)
        .body(Full::new(Bytes::from_static(b"{not json")))
        .unwrap();
    let (status, body) = h.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_body_over_limit_is_413() {
    let h = harness().await;
    let bio = "x".repeat(4096);
    let (status, _) = h
        .create_profile(TOKEN, json!({ "status": "Dev", "skills": "rust", "bio": bio }))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_unknown_path_and_wrong_method() {
    let h = harness().await;
    let (status, _) = h.call(Method::GET, "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = h
        .call(Method::PATCH, "/api/profile/me", Some(TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health() {
    let h = harness().await;
    let (status, body) = h.call(Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}

#[tokio::test]
async fn test_entry_edit_after_account_delete_does_not_restore_profile() {
    let h = harness().await;
    h.create_profile(TOKEN, json!({ "status": "Dev", "skills": "rust" }))
        .await;
    let (status, _) = h.call(Method::DELETE, "/api/profile", Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = h
        .call(Method::PUT, "/api/profile/experience", Some(TOKEN), Some(experience("late")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Profile not found");

    let path = format!("/api/profile/education/{}", crate::model::EntryId::new());
    let (status, _) = h.call(Method::DELETE, &path, Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(h.store.find_profile(h.ada.id).await.unwrap().is_none());
    assert!(h.store.list_profiles().await.unwrap().iter().all(|p| p.user != h.ada.id));
}

#[tokio::test]
async fn test_failed_snapshot_is_500_and_not_applied() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let store = Arc::new(DocumentStore::open(blocker.join("profiles.toml")).unwrap());

    let user = UserId::new();
    let mut auth = TokenAuthenticator::new();
    auth.insert(TOKEN, user);
    let h = Harness {
        state: Arc::new(AppState::new(Config::for_tests(), store.clone(), Arc::new(auth))),
        store,
        ada: User::new(user, "Ada", "ada@example.com"),
        bob: User::new(UserId::new(), "Bob", "bob@example.com"),
    };

    let (status, body) = h
        .create_profile(TOKEN, json!({ "status": "Dev", "skills": "rust" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, Value::String("Server error".to_string()));

    let (status, body) = h.call(Method::GET, "/api/profile/me", Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "There is no profile for this user");
}
