//! Integration tests for the NeonSki backend.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::auth::PRINCIPAL_HEADER;
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::{create_router, AppState};

const PSK: &str = "test-api-key";

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_config(Some(PSK.to_string()), true).await
    }

    async fn with_config(psk: Option<String>, seed_demo_data: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        let config = Config {
            api_psk: psk.clone(),
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            seed_demo_data,
        };

        let state = AppState {
            repo,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A request made by `user`, or by a guest when `None`.
    fn request(&self, method: Method, path: &str, user: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match user {
            Some(name) => builder.header(PRINCIPAL_HEADER, name),
            None => builder,
        }
    }

    async fn get(&self, path: &str, user: Option<&str>) -> Response {
        self.request(Method::GET, path, user).send().await.unwrap()
    }

    async fn send_json(&self, method: Method, path: &str, user: &str, body: Value) -> Response {
        self.request(method, path, Some(user))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    /// GET returning the `data` member of a 200 envelope.
    async fn data(&self, path: &str, user: Option<&str>) -> Value {
        let resp = self.get(path, user).await;
        assert_eq!(resp.status(), 200, "GET {} failed", path);
        let body: Value = resp.json().await.unwrap();
        assert!(body["errors"].is_null());
        body["data"].clone()
    }

    /// List resorts as `user`, seeding the demo catalogue on first call.
    async fn seeded_resorts(&self, user: &str) -> Vec<Value> {
        self.data("/api/resorts", Some(user))
            .await
            .as_array()
            .unwrap()
            .clone()
    }
}

async fn error_type(resp: Response) -> String {
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].is_null());
    body["errors"][0]["errorType"].as_str().unwrap().to_string()
}

fn names(records: &[Value]) -> Vec<&str> {
    records.iter().map(|r| r["name"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    // Plain client without the default API key header
    let resp = Client::new()
        .get(fixture.url("/api/session"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    assert_eq!(error_type(resp).await, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/session"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_auth_bearer_token() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/session"))
        .header("Authorization", format!("Bearer {}", PSK))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_no_psk_configured() {
    let fixture = TestFixture::with_config(None, true).await;

    let resp = Client::new()
        .get(fixture.url("/api/session"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_session() {
    let fixture = TestFixture::new().await;

    let guest = fixture.data("/api/session", None).await;
    assert_eq!(guest["authenticated"], false);
    assert!(guest["username"].is_null());

    let alice = fixture.data("/api/session", Some("alice")).await;
    assert_eq!(alice["authenticated"], true);
    assert_eq!(alice["username"], "alice");
}

#[tokio::test]
async fn test_resorts_seeded_on_first_listing() {
    let fixture = TestFixture::new().await;

    let resorts = fixture.seeded_resorts("alice").await;
    assert_eq!(
        names(&resorts),
        vec![
            "Cyber Peak",
            "Neon Valley",
            "Quantum Ridge",
            "Digital Slopes",
            "Pixel Peaks",
            "Synthwave Summit"
        ]
    );
    assert_eq!(resorts[0]["location"], "Colorado, USA");
    assert_eq!(resorts[0]["elevation"], 3500);
    assert_eq!(resorts[0]["numberOfTrails"], 45);
    assert_eq!(resorts[0]["difficulty"], "ADVANCED");
    assert_eq!(resorts[0]["owner"], "alice");

    // A second listing does not seed again
    let again = fixture.seeded_resorts("bob").await;
    assert_eq!(again.len(), 6);
}

#[tokio::test]
async fn test_guest_listing_does_not_seed() {
    let fixture = TestFixture::new().await;

    let resorts = fixture.data("/api/resorts", None).await;
    assert_eq!(resorts, json!([]));

    // Guests can read once someone has seeded
    fixture.seeded_resorts("alice").await;
    let resorts = fixture.data("/api/resorts", None).await;
    assert_eq!(resorts.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_seeding_disabled() {
    let fixture = TestFixture::with_config(Some(PSK.to_string()), false).await;

    let resorts = fixture.data("/api/resorts", Some("alice")).await;
    assert_eq!(resorts, json!([]));
}

#[tokio::test]
async fn test_concurrent_first_listings_seed_once() {
    let fixture = TestFixture::new().await;

    let (a, b, c) = tokio::join!(
        fixture.get("/api/resorts", Some("alice")),
        fixture.get("/api/resorts", Some("bob")),
        fixture.get("/api/resorts", Some("carol")),
    );
    for resp in [a, b, c] {
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 6);
    }

    let resorts = fixture.data("/api/resorts", None).await;
    assert_eq!(resorts.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_resort_difficulty_filter() {
    let fixture = TestFixture::new().await;
    fixture.seeded_resorts("alice").await;

    let all = fixture.data("/api/resorts?difficulty=ALL", None).await;
    assert_eq!(all.as_array().unwrap().len(), 6);

    let intermediate = fixture
        .data("/api/resorts?difficulty=INTERMEDIATE", None)
        .await;
    assert_eq!(
        names(intermediate.as_array().unwrap()),
        vec!["Neon Valley", "Pixel Peaks"]
    );

    let expert = fixture.data("/api/resorts?difficulty=EXPERT", None).await;
    assert_eq!(names(expert.as_array().unwrap()), vec!["Quantum Ridge"]);

    let resp = fixture.get("/api/resorts?difficulty=EXTREME", None).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(error_type(resp).await, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_limit() {
    let fixture = TestFixture::new().await;
    fixture.seeded_resorts("alice").await;

    let two = fixture.data("/api/resorts?limit=2", None).await;
    assert_eq!(
        names(two.as_array().unwrap()),
        vec!["Cyber Peak", "Neon Valley"]
    );

    let resp = fixture.get("/api/resorts?limit=0", None).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_resort_detail() {
    let fixture = TestFixture::new().await;
    let resorts = fixture.seeded_resorts("alice").await;
    let id = resorts[2]["id"].as_str().unwrap();

    let resort = fixture.data(&format!("/api/resorts/{}", id), None).await;
    assert_eq!(resort["name"], "Quantum Ridge");

    let resp = fixture.get("/api/resorts/does-not-exist", None).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(error_type(resp).await, "NOT_FOUND");
}

#[tokio::test]
async fn test_resort_authorization() {
    let fixture = TestFixture::new().await;
    let resorts = fixture.seeded_resorts("alice").await;
    let path = format!("/api/resorts/{}", resorts[0]["id"].as_str().unwrap());

    // Guests cannot create
    let resp = fixture
        .request(Method::POST, "/api/resorts", None)
        .json(&json!({ "name": "Guest Hill", "location": "Nowhere" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    assert_eq!(error_type(resp).await, "UNAUTHORIZED");

    // Another user can read but not modify
    let resp = fixture
        .send_json(Method::PUT, &path, "bob", json!({ "name": "Bob's Peak" }))
        .await;
    assert_eq!(resp.status(), 403);
    assert_eq!(error_type(resp).await, "FORBIDDEN");

    let resp = fixture.request(Method::DELETE, &path, Some("bob")).send().await.unwrap();
    assert_eq!(resp.status(), 403);

    // The owner can
    let resp = fixture
        .send_json(Method::PUT, &path, "alice", json!({ "name": "Cyber Peak II" }))
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Cyber Peak II");
    assert_eq!(body["data"]["location"], "Colorado, USA");
}

#[tokio::test]
async fn test_create_resort_validation() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .send_json(
            Method::POST,
            "/api/resorts",
            "alice",
            json!({ "name": "  ", "location": "Alps" }),
        )
        .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(error_type(resp).await, "VALIDATION_ERROR");

    let resp = fixture
        .request(Method::POST, "/api/resorts", Some("alice"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(error_type(resp).await, "BAD_REQUEST");
}

#[tokio::test]
async fn test_version_conflict() {
    let fixture = TestFixture::new().await;
    let resp = fixture
        .send_json(
            Method::POST,
            "/api/resorts",
            "alice",
            json!({ "name": "Test Hill", "location": "Here", "difficulty": "BEGINNER" }),
        )
        .await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["version"], 1);
    let path = format!("/api/resorts/{}", body["data"]["id"].as_str().unwrap());

    let resp = fixture
        .send_json(
            Method::PUT,
            &path,
            "alice",
            json!({ "elevation": 1200, "expectedVersion": 1 }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["data"]["elevation"], 1200);

    // Stale version
    let resp = fixture
        .send_json(
            Method::PUT,
            &path,
            "alice",
            json!({ "elevation": 900, "expectedVersion": 1 }),
        )
        .await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"][0]["errorType"], "VERSION_MISMATCH");
    assert_eq!(body["errors"][0]["details"]["currentVersion"], 2);
}

#[tokio::test]
async fn test_profile_created_once() {
    let fixture = TestFixture::new().await;

    let profile = fixture.data("/api/me", Some("alice")).await;
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["email"], "alice");
    assert_eq!(profile["skillLevel"], "INTERMEDIATE");
    assert_eq!(
        profile["profilePicture"],
        "https://api.dicebear.com/7.x/personas/svg?seed=alice"
    );

    let again = fixture.data("/api/me", Some("alice")).await;
    assert_eq!(again["id"], profile["id"]);

    let users = fixture.data("/api/users?username=alice", Some("alice")).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_profile_resolution() {
    let fixture = TestFixture::new().await;

    let (a, b, c, d) = tokio::join!(
        fixture.get("/api/me", Some("dana")),
        fixture.get("/api/me", Some("dana")),
        fixture.get("/api/my-adventures", Some("dana")),
        fixture.get("/api/me", Some("dana")),
    );
    for resp in [a, b, c, d] {
        assert_eq!(resp.status(), 200);
    }

    let users = fixture.data("/api/users", Some("dana")).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_profile_requires_sign_in() {
    let fixture = TestFixture::new().await;

    let resp = fixture.get("/api/me", None).await;
    assert_eq!(resp.status(), 401);
    assert_eq!(error_type(resp).await, "UNAUTHORIZED");

    let resp = fixture.get("/api/my-adventures", None).await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_profile_update_persists() {
    let fixture = TestFixture::new().await;
    fixture.data("/api/me", Some("alice")).await;

    let resp = fixture
        .send_json(
            Method::PUT,
            "/api/me",
            "alice",
            json!({ "skillLevel": "EXPERT", "profilePicture": "https://example.com/me.png" }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let profile = fixture.data("/api/me", Some("alice")).await;
    assert_eq!(profile["skillLevel"], "EXPERT");
    assert_eq!(profile["profilePicture"], "https://example.com/me.png");

    let resp = fixture
        .send_json(Method::PUT, "/api/me", "alice", json!({ "skillLevel": "PRO" }))
        .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_regenerate_avatar() {
    let fixture = TestFixture::new().await;
    let before = fixture.data("/api/me", Some("alice")).await;

    let resp = fixture
        .request(Method::POST, "/api/me/avatar", Some("alice"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let picture = body["data"]["profilePicture"].as_str().unwrap();
    assert_ne!(picture, before["profilePicture"].as_str().unwrap());
    assert!(picture.starts_with("https://api.dicebear.com/7.x/personas/svg?seed=alice-"));

    let after = fixture.data("/api/me", Some("alice")).await;
    assert_eq!(after["profilePicture"], picture);
}

#[tokio::test]
async fn test_resolve_user_on_fresh_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pool = init_database(&temp_dir.path().join("fresh.sqlite"))
        .await
        .expect("Failed to init DB");
    let repo = Repository::new(pool);

    let first = crate::planner::resolve_profile_user(&repo, "bob")
        .await
        .expect("first resolution failed");
    assert_eq!(first.owner, "bob");

    let second = crate::planner::resolve_current_user(&repo, "bob")
        .await
        .expect("second resolution failed");
    assert_eq!(second.id, first.id);
}

#[tokio::test]
async fn test_username_cannot_be_claimed() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .send_json(
            Method::POST,
            "/api/users",
            "mallory",
            json!({ "username": "bob", "email": "bob@example.com" }),
        )
        .await;
    assert_eq!(resp.status(), 403);
    assert_eq!(error_type(resp).await, "FORBIDDEN");

    let mallory = fixture.data("/api/me", Some("mallory")).await;
    let path = format!("/api/users/{}", mallory["id"].as_str().unwrap());
    let resp = fixture
        .send_json(Method::PUT, &path, "mallory", json!({ "username": "bob" }))
        .await;
    assert_eq!(resp.status(), 403);

    let bob = fixture.data("/api/me", Some("bob")).await;
    assert_eq!(bob["username"], "bob");
    assert_eq!(bob["owner"], "bob");

    let resp = fixture
        .send_json(Method::PUT, "/api/me", "bob", json!({ "skillLevel": "EXPERT" }))
        .await;
    assert_eq!(resp.status(), 200);

    let path = format!("/api/users/{}", bob["id"].as_str().unwrap());
    let resp = fixture.get(&path, Some("mallory")).await;
    assert_eq!(resp.status(), 403);

    let unchanged = fixture.data("/api/me", Some("mallory")).await;
    assert_eq!(unchanged["username"], "mallory");
}

#[tokio::test]
async fn test_overlapping_profile_updates() {
    let fixture = TestFixture::new().await;
    let before = fixture.data("/api/me", Some("alice")).await;
    assert_eq!(before["version"], 1);

    let (a, b) = tokio::join!(
        fixture.send_json(Method::PUT, "/api/me", "alice", json!({ "skillLevel": "EXPERT" })),
        fixture.send_json(Method::PUT, "/api/me", "alice", json!({ "skillLevel": "BEGINNER" })),
    );
    assert_eq!(a.status(), 200);
    assert_eq!(b.status(), 200);

    let after = fixture.data("/api/me", Some("alice")).await;
    assert_eq!(after["version"], 3);
    let level = after["skillLevel"].as_str().unwrap();
    assert!(level == "EXPERT" || level == "BEGINNER");
}

#[tokio::test]
async fn test_plan_adventure() {
    let fixture = TestFixture::new().await;
    let resorts = fixture.seeded_resorts("alice").await;
    let resort_id = resorts[1]["id"].as_str().unwrap();

    let resp = fixture
        .send_json(
            Method::POST,
            "/api/plan",
            "alice",
            json!({
                "title": "Powder Week",
                "resortId": resort_id,
                "startDate": "2025-02-01",
                "endDate": "2025-02-06",
                "activities": ["SKI: Morning run", "APRES_SKI: Hot tub: rooftop"]
            }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let adventure = &body["data"]["adventure"];
    assert_eq!(adventure["title"], "Powder Week");
    assert_eq!(adventure["resortId"], resort_id);
    assert_eq!(adventure["startDate"], "2025-02-01T00:00:00Z");

    let activities = body["data"]["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0]["type"], "SKI");
    assert_eq!(activities[0]["name"], "Morning run");
    assert_eq!(activities[0]["duration"], 120);
    assert_eq!(activities[0]["date"], "2025-02-01T00:00:00Z");
    assert_eq!(activities[1]["type"], "APRES_SKI");
    assert_eq!(activities[1]["name"], "Hot tub: rooftop");

    let adventure_id = adventure["id"].as_str().unwrap();
    let stored = fixture
        .data(
            &format!("/api/activities?adventureId={}", adventure_id),
            Some("alice"),
        )
        .await;
    assert_eq!(stored.as_array().unwrap().len(), 2);

    let profile = fixture.data("/api/me", Some("alice")).await;
    assert_eq!(adventure["userId"], profile["id"]);
}

#[tokio::test]
async fn test_plan_rejects_invalid_input() {
    let fixture = TestFixture::new().await;
    let resorts = fixture.seeded_resorts("alice").await;
    let resort_id = resorts[0]["id"].as_str().unwrap();

    let attempts = [
        json!({ "title": "Backwards", "resortId": resort_id,
                "startDate": "2025-03-10", "endDate": "2025-03-01" }),
        json!({ "title": " ", "resortId": resort_id,
                "startDate": "2025-03-01", "endDate": "2025-03-02" }),
        json!({ "title": "Nowhere", "resortId": "missing",
                "startDate": "2025-03-01", "endDate": "2025-03-02" }),
        json!({ "title": "Odd", "resortId": resort_id,
                "startDate": "2025-03-01", "endDate": "2025-03-02",
                "activities": ["SKI: ok", "SURF: waves"] }),
    ];
    for attempt in attempts {
        let resp = fixture
            .send_json(Method::POST, "/api/plan", "alice", attempt)
            .await;
        assert_eq!(resp.status(), 400);
        assert_eq!(error_type(resp).await, "VALIDATION_ERROR");
    }

    // Nothing was written
    let adventures = fixture.data("/api/adventures", Some("alice")).await;
    assert_eq!(adventures, json!([]));
    let activities = fixture.data("/api/activities", Some("alice")).await;
    assert_eq!(activities, json!([]));
}

#[tokio::test]
async fn test_direct_adventure_create_skips_date_order() {
    let fixture = TestFixture::new().await;
    let resorts = fixture.seeded_resorts("alice").await;
    let profile = fixture.data("/api/me", Some("alice")).await;

    let resp = fixture
        .send_json(
            Method::POST,
            "/api/adventures",
            "alice",
            json!({
                "title": "Time Travel",
                "startDate": "2025-03-10T00:00:00Z",
                "endDate": "2025-03-01T00:00:00Z",
                "userId": profile["id"],
                "resortId": resorts[0]["id"]
            }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    // Dangling references are constraint violations
    let resp = fixture
        .send_json(
            Method::POST,
            "/api/adventures",
            "alice",
            json!({
                "title": "Ghost Trip",
                "startDate": "2025-03-01T00:00:00Z",
                "endDate": "2025-03-02T00:00:00Z",
                "userId": profile["id"],
                "resortId": "missing"
            }),
        )
        .await;
    assert_eq!(resp.status(), 409);
    assert_eq!(error_type(resp).await, "CONSTRAINT_VIOLATION");
}

#[tokio::test]
async fn test_plan_form_defaults() {
    let fixture = TestFixture::new().await;
    let resorts = fixture.seeded_resorts("alice").await;
    let second = resorts[1]["id"].as_str().unwrap();

    let form = fixture
        .data(&format!("/api/plan?resortId={}", second), Some("alice"))
        .await;
    assert_eq!(form["selectedResortId"], second);
    assert_eq!(form["resorts"].as_array().unwrap().len(), 6);
    assert_eq!(form["activityTypes"].as_array().unwrap().len(), 5);

    let start = chrono::NaiveDate::parse_from_str(form["startDate"].as_str().unwrap(), "%Y-%m-%d")
        .unwrap();
    let end = chrono::NaiveDate::parse_from_str(form["endDate"].as_str().unwrap(), "%Y-%m-%d")
        .unwrap();
    assert_eq!((end - start).num_days(), 5);

    let fallback = fixture.data("/api/plan?resortId=unknown", Some("alice")).await;
    assert_eq!(fallback["selectedResortId"], resorts[0]["id"]);
}

#[tokio::test]
async fn test_my_adventures_sample_trip() {
    let fixture = TestFixture::new().await;

    // No resorts yet: nothing to sample
    let empty = fixture.data("/api/my-adventures", Some("alice")).await;
    assert_eq!(empty, json!([]));

    fixture.seeded_resorts("alice").await;
    let trips = fixture.data("/api/my-adventures", Some("alice")).await;
    let trips = trips.as_array().unwrap();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0]["title"], "My First Ski Trip");
    assert_eq!(trips[0]["resortName"], "Cyber Peak");
    assert_eq!(trips[0]["activityCount"], 0);
    assert_eq!(trips[0]["days"], 5);

    // Only created once
    let again = fixture.data("/api/my-adventures", Some("alice")).await;
    assert_eq!(again.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_my_adventures_summaries() {
    let fixture = TestFixture::new().await;
    let resorts = fixture.seeded_resorts("alice").await;

    fixture
        .send_json(
            Method::POST,
            "/api/plan",
            "alice",
            json!({
                "title": "Long Weekend",
                "resortId": resorts[3]["id"],
                "startDate": "2025-01-10T08:00:00Z",
                "endDate": "2025-01-12T20:00:00Z",
                "activities": ["LESSON: Basics", "SKI: Green runs", "OTHER: Onsen"]
            }),
        )
        .await;

    let trips = fixture.data("/api/my-adventures", Some("alice")).await;
    let trips = trips.as_array().unwrap();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0]["title"], "Long Weekend");
    assert_eq!(trips[0]["resortName"], "Digital Slopes");
    assert_eq!(trips[0]["activityCount"], 3);
    assert_eq!(trips[0]["days"], 3);

    // Bob sees none of Alice's trips
    let bobs = fixture.data("/api/adventures", Some("bob")).await;
    assert_eq!(bobs, json!([]));
}

#[tokio::test]
async fn test_owner_only_records() {
    let fixture = TestFixture::new().await;
    let alice = fixture.data("/api/me", Some("alice")).await;
    let path = format!("/api/users/{}", alice["id"].as_str().unwrap());

    let resp = fixture.get(&path, Some("bob")).await;
    assert_eq!(resp.status(), 403);

    let resp = fixture.get(&path, None).await;
    assert_eq!(resp.status(), 401);

    let resp = fixture.get("/api/adventures", None).await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_gear_and_participants() {
    let fixture = TestFixture::new().await;
    let resorts = fixture.seeded_resorts("alice").await;
    let alice = fixture.data("/api/me", Some("alice")).await;

    let resp = fixture
        .send_json(
            Method::POST,
            "/api/plan",
            "alice",
            json!({
                "title": "Gear Test",
                "resortId": resorts[0]["id"],
                "startDate": "2025-01-01",
                "endDate": "2025-01-02"
            }),
        )
        .await;
    let body: Value = resp.json().await.unwrap();
    let adventure_id = body["data"]["adventure"]["id"].as_str().unwrap().to_string();

    for (name, kind, status) in [
        ("Helmet", "HELMET", "OWNED"),
        ("Board", "SNOWBOARD", "NEED_TO_RENT"),
        ("Goggles", "GOGGLES", "NEED_TO_BUY"),
    ] {
        let resp = fixture
            .send_json(
                Method::POST,
                "/api/gear",
                "alice",
                json!({ "name": name, "type": kind, "status": status, "adventureId": adventure_id }),
            )
            .await;
        assert_eq!(resp.status(), 200);
    }

    let owned = fixture
        .data(
            &format!("/api/gear?adventureId={}&status=OWNED", adventure_id),
            Some("alice"),
        )
        .await;
    assert_eq!(names(owned.as_array().unwrap()), vec!["Helmet"]);

    let rentals = fixture.data("/api/gear?type=SNOWBOARD", Some("alice")).await;
    assert_eq!(names(rentals.as_array().unwrap()), vec!["Board"]);

    let resp = fixture
        .send_json(
            Method::POST,
            "/api/participants",
            "alice",
            json!({ "userId": alice["id"], "adventureId": adventure_id, "status": "INVITED" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let participant_path = format!("/api/participants/{}", body["data"]["id"].as_str().unwrap());

    let resp = fixture
        .send_json(
            Method::PUT,
            &participant_path,
            "alice",
            json!({ "status": "CONFIRMED" }),
        )
        .await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "CONFIRMED");
    assert_eq!(body["data"]["version"], 2);
}

#[tokio::test]
async fn test_delete_adventure_cascades() {
    let fixture = TestFixture::new().await;
    let resorts = fixture.seeded_resorts("alice").await;

    let resp = fixture
        .send_json(
            Method::POST,
            "/api/plan",
            "alice",
            json!({
                "title": "Short Trip",
                "resortId": resorts[0]["id"],
                "startDate": "2025-01-01",
                "endDate": "2025-01-02",
                "activities": ["SKI: Day one"]
            }),
        )
        .await;
    let body: Value = resp.json().await.unwrap();
    let adventure_id = body["data"]["adventure"]["id"].as_str().unwrap().to_string();
    let activity_id = body["data"]["activities"][0]["id"].as_str().unwrap().to_string();

    fixture
        .send_json(
            Method::POST,
            "/api/gear",
            "alice",
            json!({ "name": "Skis", "adventureId": adventure_id }),
        )
        .await;

    let resp = fixture
        .request(
            Method::DELETE,
            &format!("/api/adventures/{}", adventure_id),
            Some("alice"),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .get(&format!("/api/activities/{}", activity_id), Some("alice"))
        .await;
    assert_eq!(resp.status(), 404);

    let gear = fixture
        .data(&format!("/api/gear?adventureId={}", adventure_id), Some("alice"))
        .await;
    assert_eq!(gear, json!([]));

    // Already gone
    let resp = fixture
        .request(
            Method::DELETE,
            &format!("/api/adventures/{}", adventure_id),
            Some("alice"),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
