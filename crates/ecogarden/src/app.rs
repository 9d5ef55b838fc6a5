use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use ecogarden_auth::auth_routes;

use crate::{
    handlers::{
        advice::{
            create_advice, delete_advice, list_advice_for_month, list_advice_for_month_year,
            list_current_advice, update_advice,
        },
        health::{healthz, livez},
        users::{delete_user, register_user, update_user},
        weather::{weather_for_city, weather_for_user},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // API routes with CORS
    let api_routes = Router::new()
        // Account routes
        .route("/users", post(register_user))
        .route("/users/{id}", put(update_user).delete(delete_user))
        // Advice routes. `{key}` is a month for GET and an advice id otherwise.
        .route("/advice", get(list_current_advice).post(create_advice))
        .route(
            "/advice/{key}",
            get(list_advice_for_month)
                .put(update_advice)
                .delete(delete_advice),
        )
        .route("/advice/{key}/{year}", get(list_advice_for_month_year))
        // Weather routes
        .route("/weather", get(weather_for_user))
        .route("/weather/{city}", get(weather_for_city))
        .layer(cors);

    // Main application router
    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .merge(auth_routes().with_state(state.auth.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use ecogarden_core::advice::{Advice, Role, User};
    use ecogarden_core::clock::FixedClock;
    use ecogarden_core::weather::{HttpFetcher, HttpResponse, TransportError};

    use super::*;
    use crate::state::testing::{bearer_for, test_state};

    /// Answers every weather request with the same payload.
    #[derive(Default)]
    struct StaticFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpFetcher for StaticFetcher {
        async fn get_json(
            &self,
            _url: &str,
            query: &[(String, String)],
        ) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let city = query
                .iter()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            Ok(HttpResponse::new(
                200,
                json!({ "name": city, "main": { "temp": 12.0 } }),
            ))
        }
    }

    fn setup() -> (AppState, Arc<StaticFetcher>) {
        let fetcher = Arc::new(StaticFetcher::default());
        let clock = Arc::new(FixedClock::at_month(2025, 5).unwrap());
        (test_state(fetcher.clone(), clock), fetcher)
    }

    fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(bearer) = bearer {
            builder = builder.header("Authorization", bearer);
        }
        match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response<Body>) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn seed_advice(state: &AppState, owner: &User, month: u32, year: i32) -> Advice {
        let advice = Advice::new(owner.id, "Sow carrots").with_period(month, year);
        state.advice_repo.create_advice(&advice).await.unwrap();
        advice
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (state, _) = setup();
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(request("GET", "/livez", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("GET", "/healthz", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_advice_routes_require_a_token() {
        let (state, _) = setup();
        let app = create_app(state);

        let response = app
            .oneshot(request("GET", "/api/advice", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (state, _) = setup();
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/users",
                None,
                Some(json!({
                    "email": " Ana@Example.com ",
                    "password": "hunter22",
                    "city": "Lille",
                    "postal_code": "59000"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let user = json_body(response).await;
        assert_eq!(user["email"], "ana@example.com");
        assert!(user.get("password_hash").is_none());

        let response = app
            .oneshot(request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "email": "ana@example.com", "password": "hunter22" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login = json_body(response).await;
        assert!(login["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(login["expires_in"], 3600);
    }

    #[tokio::test]
    async fn test_register_validation_and_conflict() {
        let (state, _) = setup();
        let app = create_app(state);
        let payload = json!({ "email": "ana@example.com", "password": "pw", "city": "Lille" });

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/users",
                None,
                Some(json!({ "email": "ana@example.com", "password": "pw" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(request("POST", "/api/users", None, Some(payload.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request("POST", "/api/users", None, Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_advice_ignores_incomplete_periods() {
        let (state, _) = setup();
        let user = User::new("ana@example.com", "Lille", "h");
        let bearer = bearer_for(&state, &user).await;
        let app = create_app(state);

        let response = app
            .oneshot(request(
                "POST",
                "/api/advice",
                Some(&bearer),
                Some(json!({
                    "content": "Mulch the beds",
                    "periods": [
                        { "month": 5, "year": 2025 },
                        { "month": 5, "year": 2025 },
                        { "month": 6 },
                        { "month": 13, "year": 2025 }
                    ]
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let advice = json_body(response).await;
        assert_eq!(advice["periods"].as_array().unwrap().len(), 1);
        assert_eq!(advice["user_id"], json!(user.id));
    }

    #[tokio::test]
    async fn test_listing_by_period() {
        let (state, _) = setup();
        let user = User::new("ana@example.com", "Lille", "h");
        let bearer = bearer_for(&state, &user).await;
        seed_advice(&state, &user, 5, 2025).await;
        seed_advice(&state, &user, 7, 2026).await;
        let app = create_app(state);

        // The fixed clock says May 2025.
        let response = app
            .clone()
            .oneshot(request("GET", "/api/advice", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/advice/7/2026", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/advice/7", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"Advice not found: period 07/2025");

        let response = app
            .clone()
            .oneshot(request("GET", "/api/advice/13", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(request("GET", "/api/advice/5/1800", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_advice_reports_changes() {
        let (state, _) = setup();
        let user = User::new("ana@example.com", "Lille", "h");
        let bearer = bearer_for(&state, &user).await;
        let advice = seed_advice(&state, &user, 5, 2025).await;
        let app = create_app(state);

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/advice/{}", advice.id),
                Some(&bearer),
                Some(json!({
                    "content": "  Sow carrots thinly  ",
                    "periods": [
                        { "month": -5, "year": 2025 },
                        { "month": 6 },
                        { "month": 13, "year": 2025 },
                        "bogus"
                    ]
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["advice"]["content"], "Sow carrots thinly");
        assert_eq!(body["advice"]["periods"].as_array().unwrap().len(), 1);
        assert_eq!(body["advice"]["periods"][0]["month"], 6);
        assert_eq!(body["advice"]["periods"][0]["year"], 2025);
        assert_eq!(body["changes"]["added"].as_array().unwrap().len(), 1);
        assert_eq!(body["changes"]["removed"].as_array().unwrap().len(), 1);
        assert_eq!(body["changes"]["skipped"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_rejects_empty_content() {
        let (state, _) = setup();
        let user = User::new("ana@example.com", "Lille", "h");
        let bearer = bearer_for(&state, &user).await;
        let advice = seed_advice(&state, &user, 5, 2025).await;
        let app = create_app(state);

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/advice/{}", advice.id),
                Some(&bearer),
                Some(json!({ "content": "   " })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_only_owner_or_admin_may_modify_advice() {
        let (state, _) = setup();
        let owner = User::new("ana@example.com", "Lille", "h");
        let other = User::new("bob@example.com", "Brest", "h");
        let admin = User::new("root@example.com", "Paris", "h").with_role(Role::Admin);
        bearer_for(&state, &owner).await;
        let other_bearer = bearer_for(&state, &other).await;
        let admin_bearer = bearer_for(&state, &admin).await;
        let advice = seed_advice(&state, &owner, 5, 2025).await;
        let app = create_app(state.clone());
        let uri = format!("/api/advice/{}", advice.id);

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some(&other_bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some(&admin_bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.advice_repo.get_advice(advice.id).await.unwrap().is_none());

        let response = app
            .oneshot(request("DELETE", &uri, Some(&admin_bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_update_rules() {
        let (state, _) = setup();
        let user = User::new("ana@example.com", "Lille", "h");
        let other = User::new("bob@example.com", "Brest", "h");
        let bearer = bearer_for(&state, &user).await;
        bearer_for(&state, &other).await;
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/users/{}", user.id),
                Some(&bearer),
                Some(json!({ "city": "Rennes" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["city"], "Rennes");
        assert_eq!(body["email"], "ana@example.com");

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/users/{}", user.id),
                Some(&bearer),
                Some(json!({ "role": "admin" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/users/{}", other.id),
                Some(&bearer),
                Some(json!({ "city": "Rennes" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_deleting_user_removes_their_advice_and_token() {
        let (state, _) = setup();
        let user = User::new("ana@example.com", "Lille", "h");
        let bearer = bearer_for(&state, &user).await;
        let advice = seed_advice(&state, &user, 5, 2025).await;
        let app = create_app(state.clone());

        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/users/{}", user.id),
                Some(&bearer),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.advice_repo.get_advice(advice.id).await.unwrap().is_none());

        let response = app
            .oneshot(request("GET", "/api/advice", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_weather_defaults_to_user_city_and_is_cached() {
        let (state, fetcher) = setup();
        let user = User::new("ana@example.com", "Paris", "h");
        let bearer = bearer_for(&state, &user).await;
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/weather", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["city"], "Paris");
        assert_eq!(body["weather"]["name"], "Paris");

        let response = app
            .oneshot(request("GET", "/api/weather/%20paris%20", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
