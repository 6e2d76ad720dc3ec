use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::accounts;
use super::health;
use super::middleware::{logging_middleware, security_headers_middleware};
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Account pages
        .merge(accounts::create_accounts_router())
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::AccountServiceTrait;
    use crate::config::SessionConfig;
    use crate::domain::account::{AccountOutcome, LoginForm, RegistrationForm};
    use crate::domain::session::{Session, SessionRecord, SessionStore, SessionToken};
    use crate::domain::DomainError;
    use axum::{
        body::Body,
        http::{header, Request, Response, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const REGISTRATION: &str = "given_name=Jo&family_name=Lee&nickname=&email=jo%40example.com\
        &city=Portland&state=OR&password=secret1&password_confirmation=secret1";

    fn app() -> Router {
        create_router(crate::create_in_memory_app_state(SessionConfig::default()))
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &Response<Body>) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    fn set_cookie(response: &Response<Body>) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    /// `name=value` pair from a Set-Cookie header
    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app();

        for uri in ["/health", "/live", "/ready"] {
            let response = app.clone().oneshot(get(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_register_sets_cookie_and_redirects_home() {
        let response = app()
            .oneshot(post_form("/auth/register", REGISTRATION, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("account_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[tokio::test]
    async fn test_register_validation_rerenders_without_cookie() {
        let body = "given_name=Jo&family_name=Lee&email=jo%40example.com\
            &password=abc&password_confirmation=abc";

        let response = app()
            .oneshot(post_form("/auth/register", body, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_none());

        let html = body_text(response).await;
        assert!(html.contains("Password must be at least 6 characters"));
        assert!(html.contains("value=\"jo@example.com\""));
        assert!(!html.contains("value=\"abc\""));
    }

    #[tokio::test]
    async fn test_session_cookie_identifies_user() {
        let app = app();

        let registered = app
            .clone()
            .oneshot(post_form("/auth/register", REGISTRATION, None))
            .await
            .unwrap();
        let cookie = cookie_pair(&set_cookie(&registered).unwrap());

        let dashboard = app
            .clone()
            .oneshot(get("/dashboard", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(dashboard.status(), StatusCode::OK);
        assert!(body_text(dashboard).await.contains("jo@example.com"));

        let login_page = app.oneshot(get("/auth/login", Some(&cookie))).await.unwrap();
        assert_eq!(login_page.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&login_page), "/");
    }

    #[tokio::test]
    async fn test_dashboard_requires_session() {
        let response = app().oneshot(get("/dashboard", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth/login");
    }

    #[tokio::test]
    async fn test_login_rotates_token() {
        let app = app();

        let registered = app
            .clone()
            .oneshot(post_form("/auth/register", REGISTRATION, None))
            .await
            .unwrap();
        let first = cookie_pair(&set_cookie(&registered).unwrap());

        let login = app
            .clone()
            .oneshot(post_form(
                "/auth/login",
                "email=jo%40example.com&password=secret1",
                Some(&first),
            ))
            .await
            .unwrap();

        assert_eq!(login.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&login), "/dashboard");

        let second = cookie_pair(&set_cookie(&login).unwrap());
        assert_ne!(first, second);

        let stale = app.oneshot(get("/dashboard", Some(&first))).await.unwrap();
        assert_eq!(location(&stale), "/auth/login");
    }

    #[tokio::test]
    async fn test_login_failures_render_identically() {
        let app = app();
        app.clone()
            .oneshot(post_form("/auth/register", REGISTRATION, None))
            .await
            .unwrap();

        let wrong_password = app
            .clone()
            .oneshot(post_form(
                "/auth/login",
                "email=jo%40example.com&password=secret2",
                None,
            ))
            .await
            .unwrap();
        let unknown = app
            .oneshot(post_form(
                "/auth/login",
                "email=ghost%40example.com&password=secret2",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::OK);
        assert!(set_cookie(&wrong_password).is_none());

        let wrong_password = body_text(wrong_password).await;
        let unknown = body_text(unknown).await;

        assert!(wrong_password.contains("Incorrect credentials"));
        assert_eq!(
            wrong_password.replace("jo@example.com", ""),
            unknown.replace("ghost@example.com", "")
        );
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let response = app()
            .oneshot(post_form("/auth/logout", "", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth/login");

        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("account_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_logout_destroys_session() {
        let app = app();

        let registered = app
            .clone()
            .oneshot(post_form("/auth/register", REGISTRATION, None))
            .await
            .unwrap();
        let cookie = cookie_pair(&set_cookie(&registered).unwrap());

        let logout = app
            .clone()
            .oneshot(post_form("/auth/logout", "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(location(&logout), "/auth/login");

        let after = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
        assert_eq!(location(&after), "/auth/login");
    }

    #[tokio::test]
    async fn test_unknown_session_cookie_is_expired() {
        let response = app()
            .oneshot(get("/", Some("account_session=abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("account_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_stale_cookie_on_dashboard_redirects_and_expires() {
        let response = app()
            .oneshot(get("/dashboard", Some("account_session=abc123")))
            .await
            .unwrap();

        assert_eq!(location(&response), "/auth/login");
        assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_pages_without_cookie_set_none() {
        let response = app().oneshot(get("/auth/login", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_none());
    }

    #[tokio::test]
    async fn test_security_headers_and_request_id() {
        let response = app().oneshot(get("/", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
        assert!(response.headers().contains_key("x-request-id"));
    }

    struct FailingAccountService;

    #[async_trait::async_trait]
    impl AccountServiceTrait for FailingAccountService {
        async fn register(
            &self,
            _form: RegistrationForm,
            _session: Session,
        ) -> Result<AccountOutcome, DomainError> {
            Err(DomainError::storage("database unreachable"))
        }

        async fn authenticate(
            &self,
            _form: LoginForm,
            _session: Session,
        ) -> Result<AccountOutcome, DomainError> {
            Err(DomainError::storage("database unreachable"))
        }

        fn logout(&self, session: Session) -> AccountOutcome {
            AccountOutcome::redirect(session, "/auth/login")
        }

        async fn user_count(&self) -> Result<usize, DomainError> {
            Err(DomainError::storage("database unreachable"))
        }
    }

    fn failing_app() -> Router {
        let mut state = crate::create_in_memory_app_state(SessionConfig::default());
        state.account_service = Arc::new(FailingAccountService);
        create_router(state)
    }

    #[tokio::test]
    async fn test_store_failure_is_500_page() {
        let response = failing_app()
            .oneshot(post_form("/auth/register", REGISTRATION, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let html = body_text(response).await;
        assert!(html.contains("Something went wrong"));
        assert!(!html.contains("database unreachable"));
    }

    #[derive(Debug)]
    struct UnreachableSessionStore;

    #[async_trait::async_trait]
    impl SessionStore for UnreachableSessionStore {
        async fn load(&self, _token: &SessionToken) -> Result<Option<SessionRecord>, DomainError> {
            Err(DomainError::storage("session store unreachable"))
        }

        async fn save(&self, _token: &SessionToken, _record: SessionRecord) -> Result<(), DomainError> {
            Err(DomainError::storage("session store unreachable"))
        }

        async fn destroy(&self, _token: &SessionToken) -> Result<(), DomainError> {
            Err(DomainError::storage("session store unreachable"))
        }

        async fn purge_expired(&self) -> Result<u64, DomainError> {
            Err(DomainError::storage("session store unreachable"))
        }
    }

    fn unreachable_session_app() -> Router {
        let mut state = crate::create_in_memory_app_state(SessionConfig::default());
        state.session_store = Arc::new(UnreachableSessionStore);
        create_router(state)
    }

    #[tokio::test]
    async fn test_logout_succeeds_when_session_store_fails() {
        let response = unreachable_session_app()
            .oneshot(post_form("/auth/logout", "", Some("account_session=abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth/login");

        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("account_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_unreadable_session_renders_anonymously() {
        let response = unreachable_session_app()
            .oneshot(get("/", Some("account_session=abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_none());
        assert!(body_text(response).await.contains("href=\"/auth/login\""));
    }

    #[tokio::test]
    async fn test_ready_reports_unavailable_store() {
        let response = failing_app().oneshot(get("/ready", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
