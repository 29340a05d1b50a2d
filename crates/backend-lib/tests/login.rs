// crates/backend-lib/tests/login.rs
mod common;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, Response, StatusCode,
    },
    Router,
};
use backend_lib::auth::SESSION_COOKIE_NAME;
use common::{body_string, test_app, write_site, FakeDirectory};
use tower::ServiceExt;

fn login_request(form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn with_cookie(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

fn assert_redirects_home(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
}

async fn log_in(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(login_request(&format!("username={username}")))
        .await
        .unwrap();
    assert_redirects_home(&response);
    session_cookie(&response).expect("login should set the session cookie")
}

#[tokio::test]
async fn test_protected_route_redirects_without_session() {
    let site = write_site();
    let app = test_app(site.path(), FakeDirectory::with_users(&["ada"]));

    let response = app.oneshot(with_cookie("GET", "/session", None)).await.unwrap();
    assert_redirects_home(&response);
}

#[tokio::test]
async fn test_login_then_session_returns_principal() {
    let site = write_site();
    let app = test_app(site.path(), FakeDirectory::with_users(&["ada"]));

    let cookie = log_in(&app, "ada").await;

    let response = app
        .oneshot(with_cookie("GET", "/session", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, serde_json::json!({ "id": "ada" }));
}

#[tokio::test]
async fn test_login_unknown_user_is_unauthorized() {
    let site = write_site();
    let app = test_app(site.path(), FakeDirectory::with_users(&["ada"]));

    let response = app.oneshot(login_request("username=mallory")).await.unwrap();
    assert_redirects_home(&response);
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_login_without_username_is_unauthorized() {
    let site = write_site();
    let app = test_app(site.path(), FakeDirectory::with_users(&["ada"]));

    for form in ["", "password=ada", "user=ada&remember=1", "username="] {
        let response = app.clone().oneshot(login_request(form)).await.unwrap();
        assert_redirects_home(&response);
        assert!(session_cookie(&response).is_none(), "form {form:?} logged in");
    }
}

#[tokio::test]
async fn test_padded_username_is_not_trimmed() {
    let site = write_site();
    let app = test_app(site.path(), FakeDirectory::with_users(&["ada"]));

    for form in ["username=%20ada%20", "username=+ada", "username=ada%09"] {
        let response = app.clone().oneshot(login_request(form)).await.unwrap();
        assert_redirects_home(&response);
        assert!(session_cookie(&response).is_none(), "form {form:?} logged in");
    }
}

#[tokio::test]
async fn test_forged_cookie_is_ignored() {
    let site = write_site();
    let app = test_app(site.path(), FakeDirectory::with_users(&["ada"]));

    let forged = format!("{SESSION_COOKIE_NAME}=not-a-signed-value");
    let response = app
        .oneshot(with_cookie("GET", "/session", Some(&forged)))
        .await
        .unwrap();
    assert_redirects_home(&response);
}

#[tokio::test]
async fn test_session_dropped_when_user_disappears() {
    let site = write_site();
    let directory = FakeDirectory::with_users(&["ada"]);
    let app = test_app(site.path(), directory.clone());

    let cookie = log_in(&app, "ada").await;
    directory.remove("ada");

    let response = app
        .clone()
        .oneshot(with_cookie("GET", "/session", Some(&cookie)))
        .await
        .unwrap();
    assert_redirects_home(&response);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let site = write_site();
    let app = test_app(site.path(), FakeDirectory::with_users(&["ada"]));

    let cookie = log_in(&app, "ada").await;

    let response = app
        .clone()
        .oneshot(with_cookie("POST", "/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_redirects_home(&response);

    let response = app
        .oneshot(with_cookie("GET", "/session", Some(&cookie)))
        .await
        .unwrap();
    assert_redirects_home(&response);
}

#[tokio::test]
async fn test_pages_do_not_require_login() {
    let site = write_site();
    let app = test_app(site.path(), FakeDirectory::default());

    for uri in ["/", "/socials"] {
        let response = app.clone().oneshot(with_cookie("GET", uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
