//! Page route guard tests
//!
//! Pages authenticate through the session cookie, the way a browser
//! navigation does.

mod common;

use axum::body::Body;
use common::{register_user, test_app};
use http::{header, Method, Request, StatusCode};
use tower::util::ServiceExt;

async fn get_page(app: &axum::Router, path: &str, token: Option<&str>) -> http::Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("auth_token={token}"));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn location(response: &http::Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn public_pages_render_for_everyone() {
    let (app, _state) = test_app().await;

    for path in ["/", "/menu", "/login", "/register"] {
        let response = get_page(&app, path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn protected_pages_redirect_anonymous_visitors_to_login() {
    let (app, _state) = test_app().await;

    for path in ["/feedback", "/account", "/dashboard", "/add-menu-item"] {
        let response = get_page(&app, path, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(
            location(&response),
            format!("/login?returnTo={}", urlencoding::encode(path))
        );
    }

    let response = get_page(&app, "/edit-menu-item/menu_item:dosa", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/login?returnTo=%2Fedit-menu-item%2Fmenu_item%3Adosa"
    );
}

#[tokio::test]
async fn login_redirect_keeps_the_query_string() {
    let (app, _state) = test_app().await;

    let response = get_page(&app, "/feedback?menuItemId=menu_item:dosa", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/login?returnTo=%2Ffeedback%3FmenuItemId%3Dmenu_item%3Adosa"
    );
}

#[tokio::test]
async fn regular_users_are_sent_home_from_staff_pages() {
    let (app, _state) = test_app().await;
    let regular = register_user(&app, "user2", "regular@mess.test", "regular").await;

    for path in ["/dashboard", "/add-menu-item", "/edit-menu-item/menu_item:dosa"] {
        let response = get_page(&app, path, Some(&regular)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(location(&response), "/");
    }

    // But they can use the member pages
    let response = get_page(&app, "/feedback", Some(&regular)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_page(&app, "/account", Some(&regular)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn staff_reach_the_dashboard() {
    let (app, _state) = test_app().await;
    let staff = register_user(&app, "user1", "staff@mess.test", "staff").await;

    for path in ["/dashboard", "/add-menu-item", "/edit-menu-item/menu_item:dosa"] {
        let response = get_page(&app, path, Some(&staff)).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn unknown_pages_get_a_404_shell() {
    let (app, _state) = test_app().await;

    let response = get_page(&app, "/no-such-page", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_or_garbage_cookie_is_treated_as_logged_out() {
    let (app, _state) = test_app().await;

    let response = get_page(&app, "/dashboard", Some("not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?returnTo=%2Fdashboard");
}
