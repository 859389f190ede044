//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http_body_util::BodyExt;
use tower::ServiceExt;

use widget_layout::AppState;
use widget_layout::catalog::{load_base_templates, load_widget_mappings};
use widget_layout::config::DEFAULT_API_PREFIX;
use widget_layout::handlers::identity::IDENTITY_HEADER;
use widget_layout::router::build_router;
use widget_layout::template_db::TemplateDb;
use widget_layout::template_service::TemplateService;

pub const PREFIX: &str = DEFAULT_API_PREFIX;

pub const BASE_TEMPLATES: &str = r#"[
    {
        "name": "landing",
        "displayName": "Landing Page",
        "templateConfig": {
            "sm": [{"i": "rhel#1", "w": 1, "h": 4, "minH": 1, "maxH": 10, "x": 0, "y": 0}],
            "md": [{"i": "rhel#1", "w": 2, "h": 4, "minH": 1, "maxH": 10, "cx": 0, "cy": 0}],
            "lg": [{"i": "rhel#1", "w": 2, "h": 4, "minH": 1, "maxH": 10, "x": 0, "y": 0}],
            "xl": [{"i": "rhel#1", "w": 3, "h": 4, "minH": 1, "maxH": 10, "x": 0, "y": 0}]
        }
    },
    {
        "name": "home",
        "displayName": "Home",
        "templateConfig": {
            "sm": [],
            "md": [],
            "lg": [],
            "xl": [{"i": "ansible#1", "w": 1, "h": 2, "minH": 1, "maxH": 6, "x": 0, "y": 0, "static": true}]
        }
    }
]"#;

pub const WIDGET_MAPPINGS: &str = r#"[
    {
        "scope": "rhel",
        "module": "./RhelWidget",
        "featureFlag": "widgets.rhel",
        "config": {
            "title": "RHEL",
            "icon": "RhelIcon",
            "headerLink": {"title": "Open RHEL", "href": "/insights"},
            "permissions": [{"method": "isOrgAdmin"}]
        },
        "defaults": {"w": 1, "h": 4, "maxH": 10, "minH": 1}
    },
    {
        "scope": "ansible",
        "module": "./AnsibleWidget",
        "importName": "Summary",
        "config": {"title": "Ansible", "icon": "AnsibleIcon"}
    }
]"#;

pub struct TestApp {
    pub router: Router,
    pub db: Arc<TemplateDb>,
}

/// Router over an in-memory database with the test catalogs loaded.
pub fn build_test_app() -> TestApp {
    let db = Arc::new(TemplateDb::open_in_memory().unwrap());
    let bases = load_base_templates(BASE_TEMPLATES).unwrap();
    let mappings = load_widget_mappings(WIDGET_MAPPINGS).unwrap();
    let service = TemplateService::new(db.clone(), Arc::new(bases), Arc::new(mappings));
    let state = AppState {
        service: Arc::new(service),
    };
    TestApp {
        router: build_router(state, PREFIX),
        db,
    }
}

/// Base64 identity document as forwarded by the gateway.
pub fn identity_header(user_id: &str) -> String {
    let document = serde_json::json!({
        "identity": {
            "org_id": "000001",
            "type": "User",
            "user": {"user_id": user_id, "username": format!("{user_id}-name")}
        }
    });
    STANDARD.encode(document.to_string())
}

pub fn api(path: &str) -> String {
    format!("{PREFIX}{path}")
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<String>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(IDENTITY_HEADER, identity_header(user));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// GET with a caller-supplied `x-rh-identity` value, sent as is.
pub async fn get_with_raw_identity(app: &Router, uri: &str, header: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(IDENTITY_HEADER, header)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, user: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn post(app: &Router, uri: &str, user: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), None).await
}

pub async fn delete(app: &Router, uri: &str, user: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user), None).await
}

pub async fn patch_json(
    app: &Router,
    uri: &str,
    user: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(user), Some(body.to_string())).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
