//! Common test utilities for integration tests
//!
//! Builds the full router on top of the in-memory repository so the HTTP
//! tests run without a database.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use usermgmt_api::app::{build_router, AppState};
use usermgmt_api::config::{ApiConfig, Config, DatabaseConfig, UserRulesConfig};
use usermgmt_shared::repository::InMemoryUserRepository;
use usermgmt_shared::service::{DeletePolicy, UserService};

/// Test context containing the router and its backing store
pub struct TestContext {
    pub app: Router,
    pub repo: Arc<InMemoryUserRepository>,
}

impl TestContext {
    /// Router with hard delete and default name bounds
    pub fn new() -> Self {
        Self::with_rules(UserRulesConfig::default())
    }

    pub fn with_delete_policy(policy: DeletePolicy) -> Self {
        Self::with_rules(UserRulesConfig {
            delete_policy: policy,
            ..Default::default()
        })
    }

    pub fn with_rules(rules: UserRulesConfig) -> Self {
        let config = Config {
            api: ApiConfig::default(),
            database: DatabaseConfig {
                url: "postgresql://unused/test".to_string(),
                max_connections: 1,
            },
            users: rules,
        };

        let repo = Arc::new(InMemoryUserRepository::new());
        let users = UserService::new(repo.clone())
            .with_delete_policy(rules.delete_policy)
            .with_name_policy(rules.name_policy);
        let app = build_router(AppState::new(users, config));

        Self { app, repo }
    }

    /// Sends a request and returns the status and parsed JSON body
    ///
    /// The body is `Value::Null` when the response is empty.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prepared request and returns the status and parsed JSON body
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }
}
