#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

#[cfg(feature = "http-server")]
pub mod http {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use flood_api::db::{FullRepository, LocalRepository};
    use flood_api::http::{create_router, AppState};

    /// Router over the development fixtures.
    pub fn fixture_app() -> Router {
        app_with(LocalRepository::with_fixtures())
    }

    pub fn app_with(repo: LocalRepository) -> Router {
        let repo = Arc::new(repo) as Arc<dyn FullRepository>;
        create_router(AppState::new(repo))
    }

    /// Send a GET request and decode the JSON body.
    pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// The `readings` array of a successful response.
    pub fn readings(body: &Value) -> &Vec<Value> {
        body["readings"]
            .as_array()
            .expect("response has a readings array")
    }

    pub fn levels(body: &Value) -> Vec<f64> {
        readings(body)
            .iter()
            .map(|r| r["level"].as_f64().expect("level is a number"))
            .collect()
    }

    pub fn timestamps(body: &Value) -> Vec<String> {
        readings(body)
            .iter()
            .map(|r| r["timestamp"].as_str().expect("timestamp is a string").to_string())
            .collect()
    }
}
