//! Helper methods only available for tests
use crate::api::v1::{Database, DatabaseSpec, SecretRef};
use crate::context::Context;
use crate::util::config::{Config, RetryConfig, WaitConfig};
use http::{Method, Request, Response, StatusCode};
use hyper::{body::to_bytes, Body};
use kube::{api::ObjectMeta, Client};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Duration;

impl Database {
    /// A small postgres database in `namespace`
    pub fn test(name: &str, namespace: &str) -> Self {
        Database {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: DatabaseSpec {
                engine: "postgres".to_string(),
                version: "13".to_string(),
                size: 10,
                username: "app".to_string(),
                db_name: name.to_string(),
                password: SecretRef {
                    name: format!("{name}-credentials"),
                    key: "password".to_string(),
                },
                delete_protection: false,
            },
            status: None,
        }
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.spec.size = size;
        self
    }

    pub fn protected(mut self) -> Self {
        self.spec.delete_protection = true;
        self
    }
}

impl Config {
    /// Defaults with every sleep removed
    pub fn test() -> Self {
        Config {
            pvc_wait: WaitConfig {
                max_iterations: 100,
                interval_ms: 0,
            },
            delete_retry: RetryConfig {
                max_attempts: 20,
                interval_ms: 0,
            },
            ..Default::default()
        }
    }
}

type ApiServerHandle = tower_test::mock::Handle<Request<Body>, Response<Body>>;

/// Scripted stand-in for the API server.
///
/// Every `expect_*` call consumes exactly one request, asserts its method and path,
/// answers it, and hands back the JSON body the client sent (`Null` for none).
pub struct ApiServerVerifier(ApiServerHandle);

impl ApiServerVerifier {
    pub fn new() -> (Client, ApiServerVerifier) {
        let (mock_service, handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
        let mock_client = Client::new(mock_service, "default");
        (mock_client, ApiServerVerifier(handle))
    }

    pub fn context(config: Config) -> (Arc<Context>, ApiServerVerifier) {
        let (client, verifier) = Self::new();
        (Context::new(client, config), verifier)
    }

    pub async fn respond(&mut self, method: Method, path: &str, status: StatusCode, body: Value) -> Value {
        let (request, send) = self.0.next_request().await.expect("service not called");
        assert_eq!(request.method(), method, "unexpected method for {}", request.uri());
        assert_eq!(request.uri().path(), path);
        let bytes = to_bytes(request.into_body()).await.unwrap();
        let sent = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        let response = serde_json::to_vec(&body).unwrap();
        send.send_response(Response::builder().status(status).body(Body::from(response)).unwrap());
        sent
    }

    pub async fn expect_ok(&mut self, method: Method, path: &str, body: Value) -> Value {
        self.respond(method, path, StatusCode::OK, body).await
    }

    /// Answers by echoing the submitted object back, as create and replace do.
    pub async fn expect_echo(&mut self, method: Method, path: &str) -> Value {
        let (request, send) = self.0.next_request().await.expect("service not called");
        assert_eq!(request.method(), method, "unexpected method for {}", request.uri());
        assert_eq!(request.uri().path(), path);
        let bytes = to_bytes(request.into_body()).await.unwrap();
        let sent: Value = serde_json::from_slice(&bytes).unwrap();
        let status = if method == Method::POST {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        send.send_response(Response::builder().status(status).body(Body::from(bytes)).unwrap());
        sent
    }

    pub async fn expect_not_found(&mut self, method: Method, path: &str) -> Value {
        self.respond(method, path, StatusCode::NOT_FOUND, status_body(404, "NotFound"))
            .await
    }

    pub async fn expect_server_error(&mut self, method: Method, path: &str) -> Value {
        self.respond(
            method,
            path,
            StatusCode::INTERNAL_SERVER_ERROR,
            status_body(500, "InternalError"),
        )
        .await
    }

    /// Fails if the client issues another request within a short window.
    pub async fn assert_idle(&mut self) {
        match tokio::time::timeout(Duration::from_millis(50), self.0.next_request()).await {
            Err(_) | Ok(None) => {}
            Ok(Some((request, _))) => {
                panic!("unexpected request {} {}", request.method(), request.uri())
            }
        }
    }
}

pub fn status_body(code: u16, reason: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": format!("test says {reason}"),
        "reason": reason,
        "code": code,
    })
}

pub fn success_status() -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Success",
    })
}

pub fn pvc_body(name: &str, storage: &str, phase: Option<&str>, volume: Option<&str>) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "PersistentVolumeClaim",
        "metadata": { "name": name, "namespace": "default", "resourceVersion": "7" },
        "spec": {
            "accessModes": ["ReadWriteOnce"],
            "resources": { "requests": { "storage": storage } },
            "storageClassName": "default",
            "volumeName": volume,
        },
        "status": { "phase": phase },
    })
}

pub fn pv_body(name: &str, phase: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "PersistentVolume",
        "metadata": { "name": name },
        "status": { "phase": phase },
    })
}

/// Wait for a spawned scenario, failing the test if it hangs or panicked.
pub async fn timeout_after_5s(handle: tokio::task::JoinHandle<ApiServerVerifier>) -> ApiServerVerifier {
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("timeout on mock apiserver")
        .expect("scenario succeeded")
}
