#![allow(dead_code)]

use arango_gateway::config::{ArangoConfig, GatewayConfig};
use arango_gateway::startup::Application;
use secrecy::Secret;
use serde_json::json;
use service_core::config::Config as CoreConfig;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TEST_USERNAME: &str = "root";
pub const TEST_PASSWORD: &str = "root";
pub const TEST_JWT: &str = "integration-jwt";

/// Gateway running on a random port in front of a stubbed ArangoDB.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub arango: MockServer,
    pub client: reqwest::Client,
}

pub fn test_config(arango_url: String) -> GatewayConfig {
    GatewayConfig {
        server: CoreConfig {
            port: 0,
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
        arango: ArangoConfig {
            url: arango_url,
            username: TEST_USERNAME.to_string(),
            password: Secret::new(TEST_PASSWORD.to_string()),
            request_timeout_secs: 5,
            connect_timeout_secs: 1,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let arango = MockServer::start().await;

        let app = Application::build(test_config(arango.uri()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            arango,
            client,
        }
    }

    /// Auth endpoint expected to be called exactly `times` times.
    pub async fn expect_auth(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/_open/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jwt": TEST_JWT })))
            .expect(times)
            .mount(&self.arango)
            .await;
    }

    pub async fn post_json(&self, route: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, route))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// In-memory stand-in for the ArangoDB endpoints the gateway uses. Keeps
/// databases, collections and documents so existence checks observe earlier
/// creates.
#[derive(Clone, Default)]
pub struct FakeArango {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    databases: BTreeMap<String, BTreeMap<String, Vec<serde_json::Value>>>,
    next_key: u64,
}

impl FakeArango {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.lock().databases.insert("_system".to_string(), BTreeMap::new());
        fake
    }

    /// Route every request on `server` to this fake.
    pub async fn mount(&self, server: &MockServer) {
        Mock::given(any())
            .respond_with(self.clone())
            .mount(server)
            .await;
    }

    pub fn has_database(&self, name: &str) -> bool {
        self.lock().databases.contains_key(name)
    }

    pub fn has_collection(&self, database: &str, name: &str) -> bool {
        self.lock()
            .databases
            .get(database)
            .map(|collections| collections.contains_key(name))
            .unwrap_or(false)
    }

    pub fn documents(&self, database: &str, collection: &str) -> Vec<serde_json::Value> {
        self.lock()
            .databases
            .get(database)
            .and_then(|collections| collections.get(collection))
            .cloned()
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake arango state poisoned")
    }

    fn authorized(request: &Request) -> bool {
        let expected = format!("bearer {}", TEST_JWT);
        request
            .headers
            .iter()
            .filter(|(name, _)| name.as_str().eq_ignore_ascii_case("authorization"))
            .any(|(_, values)| values.iter().any(|v| v.as_str() == expected))
    }
}

fn error(code: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({
        "error": true,
        "code": code,
        "errorMessage": message
    }))
}

impl Respond for FakeArango {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let segments: Vec<String> = request
            .url
            .path_segments()
            .map(|s| s.map(|p| p.to_string()).collect())
            .unwrap_or_default();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let method = request.method.to_string();
        let body: serde_json::Value =
            serde_json::from_slice(&request.body).unwrap_or(serde_json::Value::Null);

        if method == "POST" && segments == ["_open", "auth"] {
            return if body == json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }) {
                ResponseTemplate::new(200).set_body_json(json!({ "jwt": TEST_JWT }))
            } else {
                error(401, "Wrong credentials")
            };
        }

        if !Self::authorized(request) {
            return error(401, "not authorized to execute this request");
        }

        let mut state = self.lock();
        match (method.as_str(), segments.as_slice()) {
            ("GET", ["_db", "_system", "_api", "database"]) => {
                let names: Vec<&String> = state.databases.keys().collect();
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "error": false, "code": 200, "result": names }))
            }
            ("POST", ["_db", "_system", "_api", "database"]) => {
                let name = body["name"].as_str().unwrap_or_default().to_string();
                if state.databases.contains_key(&name) {
                    return error(409, "duplicate database name");
                }
                state.databases.insert(name, BTreeMap::new());
                ResponseTemplate::new(201)
                    .set_body_json(json!({ "error": false, "code": 201, "result": true }))
            }
            ("GET", ["_db", database, "_api", "collection"]) => {
                match state.databases.get(*database) {
                    Some(collections) => {
                        let result: Vec<serde_json::Value> = collections
                            .keys()
                            .map(|name| json!({ "name": name, "isSystem": false, "type": 2 }))
                            .collect();
                        ResponseTemplate::new(200)
                            .set_body_json(json!({ "error": false, "code": 200, "result": result }))
                    }
                    None => error(404, "database not found"),
                }
            }
            ("POST", ["_db", database, "_api", "collection"]) => {
                let name = body["name"].as_str().unwrap_or_default().to_string();
                match state.databases.get_mut(*database) {
                    Some(collections) if collections.contains_key(&name) => {
                        error(409, "duplicate name")
                    }
                    Some(collections) => {
                        collections.insert(name.clone(), Vec::new());
                        ResponseTemplate::new(200)
                            .set_body_json(json!({ "name": name, "type": 2, "status": 3 }))
                    }
                    None => error(404, "database not found"),
                }
            }
            ("POST", ["_db", database, "_api", "document", collection]) => {
                state.next_key += 1;
                let key = state.next_key.to_string();
                let stored = match state
                    .databases
                    .get_mut(*database)
                    .and_then(|collections| collections.get_mut(*collection))
                {
                    Some(documents) => {
                        let mut document = body.clone();
                        document["_key"] = json!(key.clone());
                        documents.push(document);
                        true
                    }
                    None => false,
                };
                if !stored {
                    return error(404, "collection or view not found");
                }
                ResponseTemplate::new(202).set_body_json(json!({
                    "_id": format!("{}/{}", collection, key),
                    "_key": key,
                    "_rev": format!("_rev{}", key)
                }))
            }
            _ => error(404, "unknown path"),
        }
    }
}
