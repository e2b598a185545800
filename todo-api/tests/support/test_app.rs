#![allow(dead_code)]

use std::io;
use std::net::TcpListener;
use std::sync::Arc;

use todo_api::config::{ApiConfig, ApplicationSettings, KubernetesConfig};
use todo_api::k8s::K8sClient;
use todo_api::routes::items::{CreateItemRequest, UpdateItemRequest};
use todo_api::startup::run;
use todo_api::store::ItemStore;
use todo_config::Environment;
use todo_config::shared::{PgConnectionConfig, TlsConfig};

use crate::support::mocks::{InMemoryItemStore, ScriptedK8sClient, ScriptedOutcome};

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub store: Arc<InMemoryItemStore>,
    pub k8s_client: Option<Arc<ScriptedK8sClient>>,
    server_handle: tokio::task::JoinHandle<io::Result<()>>,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{path}", &self.address))
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn health(&self) -> reqwest::Response {
        self.get("/health").await
    }

    pub async fn ready(&self) -> reqwest::Response {
        self.get("/ready").await
    }

    pub async fn version(&self) -> reqwest::Response {
        self.get("/version").await
    }

    pub async fn read_env(&self) -> reqwest::Response {
        self.get("/api/env").await
    }

    pub async fn create_test_pod(&self) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/test-pod", &self.address))
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn read_all_items(&self) -> reqwest::Response {
        self.get("/api/items").await
    }

    pub async fn read_item(&self, item_id: i64) -> reqwest::Response {
        self.get(&format!("/api/items/{item_id}")).await
    }

    pub async fn create_item(&self, item: &CreateItemRequest) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/items", &self.address))
            .json(item)
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn update_item(&self, item_id: i64, item: &UpdateItemRequest) -> reqwest::Response {
        self.api_client
            .put(format!("{}/api/items/{item_id}", &self.address))
            .json(item)
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn delete_item(&self, item_id: i64) -> reqwest::Response {
        self.api_client
            .delete(format!("{}/api/items/{item_id}", &self.address))
            .send()
            .await
            .expect("failed to execute request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

fn test_config(request_timeout_secs: u64) -> ApiConfig {
    ApiConfig {
        database: PgConnectionConfig {
            host: "localhost".to_string(),
            port: 5432,
            name: "todolist".to_string(),
            username: "postgres".to_string(),
            password: None,
            tls: TlsConfig {
                trusted_root_certs: String::new(),
                enabled: false,
            },
        },
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        kubernetes: KubernetesConfig {
            pod_image: "busybox:latest".to_string(),
            request_timeout_secs,
            namespace: Some("todolist".to_string()),
        },
        sentry: None,
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_test_app_with(Some(ScriptedOutcome::Created), 5).await
}

/// Spawns the app with a scripted Kubernetes client, or without one when
/// `outcome` is `None`.
pub async fn spawn_test_app_with(
    outcome: Option<ScriptedOutcome>,
    request_timeout_secs: u64,
) -> TestApp {
    // We set the environment to dev.
    Environment::Dev.set();

    let base_address = "127.0.0.1";
    let listener =
        TcpListener::bind(format!("{base_address}:0")).expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let config = test_config(request_timeout_secs);

    let store = Arc::new(InMemoryItemStore::new());
    let k8s_client = outcome.map(|outcome| Arc::new(ScriptedK8sClient::new(outcome)));

    let server = run(
        config,
        listener,
        store.clone() as Arc<dyn ItemStore>,
        k8s_client
            .clone()
            .map(|client| client as Arc<dyn K8sClient>),
    )
    .await
    .expect("failed to bind address");

    let server_handle = tokio::spawn(server);

    TestApp {
        address: format!("http://{base_address}:{port}"),
        api_client: reqwest::Client::new(),
        store,
        k8s_client,
        server_handle,
    }
}
