#![allow(dead_code)]

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicI64, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use k8s_openapi::api::core::v1::Pod;
use todo_api::k8s::{K8sClient, K8sError};
use todo_api::store::{Item, ItemStore, StoreError};

/// What the scripted Kubernetes client should do when asked to create a pod.
#[derive(Debug, Clone, Copy)]
pub enum ScriptedOutcome {
    /// Accept the pod and echo it back, like a permissive cluster.
    Created,
    /// Reject the request with an RBAC forbidden error.
    Denied,
    /// Reject the request because a pod with that name already exists.
    Conflict,
    /// Never answer, forcing the caller's timeout to fire.
    Hang,
}

/// A [`K8sClient`] that follows a fixed script instead of talking to a
/// cluster.
pub struct ScriptedK8sClient {
    namespace: String,
    outcome: ScriptedOutcome,
    created_pod_names: Mutex<Vec<String>>,
}

impl ScriptedK8sClient {
    pub fn new(outcome: ScriptedOutcome) -> Self {
        Self {
            namespace: "todolist".to_string(),
            outcome,
            created_pod_names: Mutex::new(Vec::new()),
        }
    }

    /// Names of the pods accepted so far, in creation order.
    pub fn created_pod_names(&self) -> Vec<String> {
        self.created_pod_names.lock().unwrap().clone()
    }
}

#[async_trait]
impl K8sClient for ScriptedK8sClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_pod(&self, pod: Pod) -> Result<Pod, K8sError> {
        match self.outcome {
            ScriptedOutcome::Created => {
                if let Some(name) = pod.metadata.name.clone() {
                    self.created_pod_names.lock().unwrap().push(name);
                }
                Ok(pod)
            }
            ScriptedOutcome::Denied => Err(K8sError::PermissionDenied(
                "pods is forbidden: User \"system:serviceaccount:todolist:default\" \
                 cannot create resource \"pods\" in API group \"\" in the namespace \"todolist\""
                    .to_string(),
            )),
            ScriptedOutcome::Conflict => Err(K8sError::Conflict(
                "pods \"test-pod\" already exists".to_string(),
            )),
            ScriptedOutcome::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(K8sError::Connectivity("request never completed".to_string()))
            }
        }
    }
}

/// An [`ItemStore`] backed by a plain `Vec`, with a switch to simulate a
/// database outage for readiness tests.
pub struct InMemoryItemStore {
    items: Mutex<Vec<Item>>,
    next_id: AtomicI64,
    reachable: AtomicBool,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            reachable: AtomicBool::new(true),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = self.items.lock().unwrap().clone();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }

    async fn read_item(&self, item_id: i64) -> Result<Option<Item>, StoreError> {
        let items = self.items.lock().unwrap();
        Ok(items.iter().find(|item| item.id == item_id).cloned())
    }

    async fn create_item(&self, title: &str) -> Result<Item, StoreError> {
        let item = Item {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: title.to_string(),
            created_at: Utc::now(),
        };
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, item_id: i64, title: &str) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.lock().unwrap();
        let item = items.iter_mut().find(|item| item.id == item_id);
        Ok(item.map(|item| {
            item.title = title.to_string();
            item.clone()
        }))
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool, StoreError> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != item_id);
        Ok(items.len() < before)
    }

    async fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}
