//! Backend service for a todo-item list running inside Kubernetes.
//!
//! Exposes item CRUD over Postgres, liveness/readiness/version probes for the
//! cluster control plane, an environment introspection endpoint, Prometheus
//! metrics, and an operational endpoint that self-tests the pod's RBAC
//! permissions by creating a throwaway diagnostic pod through the in-cluster
//! Kubernetes API.

pub mod config;
pub mod k8s;
pub mod metrics;
pub mod routes;
pub mod startup;
pub mod store;
