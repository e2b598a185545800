//! Kubernetes integration for the todo backend.
//!
//! This module contains the abstractions and implementations used by the HTTP
//! API to self-test the pod's RBAC permissions by creating a throwaway
//! diagnostic pod. Consumers should depend on the trait [`K8sClient`] and
//! avoid relying on a specific transport.
//!
//! The default client, [`http::HttpK8sClient`], is backed by the [`kube`]
//! crate and talks to the cluster with the credentials resolved by
//! [`ServiceIdentity`] (in-cluster service account or local `~/.kube/config`).
//! Keeping the abstraction in [`base`] lets us swap implementations in tests
//! and non-Kubernetes environments.

mod base;
mod diagnostics;
pub mod http;
mod identity;

pub use base::*;
pub use diagnostics::*;
pub use identity::*;
