// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, the combined clientset and namespace visibility.

pub mod client;
pub mod clientset;
pub mod namespaces;

pub use client::{clientset_for_config, config_for_token, load_base_config, ClientsetFactory};
pub use clientset::{Clientset, CombinedClientset};
pub use namespaces::{can_i, visible_namespaces};
