// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::env as env_vars;
use anyhow::{Context, Result};
use std::env;

/// Service configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Privileged namespace holding shared copies of repository credentials
    pub system_namespace: String,
    /// Kubeconfig context to use instead of the inferred one
    pub kube_context: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let system_namespace = env::var(env_vars::SYSTEM_NAMESPACE)
            .with_context(|| format!("{} should be defined", env_vars::SYSTEM_NAMESPACE))?;
        if system_namespace.is_empty() {
            anyhow::bail!("{} should not be empty", env_vars::SYSTEM_NAMESPACE);
        }

        let kube_context = env::var(env_vars::KUBE_CONTEXT)
            .ok()
            .filter(|c| !c.is_empty());

        Ok(Config {
            system_namespace,
            kube_context,
        })
    }
}
