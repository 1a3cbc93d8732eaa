// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client configuration and per-caller client creation

use crate::config::Config;
use crate::error::{AppRepoError, Result};
use crate::kubernetes::clientset::{Clientset, CombinedClientset};
use kube::{
    config::{AuthInfo, KubeConfigOptions},
    Client, Config as KConfig,
};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Builds a clientset for a (usually token scoped) configuration
pub type ClientsetFactory =
    Arc<dyn Fn(KConfig) -> Result<Arc<dyn CombinedClientset>> + Send + Sync>;

/// Load the base configuration every per-caller configuration is derived from.
///
/// Uses the configured kubeconfig context when one is set, otherwise infers
/// the configuration (kubeconfig first, then in-cluster).
#[instrument(skip(config))]
pub async fn load_base_config(config: &Config) -> Result<KConfig> {
    match &config.kube_context {
        Some(context) => {
            info!("Loading kubeconfig context '{}'", context);
            let options = KubeConfigOptions {
                context: Some(context.clone()),
                ..Default::default()
            };
            KConfig::from_kubeconfig(&options).await.map_err(|e| {
                AppRepoError::ClientConfig(format!(
                    "Failed to load kubeconfig context {}: {}",
                    context, e
                ))
            })
        }
        None => KConfig::infer()
            .await
            .map_err(|e| AppRepoError::ClientConfig(format!("Failed to infer config: {}", e))),
    }
}

/// Copy `base` with `token` as the only credential.
///
/// Every other credential of `base` (basic auth, client certificates, auth
/// providers, exec plugins, impersonation) is dropped, otherwise it would be
/// presented in place of the caller's token. `base` itself is left untouched
/// so concurrent callers never see each other's tokens.
pub fn config_for_token(base: &KConfig, token: &str) -> KConfig {
    let mut config = base.clone();
    config.auth_info = AuthInfo {
        token: Some(SecretString::from(token.to_string())),
        ..Default::default()
    };
    config
}

/// Create a Kubernetes backed clientset from a configuration
pub fn clientset_for_config(config: KConfig) -> Result<Arc<dyn CombinedClientset>> {
    debug!("Creating clientset for {}", config.cluster_url);
    let client = Client::try_from(config)
        .map_err(|e| AppRepoError::ClientConfig(format!("Failed to create client: {}", e)))?;
    Ok(Arc::new(Clientset::new(client)))
}
