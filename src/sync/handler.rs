// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Repository and credential synchronization.
//!
//! A repository created outside the system namespace gets its credentials
//! twice: an owned secret next to it, and an unowned copy in the system
//! namespace that the privileged sync job reads.

use crate::config::Config;
use crate::error::{is_not_found, Result};
use crate::kubernetes::{
    clientset_for_config, config_for_token, load_base_config, visible_namespaces,
    ClientsetFactory, CombinedClientset,
};
use crate::sync::naming::{secret_name_for_repo, shared_secret_name_for_repo};
use crate::sync::secrets::shared_copy_of_secret;
use crate::types::request::{app_repository_for_request, secret_for_request};
use crate::types::{AppRepository, AppRepositoryRequest};
use k8s_openapi::api::core::v1::{Namespace, Secret};
use kube::Config as KConfig;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Entry point shared by all requests.
///
/// Holds the base client configuration and the service clientset; per
/// request handlers are derived from it with [`KubeHandler::as_user`] or
/// [`KubeHandler::as_svc`].
#[derive(Clone)]
pub struct KubeHandler {
    config: KConfig,
    system_namespace: String,
    clientset_for_config: ClientsetFactory,
    svc_clientset: Arc<dyn CombinedClientset>,
}

impl KubeHandler {
    /// Build a handler against the cluster described by `config`
    pub async fn new(config: &Config) -> Result<Self> {
        let base = load_base_config(config).await?;
        let svc_clientset = clientset_for_config(base.clone())?;

        info!(
            "Handler ready: system_namespace={}, cluster={}",
            config.system_namespace, base.cluster_url
        );

        Ok(Self::with_clientsets(
            base,
            &config.system_namespace,
            Arc::new(clientset_for_config),
            svc_clientset,
        ))
    }

    pub fn with_clientsets(
        config: KConfig,
        system_namespace: &str,
        clientset_for_config: ClientsetFactory,
        svc_clientset: Arc<dyn CombinedClientset>,
    ) -> Self {
        Self {
            config,
            system_namespace: system_namespace.to_string(),
            clientset_for_config,
            svc_clientset,
        }
    }

    /// Client configuration acting as the owner of `token`
    pub fn config_for_token(&self, token: &str) -> KConfig {
        config_for_token(&self.config, token)
    }

    /// Handler performing operations with the caller's own credentials
    pub fn as_user(&self, token: &str) -> Result<UserHandler> {
        let clientset = (self.clientset_for_config)(self.config_for_token(token))?;
        Ok(UserHandler {
            system_namespace: self.system_namespace.clone(),
            clientset,
            svc_clientset: self.svc_clientset.clone(),
        })
    }

    /// Handler performing every operation with the service credentials
    pub fn as_svc(&self) -> UserHandler {
        UserHandler {
            system_namespace: self.system_namespace.clone(),
            clientset: self.svc_clientset.clone(),
            svc_clientset: self.svc_clientset.clone(),
        }
    }
}

/// Operations on behalf of a single caller.
///
/// `clientset` carries the caller's identity; `svc_clientset` is only used
/// for the system namespace copy of the credentials.
pub struct UserHandler {
    system_namespace: String,
    clientset: Arc<dyn CombinedClientset>,
    svc_clientset: Arc<dyn CombinedClientset>,
}

impl UserHandler {
    /// Create a repository, its credential secret and, outside the system
    /// namespace, the shared copy of that secret.
    ///
    /// Nothing is rolled back: when a secret cannot be created the
    /// repository created before it stays in place.
    #[instrument(skip(self, body))]
    pub async fn create_app_repository<R: Read>(&self, body: R, namespace: &str) -> Result<AppRepository> {
        let request = AppRepositoryRequest::parse(body)?;
        let app_repo = app_repository_for_request(&request);
        let pending_secret = secret_for_request(&request, &app_repo);
        let repo_name = request.app_repository.name.as_str();

        let app_repo = self
            .clientset
            .create_app_repository(namespace, &app_repo)
            .await?;
        debug!("Created AppRepository {}/{}", namespace, repo_name);

        // Project again now that the repository has a UID to own the secret.
        let Some(secret) = pending_secret.and_then(|_| secret_for_request(&request, &app_repo)) else {
            return Ok(app_repo);
        };
        self.clientset.create_secret(namespace, &secret).await?;
        debug!("Created credential secret {}/{}", namespace, secret_name_for_repo(repo_name));

        if namespace != self.system_namespace {
            let copy = shared_copy_of_secret(&secret, repo_name, namespace, &self.system_namespace);
            self.svc_clientset
                .create_secret(&self.system_namespace, &copy)
                .await?;
            debug!(
                "Copied credentials to {}/{}",
                self.system_namespace,
                shared_secret_name_for_repo(repo_name, namespace)
            );
        }

        Ok(app_repo)
    }

    #[instrument(skip(self))]
    pub async fn get_app_repository(&self, name: &str, namespace: &str) -> Result<AppRepository> {
        Ok(self.clientset.get_app_repository(namespace, name).await?)
    }

    /// Fetch a secret, such as the credentials of a repository, as the caller
    #[instrument(skip(self))]
    pub async fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret> {
        Ok(self.clientset.get_secret(namespace, name).await?)
    }

    /// Delete a repository together with the system namespace copy of its
    /// credentials.
    ///
    /// The owned secret is left to garbage collection unless the clientset
    /// reports that it does not cascade deletes. Missing secrets are fine:
    /// repositories without credentials never had any.
    #[instrument(skip(self))]
    pub async fn delete_app_repository(&self, name: &str, namespace: &str) -> Result<()> {
        self.clientset.delete_app_repository(namespace, name).await?;
        debug!("Deleted AppRepository {}/{}", namespace, name);

        if !self.clientset.cascades_owned_deletes() {
            delete_ignoring_not_found(self.clientset.as_ref(), namespace, &secret_name_for_repo(name))
                .await?;
        }

        delete_ignoring_not_found(
            self.svc_clientset.as_ref(),
            &self.system_namespace,
            &shared_secret_name_for_repo(name, namespace),
        )
        .await
    }

    /// Namespaces the caller may list, empty when it may not list any
    #[instrument(skip(self))]
    pub async fn get_namespaces(&self) -> Result<Vec<Namespace>> {
        visible_namespaces(self.clientset.as_ref()).await
    }
}

async fn delete_ignoring_not_found(
    clientset: &dyn CombinedClientset,
    namespace: &str,
    name: &str,
) -> Result<()> {
    match clientset.delete_secret(namespace, name).await {
        Ok(()) => {
            debug!("Deleted secret {}/{}", namespace, name);
            Ok(())
        }
        Err(e) if is_not_found(&e) => {
            debug!("Secret {}/{} does not exist, nothing to delete", namespace, name);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
