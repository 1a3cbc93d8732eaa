// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Single handle over the AppRepository API and the core Kubernetes API.

use crate::types::AppRepository;
use async_trait::async_trait;
use k8s_openapi::api::authorization::v1::SelfSubjectAccessReview;
use k8s_openapi::api::core::v1::{Namespace, Secret};
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Api, Client,
};
use tracing::{debug, instrument};

/// Everything the repository engine needs from a cluster.
///
/// Errors are the untouched API errors so callers can classify them by status.
#[async_trait]
pub trait CombinedClientset: Send + Sync {
    async fn create_app_repository(
        &self,
        namespace: &str,
        app_repo: &AppRepository,
    ) -> Result<AppRepository, kube::Error>;

    async fn get_app_repository(&self, namespace: &str, name: &str) -> Result<AppRepository, kube::Error>;

    async fn delete_app_repository(&self, namespace: &str, name: &str) -> Result<(), kube::Error>;

    async fn create_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret, kube::Error>;

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, kube::Error>;

    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<(), kube::Error>;

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, kube::Error>;

    async fn create_self_subject_access_review(
        &self,
        review: &SelfSubjectAccessReview,
    ) -> Result<SelfSubjectAccessReview, kube::Error>;

    /// Whether deleting an object also deletes the objects it owns.
    ///
    /// Kubernetes garbage collection follows owner references, so the
    /// credential secret goes away with its repository.
    fn cascades_owned_deletes(&self) -> bool {
        true
    }
}

/// Kubernetes backed [`CombinedClientset`]
#[derive(Clone)]
pub struct Clientset {
    client: Client,
}

impl Clientset {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn app_repositories(&self, namespace: &str) -> Api<AppRepository> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl CombinedClientset for Clientset {
    #[instrument(skip(self, app_repo))]
    async fn create_app_repository(
        &self,
        namespace: &str,
        app_repo: &AppRepository,
    ) -> Result<AppRepository, kube::Error> {
        debug!("Creating AppRepository {:?}", app_repo.metadata.name);
        self.app_repositories(namespace)
            .create(&PostParams::default(), app_repo)
            .await
    }

    #[instrument(skip(self))]
    async fn get_app_repository(&self, namespace: &str, name: &str) -> Result<AppRepository, kube::Error> {
        self.app_repositories(namespace).get(name).await
    }

    #[instrument(skip(self))]
    async fn delete_app_repository(&self, namespace: &str, name: &str) -> Result<(), kube::Error> {
        debug!("Deleting AppRepository");
        self.app_repositories(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
    }

    #[instrument(skip(self, secret))]
    async fn create_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret, kube::Error> {
        debug!("Creating secret {:?}", secret.metadata.name);
        self.secrets(namespace)
            .create(&PostParams::default(), secret)
            .await
    }

    #[instrument(skip(self))]
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, kube::Error> {
        self.secrets(namespace).get(name).await
    }

    #[instrument(skip(self))]
    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<(), kube::Error> {
        debug!("Deleting secret");
        self.secrets(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
    }

    #[instrument(skip(self))]
    async fn list_namespaces(&self) -> Result<Vec<Namespace>, kube::Error> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        Ok(namespaces.list(&ListParams::default()).await?.items)
    }

    #[instrument(skip(self, review))]
    async fn create_self_subject_access_review(
        &self,
        review: &SelfSubjectAccessReview,
    ) -> Result<SelfSubjectAccessReview, kube::Error> {
        let reviews: Api<SelfSubjectAccessReview> = Api::all(self.client.clone());
        reviews.create(&PostParams::default(), review).await
    }
}
