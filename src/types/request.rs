// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! User supplied repository definitions and their projection into stored resources.

use crate::constants::{secret_keys, DEFAULT_REPO_TYPE};
use crate::error::{AppRepoError, Result};
use crate::sync::naming::secret_name_for_repo;
use crate::types::app_repository::{
    AppRepository, AppRepositoryAuth, AppRepositorySpec, SecretSource,
};
use k8s_openapi::api::core::v1::{PodTemplateSpec, Secret};
use kube::api::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Body of a repository creation request
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppRepositoryRequest {
    pub app_repository: AppRepositoryRequestDetails,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppRepositoryRequestDetails {
    pub name: String,
    #[serde(default, rename = "url")]
    pub repo_url: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub repo_type: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth_header: String,
    #[serde(default, rename = "customCA", skip_serializing_if = "String::is_empty")]
    pub custom_ca: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_job_pod_template: Option<PodTemplateSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resync_requests: Option<u32>,
}

impl AppRepositoryRequest {
    /// Decode and validate a request body
    pub fn parse<R: Read>(body: R) -> Result<Self> {
        let request: AppRepositoryRequest = serde_json::from_reader(body)?;
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<()> {
        if self.app_repository.name.is_empty() {
            return Err(AppRepoError::InvalidRequest(
                "the repository name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The credential stored for this repository, as `(key, value)`.
    ///
    /// A secret only ever holds one key: when both an auth header and a
    /// custom CA are supplied, the custom CA is kept.
    pub fn credential(&self) -> Option<(&'static str, &str)> {
        let details = &self.app_repository;
        let mut credential = None;
        if !details.auth_header.is_empty() {
            credential = Some((secret_keys::AUTH_HEADER, details.auth_header.as_str()));
        }
        if !details.custom_ca.is_empty() {
            credential = Some((secret_keys::CUSTOM_CA, details.custom_ca.as_str()));
        }
        credential
    }
}

/// Project a request into the repository that will be stored
pub fn app_repository_for_request(request: &AppRepositoryRequest) -> AppRepository {
    let details = &request.app_repository;
    let secret_name = secret_name_for_repo(&details.name);

    let mut auth = AppRepositoryAuth::default();
    if !details.auth_header.is_empty() {
        auth.header = Some(SecretSource::new(&secret_name, secret_keys::AUTH_HEADER));
    }
    if !details.custom_ca.is_empty() {
        auth.custom_ca = Some(SecretSource::new(&secret_name, secret_keys::CUSTOM_CA));
    }

    AppRepository {
        metadata: ObjectMeta {
            name: Some(details.name.clone()),
            ..Default::default()
        },
        spec: AppRepositorySpec {
            type_: details
                .repo_type
                .clone()
                .unwrap_or_else(|| DEFAULT_REPO_TYPE.to_string()),
            url: details.repo_url.clone(),
            auth,
            sync_job_pod_template: details.sync_job_pod_template.clone(),
            resync_requests: details.resync_requests,
        },
    }
}

/// Project a request into the credential secret of `app_repo`, if any.
///
/// The owner reference is only attached once `app_repo` carries the UID
/// assigned by the API server.
pub fn secret_for_request(request: &AppRepositoryRequest, app_repo: &AppRepository) -> Option<Secret> {
    let (key, value) = request.credential()?;

    Some(Secret {
        metadata: ObjectMeta {
            name: Some(secret_name_for_repo(&request.app_repository.name)),
            owner_references: app_repo.owner_reference().map(|owner| vec![owner]),
            ..Default::default()
        },
        string_data: Some(BTreeMap::from([(key.to_string(), value.to_string())])),
        ..Default::default()
    })
}
