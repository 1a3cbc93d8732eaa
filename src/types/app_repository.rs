// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{CustomResource, Resource, ResourceExt};
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "kubeapps.com", version = "v1alpha1", kind = "AppRepository")]
#[kube(namespaced)]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct AppRepositorySpec {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub auth: AppRepositoryAuth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_job_pod_template: Option<PodTemplateSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resync_requests: Option<u32>,
}

/// Where the sync job finds the credentials of a private repository
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
pub struct AppRepositoryAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SecretSource>,
    #[serde(rename = "customCA", default, skip_serializing_if = "Option::is_none")]
    pub custom_ca: Option<SecretSource>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretSource {
    pub secret_key_ref: SecretKeyRef,
}

/// A key within a secret living in the repository's namespace
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct SecretKeyRef {
    pub name: String,
    pub key: String,
}

impl SecretSource {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            secret_key_ref: SecretKeyRef {
                name: name.into(),
                key: key.into(),
            },
        }
    }
}

impl AppRepository {
    /// Owner reference pointing at this repository.
    ///
    /// Returns `None` until the API server has assigned a UID.
    pub fn owner_reference(&self) -> Option<OwnerReference> {
        let uid = self.uid()?;
        Some(OwnerReference {
            api_version: Self::api_version(&()).into_owned(),
            kind: Self::kind(&()).into_owned(),
            name: self.name_any(),
            uid,
            block_owner_deletion: Some(true),
            controller: None,
        })
    }
}
