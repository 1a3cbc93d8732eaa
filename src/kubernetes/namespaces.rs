// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace visibility for a caller

use crate::error::Result;
use crate::kubernetes::clientset::CombinedClientset;
use k8s_openapi::api::authorization::v1::{
    ResourceAttributes, SelfSubjectAccessReview, SelfSubjectAccessReviewSpec,
};
use k8s_openapi::api::core::v1::Namespace;
use tracing::{debug, instrument};

/// Ask the authorizer whether the caller behind `clientset` may perform
/// `verb` on the core `resource`.
#[instrument(skip(clientset))]
pub async fn can_i(clientset: &dyn CombinedClientset, verb: &str, resource: &str) -> Result<bool> {
    let review = SelfSubjectAccessReview {
        spec: SelfSubjectAccessReviewSpec {
            resource_attributes: Some(ResourceAttributes {
                group: Some(String::new()),
                resource: Some(resource.to_string()),
                verb: Some(verb.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    let response = clientset.create_self_subject_access_review(&review).await?;
    let allowed = response.status.is_some_and(|s| s.allowed);

    debug!("Access review answered allowed={}", allowed);
    Ok(allowed)
}

/// List the namespaces the caller is allowed to enumerate.
///
/// A caller without permission gets an empty list rather than an error.
/// Namespaces are returned in the order the API server lists them.
#[instrument(skip(clientset))]
pub async fn visible_namespaces(clientset: &dyn CombinedClientset) -> Result<Vec<Namespace>> {
    if !can_i(clientset, "list", "namespaces").await? {
        debug!("Caller may not list namespaces");
        return Ok(Vec::new());
    }

    Ok(clientset.list_namespaces().await?)
}
