// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Copies of repository credentials for the system namespace

use crate::sync::naming::shared_secret_name_for_repo;
use k8s_openapi::api::core::v1::Secret;
use kube::api::ObjectMeta;

/// Build the system namespace copy of the credential secret of repository
/// `repo_name` in `repo_namespace`.
///
/// The copy keeps the secret content but carries no owner reference: owners
/// must live in the same namespace as the objects they own.
pub fn shared_copy_of_secret(
    secret: &Secret,
    repo_name: &str,
    repo_namespace: &str,
    system_namespace: &str,
) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(shared_secret_name_for_repo(repo_name, repo_namespace)),
            namespace: Some(system_namespace.to_string()),
            labels: secret.metadata.labels.clone(),
            annotations: secret.metadata.annotations.clone(),
            ..Default::default()
        },
        data: secret.data.clone(),
        string_data: secret.string_data.clone(),
        type_: secret.type_.clone(),
        immutable: secret.immutable,
    }
}
