// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deterministic names of the secrets attached to a repository.

use crate::constants::SECRET_NAME_PREFIX;

/// Name of the credential secret living next to repository `repo_name`
pub fn secret_name_for_repo(repo_name: &str) -> String {
    format!("{}{}", SECRET_NAME_PREFIX, repo_name)
}

/// Name of the system namespace copy of the credentials of `repo_name` in `namespace`.
///
/// The namespace is part of the name so same-named repositories of
/// different namespaces never share a copy.
pub fn shared_secret_name_for_repo(repo_name: &str, namespace: &str) -> String {
    format!("{}-{}", namespace, secret_name_for_repo(repo_name))
}
