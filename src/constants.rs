// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The only repository type understood by the sync job
pub const DEFAULT_REPO_TYPE: &str = "helm";

/// Prefix of the credential secret created next to a repository
pub const SECRET_NAME_PREFIX: &str = "apprepo-";

/// Keys used inside credential secrets
pub mod secret_keys {
    /// Value sent verbatim as the `Authorization` header
    pub const AUTH_HEADER: &str = "authorizationHeader";
    /// PEM bundle trusted when fetching from the repository
    pub const CUSTOM_CA: &str = "ca.crt";
}

/// Environment variables read at startup
pub mod env {
    pub const SYSTEM_NAMESPACE: &str = "POD_NAMESPACE";
    pub const KUBE_CONTEXT: &str = "KUBE_CONTEXT";
    pub const KUBE_TOKEN: &str = "KUBE_TOKEN";
}
