// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppRepoError {
    /// The request body could not be decoded. The message is the decoder's own text.
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{}", api_message(.0))]
    Kube(#[from] kube::Error),

    #[error("Failed to build client configuration: {0}")]
    ClientConfig(String),
}

/// API server failures carry a human readable message (`... already exists`,
/// `... not found`) that callers expect to see untouched.
fn api_message(err: &kube::Error) -> String {
    match err {
        kube::Error::Api(response) => response.message.clone(),
        other => other.to_string(),
    }
}

impl AppRepoError {
    /// HTTP status a caller should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppRepoError::Parse(_) | AppRepoError::InvalidRequest(_) => 400,
            AppRepoError::Kube(kube::Error::Api(response)) => response.code,
            AppRepoError::Kube(_) | AppRepoError::ClientConfig(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }

    pub fn is_conflict(&self) -> bool {
        self.status_code() == 409
    }
}

/// True when a kube call failed because the object does not exist.
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == 404)
}

pub type Result<T> = std::result::Result<T, AppRepoError>;
