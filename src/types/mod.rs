// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource and request types.

pub mod app_repository;
pub mod request;

pub use app_repository::{AppRepository, AppRepositoryAuth, AppRepositorySpec, SecretKeyRef, SecretSource};
pub use request::{AppRepositoryRequest, AppRepositoryRequestDetails};
