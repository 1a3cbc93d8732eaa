// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Repository and credential synchronization logic.

pub mod handler;
pub mod naming;
pub mod secrets;

pub use handler::{KubeHandler, UserHandler};
pub use naming::{secret_name_for_repo, shared_secret_name_for_repo};
