// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller identity, as handed down by the (external) auth layer.
//!
//! This crate never validates tokens or sessions; it only trusts the
//! `Caller` it is given and checks role membership at the handler level.

use serde::{Deserialize, Serialize};

/// Role a caller was authenticated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Worker,
    Admin,
}

/// Identity attached to every public operation by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }

    pub fn is_worker(&self) -> bool {
        self.role == Role::Worker
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn user(id: impl Into<String>) -> Self {
        Self::new(id, Role::User)
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn worker(id: impl Into<String>) -> Self {
        Self::new(id, Role::Worker)
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn admin(id: impl Into<String>) -> Self {
        Self::new(id, Role::Admin)
    }
}

#[cfg(test)]
#[path = "caller_tests.rs"]
mod tests;
