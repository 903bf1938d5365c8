//! Auth module — identity store, credential service, authorization guard.
//!
//! # Resources
//!
//! - **User** — identity record with unique username/email
//! - **Token** — stateless JWT carrying `{userId, email}` claims
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::{AuthConfig, AuthService}};
//!
//! let service = AuthService::new(sql, AuthConfig::default())?;
//! let module = AuthModule::new(service.clone());
//! let router = module.routes(); // /auth/register, /auth/login, ...
//! ```

pub mod api;
pub mod model;
pub mod service;
pub mod validation;

use std::sync::Arc;

use axum::Router;

use chirp_core::Module;

use crate::service::AuthService;

/// Auth module implementing the Module trait.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
