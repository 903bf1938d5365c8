//! Feed module — posts, comments, like-sets, and the thread assembler.
//!
//! # Resources
//!
//! - **Post** — 1–280 chars of content, owned by its author, with a
//!   like-set kept in its own table so like/unlike are single atomic
//!   statements
//! - **Comment** — attached to exactly one post, never updated
//!
//! List endpoints return denormalized views: an embedded author
//! projection plus a live comment count, wrapped in a pagination
//! envelope recomputed on every call.

pub mod api;
pub mod model;
pub mod service;
pub mod validation;

use std::sync::Arc;

use axum::Router;

use chirp_core::{Authenticator, Module};

use crate::service::FeedService;

/// Feed module implementing the Module trait.
pub struct FeedModule {
    service: Arc<FeedService>,
    guard: Arc<dyn Authenticator>,
}

impl FeedModule {
    pub fn new(service: Arc<FeedService>, guard: Arc<dyn Authenticator>) -> Self {
        Self { service, guard }
    }
}

impl Module for FeedModule {
    fn name(&self) -> &str {
        "feed"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone(), self.guard.clone())
    }
}
