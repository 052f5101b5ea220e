//! Netlify REST API client and data models.
//!
//! Provides typed structures and an asynchronous client for the Netlify resources the
//! provider manages: sites, deploy keys, environment variables and the current user.

#![deny(missing_docs)]

pub mod client;
pub mod models;

#[cfg(feature = "mock")]
pub use client::MockNetlifyApi;
pub use client::{NetlifyApi, NetlifyClient, NetlifyClientBuilder};
pub use models::{CurrentUser, DeployKey, EnvVar, EnvVarValue, Repository, Site, SiteRequest};

/// Convenient result alias that reuses the shared Netlify error type.
pub type Result<T> = netlify_core::Result<T>;
