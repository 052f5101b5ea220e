//! # netlify-core
//!
//! Core types and HTTP plumbing for the Netlify REST API.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and HTTP status mapping
//! - [`config`] - Client configuration (base URL, personal token, timeouts)
//! - [`client`] - Authenticated transport and the request/response handler
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use client::{Request, ServiceClient};
pub use config::NetlifyClientConfig;
pub use error::{Error, Result};
