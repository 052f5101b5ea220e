//! Netlify provider: resources and data sources over the Netlify REST API.
//!
//! The provider resolves a personal token, builds a [`netlify_api::NetlifyClient`] and hands
//! it to each resource and data source. Handlers take and return JSON state objects keyed by
//! attribute name, and report failures as [`Diagnostics`].
//!
//! | Type name | Kind |
//! |---|---|
//! | `netlify_site` | resource, data source |
//! | `netlify_deploy_key` | resource |
//! | `netlify_env_var` | resource |
//! | `netlify_current_user` | data source |

#![deny(missing_docs)]

pub mod data_sources;
pub mod diagnostics;
pub mod provider;
pub mod resources;
pub mod schema;

pub use data_sources::DataSource;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use provider::{NetlifyProvider, ProviderMetadata, PROVIDER_TYPE_NAME, UNKNOWN_VALUE};
pub use resources::Resource;
pub use schema::{Attribute, AttributeType, Schema};
