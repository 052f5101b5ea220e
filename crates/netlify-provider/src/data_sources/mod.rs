//! Read-only data sources.

mod current_user;
mod site;

pub use current_user::CurrentUserDataSource;
pub use site::SiteDataSource;

use crate::diagnostics::Diagnostics;
use crate::schema::Schema;
use async_trait::async_trait;
use netlify_api::NetlifyApi;
use serde_json::Value;
use std::sync::Arc;

/// Constructor registered with the provider.
pub type DataSourceFactory = fn() -> Box<dyn DataSource>;

/// A data source reads remote objects without managing them.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Suffix appended to the provider type name, e.g. `_current_user`.
    fn type_suffix(&self) -> &'static str;

    /// Full type name such as `netlify_current_user`.
    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}{}", self.type_suffix())
    }

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Receive the client built by the provider.
    fn configure(&mut self, client: Option<Arc<dyn NetlifyApi>>);

    /// Resolve `config` into a full state object.
    async fn read(&self, config: Value) -> Result<Value, Diagnostics>;
}

/// All data sources the provider exposes.
#[must_use]
pub fn factories() -> Vec<DataSourceFactory> {
    vec![
        boxed::<SiteDataSource> as DataSourceFactory,
        boxed::<CurrentUserDataSource> as DataSourceFactory,
    ]
}

fn boxed<D: DataSource + Default + 'static>() -> Box<dyn DataSource> {
    Box::new(D::default())
}
