use crate::diagnostics::Diagnostics;
use crate::resources::{api_error, check_plan, client, decode, encode, non_empty};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::DataSource;
use async_trait::async_trait;
use netlify_api::NetlifyApi;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// `netlify_site` data source: look up an existing site by id.
#[derive(Default)]
pub struct SiteDataSource {
    client: Option<Arc<dyn NetlifyApi>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SiteDataModel {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    custom_domain: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[async_trait]
impl DataSource for SiteDataSource {
    fn type_suffix(&self) -> &'static str {
        "_site"
    }

    fn schema(&self) -> Schema {
        let computed = || Attribute::computed(AttributeType::String);
        Schema::new("Existing Netlify site.")
            .attribute("id", Attribute::required(AttributeType::String))
            .attribute("name", computed())
            .attribute("custom_domain", computed())
            .attribute("url", computed())
            .attribute("state", computed())
            .attribute("created_at", computed())
            .attribute("updated_at", computed())
    }

    fn configure(&mut self, client: Option<Arc<dyn NetlifyApi>>) {
        self.client = client;
    }

    async fn read(&self, config: Value) -> Result<Value, Diagnostics> {
        let api = client(self.client.as_ref())?;
        check_plan(&self.schema(), &config)?;
        let model: SiteDataModel = decode(config)?;
        if model.id.trim().is_empty() {
            let mut diags = Diagnostics::new();
            diags.add_attribute_error("id", "Missing Site ID", "The site id must not be empty.");
            return Err(diags);
        }
        debug!(site_id = %model.id, "reading Netlify site data source");

        let site = api
            .get_site(&model.id)
            .await
            .map_err(|e| api_error("Unable to Read Netlify Site", &e))?;

        encode(&SiteDataModel {
            id: site.id,
            name: Some(site.name),
            custom_domain: non_empty(site.custom_domain),
            url: Some(site.url),
            state: Some(site.state),
            created_at: Some(site.created_at),
            updated_at: Some(site.updated_at),
        })
    }
}
