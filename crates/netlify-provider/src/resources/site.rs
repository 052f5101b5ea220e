use super::{
    api_error, check_plan, client, decode, encode, last_updated, non_empty, Resource,
};
use crate::diagnostics::Diagnostics;
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use netlify_api::{NetlifyApi, Repository, Site, SiteRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// `netlify_site`: a site linked to a source repository.
#[derive(Default)]
pub struct SiteResource {
    client: Option<Arc<dyn NetlifyApi>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
struct SiteModel {
    #[serde(default)]
    id: Option<String>,
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
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    repository: Option<RepositoryModel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
struct RepositoryModel {
    provider: String,
    deploy_key_id: String,
    repo_path: String,
    repo_branch: String,
    cmd: String,
    dir: String,
}

impl RepositoryModel {
    fn to_repository(&self) -> Repository {
        Repository {
            provider: self.provider.clone(),
            path: self.repo_path.clone(),
            branch: self.repo_branch.clone(),
            deploy_key_id: self.deploy_key_id.clone(),
            cmd: self.cmd.clone(),
            dir: self.dir.clone(),
            ..Repository::default()
        }
    }
}

impl SiteModel {
    fn to_request(&self) -> SiteRequest {
        SiteRequest {
            name: self.name.clone().unwrap_or_default(),
            custom_domain: self.custom_domain.clone().unwrap_or_default(),
            repo: self
                .repository
                .as_ref()
                .map(RepositoryModel::to_repository)
                .unwrap_or_default(),
        }
    }

    fn apply(&mut self, site: Site) {
        self.id = Some(site.id);
        self.name = Some(site.name);
        self.custom_domain = non_empty(site.custom_domain);
        self.url = Some(site.url);
        self.state = Some(site.state);
        self.created_at = Some(site.created_at);
        self.updated_at = Some(site.updated_at);
    }

    fn require_id(&self) -> Result<&str, Diagnostics> {
        self.id.as_deref().filter(|id| !id.is_empty()).ok_or_else(|| {
            let mut diags = Diagnostics::new();
            diags.add_attribute_error("id", "Missing Site ID", "The site state has no id.");
            diags
        })
    }
}

#[async_trait]
impl Resource for SiteResource {
    fn type_suffix(&self) -> &'static str {
        "_site"
    }

    fn schema(&self) -> Schema {
        let required_string = || Attribute::required(AttributeType::String);
        Schema::new("Netlify site linked to a source repository.")
            .attribute("id", Attribute::computed(AttributeType::String))
            .attribute(
                "name",
                Attribute::optional_computed(AttributeType::String)
                    .with_description("Site name; Netlify generates one when unset."),
            )
            .attribute("custom_domain", Attribute::optional(AttributeType::String))
            .attribute("url", Attribute::computed(AttributeType::String))
            .attribute("state", Attribute::computed(AttributeType::String))
            .attribute("created_at", Attribute::computed(AttributeType::String))
            .attribute("updated_at", Attribute::computed(AttributeType::String))
            .attribute("last_updated", Attribute::computed(AttributeType::String))
            .attribute(
                "repository",
                Attribute::required(AttributeType::object([
                    ("provider", required_string()),
                    ("deploy_key_id", required_string()),
                    ("repo_path", required_string()),
                    ("repo_branch", required_string()),
                    ("cmd", required_string()),
                    ("dir", required_string()),
                ])),
            )
    }

    fn configure(&mut self, client: Option<Arc<dyn NetlifyApi>>) {
        self.client = client;
    }

    async fn create(&self, plan: Value) -> Result<Value, Diagnostics> {
        let api = client(self.client.as_ref())?;
        check_plan(&self.schema(), &plan)?;
        let mut model: SiteModel = decode(plan)?;

        let site = api
            .create_site(&model.to_request())
            .await
            .map_err(|e| api_error("Unable to Create Netlify Site", &e))?;
        info!(site_id = %site.id, "created Netlify site");

        model.apply(site);
        model.last_updated = Some(last_updated());
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics> {
        let api = client(self.client.as_ref())?;
        let mut model: SiteModel = decode(state)?;
        let id = model.require_id()?.to_string();

        match api.get_site(&id).await {
            Ok(site) => {
                model.apply(site);
                encode(&model).map(Some)
            }
            Err(e) if e.is_not_found() => {
                debug!(site_id = %id, "site no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(api_error("Unable to Read Netlify Site", &e)),
        }
    }

    async fn update(&self, prior: Value, plan: Value) -> Result<Value, Diagnostics> {
        let api = client(self.client.as_ref())?;
        check_plan(&self.schema(), &plan)?;
        let prior: SiteModel = decode(prior)?;
        let id = prior.require_id()?;
        let mut model: SiteModel = decode(plan)?;

        let site = api
            .update_site(id, &model.to_request())
            .await
            .map_err(|e| api_error("Unable to Update Netlify Site", &e))?;
        info!(site_id = %site.id, "updated Netlify site");

        model.apply(site);
        model.last_updated = Some(last_updated());
        encode(&model)
    }

    async fn delete(&self, state: Value) -> Result<(), Diagnostics> {
        let api = client(self.client.as_ref())?;
        let model: SiteModel = decode(state)?;
        let id = model.require_id()?;

        api.delete_site(id)
            .await
            .map_err(|e| api_error("Unable to Delete Netlify Site", &e))?;
        info!(site_id = %id, "deleted Netlify site");
        Ok(())
    }
}
