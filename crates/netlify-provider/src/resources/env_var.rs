use super::{api_error, check_plan, client, decode, encode, last_updated, Resource};
use crate::diagnostics::Diagnostics;
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use netlify_api::{EnvVar, EnvVarValue, NetlifyApi};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Value sent when a variable is created without any configured values.
pub const PLACEHOLDER_VALUE: &str = "Terraform Placeholder";

const DEFAULT_CONTEXT: &str = "all";

/// `netlify_env_var`: an account-level environment variable scoped to one site.
#[derive(Default)]
pub struct EnvVarResource {
    client: Option<Arc<dyn NetlifyApi>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
struct EnvVarModel {
    account_slug: String,
    site_id: String,
    key: String,
    #[serde(default)]
    scopes: Option<Vec<String>>,
    #[serde(default)]
    values: Option<Vec<EnvVarValueModel>>,
    #[serde(default)]
    is_secret: Option<bool>,
    #[serde(default)]
    last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
struct EnvVarValueModel {
    value: String,
    #[serde(default)]
    context: Option<String>,
}

impl EnvVarValueModel {
    fn to_value(&self) -> EnvVarValue {
        EnvVarValue::new(
            self.value.clone(),
            self.context.clone().unwrap_or_else(|| DEFAULT_CONTEXT.to_string()),
        )
    }
}

impl EnvVarModel {
    fn configured_values(&self) -> Option<Vec<EnvVarValue>> {
        self.values
            .as_ref()
            .filter(|values| !values.is_empty())
            .map(|values| values.iter().map(EnvVarValueModel::to_value).collect())
    }

    fn to_create_request(&self) -> EnvVar {
        let values = self.configured_values().unwrap_or_else(|| {
            vec![EnvVarValue {
                value: PLACEHOLDER_VALUE.to_string(),
                ..EnvVarValue::default()
            }]
        });
        EnvVar {
            key: self.key.clone(),
            scopes: self.scopes.clone().unwrap_or_default(),
            values,
            is_secret: self.is_secret.unwrap_or(false),
        }
    }

    fn apply(&mut self, remote: EnvVar) {
        self.scopes = Some(remote.scopes);
        self.is_secret = Some(remote.is_secret);
    }
}

fn parse_import_id(id: &str) -> Option<(&str, &str, &str)> {
    let mut parts = id.splitn(3, '/');
    let slug = parts.next().filter(|s| !s.is_empty())?;
    let site_id = parts.next().filter(|s| !s.is_empty())?;
    let key = parts.next().filter(|s| !s.is_empty() && !s.contains('/'))?;
    Some((slug, site_id, key))
}

#[async_trait]
impl Resource for EnvVarResource {
    fn type_suffix(&self) -> &'static str {
        "_env_var"
    }

    fn schema(&self) -> Schema {
        Schema::new("Environment variable shared through a Netlify account and scoped to a site.")
            .attribute("account_slug", Attribute::required(AttributeType::String))
            .attribute("site_id", Attribute::required(AttributeType::String))
            .attribute("key", Attribute::required(AttributeType::String))
            .attribute(
                "scopes",
                Attribute::optional_computed(AttributeType::string_list())
                    .with_description("Deploy scopes: builds, functions, runtime, post-processing."),
            )
            .attribute(
                "values",
                Attribute::optional(AttributeType::List(Box::new(AttributeType::object([
                    ("value", Attribute::required(AttributeType::String).sensitive()),
                    ("context", Attribute::optional(AttributeType::String)),
                ])))),
            )
            .attribute("is_secret", Attribute::optional_computed(AttributeType::Bool))
            .attribute("last_updated", Attribute::computed(AttributeType::String))
    }

    fn configure(&mut self, client: Option<Arc<dyn NetlifyApi>>) {
        self.client = client;
    }

    async fn create(&self, plan: Value) -> Result<Value, Diagnostics> {
        let api = client(self.client.as_ref())?;
        check_plan(&self.schema(), &plan)?;
        let mut model: EnvVarModel = decode(plan)?;

        let created = api
            .create_env_var(&model.account_slug, &model.site_id, &model.to_create_request())
            .await
            .map_err(|e| api_error("Unable to Create Netlify Env Variable", &e))?;
        info!(key = %model.key, site_id = %model.site_id, "created Netlify env variable");

        model.apply(created);
        model.last_updated = Some(last_updated());
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics> {
        let api = client(self.client.as_ref())?;
        let mut model: EnvVarModel = decode(state)?;

        let result = api
            .get_env_var(&model.account_slug, &model.site_id, &model.key)
            .await;
        match result {
            Ok(remote) => {
                model.apply(remote);
                encode(&model).map(Some)
            }
            Err(e) if e.is_not_found() => {
                debug!(key = %model.key, "env variable no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(api_error("Unable to Read Netlify Env Variable", &e)),
        }
    }

    async fn update(&self, prior: Value, plan: Value) -> Result<Value, Diagnostics> {
        let api = client(self.client.as_ref())?;
        check_plan(&self.schema(), &plan)?;
        let prior: EnvVarModel = decode(prior)?;
        let mut model: EnvVarModel = decode(plan)?;

        let mut remote = api
            .get_env_var(&prior.account_slug, &prior.site_id, &prior.key)
            .await
            .map_err(|e| api_error("Unable to Update Netlify Env Variable", &e))?;

        remote.merge_scopes(model.scopes.iter().flatten().cloned());
        remote.key.clone_from(&model.key);
        remote.is_secret = model.is_secret.unwrap_or(false);
        if let Some(values) = model.configured_values() {
            remote.values = values;
        }

        let updated = api
            .update_env_var(&prior.account_slug, &prior.site_id, &prior.key, &remote)
            .await
            .map_err(|e| api_error("Unable to Update Netlify Env Variable", &e))?;
        info!(key = %model.key, site_id = %prior.site_id, "updated Netlify env variable");

        model.apply(updated);
        model.last_updated = Some(last_updated());
        encode(&model)
    }

    async fn delete(&self, state: Value) -> Result<(), Diagnostics> {
        let api = client(self.client.as_ref())?;
        let model: EnvVarModel = decode(state)?;

        api.delete_env_var(&model.account_slug, &model.site_id, &model.key)
            .await
            .map_err(|e| api_error("Unable to Delete Netlify Env Variable", &e))?;
        info!(key = %model.key, site_id = %model.site_id, "deleted Netlify env variable");
        Ok(())
    }

    fn import_state(&self, id: &str) -> Result<Value, Diagnostics> {
        let (account_slug, site_id, key) = parse_import_id(id).ok_or_else(|| {
            Diagnostics::error(
                "Invalid Import ID",
                format!("Expected \"account_slug/site_id/key\", got \"{id}\"."),
            )
        })?;
        Ok(json!({
            "account_slug": account_slug,
            "site_id": site_id,
            "key": key,
        }))
    }
}
