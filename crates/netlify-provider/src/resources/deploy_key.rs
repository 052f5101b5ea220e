use super::{api_error, client, decode, encode, last_updated, Resource};
use crate::diagnostics::Diagnostics;
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use netlify_api::{DeployKey, NetlifyApi};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// `netlify_deploy_key`: an SSH key Netlify uses to clone private repositories.
///
/// Keys are immutable, so updates only refresh the stored attributes.
#[derive(Default)]
pub struct DeployKeyResource {
    client: Option<Arc<dyn NetlifyApi>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
struct DeployKeyModel {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
}

impl DeployKeyModel {
    fn apply(&mut self, key: DeployKey) {
        self.id = Some(key.id);
        self.key = Some(key.public_key);
        self.created_at = Some(key.created_at);
    }

    fn require_id(&self) -> Result<String, Diagnostics> {
        self.id.clone().filter(|id| !id.is_empty()).ok_or_else(|| {
            let mut diags = Diagnostics::new();
            diags.add_attribute_error("id", "Missing Deploy Key ID", "The deploy key state has no id.");
            diags
        })
    }
}

#[async_trait]
impl Resource for DeployKeyResource {
    fn type_suffix(&self) -> &'static str {
        "_deploy_key"
    }

    fn schema(&self) -> Schema {
        Schema::new("SSH deploy key for repository access.")
            .attribute("id", Attribute::computed(AttributeType::String))
            .attribute(
                "key",
                Attribute::computed(AttributeType::String).with_description("Public key material."),
            )
            .attribute("created_at", Attribute::computed(AttributeType::String))
            .attribute("last_updated", Attribute::computed(AttributeType::String))
    }

    fn configure(&mut self, client: Option<Arc<dyn NetlifyApi>>) {
        self.client = client;
    }

    async fn create(&self, _plan: Value) -> Result<Value, Diagnostics> {
        let api = client(self.client.as_ref())?;
        let key = api
            .create_deploy_key()
            .await
            .map_err(|e| api_error("Unable to Create Netlify Deploy Key", &e))?;
        info!(key_id = %key.id, "created Netlify deploy key");

        let mut model = DeployKeyModel::default();
        model.apply(key);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics> {
        let api = client(self.client.as_ref())?;
        let mut model: DeployKeyModel = decode(state)?;
        let id = model.require_id()?;

        match api.get_deploy_key(&id).await {
            Ok(key) => {
                model.apply(key);
                encode(&model).map(Some)
            }
            Err(e) if e.is_not_found() => {
                debug!(key_id = %id, "deploy key no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(api_error("Unable to Read Netlify Deploy Key", &e)),
        }
    }

    async fn update(&self, prior: Value, _plan: Value) -> Result<Value, Diagnostics> {
        let api = client(self.client.as_ref())?;
        let mut model: DeployKeyModel = decode(prior)?;
        let id = model.require_id()?;

        let key = api
            .get_deploy_key(&id)
            .await
            .map_err(|e| api_error("Unable to Read Netlify Deploy Key", &e))?;
        model.apply(key);
        model.last_updated = Some(last_updated());
        encode(&model)
    }

    async fn delete(&self, state: Value) -> Result<(), Diagnostics> {
        let api = client(self.client.as_ref())?;
        let model: DeployKeyModel = decode(state)?;
        let id = model.require_id()?;

        api.delete_deploy_key(&id)
            .await
            .map_err(|e| api_error("Unable to Delete Netlify Deploy Key", &e))?;
        info!(key_id = %id, "deleted Netlify deploy key");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netlify_api::MockNetlifyApi;
    use netlify_core::Error;
    use serde_json::json;

    fn remote_key() -> DeployKey {
        DeployKey {
            id: "key-1".to_string(),
            public_key: "ssh-rsa AAAA".to_string(),
            created_at: "2024-03-01T10:00:00Z".to_string(),
        }
    }

    fn resource(mock: MockNetlifyApi) -> DeployKeyResource {
        let mut resource = DeployKeyResource::default();
        resource.configure(Some(Arc::new(mock)));
        resource
    }

    #[tokio::test]
    async fn create_stores_public_key() {
        let mut mock = MockNetlifyApi::new();
        mock.expect_create_deploy_key()
            .times(1)
            .returning(|| Ok(remote_key()));

        let state = resource(mock).create(json!({})).await.unwrap();
        assert_eq!(
            state,
            json!({
                "id": "key-1",
                "key": "ssh-rsa AAAA",
                "created_at": "2024-03-01T10:00:00Z",
                "last_updated": null
            })
        );
    }

    #[tokio::test]
    async fn update_rereads_key() {
        let mut mock = MockNetlifyApi::new();
        mock.expect_get_deploy_key()
            .withf(|id| id == "key-1")
            .times(1)
            .returning(|_| Ok(remote_key()));

        let state = resource(mock)
            .update(json!({"id": "key-1", "key": "stale"}), json!({}))
            .await
            .unwrap();
        assert_eq!(state["key"], "ssh-rsa AAAA");
        assert!(state["last_updated"].is_string());
    }

    #[tokio::test]
    async fn read_removes_missing_key() {
        let mut mock = MockNetlifyApi::new();
        mock.expect_get_deploy_key()
            .returning(|_| Err(Error::NotFound("invalid status code received 404 : ".into())));

        assert!(resource(mock)
            .read(json!({"id": "key-1"}))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn read_reports_server_errors() {
        let mut mock = MockNetlifyApi::new();
        mock.expect_get_deploy_key().returning(|_| {
            Err(Error::UnexpectedStatus {
                status: 500,
                body: "oops".to_string(),
            })
        });

        let diags = resource(mock)
            .read(json!({"id": "key-1"}))
            .await
            .unwrap_err();
        assert_eq!(diags.summaries(), vec!["Unable to Read Netlify Deploy Key"]);
    }

    #[tokio::test]
    async fn delete_calls_api() {
        let mut mock = MockNetlifyApi::new();
        mock.expect_delete_deploy_key()
            .withf(|id| id == "key-1")
            .times(1)
            .returning(|_| Ok(()));

        resource(mock).delete(json!({"id": "key-1"})).await.unwrap();
    }
}
