//! Managed resources.
//!
//! Every handler takes and returns a JSON object keyed by attribute name.

mod deploy_key;
mod env_var;
mod site;

pub use deploy_key::DeployKeyResource;
pub use env_var::EnvVarResource;
pub use site::SiteResource;

use crate::diagnostics::Diagnostics;
use crate::schema::Schema;
use async_trait::async_trait;
use chrono::Utc;
use netlify_api::NetlifyApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Constructor registered with the provider.
pub type ResourceFactory = fn() -> Box<dyn Resource>;

/// Go-style RFC 850 layout used for `last_updated`.
pub(crate) const RFC850: &str = "%A, %d-%b-%y %H:%M:%S UTC";

/// Lifecycle handlers of a managed resource.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Suffix appended to the provider type name, e.g. `_site`.
    fn type_suffix(&self) -> &'static str;

    /// Full type name such as `netlify_site`.
    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}{}", self.type_suffix())
    }

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Receive the client built by the provider. `None` leaves the resource unconfigured.
    fn configure(&mut self, client: Option<Arc<dyn NetlifyApi>>);

    /// Create the remote object from `plan` and return the new state.
    async fn create(&self, plan: Value) -> Result<Value, Diagnostics>;

    /// Refresh `state`. `Ok(None)` means the object is gone and must be removed from state.
    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics>;

    /// Apply `plan` on top of `prior` state and return the new state.
    async fn update(&self, prior: Value, plan: Value) -> Result<Value, Diagnostics>;

    /// Delete the remote object described by `state`.
    async fn delete(&self, state: Value) -> Result<(), Diagnostics>;

    /// Turn an import identifier into a partial state for a subsequent read.
    fn import_state(&self, id: &str) -> Result<Value, Diagnostics> {
        Ok(serde_json::json!({ "id": id }))
    }
}

/// All resources the provider exposes.
#[must_use]
pub fn factories() -> Vec<ResourceFactory> {
    vec![
        boxed::<SiteResource> as ResourceFactory,
        boxed::<DeployKeyResource> as ResourceFactory,
        boxed::<EnvVarResource> as ResourceFactory,
    ]
}

fn boxed<R: Resource + Default + 'static>() -> Box<dyn Resource> {
    Box::new(R::default())
}

pub(crate) fn client(client: Option<&Arc<dyn NetlifyApi>>) -> Result<&dyn NetlifyApi, Diagnostics> {
    client.map(|c| &**c).ok_or_else(|| {
        Diagnostics::error(
            "Unconfigured Netlify Client",
            "Expected configured Netlify client. Please report this issue to the provider developers.",
        )
    })
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Diagnostics> {
    serde_json::from_value(value)
        .map_err(|e| Diagnostics::error("Invalid Resource Data", e.to_string()))
}

pub(crate) fn encode<T: Serialize>(model: &T) -> Result<Value, Diagnostics> {
    serde_json::to_value(model)
        .map_err(|e| Diagnostics::error("Unable to Encode Resource State", e.to_string()))
}

/// Attribute errors for required attributes that are missing and values of the wrong type.
pub(crate) fn check_plan(schema: &Schema, plan: &Value) -> Result<(), Diagnostics> {
    let mut diags = Diagnostics::new();
    for path in schema.missing_required(plan) {
        diags.add_attribute_error(
            path.clone(),
            "Missing Required Attribute",
            format!("The attribute \"{path}\" is required."),
        );
    }
    diags.append(type_errors(schema, plan));
    if diags.has_error() {
        Err(diags)
    } else {
        Ok(())
    }
}

fn type_errors(schema: &Schema, plan: &Value) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for name in schema.type_mismatches(plan) {
        let expected = schema
            .get(&name)
            .map(|attr| format!("{:?}", attr.attr_type))
            .unwrap_or_default();
        diags.add_attribute_error(
            name.clone(),
            "Invalid Attribute Type",
            format!("The attribute \"{name}\" does not match its declared type {expected}."),
        );
    }
    diags
}

pub(crate) fn api_error(summary: &str, err: &netlify_core::Error) -> Diagnostics {
    Diagnostics::error(summary, err.to_string())
}

pub(crate) fn last_updated() -> String {
    Utc::now().format(RFC850).to_string()
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn last_updated_is_rfc850() {
        let stamp = last_updated();
        assert!(stamp.ends_with(" UTC"));
        let trimmed = stamp.trim_end_matches(" UTC");
        assert!(NaiveDateTime::parse_from_str(trimmed, "%A, %d-%b-%y %H:%M:%S").is_ok());
    }

    #[test]
    fn unconfigured_client_diagnostic() {
        let Err(diags) = client(None) else {
            panic!("expected diagnostics");
        };
        assert_eq!(diags.summaries(), vec!["Unconfigured Netlify Client"]);
    }

    #[test]
    fn check_plan_reports_missing_and_mistyped_attributes() {
        let schema = SiteResource::default().schema();
        let diags = check_plan(
            &schema,
            &serde_json::json!({"name": 42, "custom_domain": ["x"]}),
        )
        .unwrap_err();
        let attributes: Vec<_> = diags.iter().filter_map(|d| d.attribute.as_deref()).collect();
        assert_eq!(attributes, vec!["repository", "custom_domain", "name"]);
        assert_eq!(
            diags.summaries(),
            vec![
                "Missing Required Attribute",
                "Invalid Attribute Type",
                "Invalid Attribute Type"
            ]
        );
    }

    #[test]
    fn factories_have_distinct_names() {
        let names: Vec<String> = factories().iter().map(|f| f().type_name("netlify")).collect();
        assert_eq!(names, vec!["netlify_site", "netlify_deploy_key", "netlify_env_var"]);
    }

    #[test]
    fn schemas_are_consistent() {
        for factory in factories() {
            assert!(factory().schema().is_valid());
        }
    }
}
