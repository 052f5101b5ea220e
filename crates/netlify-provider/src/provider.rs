//! Provider entry point: configuration, client construction and registration.

use crate::data_sources::{self, DataSource};
use crate::diagnostics::Diagnostics;
use crate::resources::{self, Resource};
use crate::schema::{Attribute, AttributeType, Schema};
use netlify_api::{NetlifyApi, NetlifyClient};
use netlify_core::config::{BASE_URL_ENV_VAR, DEFAULT_BASE_URL, TOKEN_ENV_VAR};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Type name prefix of every resource and data source.
pub const PROVIDER_TYPE_NAME: &str = "netlify";

/// Placeholder a host passes for configuration values not known until apply.
pub const UNKNOWN_VALUE: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// Name and version reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Provider type name.
    pub type_name: &'static str,
    /// Release version, `dev` for local builds.
    pub version: String,
}

/// The Netlify provider.
pub struct NetlifyProvider {
    version: String,
    base_url: Option<String>,
    client: Option<Arc<dyn NetlifyApi>>,
}

impl fmt::Debug for NetlifyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetlifyProvider")
            .field("version", &self.version)
            .field("base_url", &self.base_url)
            .field("configured", &self.client.is_some())
            .finish()
    }
}

impl NetlifyProvider {
    /// New, unconfigured provider.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            base_url: None,
            client: None,
        }
    }

    /// Point the client at another API endpoint, overriding `NETLIFY_API_URL`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use an already built client instead of configuring one.
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn NetlifyApi>) -> Self {
        self.client = Some(client);
        self
    }

    /// Type name and version.
    #[must_use]
    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME,
            version: self.version.clone(),
        }
    }

    /// Provider configuration schema.
    #[must_use]
    pub fn schema(&self) -> Schema {
        Schema::new("Interact with Netlify.").attribute(
            "personal_token",
            Attribute::optional(AttributeType::String)
                .sensitive()
                .with_description(format!(
                    "Netlify personal token for the Netlify API. May also be provided via the {TOKEN_ENV_VAR} environment variable."
                )),
        )
    }

    /// Configure from `config`, falling back to the process environment.
    pub fn configure(&mut self, config: &Value) -> Diagnostics {
        self.configure_with_lookup(config, |key| std::env::var(key).ok())
    }

    /// Same as [`Self::configure`] with a custom environment source.
    ///
    /// The configured `personal_token` wins over `NETLIFY_PERSONAL_TOKEN`.
    pub fn configure_with_lookup<F>(&mut self, config: &Value, lookup: F) -> Diagnostics
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut diags = Diagnostics::new();
        let configured = config.get("personal_token").and_then(Value::as_str);

        if configured == Some(UNKNOWN_VALUE) {
            diags.add_attribute_error(
                "personal_token",
                "Unknown Netlify API Personal token",
                format!(
                    "The provider cannot create the Netlify API client as there is an unknown configuration value for the personal_token. \
                     Either target apply the source of the value first, set the value statically in the configuration, or use the {TOKEN_ENV_VAR} environment variable."
                ),
            );
            return diags;
        }

        let token = configured
            .map(ToString::to_string)
            .filter(|t| !t.is_empty())
            .or_else(|| lookup(TOKEN_ENV_VAR))
            .unwrap_or_default();

        if token.is_empty() {
            diags.add_attribute_error(
                "personal_token",
                "Missing Netlify API Personal token",
                format!(
                    "The provider cannot create the Netlify API client as there is a missing or empty value for the personal_token. \
                     Set the personal_token value in the configuration or use the {TOKEN_ENV_VAR} environment variable. \
                     If either is already set, ensure the value is not empty."
                ),
            );
            return diags;
        }

        let base_url = self
            .base_url
            .clone()
            .or_else(|| lookup(BASE_URL_ENV_VAR))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        debug!(base_url = %base_url, "creating Netlify API client");
        if base_url != DEFAULT_BASE_URL {
            diags.add_warning(
                "Custom Netlify API Endpoint",
                format!("Requests are sent to {base_url} instead of {DEFAULT_BASE_URL}."),
            );
        }

        match NetlifyClient::new(base_url, token) {
            Ok(client) => {
                info!(version = %self.version, "configured Netlify provider");
                self.client = Some(Arc::new(client));
            }
            Err(e) => diags.add_error(
                "Unable to Create Netlify API Client",
                format!(
                    "An unexpected error occurred when creating the Netlify API client. \
                     If the error is not clear, please contact the provider developers.\n\nError: {e}"
                ),
            ),
        }
        diags
    }

    /// The configured client, if any.
    #[must_use]
    pub fn client(&self) -> Option<Arc<dyn NetlifyApi>> {
        self.client.clone()
    }

    /// Every resource, configured with the current client.
    #[must_use]
    pub fn resources(&self) -> Vec<Box<dyn Resource>> {
        resources::factories()
            .into_iter()
            .map(|factory| {
                let mut resource = factory();
                resource.configure(self.client());
                resource
            })
            .collect()
    }

    /// Every data source, configured with the current client.
    #[must_use]
    pub fn data_sources(&self) -> Vec<Box<dyn DataSource>> {
        data_sources::factories()
            .into_iter()
            .map(|factory| {
                let mut data_source = factory();
                data_source.configure(self.client());
                data_source
            })
            .collect()
    }

    /// Resource by full type name, e.g. `netlify_site`.
    #[must_use]
    pub fn resource(&self, type_name: &str) -> Option<Box<dyn Resource>> {
        self.resources()
            .into_iter()
            .find(|r| r.type_name(PROVIDER_TYPE_NAME) == type_name)
    }

    /// Data source by full type name, e.g. `netlify_current_user`.
    #[must_use]
    pub fn data_source(&self, type_name: &str) -> Option<Box<dyn DataSource>> {
        self.data_sources()
            .into_iter()
            .find(|d| d.type_name(PROVIDER_TYPE_NAME) == type_name)
    }
}

impl Default for NetlifyProvider {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}
