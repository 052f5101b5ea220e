//! Netlify API models shared by the client and the provider layer.
//!
//! String fields that Netlify reports as `null` (or omits) decode as empty strings.

use serde::{Deserialize, Deserializer, Serialize};

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A deployable web project as returned by `GET sites/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Site {
    /// Site identifier.
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    /// Custom domain, empty when none is attached.
    #[serde(default, deserialize_with = "nullable")]
    pub custom_domain: String,
    /// Site name (subdomain on netlify.app).
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// Canonical URL.
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "nullable")]
    pub updated_at: String,
    /// Lifecycle state (free-form, e.g. `current`).
    #[serde(default, deserialize_with = "nullable")]
    pub state: String,
}

/// Repository settings embedded in site creation and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    /// Version control provider (`github`, `gitlab`, ...).
    #[serde(default, deserialize_with = "nullable")]
    pub provider: String,
    /// Repository path, e.g. `owner/project`.
    #[serde(rename = "repo", default, deserialize_with = "nullable")]
    pub path: String,
    /// Branch to build.
    #[serde(default, deserialize_with = "nullable")]
    pub branch: String,
    /// Deploy key used to clone the repository.
    #[serde(default, deserialize_with = "nullable")]
    pub deploy_key_id: String,
    /// Build command.
    #[serde(default, deserialize_with = "nullable")]
    pub cmd: String,
    /// Publish directory.
    #[serde(default, deserialize_with = "nullable")]
    pub dir: String,
    /// Repository URL.
    #[serde(rename = "repo_url", default, deserialize_with = "nullable")]
    pub url: String,
}

/// Body of site create (`POST sites/`) and update (`PATCH sites/{id}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteRequest {
    /// Site name; omitted when empty so Netlify picks one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Custom domain; always sent so an empty string detaches the current one.
    #[serde(default)]
    pub custom_domain: String,
    /// Repository settings.
    #[serde(default)]
    pub repo: Repository,
}

/// SSH public key registered for repository access.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployKey {
    /// Key identifier.
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    /// Public key material.
    #[serde(default, deserialize_with = "nullable")]
    pub public_key: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
}

/// Environment variable attached to a site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvVar {
    /// Variable name.
    pub key: String,
    /// Deploy scopes (`builds`, `functions`, `runtime`, `post-processing`).
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    /// Values, one per deploy context.
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<EnvVarValue>,
    /// Whether the value is hidden from the UI and API reads.
    #[serde(default, deserialize_with = "nullable")]
    pub is_secret: bool,
}

impl EnvVar {
    /// Add scopes not already present, keeping existing order.
    pub fn merge_scopes<I, S>(&mut self, scopes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for scope in scopes {
            let scope = scope.into();
            if !self.scopes.contains(&scope) {
                self.scopes.push(scope);
            }
        }
    }
}

/// A single environment variable value bound to a deploy context.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvVarValue {
    /// Value identifier assigned by Netlify.
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// The value itself.
    #[serde(default, deserialize_with = "nullable")]
    pub value: String,
    /// Deploy context (`all`, `production`, `deploy-preview`, ...).
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub context: String,
    /// Branch name when the context is `branch`.
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub context_parameter: String,
}

impl EnvVarValue {
    /// Value applied in the given context.
    #[must_use]
    pub fn new(value: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            context: context.into(),
            ..Self::default()
        }
    }
}

/// Profile of the token owner (`GET user/`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    /// User identifier.
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    /// Secondary identifier.
    #[serde(default, deserialize_with = "nullable")]
    pub uid: String,
    /// Account slug.
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    /// Display name.
    #[serde(default, deserialize_with = "nullable")]
    pub full_name: String,
    /// Avatar image URL.
    #[serde(default, deserialize_with = "nullable")]
    pub avatar_url: String,
    /// E-mail address.
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    /// Affiliate identifier.
    #[serde(default, deserialize_with = "nullable")]
    pub affiliate_id: String,
    /// Number of sites owned.
    #[serde(default, deserialize_with = "nullable")]
    pub site_count: i64,
    /// Account creation timestamp.
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    /// Last login timestamp.
    #[serde(default, deserialize_with = "nullable")]
    pub last_login: String,
}
