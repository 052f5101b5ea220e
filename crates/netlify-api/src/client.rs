//! Asynchronous Netlify API client implementation.

use crate::models::{CurrentUser, DeployKey, EnvVar, Site, SiteRequest};
use crate::Result;
use async_trait::async_trait;
use netlify_core::client::{ClientConfig, Request, ServiceClient, ServiceClientBuilder};
use netlify_core::config::{NetlifyClientConfig, DEFAULT_BASE_URL};
use netlify_core::query::QueryParams;
use netlify_core::Error;
use reqwest::Method;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("netlify-api/", env!("CARGO_PKG_VERSION"));

/// Operations the provider layer needs from Netlify.
///
/// [`NetlifyClient`] is the HTTP implementation; tests substitute a mock.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait NetlifyApi: Send + Sync {
    /// List sites visible to the token (first page only).
    async fn list_sites(&self) -> Result<Vec<Site>>;

    /// Create a site.
    async fn create_site(&self, request: &SiteRequest) -> Result<Site>;

    /// Fetch a site by id.
    async fn get_site(&self, site_id: &str) -> Result<Site>;

    /// Update a site.
    async fn update_site(&self, site_id: &str, request: &SiteRequest) -> Result<Site>;

    /// Delete a site.
    async fn delete_site(&self, site_id: &str) -> Result<()>;

    /// Create a deploy key.
    async fn create_deploy_key(&self) -> Result<DeployKey>;

    /// Fetch a deploy key by id.
    async fn get_deploy_key(&self, key_id: &str) -> Result<DeployKey>;

    /// Delete a deploy key.
    async fn delete_deploy_key(&self, key_id: &str) -> Result<()>;

    /// Create an environment variable on a site.
    async fn create_env_var(
        &self,
        account_slug: &str,
        site_id: &str,
        env_var: &EnvVar,
    ) -> Result<EnvVar>;

    /// Fetch an environment variable.
    async fn get_env_var(&self, account_slug: &str, site_id: &str, key: &str) -> Result<EnvVar>;

    /// Replace an environment variable.
    async fn update_env_var(
        &self,
        account_slug: &str,
        site_id: &str,
        key: &str,
        env_var: &EnvVar,
    ) -> Result<EnvVar>;

    /// Delete an environment variable.
    async fn delete_env_var(&self, account_slug: &str, site_id: &str, key: &str) -> Result<()>;

    /// Fetch the profile of the token owner.
    async fn get_current_user(&self) -> Result<CurrentUser>;
}

/// Builder for [`NetlifyClient`].
#[derive(Debug)]
pub struct NetlifyClientBuilder {
    inner: ServiceClientBuilder,
}

impl NetlifyClientBuilder {
    /// Create a builder for the given base URL and personal token.
    pub fn new(base_url: impl Into<String>, personal_token: impl Into<String>) -> Result<Self> {
        let config = NetlifyClientConfig::new(base_url, personal_token)?;
        Ok(Self::from_config(config))
    }

    /// Create a builder from an existing configuration.
    #[must_use]
    pub fn from_config(config: NetlifyClientConfig) -> Self {
        let config = if config.user_agent.is_some() {
            config
        } else {
            config.with_user_agent(USER_AGENT)
        };
        Self {
            inner: ServiceClientBuilder::new(config),
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<NetlifyClient> {
        let inner = self.inner.build()?;
        Ok(NetlifyClient { inner })
    }
}

/// Asynchronous Netlify API client.
#[derive(Debug, Clone)]
pub struct NetlifyClient {
    inner: ServiceClient,
}

impl NetlifyClient {
    /// Construct a client directly from the base URL and token.
    pub fn new(base_url: impl Into<String>, personal_token: impl Into<String>) -> Result<Self> {
        NetlifyClientBuilder::new(base_url, personal_token)?.build()
    }

    /// Client for the public Netlify endpoint.
    pub fn with_token(personal_token: impl Into<String>) -> Result<Self> {
        Self::new(DEFAULT_BASE_URL, personal_token)
    }

    /// Client configured from `NETLIFY_PERSONAL_TOKEN` / `NETLIFY_API_URL`.
    pub fn from_env() -> Result<Self> {
        NetlifyClientBuilder::from_config(NetlifyClientConfig::from_env()?).build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List sites visible to the token (first page only).
    pub async fn list_sites(&self) -> Result<Vec<Site>> {
        self.inner.send_json(Request::get("sites/")).await
    }

    /// Create a site.
    pub async fn create_site(&self, request: &SiteRequest) -> Result<Site> {
        let request = Request::post("sites/").with_json(request)?;
        self.inner.send_json(request).await
    }

    /// Fetch a site by id.
    pub async fn get_site(&self, site_id: &str) -> Result<Site> {
        self.inner
            .send_json(Request::get("sites/").segment(site_id))
            .await
    }

    /// Update a site.
    pub async fn update_site(&self, site_id: &str, request: &SiteRequest) -> Result<Site> {
        let request = Request::patch("sites/").segment(site_id).with_json(request)?;
        self.inner.send_json(request).await
    }

    /// Delete a site.
    pub async fn delete_site(&self, site_id: &str) -> Result<()> {
        self.inner
            .send_unit(Request::delete("sites/").segment(site_id))
            .await
    }

    /// Create a deploy key.
    pub async fn create_deploy_key(&self) -> Result<DeployKey> {
        self.inner.send_json(Request::post("deploy_keys/")).await
    }

    /// Fetch a deploy key by id.
    pub async fn get_deploy_key(&self, key_id: &str) -> Result<DeployKey> {
        self.inner
            .send_json(Request::get("deploy_keys/").segment(key_id))
            .await
    }

    /// Delete a deploy key.
    pub async fn delete_deploy_key(&self, key_id: &str) -> Result<()> {
        self.inner
            .send_unit(Request::delete("deploy_keys/").segment(key_id))
            .await
    }

    /// Create an environment variable on a site.
    ///
    /// Netlify takes and returns an array; the first returned element is the created variable.
    pub async fn create_env_var(
        &self,
        account_slug: &str,
        site_id: &str,
        env_var: &EnvVar,
    ) -> Result<EnvVar> {
        let request = Request::post("accounts/")
            .segment(account_slug)
            .segment("env")
            .with_query(QueryParams::site_id(site_id))
            .with_json(std::slice::from_ref(env_var))?;

        let created: Vec<EnvVar> = self.inner.send_json(request).await?;
        debug!(count = created.len(), key = %env_var.key, "Netlify env vars created");

        created.into_iter().next().ok_or_else(|| {
            Error::ParseError(format!(
                "Netlify returned no environment variable for `{}`",
                env_var.key
            ))
        })
    }

    /// Fetch an environment variable.
    pub async fn get_env_var(&self, account_slug: &str, site_id: &str, key: &str) -> Result<EnvVar> {
        self.inner
            .send_json(env_var_request(Method::GET, account_slug, site_id, key))
            .await
    }

    /// Replace an environment variable.
    pub async fn update_env_var(
        &self,
        account_slug: &str,
        site_id: &str,
        key: &str,
        env_var: &EnvVar,
    ) -> Result<EnvVar> {
        let request =
            env_var_request(Method::PUT, account_slug, site_id, key).with_json(env_var)?;
        self.inner.send_json(request).await
    }

    /// Delete an environment variable.
    pub async fn delete_env_var(&self, account_slug: &str, site_id: &str, key: &str) -> Result<()> {
        self.inner
            .send_unit(env_var_request(Method::DELETE, account_slug, site_id, key))
            .await
    }

    /// Fetch the profile of the token owner.
    pub async fn get_current_user(&self) -> Result<CurrentUser> {
        self.inner.send_json(Request::get("user/")).await
    }
}

fn env_var_request(method: Method, account_slug: &str, site_id: &str, key: &str) -> Request {
    Request::new(method, "accounts/")
        .segment(account_slug)
        .segment("env")
        .segment(key)
        .with_query(QueryParams::site_id(site_id))
}

#[async_trait]
impl NetlifyApi for NetlifyClient {
    async fn list_sites(&self) -> Result<Vec<Site>> {
        NetlifyClient::list_sites(self).await
    }

    async fn create_site(&self, request: &SiteRequest) -> Result<Site> {
        NetlifyClient::create_site(self, request).await
    }

    async fn get_site(&self, site_id: &str) -> Result<Site> {
        NetlifyClient::get_site(self, site_id).await
    }

    async fn update_site(&self, site_id: &str, request: &SiteRequest) -> Result<Site> {
        NetlifyClient::update_site(self, site_id, request).await
    }

    async fn delete_site(&self, site_id: &str) -> Result<()> {
        NetlifyClient::delete_site(self, site_id).await
    }

    async fn create_deploy_key(&self) -> Result<DeployKey> {
        NetlifyClient::create_deploy_key(self).await
    }

    async fn get_deploy_key(&self, key_id: &str) -> Result<DeployKey> {
        NetlifyClient::get_deploy_key(self, key_id).await
    }

    async fn delete_deploy_key(&self, key_id: &str) -> Result<()> {
        NetlifyClient::delete_deploy_key(self, key_id).await
    }

    async fn create_env_var(
        &self,
        account_slug: &str,
        site_id: &str,
        env_var: &EnvVar,
    ) -> Result<EnvVar> {
        NetlifyClient::create_env_var(self, account_slug, site_id, env_var).await
    }

    async fn get_env_var(&self, account_slug: &str, site_id: &str, key: &str) -> Result<EnvVar> {
        NetlifyClient::get_env_var(self, account_slug, site_id, key).await
    }

    async fn update_env_var(
        &self,
        account_slug: &str,
        site_id: &str,
        key: &str,
        env_var: &EnvVar,
    ) -> Result<EnvVar> {
        NetlifyClient::update_env_var(self, account_slug, site_id, key, env_var).await
    }

    async fn delete_env_var(&self, account_slug: &str, site_id: &str, key: &str) -> Result<()> {
        NetlifyClient::delete_env_var(self, account_slug, site_id, key).await
    }

    async fn get_current_user(&self) -> Result<CurrentUser> {
        NetlifyClient::get_current_user(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnvVarValue, Repository};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

    const TOKEN: &str = "nfp_test_token";

    fn test_client(server: &MockServer) -> NetlifyClient {
        NetlifyClient::new(format!("{}/api/v1/", server.uri()), TOKEN).unwrap()
    }

    fn site_json() -> serde_json::Value {
        json!({
            "id": "3970e0fe-8564-4903-9a55-c5f8de49fb8b",
            "name": "quirky-blog",
            "custom_domain": "blog.example.com",
            "url": "https://blog.example.com",
            "created_at": "2024-03-01T10:00:00.000Z",
            "updated_at": "2024-03-02T11:30:00.000Z",
            "state": "current",
            "account_slug": "acme"
        })
    }

    fn sample_request() -> SiteRequest {
        SiteRequest {
            name: "quirky-blog".into(),
            custom_domain: "blog.example.com".into(),
            repo: Repository {
                provider: "github".into(),
                path: "acme/blog".into(),
                branch: "main".into(),
                deploy_key_id: "5f1e2d3c".into(),
                cmd: "npm run build".into(),
                dir: "public".into(),
                url: "https://github.com/acme/blog".into(),
            },
        }
    }

    struct Echo(u16);

    impl Respond for Echo {
        fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
            ResponseTemplate::new(self.0).set_body_bytes(request.body.clone())
        }
    }

    #[test]
    fn construction_keeps_supplied_url() {
        let base = "https://api.netlify.com/api/v1/";
        let client = NetlifyClient::new(base, TOKEN).unwrap();
        assert_eq!(client.base_url().as_str(), base);
    }

    #[tokio::test]
    async fn get_site_matches_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sites/3970e0fe-8564-4903-9a55-c5f8de49fb8b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(site_json()))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let site = client
            .get_site("3970e0fe-8564-4903-9a55-c5f8de49fb8b")
            .await
            .unwrap();
        assert_eq!(
            site,
            Site {
                id: "3970e0fe-8564-4903-9a55-c5f8de49fb8b".into(),
                custom_domain: "blog.example.com".into(),
                name: "quirky-blog".into(),
                url: "https://blog.example.com".into(),
                created_at: "2024-03-01T10:00:00.000Z".into(),
                updated_at: "2024-03-02T11:30:00.000Z".into(),
                state: "current".into(),
            }
        );
    }

    #[tokio::test]
    async fn get_site_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sites/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": 404,
                "message": "Not Found"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get_site("missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn list_sites_returns_all_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sites/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([site_json(), {
                "id": "other",
                "name": "docs",
                "custom_domain": null
            }])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let sites = client.list_sites().await.unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[1].name, "docs");
        assert!(sites[1].custom_domain.is_empty());
    }

    #[tokio::test]
    async fn create_site_posts_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/sites/"))
            .and(body_json(json!({
                "name": "quirky-blog",
                "custom_domain": "blog.example.com",
                "repo": {
                    "provider": "github",
                    "repo": "acme/blog",
                    "branch": "main",
                    "deploy_key_id": "5f1e2d3c",
                    "cmd": "npm run build",
                    "dir": "public",
                    "repo_url": "https://github.com/acme/blog"
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(site_json()))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let site = client.create_site(&sample_request()).await.unwrap();
        assert_eq!(site.state, "current");
    }

    #[tokio::test]
    async fn site_request_round_trips_through_echo() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/sites/"))
            .respond_with(Echo(201))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = sample_request();
        let echoed: SiteRequest = client
            .inner
            .send_json(Request::post("sites/").with_json(&request).unwrap())
            .await
            .unwrap();
        assert_eq!(echoed.repo, request.repo);
    }

    #[tokio::test]
    async fn update_site_uses_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/sites/site-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(site_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let site = client
            .update_site("site-1", &sample_request())
            .await
            .unwrap();
        assert_eq!(site.name, "quirky-blog");
    }

    #[tokio::test]
    async fn delete_site_handles_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/sites/site-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete_site("site-1").await.unwrap();
    }

    #[tokio::test]
    async fn update_site_can_clear_custom_domain() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/sites/site-1"))
            .and(body_json(json!({
                "name": "quirky-blog",
                "custom_domain": "",
                "repo": {
                    "provider": "github",
                    "repo": "acme/blog",
                    "branch": "main",
                    "deploy_key_id": "5f1e2d3c",
                    "cmd": "npm run build",
                    "dir": "public",
                    "repo_url": "https://github.com/acme/blog"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "site-1",
                "name": "quirky-blog",
                "custom_domain": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = SiteRequest {
            custom_domain: String::new(),
            ..sample_request()
        };
        let site = client.update_site("site-1", &request).await.unwrap();
        assert!(site.custom_domain.is_empty());
    }

    #[tokio::test]
    async fn ids_are_sent_as_single_segments() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/accounts/acme/env/FOO%3Fx"))
            .and(query_param("site_id", "site-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/sites/..%2Fdeploy_keys%2Fk1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/deploy_keys/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a/b"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .delete_env_var("acme", "site-1", "FOO?x")
            .await
            .unwrap();
        client.delete_site("../deploy_keys/k1").await.unwrap();
        let key = client.get_deploy_key("a/b").await.unwrap();
        assert_eq!(key.id, "a/b");
    }

    #[tokio::test]
    async fn dot_and_empty_ids_never_reach_the_server() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        for id in ["..", ".", ""] {
            let err = client.delete_site(id).await.unwrap_err();
            assert!(matches!(err, Error::InvalidEndpoint(_)), "{id:?}: {err}");
        }
        let err = client.get_site("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn deploy_key_lifecycle() {
        let server = MockServer::start().await;
        let key = json!({
            "id": "5f1e2d3c",
            "public_key": "ssh-rsa AAAAB3NzaC1yc2E netlify",
            "created_at": "2024-03-01T10:00:00.000Z"
        });
        Mock::given(method("POST"))
            .and(path("/api/v1/deploy_keys/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(key.clone()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/deploy_keys/5f1e2d3c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(key))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/deploy_keys/5f1e2d3c"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let created = client.create_deploy_key().await.unwrap();
        assert_eq!(created.public_key, "ssh-rsa AAAAB3NzaC1yc2E netlify");

        let fetched = client.get_deploy_key(&created.id).await.unwrap();
        assert_eq!(fetched, created);

        client.delete_deploy_key(&created.id).await.unwrap();
    }

    #[tokio::test]
    async fn create_env_var_sends_array_with_site_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/accounts/acme/env"))
            .and(query_param("site_id", "site-1"))
            .and(body_json(json!([{
                "key": "API_URL",
                "scopes": ["builds", "functions"],
                "values": [{"value": "https://api.example.com", "context": "all"}],
                "is_secret": false
            }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
                "key": "API_URL",
                "scopes": ["builds", "functions"],
                "values": [{"id": "v1", "value": "https://api.example.com", "context": "all"}],
                "is_secret": false
            }])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let env_var = EnvVar {
            key: "API_URL".into(),
            scopes: vec!["builds".into(), "functions".into()],
            values: vec![EnvVarValue::new("https://api.example.com", "all")],
            is_secret: false,
        };
        let created = client
            .create_env_var("acme", "site-1", &env_var)
            .await
            .unwrap();
        assert_eq!(created.values[0].id, "v1");
        assert_eq!(created.scopes, env_var.scopes);
    }

    #[tokio::test]
    async fn create_env_var_empty_response_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/accounts/acme/env"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let env_var = EnvVar {
            key: "API_URL".into(),
            ..EnvVar::default()
        };
        let err = client
            .create_env_var("acme", "site-1", &env_var)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[tokio::test]
    async fn env_var_get_update_delete() {
        let server = MockServer::start().await;
        let body = json!({"key": "API_URL", "scopes": ["builds"], "is_secret": true});
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/acme/env/API_URL"))
            .and(query_param("site_id", "site-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/accounts/acme/env/API_URL"))
            .and(query_param("site_id", "site-1"))
            .and(body_json(json!({
                "key": "API_URL",
                "scopes": ["builds", "runtime"],
                "is_secret": true
            })))
            .respond_with(Echo(200))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/accounts/acme/env/API_URL"))
            .and(query_param("site_id", "site-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut env_var = client
            .get_env_var("acme", "site-1", "API_URL")
            .await
            .unwrap();
        assert!(env_var.is_secret);

        env_var.merge_scopes(["runtime"]);
        let updated = client
            .update_env_var("acme", "site-1", "API_URL", &env_var)
            .await
            .unwrap();
        assert_eq!(updated.scopes, vec!["builds", "runtime"]);

        client
            .delete_env_var("acme", "site-1", "API_URL")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn get_current_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "5a1b",
                "uid": "u-5a1b",
                "slug": "jdoe",
                "full_name": "Jane Doe",
                "avatar_url": "https://avatars.example.com/jdoe.png",
                "email": "jane@example.com",
                "affiliate_id": "",
                "site_count": 7,
                "created_at": "2020-01-01T00:00:00.000Z",
                "last_login": "2024-03-02T08:00:00.000Z"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let user = client.get_current_user().await.unwrap();
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.site_count, 7);
    }

    #[tokio::test]
    async fn every_accessor_sends_bearer_token() {
        let server = MockServer::start().await;
        // Requests without the header fall through to wiremock's default 404.
        Mock::given(header("Authorization", format!("Bearer {TOKEN}").as_str()))
            .and(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "K"})))
            .mount(&server)
            .await;
        Mock::given(header("Authorization", format!("Bearer {TOKEN}").as_str()))
            .and(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(header("Authorization", format!("Bearer {TOKEN}").as_str()))
            .and(method("POST"))
            .and(path("/api/v1/deploy_keys/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "k"})))
            .mount(&server)
            .await;

        let api: Box<dyn NetlifyApi> = Box::new(test_client(&server));
        api.get_site("s").await.unwrap();
        api.get_deploy_key("k").await.unwrap();
        api.get_env_var("acme", "s", "K").await.unwrap();
        api.get_current_user().await.unwrap();
        api.create_deploy_key().await.unwrap();
        api.delete_site("s").await.unwrap();
        api.delete_deploy_key("k").await.unwrap();
        api.delete_env_var("acme", "s", "K").await.unwrap();
    }
}
