use crate::diagnostics::Diagnostics;
use crate::resources::{api_error, client, encode};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::DataSource;
use async_trait::async_trait;
use netlify_api::{CurrentUser, NetlifyApi};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// `netlify_current_user`: profile of the token owner.
#[derive(Default)]
pub struct CurrentUserDataSource {
    client: Option<Arc<dyn NetlifyApi>>,
}

#[derive(Debug, Serialize)]
struct CurrentUserModel {
    id: String,
    uid: String,
    slug: String,
    full_name: String,
    avatar_url: String,
    email: String,
    affiliate_id: String,
    site_count: i64,
    created_at: String,
    last_login: String,
}

impl From<CurrentUser> for CurrentUserModel {
    // the email doubles as the stable identifier
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.email.clone(),
            uid: user.uid,
            slug: user.slug,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            email: user.email,
            affiliate_id: user.affiliate_id,
            site_count: user.site_count,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

#[async_trait]
impl DataSource for CurrentUserDataSource {
    fn type_suffix(&self) -> &'static str {
        "_current_user"
    }

    fn schema(&self) -> Schema {
        let computed = || Attribute::computed(AttributeType::String);
        Schema::new("The Netlify user owning the configured token.")
            .attribute("id", computed())
            .attribute("uid", computed())
            .attribute("slug", computed())
            .attribute("full_name", computed())
            .attribute("avatar_url", computed())
            .attribute("email", computed())
            .attribute("affiliate_id", computed())
            .attribute("site_count", Attribute::computed(AttributeType::Int64))
            .attribute("created_at", computed())
            .attribute("last_login", computed())
    }

    fn configure(&mut self, client: Option<Arc<dyn NetlifyApi>>) {
        self.client = client;
    }

    async fn read(&self, _config: Value) -> Result<Value, Diagnostics> {
        let api = client(self.client.as_ref())?;
        debug!("reading Netlify current user");

        let user = api
            .get_current_user()
            .await
            .map_err(|e| api_error("Unable to Read Netlify Current User", &e))?;
        encode(&CurrentUserModel::from(user))
    }
}
