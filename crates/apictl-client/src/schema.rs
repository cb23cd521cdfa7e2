//! Entity-model introspection and action execution.

use apictl_models::{Action, Document, Object, TableInfo};
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use crate::error::ClientResult;
use crate::query::ListOptions;
use crate::transport::{ApiClient, require_name};

const ACTION_COLLECTION: &str = "action";

impl ApiClient {
    /// Fetch the schema of `kind` from `jsmodel/{kind}.js`. Never cached.
    pub async fn describe(&self, kind: &str) -> ClientResult<TableInfo> {
        require_name("resource type", kind)?;
        let url = self.root_url(&["jsmodel", &format!("{kind}.js")])?;
        self.get(url).await?.decode("entity model")
    }

    /// Actions attached to `kind`, read from the action collection.
    pub async fn list_actions(&self, kind: &str) -> ClientResult<Vec<Action>> {
        require_name("resource type", kind)?;
        let mut url = self.api_url(&[ACTION_COLLECTION])?;
        ListOptions {
            filter: [("OnType".to_string(), kind.to_string())].into(),
            ..ListOptions::default()
        }
        .apply(&mut url);

        let document: Document = self.get(url).await?.decode("action collection")?;
        let mut actions = document
            .resources()
            .iter()
            .map(Action::from_resource)
            .collect::<Result<Vec<_>, _>>()?;
        for action in &mut actions {
            if action.on_type.is_empty() {
                action.on_type = kind.to_string();
            }
        }
        Ok(actions)
    }

    /// POST `inputs` to `action/{kind}/{action}` and return the server's
    /// response verbatim (`null` when the body is empty).
    pub async fn execute_action(
        &self,
        kind: &str,
        action: &str,
        inputs: &Object,
    ) -> ClientResult<Value> {
        require_name("resource type", kind)?;
        require_name("action name", action)?;
        let url = self.root_url(&[ACTION_COLLECTION, kind, action])?;
        let response = self.send(Method::POST, url, Some(inputs)).await?;
        info!(%kind, %action, "action executed");
        if response.is_empty() {
            return Ok(Value::Null);
        }
        response.decode("action result")
    }
}
