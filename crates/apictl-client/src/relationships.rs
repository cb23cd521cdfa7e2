//! Relationship sub-resource operations.
//!
//! Mutations send relationship documents whose data is resource identifiers
//! only; full resources are never embedded.

use apictl_models::{Document, Linkage, RelationshipDocument, ResourceIdentifier};
use reqwest::Method;
use tracing::info;

use crate::error::ClientResult;
use crate::transport::{ApiClient, require_id, require_name};

const RELATIONSHIPS: &str = "relationships";

impl ApiClient {
    /// GET the related resources (`type/id/relation`).
    pub async fn fetch_related(
        &self,
        kind: &str,
        id: &str,
        relation: &str,
    ) -> ClientResult<Document> {
        validate(kind, id, relation)?;
        self.get(self.api_url(&[kind, id, relation])?)
            .await?
            .decode("related resources")
    }

    /// GET the relationship linkage (`type/id/relationships/relation`).
    pub async fn get_relationship(
        &self,
        kind: &str,
        id: &str,
        relation: &str,
    ) -> ClientResult<RelationshipDocument> {
        validate(kind, id, relation)?;
        self.get(self.api_url(&[kind, id, RELATIONSHIPS, relation])?)
            .await?
            .decode("relationship document")
    }

    /// Replace the relationship with `linkage` (PATCH).
    ///
    /// `Linkage::Null` clears a to-one relationship and an empty
    /// `Linkage::Many` clears a to-many relationship.
    pub async fn update_relationship(
        &self,
        kind: &str,
        id: &str,
        relation: &str,
        linkage: Linkage,
    ) -> ClientResult<()> {
        self.mutate_relationship(Method::PATCH, kind, id, relation, linkage)
            .await
    }

    /// Add `members` to a to-many relationship (POST).
    pub async fn add_to_relationship(
        &self,
        kind: &str,
        id: &str,
        relation: &str,
        members: Vec<ResourceIdentifier>,
    ) -> ClientResult<()> {
        self.mutate_relationship(Method::POST, kind, id, relation, Linkage::Many(members))
            .await
    }

    /// Remove `members` from a to-many relationship (DELETE with a body).
    pub async fn delete_from_relationship(
        &self,
        kind: &str,
        id: &str,
        relation: &str,
        members: Vec<ResourceIdentifier>,
    ) -> ClientResult<()> {
        self.mutate_relationship(Method::DELETE, kind, id, relation, Linkage::Many(members))
            .await
    }

    async fn mutate_relationship(
        &self,
        method: Method,
        kind: &str,
        id: &str,
        relation: &str,
        linkage: Linkage,
    ) -> ClientResult<()> {
        validate(kind, id, relation)?;
        let url = self.api_url(&[kind, id, RELATIONSHIPS, relation])?;
        let members = linkage.identifiers().len();
        let payload = RelationshipDocument::linkage(linkage);
        self.send(method.clone(), url, Some(&payload)).await?;
        info!(%method, %kind, %id, %relation, members, "relationship changed");
        Ok(())
    }
}

fn validate(kind: &str, id: &str, relation: &str) -> ClientResult<()> {
    require_name("resource type", kind)?;
    require_id(kind, id)?;
    require_name("relation name", relation)
}

#[cfg(test)]
mod tests {
    use crate::error::ClientError;
    use crate::transport::testing::client_for;
    use anyhow::Result;
    use apictl_models::{Linkage, ResourceIdentifier};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn get_relationship_decodes_to_many_linkage() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/article/7/relationships/tags");
            then.status(200).json_body(json!({
                "data": [{"type": "tag", "id": "1"}, {"type": "tag", "id": "2"}],
                "links": {"self": "/api/article/7/relationships/tags"}
            }));
        });

        let client = client_for(&server)?;
        let document = client.get_relationship("article", "7", "tags").await?;
        let ids: Vec<&str> = document
            .data
            .as_ref()
            .map(|linkage| linkage.identifiers().iter().map(|rid| rid.id.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(ids, ["1", "2"]);
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn fetch_related_uses_the_related_path() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/article/7/author");
            then.status(200).json_body(json!({
                "data": {"type": "user_account", "id": "u1", "attributes": {"name": "Ada"}}
            }));
        });

        let client = client_for(&server)?;
        let document = client.fetch_related("article", "7", "author").await?;
        assert_eq!(document.resources()[0].id, "u1");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn update_relationship_sends_null_to_clear() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/article/7/relationships/author")
                .json_body(json!({"data": null}));
            then.status(204);
        });

        let client = client_for(&server)?;
        client
            .update_relationship("article", "7", "author", Linkage::Null)
            .await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn add_and_remove_send_identifier_arrays() -> Result<()> {
        let server = MockServer::start_async().await;
        let body = json!({"data": [{"type": "tag", "id": "3"}]});
        let add = server.mock(|when, then| {
            when.method(POST)
                .path("/api/article/7/relationships/tags")
                .json_body(body.clone());
            then.status(204);
        });
        let remove = server.mock(|when, then| {
            when.method(DELETE)
                .path("/api/article/7/relationships/tags")
                .json_body(body.clone());
            then.status(200).json_body(json!({"meta": {}}));
        });

        let client = client_for(&server)?;
        let members = vec![ResourceIdentifier::new("tag", "3")];
        client
            .add_to_relationship("article", "7", "tags", members.clone())
            .await?;
        client
            .delete_from_relationship("article", "7", "tags", members)
            .await?;
        add.assert();
        remove.assert();
        Ok(())
    }

    #[tokio::test]
    async fn empty_relation_name_is_rejected_locally() -> Result<()> {
        let server = MockServer::start_async().await;
        let client = client_for(&server)?;
        let err = client
            .get_relationship("article", "7", " ")
            .await
            .expect_err("relation required");
        assert!(matches!(err, ClientError::Validation(_)));
        Ok(())
    }
}
