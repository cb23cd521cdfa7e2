//! Create, read, update, delete, and list.

use apictl_models::{Document, PrimaryData, Resource};
use reqwest::{Method, StatusCode};
use tracing::info;

use crate::error::ClientResult;
use crate::query::ListOptions;
use crate::transport::{ApiClient, require_id, require_name};

impl ApiClient {
    /// POST `resource` to its collection and return the stored resource.
    ///
    /// The returned id is the one assigned by the server.
    pub async fn create(&self, resource: &Resource) -> ClientResult<Resource> {
        require_name("resource type", &resource.kind)?;
        let url = self.api_url(&[&resource.kind])?;
        let payload = Document::single(resource.clone());
        let response = self.send(Method::POST, url, Some(&payload)).await?;
        let created = response
            .decode::<Document>("created resource")?
            .into_single()?;
        info!(kind = %created.kind, id = %created.id, "created resource");
        Ok(created)
    }

    /// GET a single resource.
    pub async fn read(&self, kind: &str, id: &str) -> ClientResult<Resource> {
        require_name("resource type", kind)?;
        require_id(kind, id)?;
        let response = self.get(self.api_url(&[kind, id])?).await?;
        Ok(response.decode::<Document>("resource")?.into_single()?)
    }

    /// PATCH `resource` in place.
    ///
    /// A 204, an empty 2xx body, or a document without primary data (for
    /// example meta only) means the server accepted the resource as sent, so
    /// the submitted resource is returned.
    pub async fn update(&self, resource: &Resource) -> ClientResult<Resource> {
        require_name("resource type", &resource.kind)?;
        require_id(&resource.kind, &resource.id)?;
        let url = self.api_url(&[&resource.kind, &resource.id])?;
        let payload = Document::single(resource.clone());
        let response = self.send(Method::PATCH, url, Some(&payload)).await?;
        let updated = if response.status == StatusCode::NO_CONTENT || response.is_empty() {
            resource.clone()
        } else {
            let document = response.decode::<Document>("updated resource")?;
            match document.data {
                None | Some(PrimaryData::Null) => resource.clone(),
                Some(_) => document.into_single()?,
            }
        };
        info!(kind = %updated.kind, id = %updated.id, "updated resource");
        Ok(updated)
    }

    /// DELETE a single resource; any response body is ignored.
    pub async fn delete(&self, kind: &str, id: &str) -> ClientResult<()> {
        require_name("resource type", kind)?;
        require_id(kind, id)?;
        self.send::<()>(Method::DELETE, self.api_url(&[kind, id])?, None)
            .await?;
        info!(%kind, %id, "deleted resource");
        Ok(())
    }

    /// GET a collection with `options` encoded into the query string.
    ///
    /// The document is returned as served; its data may be a single resource
    /// or a collection.
    pub async fn list(&self, kind: &str, options: &ListOptions) -> ClientResult<Document> {
        require_name("resource type", kind)?;
        let mut url = self.api_url(&[kind])?;
        options.apply(&mut url);
        self.get(url).await?.decode("resource collection")
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ClientError;
    use crate::query::ListOptions;
    use crate::transport::testing::client_for;
    use anyhow::Result;
    use apictl_models::{Object, Resource};
    use httpmock::prelude::*;
    use serde_json::json;

    fn attributes(value: serde_json::Value) -> Object {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Object::new(),
        }
    }

    #[tokio::test]
    async fn create_posts_document_and_returns_server_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/article")
                .json_body(json!({"data": {"type": "article", "attributes": {"title": "Hello"}}}));
            then.status(201).json_body(json!({
                "data": {"type": "article", "id": "a-17", "attributes": {"title": "Hello"}}
            }));
        });

        let client = client_for(&server)?;
        let draft = Resource::new("article", "").with_attributes(attributes(json!({"title": "Hello"})));
        let created = client.create(&draft).await?;
        assert_eq!(created.id, "a-17");
        assert_eq!(created.attribute("title"), Some(&json!("Hello")));
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn read_maps_404_to_not_found() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/article/404");
            then.status(404);
        });

        let client = client_for(&server)?;
        let err = client.read("article", "404").await.expect_err("missing");
        assert!(matches!(err, ClientError::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn update_with_empty_id_sends_nothing() -> Result<()> {
        let server = MockServer::start_async().await;
        let any_request = server.mock(|_when, then| {
            then.status(200);
        });

        let client = client_for(&server)?;
        let err = client
            .update(&Resource::new("article", ""))
            .await
            .expect_err("missing id");
        assert!(matches!(err, ClientError::MissingId { ref resource_type } if resource_type == "article"));
        any_request.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn update_accepts_no_content() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH).path("/api/article/7").json_body(json!({
                "data": {"type": "article", "id": "7", "attributes": {"title": "Renamed"}}
            }));
            then.status(204);
        });

        let client = client_for(&server)?;
        let resource =
            Resource::new("article", "7").with_attributes(attributes(json!({"title": "Renamed"})));
        let updated = client.update(&resource).await?;
        assert_eq!(updated, resource);
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn update_accepts_meta_only_and_null_data() -> Result<()> {
        let server = MockServer::start_async().await;
        let meta_only = server.mock(|when, then| {
            when.method(PATCH).path("/api/article/7");
            then.status(200).json_body(json!({"meta": {"updated": true}}));
        });
        let null_data = server.mock(|when, then| {
            when.method(PATCH).path("/api/article/8");
            then.status(200).json_body(json!({"data": null}));
        });

        let client = client_for(&server)?;
        let first =
            Resource::new("article", "7").with_attributes(attributes(json!({"title": "Seven"})));
        assert_eq!(client.update(&first).await?, first);
        let second = Resource::new("article", "8");
        assert_eq!(client.update(&second).await?, second);
        meta_only.assert();
        null_data.assert();
        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_collection_data() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PATCH).path("/api/article/7");
            then.status(200).json_body(json!({"data": []}));
        });

        let client = client_for(&server)?;
        let err = client
            .update(&Resource::new("article", "7"))
            .await
            .expect_err("collection is not an update result");
        assert!(matches!(err, ClientError::Model(_)));
        Ok(())
    }

    #[tokio::test]
    async fn delete_ignores_response_body() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/api/article/7");
            then.status(200).body(r#"{"meta":{"deleted":true}}"#);
        });

        let client = client_for(&server)?;
        client.delete("article", "7").await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn list_encodes_filter_pairs() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/article")
                .query_param("filter[status]", "active")
                .query_param("filter[owner]", "42")
                .query_param("page[size]", "5");
            then.status(200).json_body(json!({
                "data": [
                    {"type": "article", "id": "1", "attributes": {"status": "active"}},
                    {"type": "article", "id": "2", "attributes": {"status": "active"}}
                ],
                "links": {"next": "/api/article?page[number]=2"}
            }));
        });

        let client = client_for(&server)?;
        let options = ListOptions {
            filter: ListOptions::parse_filter("status:active,owner:42")?,
            ..ListOptions::default()
        }
        .with_page("size", "5");
        let document = client.list("article", &options).await?;
        assert_eq!(document.resources().len(), 2);
        assert!(document.links.is_some());
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/article/1");
            then.status(200).body("not json");
        });

        let client = client_for(&server)?;
        let err = client.read("article", "1").await.expect_err("decode");
        assert!(matches!(err, ClientError::Decode { ref body, .. } if body == "not json"));
        Ok(())
    }
}
