use apictl_models::Object;

use crate::cli::{ActionExecuteArgs, OutputFormat, TypeArgs};
use crate::client::{AppContext, CliResult};
use crate::commands::parse_json_object;
use crate::output::{actions_table, pretty_json};

pub(crate) async fn handle_action_list(ctx: &AppContext, args: TypeArgs) -> CliResult<()> {
    let actions = ctx.client.list_actions(&args.kind).await?;
    match ctx.output {
        OutputFormat::Json => println!("{}", pretty_json(&actions)?),
        OutputFormat::Table => println!("{}", actions_table(&actions)),
    }
    Ok(())
}

/// Action results have no fixed shape, so they are always printed as JSON.
pub(crate) async fn handle_action_execute(
    ctx: &AppContext,
    args: ActionExecuteArgs,
) -> CliResult<()> {
    let inputs = match args.inputs.as_deref() {
        Some(raw) => parse_json_object("inputs", raw)?,
        None => Object::new(),
    };
    let result = ctx
        .client
        .execute_action(&args.kind, &args.name, &inputs)
        .await?;
    println!("{}", pretty_json(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CliError;
    use crate::commands::testing::context;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    fn execute_args(name: &str, inputs: Option<&str>) -> ActionExecuteArgs {
        ActionExecuteArgs {
            kind: "article".into(),
            name: name.into(),
            inputs: inputs.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn list_filters_actions_by_type() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/action")
                .query_param("filter[OnType]", "article");
            then.status(200).json_body(json!({"data": [{
                "type": "action",
                "id": "a1",
                "attributes": {"action_name": "publish", "label": "Publish", "on_type": "article"}
            }]}));
        });

        let ctx = context(&server)?;
        handle_action_list(
            &ctx,
            TypeArgs {
                kind: "article".into(),
            },
        )
        .await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn execute_posts_inputs_to_the_action_path() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/action/article/publish")
                .json_body(json!({"article_id": "7", "notify": true}));
            then.status(200)
                .json_body(json!([{"ResponseType": "client.notify", "Attributes": {"message": "ok"}}]));
        });

        let ctx = context(&server)?;
        handle_action_execute(
            &ctx,
            execute_args("publish", Some(r#"{"article_id":"7","notify":true}"#)),
        )
        .await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn execute_without_inputs_sends_an_empty_object() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/action/article/archive").json_body(json!({}));
            then.status(204);
        });

        let ctx = context(&server)?;
        handle_action_execute(&ctx, execute_args("archive", None)).await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn non_object_inputs_are_rejected_locally() -> Result<()> {
        let server = MockServer::start_async().await;
        let any_request = server.mock(|_when, then| {
            then.status(200);
        });

        let ctx = context(&server)?;
        let err = handle_action_execute(&ctx, execute_args("publish", Some("[1,2]")))
            .await
            .expect_err("array inputs");
        assert!(matches!(err, CliError::Validation(_)));
        any_request.assert_hits(0);
        Ok(())
    }
}
