use crate::cli::{OutputFormat, TypeArgs};
use crate::client::{AppContext, CliResult};
use crate::output::{describe_table, pretty_json};

pub(crate) async fn handle_describe(ctx: &AppContext, args: TypeArgs) -> CliResult<()> {
    let table = ctx.client.describe(&args.kind).await?;
    match ctx.output {
        OutputFormat::Json => println!("{}", pretty_json(&table)?),
        OutputFormat::Table => println!("{}", describe_table(&table)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CliError;
    use crate::commands::testing::{context, context_with};
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn describe_reads_the_model_outside_the_prefix() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/jsmodel/article.js")
                .header("authorization", "Bearer token");
            then.status(200).json_body(json!({
                "TableName": "article",
                "Columns": [
                    {"Name": "title", "ColumnType": "label", "IsNullable": false},
                    {"Name": "author", "ColumnType": "alias", "jsonApi": "hasOne", "type": "user"}
                ],
                "Actions": [{"Name": "publish", "Label": "Publish", "OnType": "article"}]
            }));
        });

        for output in [OutputFormat::Table, OutputFormat::Json] {
            let ctx = context_with(&server, output)?;
            handle_describe(
                &ctx,
                TypeArgs {
                    kind: "article".into(),
                },
            )
            .await?;
        }
        mock.assert_hits(2);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_type_is_a_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/jsmodel/ghost.js");
            then.status(404);
        });

        let ctx = context(&server)?;
        let err = handle_describe(
            &ctx,
            TypeArgs {
                kind: "ghost".into(),
            },
        )
        .await
        .expect_err("unknown type");
        assert!(matches!(err, CliError::Failure(_)));
        Ok(())
    }
}
