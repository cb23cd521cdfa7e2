use apictl_models::{AuthPermission, PermissionOp};

use crate::cli::{OutputFormat, PermissionArgs, ResourceArgs};
use crate::client::{AppContext, CliResult};
use crate::output::{permission_json, permission_text, pretty_json};

pub(crate) async fn handle_permission_view(ctx: &AppContext, args: ResourceArgs) -> CliResult<()> {
    let permission = ctx.client.get_permission(&args.kind, &args.id).await?;
    print_permission(permission, ctx.output)
}

pub(crate) async fn handle_permission_set(ctx: &AppContext, args: PermissionArgs) -> CliResult<()> {
    let permission = parse_permissions(&args.permissions)?;
    let written = ctx
        .client
        .set_permission(&args.kind, &args.id, permission)
        .await?;
    print_permission(written, ctx.output)
}

pub(crate) async fn handle_permission_add(ctx: &AppContext, args: PermissionArgs) -> CliResult<()> {
    apply(ctx, &args, PermissionOp::Union).await
}

pub(crate) async fn handle_permission_remove(
    ctx: &AppContext,
    args: PermissionArgs,
) -> CliResult<()> {
    apply(ctx, &args, PermissionOp::Subtract).await
}

async fn apply(ctx: &AppContext, args: &PermissionArgs, op: PermissionOp) -> CliResult<()> {
    let delta = parse_permissions(&args.permissions)?;
    let written = ctx
        .client
        .apply_permission(&args.kind, &args.id, delta, op)
        .await?;
    print_permission(written, ctx.output)
}

fn parse_permissions(raw: &str) -> CliResult<AuthPermission> {
    Ok(AuthPermission::parse_names(raw.split(','))?)
}

fn print_permission(permission: AuthPermission, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", pretty_json(&permission_json(permission))?),
        OutputFormat::Table => println!("{}", permission_text(permission)),
    }
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

    fn args(permissions: &str) -> PermissionArgs {
        PermissionArgs {
            kind: "article".into(),
            id: "7".into(),
            permissions: permissions.into(),
        }
    }

    #[tokio::test]
    async fn add_patches_the_combined_value_once() -> Result<()> {
        let server = MockServer::start_async().await;
        let read = server.mock(|when, then| {
            when.method(GET).path("/api/article/7");
            then.status(200).json_body(json!({
                "data": {"type": "article", "id": "7", "attributes": {"permission": "4"}}
            }));
        });
        let write = server.mock(|when, then| {
            when.method(PATCH).path("/api/article/7").json_body(json!({
                "data": {"type": "article", "id": "7", "attributes": {"permission": "2564"}}
            }));
            then.status(204);
        });

        let ctx = context(&server)?;
        handle_permission_add(&ctx, args("UserRead,UserUpdate")).await?;
        read.assert_hits(1);
        write.assert_hits(1);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_name_fails_before_any_request() -> Result<()> {
        let server = MockServer::start_async().await;
        let any_request = server.mock(|_when, then| {
            then.status(200);
        });

        let ctx = context(&server)?;
        let err = handle_permission_set(&ctx, args("GuestRead, UserTeleport"))
            .await
            .expect_err("unknown permission");
        match err {
            CliError::Validation(message) => assert!(message.contains("UserTeleport")),
            CliError::Failure(other) => panic!("unexpected failure: {other:#}"),
        }
        any_request.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn empty_permission_list_never_writes() -> Result<()> {
        let server = MockServer::start_async().await;
        let any_request = server.mock(|_when, then| {
            then.status(200);
        });

        let ctx = context(&server)?;
        for raw in ["", " ", "UserRead,"] {
            let err = handle_permission_set(&ctx, args(raw))
                .await
                .expect_err("empty token");
            assert!(matches!(err, CliError::Validation(_)));
            let err = handle_permission_add(&ctx, args(raw))
                .await
                .expect_err("empty token");
            assert!(matches!(err, CliError::Validation(_)));
        }
        any_request.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn view_reads_numeric_permissions() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/article/7");
            then.status(200).json_body(json!({
                "data": {"type": "article", "id": "7", "attributes": {"permission": 516}}
            }));
        });

        let ctx = context(&server)?;
        handle_permission_view(
            &ctx,
            ResourceArgs {
                kind: "article".into(),
                id: "7".into(),
            },
        )
        .await?;
        mock.assert();
        Ok(())
    }
}
