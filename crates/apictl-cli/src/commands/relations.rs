use apictl_models::{Linkage, ResourceIdentifier};
use serde_json::Value;

use crate::cli::{OutputFormat, RelationDataArgs, RelationGetArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{document_table, linkage_table, pretty_json};

pub(crate) async fn handle_relation_get(ctx: &AppContext, args: RelationGetArgs) -> CliResult<()> {
    let target = &args.target;
    if args.linkage {
        let document = ctx
            .client
            .get_relationship(&target.kind, &target.id, &target.relation)
            .await?;
        match ctx.output {
            OutputFormat::Json => println!("{}", pretty_json(&document)?),
            OutputFormat::Table => println!("{}", linkage_table(document.data.as_ref())),
        }
    } else {
        let document = ctx
            .client
            .fetch_related(&target.kind, &target.id, &target.relation)
            .await?;
        match ctx.output {
            OutputFormat::Json => println!("{}", pretty_json(&document)?),
            OutputFormat::Table => println!("{}", document_table(&document)),
        }
    }
    Ok(())
}

pub(crate) async fn handle_relation_update(
    ctx: &AppContext,
    args: RelationDataArgs,
) -> CliResult<()> {
    let linkage = parse_linkage(&args.data)?;
    let target = &args.target;
    ctx.client
        .update_relationship(&target.kind, &target.id, &target.relation, linkage)
        .await?;
    println!(
        "Relationship '{}' of {}/{} replaced.",
        target.relation, target.kind, target.id
    );
    Ok(())
}

pub(crate) async fn handle_relation_add(ctx: &AppContext, args: RelationDataArgs) -> CliResult<()> {
    let members = parse_members(&args.data)?;
    let count = members.len();
    let target = &args.target;
    ctx.client
        .add_to_relationship(&target.kind, &target.id, &target.relation, members)
        .await?;
    println!(
        "Added {count} member(s) to '{}' of {}/{}.",
        target.relation, target.kind, target.id
    );
    Ok(())
}

pub(crate) async fn handle_relation_remove(
    ctx: &AppContext,
    args: RelationDataArgs,
) -> CliResult<()> {
    let members = parse_members(&args.data)?;
    let count = members.len();
    let target = &args.target;
    ctx.client
        .delete_from_relationship(&target.kind, &target.id, &target.relation, members)
        .await?;
    println!(
        "Removed {count} member(s) from '{}' of {}/{}.",
        target.relation, target.kind, target.id
    );
    Ok(())
}

/// Accepts an identifier, an identifier array, `null`, or a `{"data": ...}` document.
pub(crate) fn parse_linkage(raw: &str) -> CliResult<Linkage> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| CliError::validation(format!("--data is not valid JSON: {err}")))?;
    let data = match value {
        Value::Object(mut object) if object.contains_key("data") => {
            object.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(data).map_err(|err| {
        CliError::validation(format!(
            "--data must hold resource identifiers ({{\"type\": ..., \"id\": ...}}): {err}"
        ))
    })
}

fn parse_members(raw: &str) -> CliResult<Vec<ResourceIdentifier>> {
    match parse_linkage(raw)? {
        Linkage::One(identifier) => Ok(vec![identifier]),
        Linkage::Many(identifiers) if !identifiers.is_empty() => Ok(identifiers),
        Linkage::Many(_) | Linkage::Null => Err(CliError::validation(
            "--data must name at least one resource identifier",
        )),
    }
}
