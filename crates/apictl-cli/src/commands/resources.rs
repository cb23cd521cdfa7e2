use apictl_client::ListOptions;
use apictl_models::{Object, Resource};

use crate::cli::{CreateArgs, ListArgs, OutputFormat, ResourceArgs, UpdateArgs};
use crate::client::{AppContext, CliResult};
use crate::commands::parse_json_object;
use crate::output::{document_table, pretty_json, resource_table};

pub(crate) async fn handle_create(ctx: &AppContext, args: CreateArgs) -> CliResult<()> {
    let attributes = match args.attributes.as_deref() {
        Some(raw) => parse_json_object("attributes", raw)?,
        None => Object::new(),
    };
    let draft = Resource::new(args.kind, "").with_attributes(attributes);
    let created = ctx.client.create(&draft).await?;
    print_resource(&created, ctx.output)
}

pub(crate) async fn handle_read(ctx: &AppContext, args: ResourceArgs) -> CliResult<()> {
    let resource = ctx.client.read(&args.kind, &args.id).await?;
    print_resource(&resource, ctx.output)
}

pub(crate) async fn handle_update(ctx: &AppContext, args: UpdateArgs) -> CliResult<()> {
    let attributes = parse_json_object("attributes", &args.attributes)?;
    let resource = Resource::new(args.kind, args.id).with_attributes(attributes);
    let updated = ctx.client.update(&resource).await?;
    print_resource(&updated, ctx.output)
}

pub(crate) async fn handle_delete(ctx: &AppContext, args: ResourceArgs) -> CliResult<()> {
    ctx.client.delete(&args.kind, &args.id).await?;
    println!("Deleted {}/{}.", args.kind, args.id);
    Ok(())
}

pub(crate) async fn handle_list(ctx: &AppContext, args: ListArgs) -> CliResult<()> {
    let options = list_options(&args)?;
    let document = ctx.client.list(&args.kind, &options).await?;
    match ctx.output {
        OutputFormat::Json => println!("{}", pretty_json(&document)?),
        OutputFormat::Table => println!("{}", document_table(&document)),
    }
    Ok(())
}

pub(crate) fn list_options(args: &ListArgs) -> CliResult<ListOptions> {
    let mut options = ListOptions {
        sort: args.sort.clone(),
        include: args.include.clone(),
        ..ListOptions::default()
    };
    if let Some(number) = args.page_number {
        options = options.with_page("number", number.to_string());
    }
    if let Some(size) = args.page_size {
        options = options.with_page("size", size.to_string());
    }
    if let Some(filter) = args.filter.as_deref() {
        options.filter = ListOptions::parse_filter(filter)?;
    }
    if let Some(fields) = args.fields.as_deref() {
        options.fields = ListOptions::parse_fields(fields)?;
    }
    Ok(options)
}

pub(crate) fn print_resource(resource: &Resource, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", pretty_json(resource)?),
        OutputFormat::Table => println!("{}", resource_table(resource)),
    }
    Ok(())
}
