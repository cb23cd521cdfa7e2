//! Output renderers and formatting helpers for CLI commands.
//!
//! Renderers build the full text and leave printing to the caller so the
//! layout can be checked without capturing stdout.

use anyhow::anyhow;
use apictl_models::{
    Action, AuthPermission, ColumnInfo, Document, Linkage, PrimaryData, Relationship, Resource,
    TableInfo,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::client::{CliError, CliResult};

/// Table cells longer than this many characters are cut and marked with `...`.
pub(crate) const MAX_CELL_CHARS: usize = 100;

/// Columns every resource type carries; `describe` leaves them out.
pub(crate) const STANDARD_COLUMNS: [&str; 6] = [
    "id",
    "version",
    "created_at",
    "updated_at",
    "reference_id",
    "permission",
];

pub(crate) fn pretty_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

/// Field/value table for one resource, relationships last.
pub(crate) fn resource_table(resource: &Resource) -> String {
    let mut rows = vec![
        vec!["type".to_string(), resource.kind.clone()],
        vec!["id".to_string(), resource.id.clone()],
    ];
    if let Some(attributes) = &resource.attributes {
        rows.extend(
            attributes
                .iter()
                .map(|(name, value)| vec![name.clone(), cell(value)]),
        );
    }
    if let Some(relationships) = &resource.relationships {
        rows.extend(relationships.iter().map(|(name, relationship)| {
            vec![
                format!("relationships.{name}"),
                relationship_cell(relationship),
            ]
        }));
    }
    render_table(&["FIELD", "VALUE"], &rows)
}

/// Collection table: `ID`, `TYPE`, then every attribute name in first-seen order.
pub(crate) fn collection_table(resources: &[Resource]) -> String {
    let mut attribute_names: Vec<&str> = Vec::new();
    for resource in resources {
        for name in resource.attributes.iter().flat_map(|attributes| attributes.keys()) {
            if !attribute_names.contains(&name.as_str()) {
                attribute_names.push(name);
            }
        }
    }

    let mut headers = vec!["ID".to_string(), "TYPE".to_string()];
    headers.extend(attribute_names.iter().map(|name| name.to_uppercase()));
    let rows: Vec<Vec<String>> = resources
        .iter()
        .map(|resource| {
            let mut row = vec![resource.id.clone(), resource.kind.clone()];
            row.extend(
                attribute_names
                    .iter()
                    .map(|name| resource.attribute(name).map(cell).unwrap_or_default()),
            );
            row
        })
        .collect();
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    render_table(&header_refs, &rows)
}

/// Table rendering of a list/related response, with a pagination hint.
pub(crate) fn document_table(document: &Document) -> String {
    let mut text = match &document.data {
        Some(PrimaryData::One(resource)) => resource_table(resource),
        _ => collection_table(document.resources()),
    };
    if let Some(total) = document
        .meta
        .as_ref()
        .and_then(|meta| meta.get("total_count").or_else(|| meta.get("total")))
    {
        text.push_str(&format!("\ntotal: {}", cell(total)));
    }
    if let Some(next) = document
        .links
        .as_ref()
        .and_then(|links| links.get("next"))
        .filter(|next| !next.is_null())
    {
        text.push_str(&format!("\nnext: {}", cell(next)));
    }
    text
}

/// Identifier table for relationship linkage.
pub(crate) fn linkage_table(linkage: Option<&Linkage>) -> String {
    let rows: Vec<Vec<String>> = linkage
        .map(Linkage::identifiers)
        .unwrap_or_default()
        .iter()
        .map(|identifier| vec![identifier.id.clone(), identifier.kind.clone()])
        .collect();
    if rows.is_empty() {
        return "(no linked resources)".to_string();
    }
    render_table(&["ID", "TYPE"], &rows)
}

/// Columns, relations, and actions of a type, without the standard columns.
pub(crate) fn describe_table(table: &TableInfo) -> String {
    let visible = |column: &&ColumnInfo| !STANDARD_COLUMNS.contains(&column.name.as_str());
    let (relations, columns): (Vec<&ColumnInfo>, Vec<&ColumnInfo>) = table
        .columns
        .iter()
        .filter(visible)
        .partition(|column| column.is_relation());

    let mut sections = vec![format!("Entity: {}", table.table_name)];

    let column_rows: Vec<Vec<String>> = columns
        .iter()
        .map(|column| {
            vec![
                column.name.clone(),
                column.column_type.clone(),
                column.data_type.clone(),
                yes_no(column.is_nullable),
                column
                    .foreign_key_data
                    .as_ref()
                    .filter(|_| column.is_foreign_key)
                    .map(|fk| format!("{}.{}", fk.namespace, fk.key_name))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    sections.push(section(
        "Columns",
        &["NAME", "TYPE", "DATA TYPE", "NULLABLE", "REFERENCES"],
        &column_rows,
    ));

    let relation_rows: Vec<Vec<String>> = relations
        .iter()
        .map(|column| {
            vec![
                column.name.clone(),
                column.relation.clone().unwrap_or_default(),
                column.related_type.clone().unwrap_or_default(),
            ]
        })
        .collect();
    sections.push(section("Relations", &["NAME", "RELATION", "TYPE"], &relation_rows));

    sections.push(section(
        "Actions",
        &["NAME", "LABEL", "INPUTS"],
        &action_rows(&table.actions),
    ));
    sections.join("\n\n")
}

/// Action listing.
pub(crate) fn actions_table(actions: &[Action]) -> String {
    if actions.is_empty() {
        return "(no actions)".to_string();
    }
    render_table(&["NAME", "LABEL", "INPUTS"], &action_rows(actions))
}

fn action_rows(actions: &[Action]) -> Vec<Vec<String>> {
    actions
        .iter()
        .map(|action| {
            let inputs = action
                .in_fields
                .iter()
                .map(|field| field.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            vec![action.name.clone(), action.label.clone(), inputs]
        })
        .collect()
}

/// Numeric value followed by one permission name per line.
pub(crate) fn permission_text(permission: AuthPermission) -> String {
    let mut lines = vec![format!("permission: {}", permission.bits())];
    let names = permission.names();
    if names.is_empty() {
        lines.push("(none)".to_string());
    } else {
        lines.extend(names.into_iter().map(str::to_string));
    }
    lines.join("\n")
}

/// JSON form of a permission value.
pub(crate) fn permission_json(permission: AuthPermission) -> Value {
    json!({"value": permission.bits(), "names": permission.names()})
}

fn section(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        format!("{title}:\n  (none)")
    } else {
        format!("{title}:\n{}", render_table(headers, rows))
    }
}

fn relationship_cell(relationship: &Relationship) -> String {
    match &relationship.data {
        None => String::new(),
        Some(Linkage::Null) => "null".to_string(),
        Some(linkage) => truncate(
            &linkage
                .identifiers()
                .iter()
                .map(|identifier| format!("{}/{}", identifier.kind, identifier.id))
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// Attribute value as a table cell: strings unquoted, `null` blank, other
/// values as compact JSON.
pub(crate) fn cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    truncate(&text)
}

pub(crate) fn truncate(text: &str) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    match single_line.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => format!("{}...", &single_line[..cut]),
        None => single_line,
    }
}

/// Left-aligned columns separated by two spaces.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (index, value) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(value.chars().count());
            }
        }
    }

    let mut lines = vec![format_row(headers.iter().copied(), &widths)];
    lines.extend(
        rows.iter()
            .map(|row| format_row(row.iter().map(String::as_str), &widths)),
    );
    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter().copied())
        .map(|(value, width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
