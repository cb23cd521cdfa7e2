//! Entity-model introspection payloads.
//!
//! The schema endpoint describes one resource type: its columns, which of
//! them are relations, and the actions that can be invoked against it. Field
//! names follow the server's PascalCase convention, except for the relation
//! markers (`jsonApi`, `type`) which the server emits in lower camel case.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Resource;
use crate::error::{ModelError, ModelResult};

/// Schema of a single resource type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TableInfo {
    /// Backing table (and resource type) name.
    pub table_name: String,
    /// Column definitions in server order.
    pub columns: Vec<ColumnInfo>,
    /// Actions invocable against the type.
    pub actions: Vec<Action>,
}

/// One column (or relation) of a resource type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ColumnInfo {
    /// API-facing field name.
    pub name: String,
    /// Storage column name.
    pub column_name: String,
    /// Free-text description.
    pub column_description: String,
    /// Logical column type (`label`, `content`, `entity`, ...).
    pub column_type: String,
    /// Storage type (`varchar(100)`, `int(11)`, ...).
    pub data_type: String,
    /// Whether the column accepts `null`.
    pub is_nullable: bool,
    /// Whether the column references another table.
    pub is_foreign_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Foreign-key target when `is_foreign_key` is set.
    pub foreign_key_data: Option<ForeignKeyData>,
    #[serde(rename = "jsonApi", skip_serializing_if = "Option::is_none")]
    /// Relation marker (`hasOne`, `hasMany`, `belongsTo`); present only on relations.
    pub relation: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    /// Related resource type for relation columns.
    pub related_type: Option<String>,
}

impl ColumnInfo {
    /// Whether the column carries a non-empty relation marker.
    #[must_use]
    pub fn is_relation(&self) -> bool {
        self.relation.as_deref().is_some_and(|marker| !marker.is_empty())
    }
}

/// Foreign-key target of a column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ForeignKeyData {
    /// Storage kind of the target (`self`, `cloud_store`, ...).
    pub data_source: String,
    /// Target table or store name.
    pub namespace: String,
    /// Target key column.
    pub key_name: String,
}

/// Action that can be executed against a resource type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Action {
    /// Machine name used in the execution path.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Longer description.
    pub description: Option<String>,
    /// Resource type the action is attached to.
    pub on_type: String,
    /// Whether the action can run without a target instance.
    pub instance_optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Identifier of the action record on the server.
    pub reference_id: Option<String>,
    /// Input fields, in prompt order.
    pub in_fields: Vec<ColumnInfo>,
    /// Output behaviours executed when the action runs.
    pub out_fields: Vec<ActionOutcome>,
}

/// One output behaviour of an action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ActionOutcome {
    #[serde(rename = "Type")]
    /// Target type of the outcome.
    pub kind: String,
    /// Operation performed (`POST`, `GET`, `EXECUTE`, ...).
    pub method: String,
    /// Name the outcome's result is stored under.
    pub reference: String,
    /// Whether the outcome is left out of the response.
    pub skip_in_response: bool,
}

impl Action {
    /// Build an action from a record of the server's action collection.
    ///
    /// A string `action_schema` attribute carries the full definition; without
    /// it the summary attributes (`action_name`, `label`, `on_type`,
    /// `instance_optional`) are used.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidAction`] when `action_schema` is not valid
    /// action JSON.
    pub fn from_resource(resource: &Resource) -> ModelResult<Self> {
        let text_attribute = |name: &str| {
            resource
                .attribute(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let mut action = if let Some(schema) = text_attribute("action_schema") {
            serde_json::from_str::<Self>(&schema).map_err(|err| ModelError::InvalidAction {
                name: resource.id.clone(),
                reason: err.to_string(),
            })?
        } else {
            Self {
                name: text_attribute("action_name").unwrap_or_default(),
                label: text_attribute("label").unwrap_or_default(),
                on_type: text_attribute("on_type").unwrap_or_default(),
                instance_optional: resource
                    .attribute("instance_optional")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                ..Self::default()
            }
        };

        if action.reference_id.is_none() && !resource.id.is_empty() {
            action.reference_id = Some(resource.id.clone());
        }
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Object;
    use serde_json::json;

    #[test]
    fn table_info_decodes_columns_relations_and_actions() {
        let raw = json!({
            "TableName": "article",
            "Columns": [
                {"Name": "title", "ColumnName": "title", "ColumnType": "label",
                 "DataType": "varchar(500)", "IsNullable": false},
                {"Name": "author", "ColumnName": "author", "ColumnType": "alias",
                 "DataType": "int(11)", "IsNullable": true, "IsForeignKey": true,
                 "ForeignKeyData": {"DataSource": "self", "Namespace": "user_account", "KeyName": "id"},
                 "jsonApi": "hasOne", "type": "user_account"},
                {"Name": "notes", "jsonApi": ""}
            ],
            "Actions": [
                {"Name": "publish", "Label": "Publish article", "OnType": "article",
                 "InstanceOptional": false,
                 "InFields": [{"Name": "when", "ColumnType": "datetime", "DataType": "timestamp"}],
                 "OutFields": [{"Type": "article", "Method": "PATCH", "Reference": "published"}]}
            ]
        });
        let table: TableInfo = serde_json::from_value(raw).expect("schema decodes");
        assert_eq!(table.table_name, "article");
        assert_eq!(table.columns.len(), 3);
        assert!(!table.columns[0].is_relation());
        assert!(table.columns[1].is_relation());
        assert!(!table.columns[2].is_relation());
        assert_eq!(table.columns[1].related_type.as_deref(), Some("user_account"));
        assert_eq!(
            table.columns[1]
                .foreign_key_data
                .as_ref()
                .map(|fk| fk.namespace.as_str()),
            Some("user_account")
        );
        let action = &table.actions[0];
        assert_eq!(action.in_fields[0].name, "when");
        assert_eq!(action.out_fields[0].method, "PATCH");
    }

    #[test]
    fn action_from_summary_attributes() {
        let mut attributes = Object::new();
        attributes.insert("action_name".into(), json!("publish"));
        attributes.insert("label".into(), json!("Publish"));
        attributes.insert("on_type".into(), json!("article"));
        attributes.insert("instance_optional".into(), json!(true));
        let resource = Resource::new("action", "a-1").with_attributes(attributes);

        let action = Action::from_resource(&resource).expect("summary decodes");
        assert_eq!(action.name, "publish");
        assert_eq!(action.on_type, "article");
        assert!(action.instance_optional);
        assert_eq!(action.reference_id.as_deref(), Some("a-1"));
    }

    #[test]
    fn action_from_embedded_schema() {
        let mut attributes = Object::new();
        attributes.insert(
            "action_schema".into(),
            json!(r#"{"Name":"archive","Label":"Archive","OnType":"article","InFields":[{"Name":"reason"}]}"#),
        );
        let resource = Resource::new("action", "a-2").with_attributes(attributes);
        let action = Action::from_resource(&resource).expect("schema decodes");
        assert_eq!(action.name, "archive");
        assert_eq!(action.in_fields.len(), 1);

        let mut broken = Object::new();
        broken.insert("action_schema".into(), json!("{not json"));
        let resource = Resource::new("action", "a-3").with_attributes(broken);
        assert!(matches!(
            Action::from_resource(&resource),
            Err(ModelError::InvalidAction { name, .. }) if name == "a-3"
        ));
    }
}
