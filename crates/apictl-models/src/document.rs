//! JSON:API resource objects, relationships, and top-level documents.
//!
//! # Design
//! - Optional members are `Option` and skipped when absent, so a decode/encode
//!   cycle never invents members the server did not send.
//! - `Relationship::data` and `Document::data` keep an explicit `null` distinct
//!   from absence: JSON:API uses the difference to tell "cleared" from "not
//!   modified".
//! - Primary data and relationship linkage are picked by inspecting the JSON
//!   shape (null, object, or array) rather than by a fixed Rust type.

use std::fmt;
use std::slice;

use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{ModelError, ModelResult};

/// JSON:API media type sent as both `Content-Type` and `Accept`.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Free-form JSON object used for `attributes`, `links`, and `meta` members.
pub type Object = Map<String, Value>;

/// One server-side entity instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    /// Collection the resource belongs to.
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    /// Server-assigned identifier; empty until the resource has been created.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Attribute values keyed by field name.
    pub attributes: Option<Object>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Relationships keyed by relation name, in served order.
    pub relationships: Option<IndexMap<String, Relationship>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque links object.
    pub links: Option<Object>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque meta object.
    pub meta: Option<Object>,
}

impl Resource {
    /// Build a bare resource with no attributes or relationships.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            attributes: None,
            relationships: None,
            links: None,
            meta: None,
        }
    }

    /// Attach an attribute object, replacing any existing one.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Object) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Look up a single attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.as_ref().and_then(|attributes| attributes.get(name))
    }

    /// Identifier pointing at this resource.
    #[must_use]
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.kind.clone(), self.id.clone())
    }
}

/// Reference to a resource without its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    /// Collection the referenced resource belongs to.
    pub kind: String,
    /// Identifier of the referenced resource.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque meta object.
    pub meta: Option<Object>,
}

impl ResourceIdentifier {
    /// Build an identifier without meta.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            meta: None,
        }
    }
}

/// Relationship object attached to a resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    /// Resource linkage; `None` when the member is absent.
    pub data: Option<Linkage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque links object.
    pub links: Option<Object>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque meta object.
    pub meta: Option<Object>,
}

/// Resource linkage carried by a relationship or a relationship document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Linkage {
    /// Explicit `null`: an empty to-one relationship.
    Null,
    /// To-one linkage.
    One(ResourceIdentifier),
    /// To-many linkage, order preserved.
    Many(Vec<ResourceIdentifier>),
}

impl Linkage {
    /// Identifiers contained in the linkage, empty for `null`.
    #[must_use]
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        match self {
            Self::Null => &[],
            Self::One(identifier) => slice::from_ref(identifier),
            Self::Many(identifiers) => identifiers,
        }
    }
}

impl Serialize for Linkage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::One(identifier) => identifier.serialize(serializer),
            Self::Many(identifiers) => identifiers.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Linkage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(
            match decode_shape::<ResourceIdentifier, D::Error>(value, "relationship data")? {
                Shape::Null => Self::Null,
                Shape::One(identifier) => Self::One(identifier),
                Shape::Many(identifiers) => Self::Many(identifiers),
            },
        )
    }
}

/// Primary data of a resource document.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryData {
    /// Explicit `null` (for example, an empty to-one related resource).
    Null,
    /// Singleton response.
    One(Box<Resource>),
    /// Collection response.
    Many(Vec<Resource>),
}

impl PrimaryData {
    const fn shape_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::One(_) => "a single resource",
            Self::Many(_) => "a collection",
        }
    }
}

impl Serialize for PrimaryData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::One(resource) => resource.serialize(serializer),
            Self::Many(resources) => resources.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for PrimaryData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(
            match decode_shape::<Resource, D::Error>(value, "primary data")? {
                Shape::Null => Self::Null,
                Shape::One(resource) => Self::One(Box::new(resource)),
                Shape::Many(resources) => Self::Many(resources),
            },
        )
    }
}

/// Top-level JSON:API document.
///
/// `D` is the primary data type: [`PrimaryData`] for resource documents and
/// [`Linkage`] for relationship documents. Both `data` and `errors` may be
/// present physically; by convention only one of them is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "D: Serialize", deserialize = "D: Deserialize<'de>"))]
pub struct Document<D = PrimaryData> {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    /// Primary data; `None` when the member is absent.
    pub data: Option<D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Error objects returned instead of data.
    pub errors: Option<Vec<ErrorObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque meta object (totals, paging counters, ...).
    pub meta: Option<Object>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Implementation information.
    pub jsonapi: Option<JsonApiObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque links object (self, pagination links, ...).
    pub links: Option<Object>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Side-loaded resources requested via `include`.
    pub included: Option<Vec<Resource>>,
}

/// Document whose primary data is resource linkage only.
pub type RelationshipDocument = Document<Linkage>;

impl<D> Default for Document<D> {
    fn default() -> Self {
        Self {
            data: None,
            errors: None,
            meta: None,
            jsonapi: None,
            links: None,
            included: None,
        }
    }
}

impl<D> Document<D> {
    /// Error objects carried by the document, empty when there are none.
    #[must_use]
    pub fn error_objects(&self) -> &[ErrorObject] {
        self.errors.as_deref().unwrap_or(&[])
    }
}

impl Document {
    /// Wrap a single resource as primary data.
    #[must_use]
    pub fn single(resource: Resource) -> Self {
        Self {
            data: Some(PrimaryData::One(Box::new(resource))),
            ..Self::default()
        }
    }

    /// Wrap a resource collection as primary data.
    #[must_use]
    pub fn collection(resources: Vec<Resource>) -> Self {
        Self {
            data: Some(PrimaryData::Many(resources)),
            ..Self::default()
        }
    }

    /// Resources carried as primary data, regardless of singleton/collection shape.
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        match &self.data {
            Some(PrimaryData::One(resource)) => slice::from_ref(resource.as_ref()),
            Some(PrimaryData::Many(resources)) => resources,
            Some(PrimaryData::Null) | None => &[],
        }
    }

    /// Consume the document and return its single primary resource.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnexpectedData`] when the data member is absent,
    /// `null`, or a collection.
    pub fn into_single(self) -> ModelResult<Resource> {
        match self.data {
            Some(PrimaryData::One(resource)) => Ok(*resource),
            Some(other) => Err(ModelError::UnexpectedData {
                expected: "a single resource",
                found: other.shape_name(),
            }),
            None => Err(ModelError::UnexpectedData {
                expected: "a single resource",
                found: "no data member",
            }),
        }
    }
}

impl RelationshipDocument {
    /// Wrap linkage as the primary data of a relationship document.
    #[must_use]
    pub fn linkage(linkage: Linkage) -> Self {
        Self {
            data: Some(linkage),
            ..Self::default()
        }
    }
}

/// `jsonapi` member describing the server implementation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JsonApiObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Highest JSON:API version supported by the server.
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque meta object.
    pub meta: Option<Object>,
}

/// Error object returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Identifier for this occurrence of the problem.
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque links object.
    pub links: Option<Object>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_status"
    )]
    /// HTTP status code, kept in the form the server sent it.
    pub status: Option<ErrorStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Application-specific error code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Short summary of the problem.
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Occurrence-specific explanation.
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Location of the problem in the request.
    pub source: Option<ErrorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Opaque meta object.
    pub meta: Option<Object>,
}

/// `status` member of an error object.
///
/// JSON:API asks for a string, but servers also send bare numbers; both are
/// written back the way they arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorStatus {
    /// String form, e.g. `"422"`.
    Text(String),
    /// Numeric form, e.g. `422`.
    Code(Number),
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Code(code) => write!(formatter, "{code}"),
        }
    }
}

impl From<&str> for ErrorStatus {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl Serialize for ErrorStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Code(code) => code.serialize(serializer),
        }
    }
}

/// Pointer to the part of the request that caused an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// JSON Pointer into the request document.
    pub pointer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Offending query parameter.
    pub parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Offending request header.
    pub header: Option<String>,
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = &self.status {
            write!(formatter, "[{status}] ")?;
        }
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => write!(formatter, "{title}: {detail}")?,
            (Some(text), None) | (None, Some(text)) => formatter.write_str(text)?,
            (None, None) => {
                formatter.write_str(self.code.as_deref().unwrap_or("unspecified error"))?;
            }
        }
        if let Some(source) = &self.source {
            if let Some(pointer) = &source.pointer {
                write!(formatter, " (at {pointer})")?;
            } else if let Some(parameter) = &source.parameter {
                write!(formatter, " (parameter {parameter})")?;
            } else if let Some(header) = &source.header {
                write!(formatter, " (header {header})")?;
            }
        }
        Ok(())
    }
}

enum Shape<T> {
    Null,
    One(T),
    Many(Vec<T>),
}

fn decode_shape<T, E>(value: Value, member: &str) -> Result<Shape<T>, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    match value {
        Value::Null => Ok(Shape::Null),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(E::custom))
            .collect::<Result<Vec<T>, E>>()
            .map(Shape::Many),
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Shape::One)
            .map_err(E::custom),
        other => Err(E::custom(format!(
            "{member} must be null, an object, or an array, found {}",
            json_kind(&other)
        ))),
    }
}

/// Keep an explicit `null` as `Some(..)`; absence is handled by `#[serde(default)]`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<ErrorStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(status)) => Ok(Some(ErrorStatus::Text(status))),
        Some(Value::Number(status)) => Ok(Some(ErrorStatus::Code(status))),
        Some(other) => Err(de::Error::custom(format!(
            "error status must be a string or number, found {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
