//! Schema representation for the floor plan record shape.
//!
//! This module provides the [`Schema`] tree, the [`SchemaInfo`] trait that
//! types implement to describe themselves, and the [`ClosedSet`] trait for
//! string enumerations with a fixed set of accepted values.
//!
//! The model types describe themselves here once. The parser validates
//! against those same types and the format instructions are rendered from
//! this tree, so the prompt and the validator cannot drift apart.

use serde_json::{json, Map, Value};

use crate::error::SchemaViolation;

/// Describes the JSON shape a type is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// String type
    String,

    /// Object with named fields
    Object {
        /// Name of the type (e.g. "Room")
        name: String,
        /// Fields in declaration order
        fields: Vec<Field>,
    },

    /// Array of elements
    Array(Box<Schema>),

    /// Value that may be null or absent
    Optional(Box<Schema>),

    /// String restricted to a closed set of values
    Enum {
        /// Name of the enumeration (e.g. "RoomType")
        name: String,
        /// Accepted values in canonical order
        values: Vec<String>,
    },
}

impl Schema {
    /// Returns a human-readable name for the schema type.
    pub fn type_name(&self) -> String {
        match self {
            Schema::String => "string".to_string(),
            Schema::Object { name, .. } => name.clone(),
            Schema::Array(inner) => format!("array<{}>", inner.type_name()),
            Schema::Optional(inner) => format!("optional<{}>", inner.type_name()),
            Schema::Enum { name, .. } => name.clone(),
        }
    }

    /// Renders this schema as a JSON Schema document.
    ///
    /// Objects are inlined rather than referenced through definitions, and
    /// only fields marked required appear in `required`.
    ///
    /// # Examples
    ///
    /// ```
    /// use floorplan::schema::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::Array(Box::new(Schema::String));
    /// assert_eq!(
    ///     schema.to_json_schema(),
    ///     json!({"type": "array", "items": {"type": "string"}})
    /// );
    /// ```
    pub fn to_json_schema(&self) -> Value {
        match self {
            Schema::String => json!({"type": "string"}),
            Schema::Array(inner) => json!({
                "type": "array",
                "items": inner.to_json_schema(),
            }),
            Schema::Optional(inner) => json!({
                "anyOf": [inner.to_json_schema(), {"type": "null"}],
            }),
            Schema::Enum { name, values } => json!({
                "title": name,
                "type": "string",
                "enum": values,
            }),
            Schema::Object { name, fields } => {
                let mut properties = Map::new();
                let mut required = Vec::new();

                for field in fields {
                    let mut property = field.schema.to_json_schema();
                    if let (Some(description), Value::Object(map)) =
                        (&field.description, &mut property)
                    {
                        map.insert("description".to_string(), json!(description));
                    }
                    properties.insert(field.name.clone(), property);

                    if field.required {
                        required.push(field.name.clone());
                    }
                }

                json!({
                    "title": name,
                    "type": "object",
                    "properties": properties,
                    "required": required,
                })
            }
        }
    }
}

/// Represents a field in an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name as it appears in JSON
    pub name: String,
    /// Field type schema
    pub schema: Schema,
    /// Whether the field is required
    pub required: bool,
    /// Text shown to the model for this field
    pub description: Option<String>,
}

impl Field {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
            description: None,
        }
    }

    /// Mark this field as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attach a description for the format instructions.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Trait for types that can describe their JSON shape.
///
/// Closed enumerations get this from `#[derive(ClosedSet)]`; the room and
/// floor plan types implement it by hand.
pub trait SchemaInfo {
    /// Returns the schema for this type.
    fn schema() -> Schema;
}

impl SchemaInfo for String {
    fn schema() -> Schema {
        Schema::String
    }
}

impl<T: SchemaInfo> SchemaInfo for Option<T> {
    fn schema() -> Schema {
        Schema::Optional(Box::new(T::schema()))
    }
}

impl<T: SchemaInfo> SchemaInfo for Vec<T> {
    fn schema() -> Schema {
        Schema::Array(Box::new(T::schema()))
    }
}

/// A string enumeration with a fixed set of accepted values.
///
/// Implemented with `#[derive(ClosedSet)]`. Matching is exact: no case
/// folding or fuzzy matching is applied, so anything outside the set is
/// rejected.
pub trait ClosedSet: Copy + Sized + 'static {
    /// Name of the enumeration, used in error messages.
    const SET_NAME: &'static str;

    /// Every variant, in canonical order.
    const VARIANTS: &'static [Self];

    /// Canonical string for this variant.
    fn as_str(&self) -> &'static str;

    /// Looks up the variant whose canonical string is exactly `value`.
    fn from_canonical(value: &str) -> Option<Self>;

    /// Like [`ClosedSet::from_canonical`], but reports a violation for `field`.
    fn parse_field(field: &'static str, value: &str) -> Result<Self, SchemaViolation> {
        Self::from_canonical(value)
            .ok_or_else(|| SchemaViolation::unknown_value(field, Self::SET_NAME, value))
    }

    /// Canonical strings of every variant, in order.
    fn canonical_values() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_type_name() {
        let schema = Schema::Array(Box::new(Schema::Optional(Box::new(Schema::String))));
        assert_eq!(schema.type_name(), "array<optional<string>>");
    }

    #[test]
    fn test_field_builder() {
        let field = Field::new("size", Schema::String)
            .optional()
            .with_description("relative size");
        assert!(!field.required);
        assert_eq!(field.description.as_deref(), Some("relative size"));
    }

    #[test]
    fn test_object_json_schema() {
        let schema = Schema::Object {
            name: "Thing".to_string(),
            fields: vec![
                Field::new("name", Schema::String).with_description("its name"),
                Field::new("kind", <Option<String>>::schema()).optional(),
            ],
        };

        assert_eq!(
            schema.to_json_schema(),
            json!({
                "title": "Thing",
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "its name"},
                    "kind": {"anyOf": [{"type": "string"}, {"type": "null"}]},
                },
                "required": ["name"],
            })
        );
    }

    #[test]
    fn test_enum_json_schema() {
        let schema = Schema::Enum {
            name: "Side".to_string(),
            values: vec!["north".to_string(), "south".to_string()],
        };
        assert_eq!(
            schema.to_json_schema(),
            json!({"title": "Side", "type": "string", "enum": ["north", "south"]})
        );
    }
}
