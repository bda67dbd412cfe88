//! Tool Input Schemas
//!
//! A tagged-variant subset of JSON Schema, enough to describe tool inputs
//! and to check them before a handler runs.
//!
//! Validation is deliberately shallow. Only a top-level `object` schema
//! validates anything: the input must be an object, every `required` name
//! must be present, and each declared property that is present must have
//! the right JSON type. Nested objects and array elements are not inspected,
//! and a non-object top-level schema accepts any input.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Why an input was rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Expected input to be an object")]
    ExpectedObject,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field \"{field}\" expected type \"{expected}\", got \"{actual}\"")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object {
        /// Declared properties in declaration order
        properties: Vec<(String, Schema)>,
        required: Vec<String>,
    },
    String,
    Number,
    Integer,
    Boolean,
    Array,
    /// No or unknown `type`; matches anything
    Any,
}

impl SchemaKind {
    /// The JSON Schema `type` keyword, if any.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::Object { .. } => Some("object"),
            Self::String => Some("string"),
            Self::Number => Some("number"),
            Self::Integer => Some("integer"),
            Self::Boolean => Some("boolean"),
            Self::Array => Some("array"),
            Self::Any => None,
        }
    }

    /// Runtime type test for a single value.
    ///
    /// `integer` accepts any JSON number.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Object { .. } => value.is_object(),
            Self::String => value.is_string(),
            Self::Number | Self::Integer => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Any => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: SchemaKind,
    pub description: Option<String>,
}

impl Schema {
    fn of(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    /// An object schema with no properties.
    pub fn object() -> Self {
        Self::of(SchemaKind::Object {
            properties: Vec::new(),
            required: Vec::new(),
        })
    }

    pub fn string() -> Self {
        Self::of(SchemaKind::String)
    }

    pub fn number() -> Self {
        Self::of(SchemaKind::Number)
    }

    pub fn integer() -> Self {
        Self::of(SchemaKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaKind::Boolean)
    }

    pub fn array() -> Self {
        Self::of(SchemaKind::Array)
    }

    pub fn any() -> Self {
        Self::of(SchemaKind::Any)
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares (or redeclares) a property. No-op on non-object schemas.
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        if let SchemaKind::Object { properties, .. } = &mut self.kind {
            let name = name.into();
            match properties.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => *existing = schema,
                None => properties.push((name, schema)),
            }
        }
        self
    }

    /// Marks properties as required. No-op on non-object schemas.
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let SchemaKind::Object { required, .. } = &mut self.kind {
            for name in names {
                let name = name.into();
                if !required.contains(&name) {
                    required.push(name);
                }
            }
        }
        self
    }

    /// Checks `input` against this schema. See the module docs for the rules.
    pub fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        let SchemaKind::Object {
            properties,
            required,
        } = &self.kind
        else {
            return Ok(());
        };

        let fields = input.as_object().ok_or(ValidationError::ExpectedObject)?;

        if let Some(missing) = required.iter().find(|name| !fields.contains_key(*name)) {
            return Err(ValidationError::MissingField(missing.clone()));
        }

        for (name, property) in properties {
            let Some(value) = fields.get(name) else {
                continue;
            };
            let Some(expected) = property.kind.type_name() else {
                continue;
            };
            if !property.kind.matches(value) {
                return Err(ValidationError::TypeMismatch {
                    field: name.clone(),
                    expected,
                    actual: json_type_name(value),
                });
            }
        }

        Ok(())
    }

    /// Renders the schema as JSON Schema.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        if let Some(type_name) = self.kind.type_name() {
            out.insert("type".into(), json!(type_name));
        }
        if let Some(description) = &self.description {
            out.insert("description".into(), json!(description));
        }
        if let SchemaKind::Object {
            properties,
            required,
        } = &self.kind
        {
            let props: Map<String, Value> = properties
                .iter()
                .map(|(name, schema)| (name.clone(), schema.to_value()))
                .collect();
            out.insert("properties".into(), Value::Object(props));
            if !required.is_empty() {
                out.insert("required".into(), json!(required));
            }
        }
        Value::Object(out)
    }

    /// Parses a loosely-typed JSON Schema value.
    ///
    /// Missing or unrecognised `type` keywords become [`SchemaKind::Any`];
    /// non-string `required` entries are ignored.
    pub fn from_value(value: &Value) -> Self {
        let description = value
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);

        let kind = match value.get("type").and_then(Value::as_str) {
            Some("object") => SchemaKind::Object {
                properties: value
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| {
                        props
                            .iter()
                            .map(|(name, prop)| (name.clone(), Schema::from_value(prop)))
                            .collect()
                    })
                    .unwrap_or_default(),
                required: value
                    .get("required")
                    .and_then(Value::as_array)
                    .map(|names| {
                        names
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            Some("string") => SchemaKind::String,
            Some("number") => SchemaKind::Number,
            Some("integer") => SchemaKind::Integer,
            Some("boolean") => SchemaKind::Boolean,
            Some("array") => SchemaKind::Array,
            _ => SchemaKind::Any,
        };

        Self { kind, description }
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// JSON type name of a value, as reported in validation errors.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
