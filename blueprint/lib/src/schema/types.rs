//! Typed representation of an abstract, database-agnostic schema.
//!
//! These types mirror the JSON shape exchanged with the model providers.
//! Keys are camelCase on the wire (`primaryKey`, `notNull`) and optional
//! constraint flags are omitted when unset.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A complete proposed database design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AbstractSchema {
    /// Tables/entities in the design. At least one.
    pub models: Vec<Model>,
}

/// One table or entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Model {
    /// Table identifier, conventionally snake_case and plural.
    pub name: String,
    /// Column definitions in declaration order. At least one.
    pub fields: Vec<Field>,
}

/// One column within a [`Model`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default, skip_serializing_if = "is_false")]
    pub primary_key: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub not_null: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,

    /// Literal default value, e.g. `"now()"` or `"false"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Reference>,
}

/// A foreign-key pointer to another model's field.
///
/// Purely structural; nothing checks that the target exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Reference {
    pub model: String,
    pub field: String,
}

/// Database-agnostic column types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldType {
    Serial,
    Integer,
    Bigint,
    Text,
    Varchar,
    Boolean,
    Date,
    Timestamp,
    Decimal,
    Float,
    Json,
    Jsonb,
    Uuid,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Field {
    /// Creates a field with no constraints.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            primary_key: false,
            not_null: false,
            unique: false,
            default: None,
            references: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }

    pub fn references(mut self, model: impl Into<String>, field: impl Into<String>) -> Self {
        self.references = Some(Reference {
            model: model.into(),
            field: field.into(),
        });
        self
    }

    /// Constraint annotations in display order.
    ///
    /// ## Examples
    ///
    /// ```
    /// use blueprint_lib::schema::{Field, FieldType};
    ///
    /// let field = Field::new("id", FieldType::Serial).primary_key().not_null();
    /// assert_eq!(field.constraints(), vec!["primary_key", "not_null"]);
    /// ```
    pub fn constraints(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.primary_key {
            out.push("primary_key".to_string());
        }
        if self.not_null {
            out.push("not_null".to_string());
        }
        if self.unique {
            out.push("unique".to_string());
        }
        if let Some(default) = &self.default {
            out.push(format!("default={default}"));
        }
        if let Some(reference) = &self.references {
            out.push(format!("references {}.{}", reference.model, reference.field));
        }
        out
    }
}

impl Model {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

impl AbstractSchema {
    pub fn new(models: Vec<Model>) -> Self {
        Self { models }
    }

    /// Readable JSON, as embedded in revision prompts.
    pub fn to_pretty_json(&self) -> String {
        // A tree of strings, bools and enums cannot fail to serialize.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
