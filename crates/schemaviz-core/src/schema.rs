use crate::error::{EngineError, EngineResult};
use crate::field_type::FieldType;
use serde::{Deserialize, Serialize};

/// A single column/field as reported by the schema source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub name: String,
    /// Raw type tag, e.g. `string` or `Id<"users">`.
    #[serde(rename = "type")]
    pub field_type: String,
    pub optional: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn parsed_type(&self) -> FieldType {
        FieldType::parse(&self.field_type)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub fields: Vec<Field>,
    pub document_count: u64,
    pub has_indexes: bool,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_document_count(mut self, count: u64) -> Self {
        self.document_count = count;
        self
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.document_count == 0
    }
}

/// Everything the schema collaborator hands over in one refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSnapshot {
    pub tables: Vec<Table>,
}

impl SchemaSnapshot {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        // Accept either `{ "tables": [...] }` or a bare array of tables.
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| EngineError::Snapshot(e.to_string()))?;
        let snapshot = if value.is_array() {
            SchemaSnapshot {
                tables: serde_json::from_value(value)
                    .map_err(|e| EngineError::Snapshot(e.to_string()))?,
            }
        } else {
            serde_json::from_value(value).map_err(|e| EngineError::Snapshot(e.to_string()))?
        };
        Ok(snapshot)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
