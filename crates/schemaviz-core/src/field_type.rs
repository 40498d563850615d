//! Field type tags as reported by the schema source.
//!
//! The source hands us free-form strings (`string`, `Id<"users">`, `Array<number>` ...).
//! Anything we do not recognise is kept verbatim as [`FieldType::Opaque`] so the
//! diagram can still show a label for it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*Id\s*<\s*["']([^"']+)["']\s*>\s*$"#).expect("reference pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Explicit reference to another table's `_id`.
    Reference(String),
    String,
    Number,
    Boolean,
    BigInt,
    Bytes,
    Null,
    Any,
    Array,
    Object,
    Opaque(String),
}

impl FieldType {
    pub fn parse(raw: &str) -> Self {
        if let Some(caps) = REFERENCE_PATTERN.captures(raw) {
            return FieldType::Reference(caps[1].to_string());
        }

        let trimmed = raw.trim();
        match trimmed {
            "string" => FieldType::String,
            "number" | "float64" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "bigint" | "int64" => FieldType::BigInt,
            "bytes" => FieldType::Bytes,
            "null" => FieldType::Null,
            "any" => FieldType::Any,
            "array" | "Array" => FieldType::Array,
            "object" | "Object" => FieldType::Object,
            _ if trimmed.starts_with("Array<") => FieldType::Array,
            _ => FieldType::Opaque(trimmed.to_string()),
        }
    }

    /// Target table of a typed reference.
    pub fn referenced_table(&self) -> Option<&str> {
        match self {
            FieldType::Reference(table) => Some(table.as_str()),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, FieldType::Reference(_))
    }

    /// Label shown in a node's field row. Opaque types keep their raw text.
    pub fn display_label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Reference(table) => write!(f, "Id<\"{}\">", table),
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::BigInt => write!(f, "bigint"),
            FieldType::Bytes => write!(f, "bytes"),
            FieldType::Null => write!(f, "null"),
            FieldType::Any => write!(f, "any"),
            FieldType::Array => write!(f, "array"),
            FieldType::Object => write!(f, "object"),
            FieldType::Opaque(raw) => write!(f, "{}", raw),
        }
    }
}
