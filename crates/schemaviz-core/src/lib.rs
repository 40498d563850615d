pub mod error;
pub mod field_type;
pub mod schema;

pub use error::{EngineError, EngineResult};
pub use field_type::FieldType;
pub use schema::{Field, SchemaSnapshot, Table};

/// Node identifier. A node is keyed by the name of the table it draws.
pub type TableName = String;
