use schemaviz_core::{Field, SchemaSnapshot, Table};

/// Synthetic schema where every table after the first references its
/// predecessor, alternating typed ids and `<table>Id` naming.
pub fn generate_synthetic_schema(table_count: usize) -> SchemaSnapshot {
    let tables = (0..table_count)
        .map(|i| {
            let name = format!("table_{i}s");
            let mut fields = vec![
                Field::new("_id", format!("Id<\"{name}\">")),
                Field::new("_creationTime", "number"),
                Field::new("label", "string"),
                Field::new("note", "string").optional(),
            ];
            if i > 0 {
                let parent = format!("table_{}s", i - 1);
                if i % 2 == 0 {
                    fields.push(Field::new("parent", format!("Id<\"{parent}\">")));
                } else {
                    fields.push(Field::new(format!("table_{}Id", i - 1), "string"));
                }
            }
            Table::new(name)
                .with_document_count(i as u64 * 10)
                .with_fields(fields)
        })
        .collect();
    SchemaSnapshot::new(tables)
}

pub fn synthetic_schema_json(table_count: usize) -> String {
    serde_json::to_string(&generate_synthetic_schema(table_count)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_but_first_has_a_parent() {
        let schema = generate_synthetic_schema(4);
        let edges = schemaviz_graph::infer_relationships(&schema.tables);
        assert_eq!(edges.len(), 3);
        assert_eq!(edges.iter().filter(|e| e.inferred).count(), 2);
    }

    #[test]
    fn test_json_parses_back() {
        let json = synthetic_schema_json(3);
        let schema = SchemaSnapshot::from_json(&json).unwrap();
        assert_eq!(schema.table_count(), 3);
    }
}
