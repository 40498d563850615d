//! Relationship inference from table/field metadata.
//!
//! Two passes per field:
//! 1. typed references (`Id<"T">`) produce `inferred = false` edges;
//! 2. fields not covered by a typed edge are matched against the naming
//!    convention `<table>id`, `<singular>id`, `<singular>_id`, `<table>_id`.
//!
//! Plural handling only strips a trailing `s`, so `categories` does not pair
//! with `categoryId`.

use crate::model::Edge;
use schemaviz_core::Table;
use std::collections::HashSet;

pub fn infer_relationships(tables: &[Table]) -> Vec<Edge> {
    let names: HashSet<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    let lowered: Vec<(&str, String)> = tables
        .iter()
        .map(|t| (t.name.as_str(), t.name.to_lowercase()))
        .collect();

    let mut edges = Vec::new();
    let mut seen: HashSet<(String, String, String)> = HashSet::new();

    for table in tables {
        for field in &table.fields {
            let typed_target = field
                .parsed_type()
                .referenced_table()
                .filter(|target| *target != table.name && names.contains(target))
                .map(str::to_string);

            if let Some(target) = typed_target {
                let key = (table.name.clone(), target.clone(), field.name.clone());
                if seen.insert(key) {
                    edges.push(Edge::typed(&table.name, &target, &field.name));
                }
                continue;
            }

            let field_lower = field.name.to_lowercase();
            for (other, other_lower) in &lowered {
                if *other == table.name {
                    continue;
                }
                if !matches_naming_convention(&field_lower, other_lower) {
                    continue;
                }
                let key = (table.name.clone(), other.to_string(), field.name.clone());
                if seen.insert(key) {
                    edges.push(Edge::inferred(&table.name, other, &field.name));
                }
            }
        }
    }

    tracing::debug!(
        tables = tables.len(),
        edges = edges.len(),
        "relationship inference complete"
    );
    edges
}

fn matches_naming_convention(field_lower: &str, table_lower: &str) -> bool {
    let singular = table_lower.strip_suffix('s').unwrap_or(table_lower);
    [
        format!("{table_lower}id"),
        format!("{singular}id"),
        format!("{singular}_id"),
        format!("{table_lower}_id"),
    ]
    .iter()
    .any(|candidate| candidate == field_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaviz_core::Field;

    fn table(name: &str, fields: &[(&str, &str)]) -> Table {
        Table::new(name).with_fields(
            fields
                .iter()
                .map(|(n, t)| Field::new(*n, *t))
                .collect(),
        )
    }

    #[test]
    fn test_typed_reference_produces_single_edge() {
        let tables = vec![
            table("users", &[]),
            table("posts", &[("authorId", r#"Id<"users">"#)]),
        ];
        let edges = infer_relationships(&tables);
        assert_eq!(edges, vec![Edge::typed("posts", "users", "authorId")]);
        assert_eq!(edges[0].to_field, "_id");
    }

    #[test]
    fn test_heuristic_match() {
        let tables = vec![
            table("users", &[]),
            table("comments", &[("userId", "string")]),
        ];
        let edges = infer_relationships(&tables);
        assert_eq!(edges, vec![Edge::inferred("comments", "users", "userId")]);
    }

    #[test]
    fn test_each_field_produces_its_own_edge() {
        let tables = vec![
            table("users", &[]),
            table("comments", &[("userId", "string"), ("user_id", "string")]),
        ];
        let edges = infer_relationships(&tables);
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.inferred && e.to == "users"));
    }

    #[test]
    fn test_typed_field_skips_heuristic() {
        let tables = vec![
            table("users", &[]),
            table("posts", &[("userId", r#"Id<"users">"#)]),
        ];
        let edges = infer_relationships(&tables);
        assert_eq!(edges.len(), 1);
        assert!(!edges[0].inferred);
    }

    #[test]
    fn test_no_self_edges() {
        let tables = vec![table(
            "users",
            &[("_id", r#"Id<"users">"#), ("userId", "string")],
        )];
        assert!(infer_relationships(&tables).is_empty());
    }

    #[test]
    fn test_reference_to_missing_table_falls_through() {
        let tables = vec![
            table("users", &[]),
            table("posts", &[("usersId", r#"Id<"ghosts">"#)]),
        ];
        let edges = infer_relationships(&tables);
        assert_eq!(edges, vec![Edge::inferred("posts", "users", "usersId")]);
    }

    #[test]
    fn test_malformed_type_does_not_fail() {
        let tables = vec![
            table("users", &[]),
            table("posts", &[("authorId", "Id<<users")]),
        ];
        assert!(infer_relationships(&tables).is_empty());
    }

    #[test]
    fn test_irregular_plural_is_not_matched() {
        let tables = vec![
            table("categories", &[]),
            table("products", &[("categoryId", "string")]),
        ];
        assert!(infer_relationships(&tables).is_empty());
    }

    #[test]
    fn test_naming_convention_is_case_insensitive() {
        let tables = vec![
            table("Users", &[]),
            table("posts", &[("USER_ID", "string")]),
        ];
        let edges = infer_relationships(&tables);
        assert_eq!(edges, vec![Edge::inferred("posts", "Users", "USER_ID")]);
    }
}
