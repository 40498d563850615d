use crate::model::Node;
use schemaviz_core::Table;
use serde::{Deserialize, Serialize};

/// Visibility predicate. Empty substrings match everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub table_name_substring: String,
    pub field_name_substring: String,
    pub field_type_substring: String,
    pub show_empty_tables: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            table_name_substring: String::new(),
            field_name_substring: String::new(),
            field_type_substring: String::new(),
            show_empty_tables: true,
        }
    }
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        *self != FilterCriteria::default()
    }

    pub fn matches(&self, table: &Table) -> bool {
        if !contains_ignore_case(&table.name, &self.table_name_substring) {
            return false;
        }
        if table.is_empty() && !self.show_empty_tables {
            return false;
        }
        if self.field_name_substring.is_empty() && self.field_type_substring.is_empty() {
            return true;
        }
        table.fields.iter().any(|field| {
            contains_ignore_case(&field.name, &self.field_name_substring)
                && contains_ignore_case(&field.field_type, &self.field_type_substring)
        })
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Set `visible` on every node. Returns the visible count.
pub fn apply_filter(nodes: &mut [Node], criteria: &FilterCriteria) -> usize {
    let mut visible = 0;
    for node in nodes.iter_mut() {
        node.visible = criteria.matches(&node.table);
        if node.visible {
            visible += 1;
        }
    }
    tracing::debug!(visible, total = nodes.len(), "filter applied");
    visible
}
