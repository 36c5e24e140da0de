//! Column mapping for order-independent flight extract headers
//!
//! The header line is mapped once per run; every data row is then read
//! through this immutable name to position table.

use crate::constants::columns::ESSENTIAL;
use std::collections::HashMap;

/// Column mapping built from the header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Trimmed column name to zero-based index
    pub name_to_index: HashMap<String, usize>,

    /// Header names in file order, as written
    pub headers: Vec<String>,

    /// Fields a row needs to reach the last essential column present
    min_required_columns: usize,
}

impl ColumnMapping {
    /// Build the mapping from the header's fields
    ///
    /// When a name occurs twice the later position wins.
    pub fn from_header(headers: &[String]) -> Self {
        let name_to_index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header.trim().to_string(), index))
            .collect();

        let max_essential_index = ESSENTIAL
            .iter()
            .filter_map(|name| name_to_index.get(*name).copied())
            .max()
            .unwrap_or(0);

        Self {
            name_to_index,
            headers: headers.to_vec(),
            min_required_columns: max_essential_index + 1,
        }
    }

    /// Get the index for a given column name
    pub fn get_index(&self, column_name: &str) -> Option<usize> {
        self.name_to_index.get(column_name).copied()
    }

    /// Check if a column exists in the mapping
    pub fn has_column(&self, column_name: &str) -> bool {
        self.name_to_index.contains_key(column_name)
    }

    /// `1 + max(index)` over the essential columns present in the header
    ///
    /// Essential columns missing from the header are ignored, so the minimum
    /// shrinks for file variants that omit them.
    pub fn min_required_columns(&self) -> usize {
        self.min_required_columns
    }

    /// Essential columns the header does not contain
    pub fn missing_essential_columns(&self) -> Vec<&'static str> {
        ESSENTIAL
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}
