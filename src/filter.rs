//! Keyword filtering over the loaded table.

use crate::dataset::{KEYWORD_COLUMN, Table};
use crate::errors::{Result, invalid_input_ref};
use itertools::Itertools;
use log::debug;

/// A view of the records matching a keyword, in source order.
#[derive(Debug)]
pub struct FilteredSet<'a> {
    table: &'a Table,
    rows: Vec<usize>,
}

impl<'a> FilteredSet<'a> {
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Indices of the matching rows, in source order.
    pub fn indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trim the keyword and reject blank input.
pub fn normalize_keyword(keyword: &str) -> Result<String> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Err(invalid_input_ref("keyword must not be blank"));
    }
    Ok(trimmed.to_owned())
}

/// Select the rows whose keyword column contains `keyword` as a
/// case-insensitive substring. Blank cells never match. The keyword is
/// assumed to be already normalized with [normalize_keyword].
pub fn filter<'a>(table: &'a Table, keyword: &str) -> Result<FilteredSet<'a>> {
    let col = table.require_column(KEYWORD_COLUMN)?;
    let needle = keyword.to_lowercase();
    let rows = (0..table.len())
        .filter(|&row| match table.cell_opt(row, col) {
            Some(value) => value.to_lowercase().contains(&needle),
            None => false,
        })
        .collect_vec();
    debug!(
        "keyword '{}' matched {} of {} records",
        keyword,
        rows.len(),
        table.len()
    );
    Ok(FilteredSet { table, rows })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::{InvalidInput, SchemaError};

    fn table(keywords: &[&str]) -> Table {
        Table::new(
            vec![KEYWORD_COLUMN.to_owned()],
            keywords
                .iter()
                .map(|k| vec![(*k).to_owned()])
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn normalize_trims() {
        assert_eq!(normalize_keyword("  deep learning ").unwrap(), "deep learning");
    }

    #[test]
    fn normalize_rejects_blank() {
        for keyword in ["", "   ", "\t"] {
            let e = normalize_keyword(keyword).unwrap_err();
            assert!(e.downcast_ref::<InvalidInput>().is_some());
        }
    }

    #[test]
    fn filter_is_case_insensitive() {
        let table = table(&["Machine Learning (ML)", "statistics"]);
        assert_eq!(filter(&table, "ML").unwrap().indices(), [0]);
        assert_eq!(filter(&table, "ml").unwrap().indices(), [0]);
    }

    #[test]
    fn filter_preserves_order_and_skips_blanks() {
        let table = table(&["deep learning", "", "graph learning", "chemistry"]);
        let set = filter(&table, "learning").unwrap();
        assert_eq!(set.indices(), [0, 2]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn filter_empty_is_not_an_error() {
        let table = table(&["chemistry"]);
        let set = filter(&table, "biology").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn filter_requires_keyword_column() {
        let table = Table::new(vec!["Other".to_owned()], vec![]);
        let e = filter(&table, "x").unwrap_err();
        let schema = e.downcast_ref::<SchemaError>().unwrap();
        assert_eq!(schema.0, [KEYWORD_COLUMN]);
    }
}
