//! Aggregating filtered records by year and by category.

use crate::dataset::{CATEGORY_COLUMN, YEAR_COLUMN, Year, parse_year};
use crate::errors::{Result, no_category_data};
use crate::filter::FilteredSet;
use std::collections::{BTreeMap, HashMap};

/// Papers per year, iterated in ascending year order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearlyCounts {
    counts: BTreeMap<Year, u64>,
}

impl YearlyCounts {
    pub fn from_years<I>(years: I) -> YearlyCounts
    where
        I: IntoIterator<Item = Year>,
    {
        let mut counts = BTreeMap::new();
        for year in years {
            *counts.entry(year).or_insert(0) += 1;
        }
        YearlyCounts { counts }
    }

    pub fn counts(&self) -> &BTreeMap<Year, u64> {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The year with the highest count. Scanning ascending means a tie goes
    /// to the smallest year.
    pub fn peak(&self) -> Option<(Year, u64)> {
        let mut best = None;
        for (&year, &count) in &self.counts {
            match best {
                Some((_, c)) if count <= c => (),
                _ => best = Some((year, count)),
            }
        }
        best
    }

    /// The covered years as a "min-max" string.
    pub fn range_string(&self) -> String {
        match (self.counts.first_key_value(), self.counts.last_key_value()) {
            (Some((&min, _)), Some((&max, _))) => format!("{min}-{max}"),
            _ => String::new(),
        }
    }
}

/// Count the filtered rows per publication year, dropping rows whose year
/// cell is blank or unparseable.
pub fn count_by_year(set: &FilteredSet) -> Result<YearlyCounts> {
    let col = set.table().require_column(YEAR_COLUMN)?;
    let counts = YearlyCounts::from_years(
        set.indices()
            .iter()
            .filter_map(|&row| parse_year(set.table().cell(row, col))),
    );
    if counts.is_empty() {
        return Err("no publication year data in matching records".into());
    }
    Ok(counts)
}

/// A frequency counter that remembers first-seen order, so ties are broken
/// by the order in which categories were first encountered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    items: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl CategoryCounts {
    /// Split a semicolon-delimited field into trimmed tokens and count each
    /// surviving token. A token repeated within one field counts once per
    /// occurrence.
    pub fn add_field(&mut self, field: &str) {
        for token in field.split(';') {
            let token = token.trim();
            if !token.is_empty() {
                self.add(token);
            }
        }
    }

    fn add(&mut self, token: &str) {
        match self.index.get(token) {
            Some(&i) => self.items[i].1 += 1,
            None => {
                self.index.insert(token.to_owned(), self.items.len());
                self.items.push((token.to_owned(), 1));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.items.iter().map(|(_, c)| c).sum()
    }

    /// All entries in first-seen order.
    pub fn entries(&self) -> Vec<(String, u64)> {
        self.items.clone()
    }

    /// The `n` highest counts, sorted descending; the stable sort keeps
    /// first-seen order for ties.
    pub fn top_n(&self, n: usize) -> Vec<(String, u64)> {
        let mut sorted = self.items.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }

    /// The category with the highest count, first-seen wins ties.
    pub fn most_active(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (name, &count) in self.items.iter().map(|(n, c)| (n.as_str(), c)) {
            match best {
                Some((_, c)) if count <= c => (),
                _ => best = Some((name, count)),
            }
        }
        best
    }
}

/// Tokenize and count the category field across the filtered rows.
pub fn count_categories(set: &FilteredSet) -> Result<CategoryCounts> {
    let col = set.table().require_column(CATEGORY_COLUMN)?;
    let mut counts = CategoryCounts::default();
    for &row in set.indices() {
        if let Some(field) = set.table().cell_opt(row, col) {
            counts.add_field(field);
        }
    }
    if counts.is_empty() {
        return Err(no_category_data());
    }
    Ok(counts)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dataset::{KEYWORD_COLUMN, Table};
    use crate::errors::NoCategoryData;
    use crate::filter;

    fn table(rows: &[(&str, &str, &str)]) -> Table {
        Table::new(
            vec![
                KEYWORD_COLUMN.to_owned(),
                YEAR_COLUMN.to_owned(),
                CATEGORY_COLUMN.to_owned(),
            ],
            rows.iter()
                .map(|(k, y, c)| vec![(*k).to_owned(), (*y).to_owned(), (*c).to_owned()])
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn count_by_year_drops_blank_years() {
        let table = table(&[("ml", "2019", ""), ("ml", "", ""), ("ml", "2021", "")]);
        let set = filter::filter(&table, "ml").unwrap();
        let counts = count_by_year(&set).unwrap();
        assert_eq!(counts.total(), 2);
        assert_eq!(
            counts.counts().iter().collect::<Vec<_>>(),
            [(&2019, &1), (&2021, &1)]
        );
    }

    #[test]
    fn peak_tie_goes_to_smallest_year() {
        let counts = YearlyCounts::from_years([2021, 2019, 2021, 2019, 2020]);
        assert_eq!(counts.peak(), Some((2019, 2)));
        assert_eq!(counts.range_string(), "2019-2021");
    }

    #[test]
    fn count_by_year_all_blank_is_an_error() {
        let table = table(&[("ml", "", "")]);
        let set = filter::filter(&table, "ml").unwrap();
        assert!(count_by_year(&set).is_err());
    }

    #[test]
    fn duplicate_tokens_count_per_occurrence() {
        // Repeated tokens in one field are deliberately not collapsed; this
        // mirrors the upstream pipeline that feeds these exports.
        let mut counts = CategoryCounts::default();
        counts.add_field("Computer Science; Engineering;  Engineering ");
        assert_eq!(
            counts.entries(),
            [("Computer Science".to_owned(), 1), ("Engineering".to_owned(), 2)]
        );
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn empty_tokens_are_dropped() {
        let mut counts = CategoryCounts::default();
        counts.add_field("; ; Physics ;;");
        assert_eq!(counts.entries(), [("Physics".to_owned(), 1)]);
    }

    #[test]
    fn top_n_ties_keep_first_seen_order() {
        let mut counts = CategoryCounts::default();
        counts.add_field("B; A; A; C; B; D");
        assert_eq!(
            counts.top_n(3),
            [
                ("B".to_owned(), 2),
                ("A".to_owned(), 2),
                ("C".to_owned(), 1)
            ]
        );
        assert_eq!(counts.most_active(), Some(("B", 2)));
    }

    #[test]
    fn count_categories_without_tokens_is_distinct_error() {
        let table = table(&[("ml", "2019", ""), ("ml", "2020", " ; ")]);
        let set = filter::filter(&table, "ml").unwrap();
        let e = count_categories(&set).unwrap_err();
        assert!(e.downcast_ref::<NoCategoryData>().is_some());
    }

    #[test]
    fn category_sum_can_exceed_row_count() {
        let table = table(&[
            ("ml", "2019", "Computer Science; Engineering"),
            ("ml", "2020", "Computer Science"),
        ]);
        let set = filter::filter(&table, "ml").unwrap();
        let counts = count_categories(&set).unwrap();
        assert!(counts.total() >= set.len() as u64);
        assert_eq!(counts.total(), 3);
    }
}
