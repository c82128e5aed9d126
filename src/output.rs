//! Data structures for representing the payloads returned over the
//! operation boundary.
//!
//! Every operation hands back one of three disjoint shapes: a success
//! payload carrying `status: "success"`, an informational empty-result
//! payload (`message`, `total_papers: 0`), or an error payload with a
//! single `error` key. Callers discriminate by the presence of `error`
//! first, then by `status`/`message`.

use crate::dataset::Year;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub const STATUS_SUCCESS: &str = "success";

/// Frequency counts serialized as a JSON object in iteration order
/// (insertion order for full maps, descending count for top-N views).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedCounts(pub Vec<(String, u64)>);

impl Serialize for OrderedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YearlyAnalysis {
    pub keyword: String,
    pub analysis_type: String,
    pub total_papers: u64,
    pub year_range: String,
    pub peak_year: Year,
    pub peak_count: u64,
    pub yearly_data: BTreeMap<Year, u64>,
    pub graph_saved_to: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAnalysis {
    pub keyword: String,
    pub analysis_type: String,
    pub total_papers: u64,
    pub total_unique_categories: usize,
    pub most_active_field: String,
    pub most_active_count: u64,
    pub top_15_categories: OrderedCounts,
    pub all_categories_count: OrderedCounts,
    pub graph_saved_to: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub total_papers: u64,
    pub research_period: String,
    pub peak_research_year: Year,
    pub peak_year_papers: u64,
    pub most_active_research_field: String,
    pub most_active_field_papers: u64,
    pub total_research_fields: usize,
}

#[derive(Debug, Serialize)]
pub struct DetailedResults {
    pub yearly_analysis: YearlyAnalysis,
    pub category_analysis: CategoryAnalysis,
}

#[derive(Debug, Serialize)]
pub struct ComprehensiveAnalysis {
    pub keyword: String,
    pub analysis_type: String,
    pub overview: Overview,
    pub detailed_results: DetailedResults,
    pub status: String,
}

/// The informational "no rows matched" payload. Deliberately not an error.
#[derive(Debug, Clone, Serialize)]
pub struct EmptyResult {
    pub keyword: String,
    pub message: String,
    pub total_papers: u64,
}

impl EmptyResult {
    pub fn new(keyword: &str) -> EmptyResult {
        EmptyResult {
            keyword: keyword.to_owned(),
            message: format!("no papers matched keyword '{keyword}'"),
            total_papers: 0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OError {
    pub error: String,
}

/// The discriminated union of the three payload shapes. Serialized
/// untagged, so the JSON is exactly the inner shape.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response<T> {
    Success(T),
    Empty(EmptyResult),
    Failed(OError),
}

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub total_papers: usize,
    pub total_columns: usize,
    pub columns_list: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct YearInfo {
    pub year_range: String,
    pub total_years: usize,
    pub most_productive_year: Year,
}

#[derive(Debug, Serialize)]
pub struct KeywordInfo {
    pub papers_with_keywords: usize,
    pub sample_keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub total_unique_categories: usize,
    pub most_common_categories: OrderedCounts,
}

#[derive(Debug, Serialize)]
pub struct FilePaths {
    pub csv_file: String,
    pub graphs_folder: String,
}

/// Whole-table overview, independent of any keyword. Sections for columns
/// absent from the table are omitted rather than failing.
#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    pub dataset_info: DatasetSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_info: Option<YearInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_info: Option<KeywordInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_info: Option<CategoryInfo>,
    pub file_paths: FilePaths,
}

#[derive(Debug, Serialize)]
pub struct FileStatus {
    pub csv_file_exists: bool,
    pub csv_file_path: String,
    pub graphs_folder_exists: bool,
    pub graphs_folder_path: String,
}

#[derive(Debug, Serialize)]
pub struct DataStatus {
    pub data_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health report. Never an error payload; failures are captured in
/// [DataStatus].
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub server_status: String,
    pub file_status: FileStatus,
    pub available_operations: Vec<String>,
    pub data_status: DataStatus,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn ordered_counts_preserve_order() {
        let counts = OrderedCounts(vec![("B".to_owned(), 2), ("A".to_owned(), 1)]);
        let text = serde_json::to_string(&counts).unwrap();
        assert_eq!(text, r#"{"B":2,"A":1}"#);
    }

    #[test]
    fn error_payload_has_only_error_key() {
        let response: Response<YearlyAnalysis> = Response::Failed(OError {
            error: "boom".to_owned(),
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"error": "boom"}));
    }

    #[test]
    fn empty_payload_shape() {
        let response: Response<YearlyAnalysis> = Response::Empty(EmptyResult::new("ml"));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["total_papers"], 0);
        assert_eq!(value["keyword"], "ml");
        assert!(value.get("error").is_none());
        assert!(value.get("status").is_none());
        assert!(value["message"].as_str().unwrap().contains("ml"));
    }
}
