//! The analysis engine: one method per exposed operation.
//!
//! Every method catches all failures at the operation boundary and folds
//! them into the uniform error payload, so no error ever escapes to the
//! dispatcher. The table is re-read from disk on every call; the source
//! file is the only state the engine keeps between calls.

use crate::chart;
use crate::counts::{self, CategoryCounts, YearlyCounts};
use crate::dataset::{CATEGORY_COLUMN, KEYWORD_COLUMN, Table, YEAR_COLUMN, parse_year};
use crate::errors::Result;
use crate::filter;
use crate::output::{
    CategoryAnalysis, CategoryInfo, ComprehensiveAnalysis, DataStatus, DatasetInfo,
    DatasetSummary, DetailedResults, EmptyResult, FilePaths, FileStatus, HealthStatus,
    KeywordInfo, OError, OrderedCounts, Overview, Response, STATUS_SUCCESS, YearInfo,
    YearlyAnalysis,
};
use itertools::Itertools;
use log::{error, info};
use std::path::PathBuf;

const TOP_CATEGORIES: usize = 15;
const TOP_CATEGORIES_INFO: usize = 5;
const SAMPLE_KEYWORDS: usize = 5;

/// The analysis engine. Holds the source file path and the chart output
/// directory; both are explicit configuration, never process-wide state.
pub struct Analyzer {
    csv_path: PathBuf,
    graph_dir: PathBuf,
}

impl Analyzer {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(csv_path: P, graph_dir: Q) -> Analyzer {
        Analyzer {
            csv_path: csv_path.into(),
            graph_dir: graph_dir.into(),
        }
    }

    /// Papers per year for a keyword, with peak statistics and a rendered
    /// bar chart.
    pub fn yearly_analysis(&self, keyword: &str) -> Response<YearlyAnalysis> {
        guard("yearly analysis failed", self.try_yearly(keyword))
    }

    fn try_yearly(&self, keyword: &str) -> Result<Response<YearlyAnalysis>> {
        let keyword = filter::normalize_keyword(keyword)?;
        let table = Table::load(&self.csv_path)?;
        table.require_columns(&[KEYWORD_COLUMN, YEAR_COLUMN])?;
        let set = filter::filter(&table, &keyword)?;
        if set.is_empty() {
            return Ok(Response::Empty(EmptyResult::new(&keyword)));
        }
        let counts = counts::count_by_year(&set)?;
        let (peak_year, peak_count) = counts.peak().expect("yearly counts are non-empty");
        let graph = chart::render_yearly(&self.graph_dir, &keyword, &counts)?;
        info!(
            "yearly analysis for '{}': {} papers, peak {} in {}",
            keyword,
            set.len(),
            peak_count,
            peak_year
        );
        Ok(Response::Success(YearlyAnalysis {
            keyword,
            analysis_type: "yearly keyword frequency".to_owned(),
            total_papers: set.len() as u64,
            year_range: counts.range_string(),
            peak_year,
            peak_count,
            yearly_data: counts.counts().clone(),
            graph_saved_to: graph.display().to_string(),
            status: STATUS_SUCCESS.to_owned(),
        }))
    }

    /// Distribution of a keyword over subject categories, with the top-15
    /// view rendered as a bar chart.
    pub fn category_analysis(&self, keyword: &str) -> Response<CategoryAnalysis> {
        guard("category analysis failed", self.try_category(keyword))
    }

    fn try_category(&self, keyword: &str) -> Result<Response<CategoryAnalysis>> {
        let keyword = filter::normalize_keyword(keyword)?;
        let table = Table::load(&self.csv_path)?;
        table.require_columns(&[KEYWORD_COLUMN, CATEGORY_COLUMN])?;
        let set = filter::filter(&table, &keyword)?;
        if set.is_empty() {
            return Ok(Response::Empty(EmptyResult::new(&keyword)));
        }
        let counts = counts::count_categories(&set)?;
        let top = counts.top_n(TOP_CATEGORIES);
        let (field, most_active_count) =
            counts.most_active().expect("category counts are non-empty");
        let most_active_field = field.to_owned();
        let graph = chart::render_categories(&self.graph_dir, &keyword, &top)?;
        info!(
            "category analysis for '{}': {} papers over {} fields",
            keyword,
            set.len(),
            counts.len()
        );
        Ok(Response::Success(CategoryAnalysis {
            keyword,
            analysis_type: "research field distribution".to_owned(),
            total_papers: set.len() as u64,
            total_unique_categories: counts.len(),
            most_active_field,
            most_active_count,
            top_15_categories: OrderedCounts(top),
            all_categories_count: OrderedCounts(counts.entries()),
            graph_saved_to: graph.display().to_string(),
            status: STATUS_SUCCESS.to_owned(),
        }))
    }

    /// Both analyses for the same keyword, merged into an overview plus the
    /// nested full sub-results. An error from either sub-analysis is
    /// returned verbatim, yearly checked first.
    pub fn comprehensive_analysis(&self, keyword: &str) -> Response<ComprehensiveAnalysis> {
        let yearly = match self.yearly_analysis(keyword) {
            Response::Success(yearly) => yearly,
            Response::Empty(empty) => return Response::Empty(empty),
            Response::Failed(failed) => return Response::Failed(failed),
        };
        let category = match self.category_analysis(keyword) {
            Response::Success(category) => category,
            Response::Empty(empty) => return Response::Empty(empty),
            Response::Failed(failed) => return Response::Failed(failed),
        };
        Response::Success(ComprehensiveAnalysis {
            keyword: yearly.keyword.clone(),
            analysis_type: "comprehensive (yearly + category)".to_owned(),
            overview: Overview {
                total_papers: yearly.total_papers,
                research_period: yearly.year_range.clone(),
                peak_research_year: yearly.peak_year,
                peak_year_papers: yearly.peak_count,
                most_active_research_field: category.most_active_field.clone(),
                most_active_field_papers: category.most_active_count,
                total_research_fields: category.total_unique_categories,
            },
            detailed_results: DetailedResults {
                yearly_analysis: yearly,
                category_analysis: category,
            },
            status: STATUS_SUCCESS.to_owned(),
        })
    }

    /// Whole-table overview, independent of any keyword. Sections for
    /// absent optional columns are omitted; only a load failure is an
    /// error.
    pub fn dataset_info(&self) -> Response<DatasetInfo> {
        match self.try_dataset_info() {
            Ok(info) => Response::Success(info),
            Err(e) => {
                error!("dataset info failed: {e}");
                Response::Failed(OError {
                    error: format!("dataset info failed: {e}"),
                })
            }
        }
    }

    fn try_dataset_info(&self) -> Result<DatasetInfo> {
        let table = Table::load(&self.csv_path)?;
        let year_info = table.column_index(YEAR_COLUMN).and_then(|col| {
            let counts = YearlyCounts::from_years(
                (0..table.len()).filter_map(|row| parse_year(table.cell(row, col))),
            );
            counts.peak().map(|(most_productive_year, _)| YearInfo {
                year_range: counts.range_string(),
                total_years: counts.counts().len(),
                most_productive_year,
            })
        });
        let keyword_info = table.column_index(KEYWORD_COLUMN).map(|col| {
            let values = (0..table.len())
                .filter_map(|row| table.cell_opt(row, col))
                .collect_vec();
            KeywordInfo {
                papers_with_keywords: values.len(),
                sample_keywords: values
                    .iter()
                    .take(SAMPLE_KEYWORDS)
                    .map(|s| (*s).to_owned())
                    .collect_vec(),
            }
        });
        let category_info = table.column_index(CATEGORY_COLUMN).and_then(|col| {
            let mut counts = CategoryCounts::default();
            for row in 0..table.len() {
                if let Some(field) = table.cell_opt(row, col) {
                    counts.add_field(field);
                }
            }
            if counts.is_empty() {
                None
            } else {
                Some(CategoryInfo {
                    total_unique_categories: counts.len(),
                    most_common_categories: OrderedCounts(counts.top_n(TOP_CATEGORIES_INFO)),
                })
            }
        });
        Ok(DatasetInfo {
            dataset_info: DatasetSummary {
                total_papers: table.len(),
                total_columns: table.columns().len(),
                columns_list: table.columns().to_vec(),
            },
            year_info,
            keyword_info,
            category_info,
            file_paths: FilePaths {
                csv_file: self.csv_path.display().to_string(),
                graphs_folder: self.graph_dir.display().to_string(),
            },
        })
    }

    /// Health report: file and folder existence plus a trial load. Never
    /// fails; load problems are captured in the returned status.
    pub fn health_check(&self) -> HealthStatus {
        let csv_file_exists = self.csv_path.exists();
        let data_status = if csv_file_exists {
            match Table::load(&self.csv_path) {
                Ok(table) => DataStatus {
                    data_loaded: true,
                    total_records: Some(table.len()),
                    error: None,
                },
                Err(e) => DataStatus {
                    data_loaded: false,
                    total_records: None,
                    error: Some(e.to_string()),
                },
            }
        } else {
            DataStatus {
                data_loaded: false,
                total_records: None,
                error: Some("source file does not exist".to_owned()),
            }
        };
        HealthStatus {
            server_status: "healthy".to_owned(),
            file_status: FileStatus {
                csv_file_exists,
                csv_file_path: self.csv_path.display().to_string(),
                graphs_folder_exists: self.graph_dir.exists(),
                graphs_folder_path: self.graph_dir.display().to_string(),
            },
            available_operations: [
                "yearly_analysis",
                "category_analysis",
                "comprehensive_analysis",
                "dataset_info",
                "health_check",
            ]
            .iter()
            .map(|s| (*s).to_owned())
            .collect_vec(),
            data_status,
        }
    }
}

fn guard<T>(context: &str, result: Result<Response<T>>) -> Response<T> {
    match result {
        Ok(response) => response,
        Err(e) => {
            error!("{context}: {e}");
            Response::Failed(OError {
                error: format!("{context}: {e}"),
            })
        }
    }
}
