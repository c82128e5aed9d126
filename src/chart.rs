//! Bar-chart rendering for analysis results.
//!
//! The engine hands over final aggregates and gets back the path of the
//! written PNG; nothing here feeds back into the analysis.

use crate::counts::YearlyCounts;
use crate::errors::{Result, render_error};
use log::debug;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const YEARLY_SIZE: (u32, u32) = (1200, 700);
const CATEGORY_SIZE: (u32, u32) = (1600, 1000);

/// Reduce a keyword to a safe file name stem: keep alphanumerics, space,
/// `-` and `_`, then turn spaces into underscores.
pub fn sanitize_keyword(keyword: &str) -> String {
    keyword
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

/// Split long category names at the midpoint word boundary into two lines.
/// Display formatting only; counts are never affected.
pub fn wrap_label(name: &str) -> String {
    if name.chars().count() <= 25 {
        return name.to_owned();
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() <= 3 {
        return name.to_owned();
    }
    let mid = words.len() / 2;
    format!("{}\n{}", words[..mid].join(" "), words[mid..].join(" "))
}

/// Render the papers-per-year bar chart and return the written path.
pub fn render_yearly(dir: &Path, keyword: &str, counts: &YearlyCounts) -> Result<PathBuf> {
    let path = output_path(dir, keyword, "yearly_trend")?;
    let (&min_year, _) = counts
        .counts()
        .first_key_value()
        .ok_or_else(|| render_error("no yearly data to draw".to_owned()))?;
    let (&max_year, _) = counts.counts().last_key_value().expect("counts are non-empty");
    let max_count = counts.counts().values().copied().max().expect("counts are non-empty");

    let root = BitMapBackend::new(&path, YEARLY_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(e.to_string()))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("'{keyword}' papers per year"), ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((min_year..max_year + 1).into_segmented(), 0u64..max_count + 1)
        .map_err(|e| render_error(e.to_string()))?;
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Papers")
        .draw()
        .map_err(|e| render_error(e.to_string()))?;
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.7).filled())
                .margin(5)
                .data(counts.counts().iter().map(|(&year, &count)| (year, count))),
        )
        .map_err(|e| render_error(e.to_string()))?;
    chart
        .draw_series(counts.counts().iter().map(|(&year, &count)| {
            Text::new(
                count.to_string(),
                (SegmentValue::CenterOf(year), count),
                ("sans-serif", 16).into_font(),
            )
        }))
        .map_err(|e| render_error(e.to_string()))?;
    root.present().map_err(|e| render_error(e.to_string()))?;
    debug!("wrote yearly chart to {}", path.display());
    Ok(path.clone())
}

/// Render the top-category bar chart and return the written path.
pub fn render_categories(dir: &Path, keyword: &str, top: &[(String, u64)]) -> Result<PathBuf> {
    let path = output_path(dir, keyword, "categories")?;
    if top.is_empty() {
        return Err(render_error("no category data to draw".to_owned()));
    }
    let max_count = top.iter().map(|(_, c)| *c).max().expect("top is non-empty");
    let n = top.len() as i32;

    let root = BitMapBackend::new(&path, CATEGORY_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(e.to_string()))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("'{keyword}' research field distribution (top {})", top.len()),
            ("sans-serif", 32),
        )
        .margin(20)
        .x_label_area_size(120)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), 0u64..max_count + 1)
        .map_err(|e| render_error(e.to_string()))?;
    chart
        .configure_mesh()
        .x_desc("Research field")
        .y_desc("Papers")
        .x_labels(top.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) if (*i as usize) < top.len() => {
                wrap_label(&top[*i as usize].0)
            }
            _ => String::new(),
        })
        .draw()
        .map_err(|e| render_error(e.to_string()))?;
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(RED.mix(0.6).filled())
                .margin(10)
                .data(top.iter().enumerate().map(|(i, (_, count))| (i as i32, *count))),
        )
        .map_err(|e| render_error(e.to_string()))?;
    chart
        .draw_series(top.iter().enumerate().map(|(i, (_, count))| {
            Text::new(
                count.to_string(),
                (SegmentValue::CenterOf(i as i32), *count),
                ("sans-serif", 16).into_font(),
            )
        }))
        .map_err(|e| render_error(e.to_string()))?;
    root.present().map_err(|e| render_error(e.to_string()))?;
    debug!("wrote category chart to {}", path.display());
    Ok(path.clone())
}

fn output_path(dir: &Path, keyword: &str, kind: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| render_error(format!("{}: {}", dir.display(), e)))?;
    Ok(dir.join(format!("{}_{}.png", sanitize_keyword(keyword), kind)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_chars() {
        assert_eq!(sanitize_keyword("deep learning"), "deep_learning");
        assert_eq!(sanitize_keyword("C++ / AI?"), "C__AI");
        assert_eq!(sanitize_keyword("  graph-based  "), "graph-based");
    }

    #[test]
    fn wrap_label_short_names_untouched() {
        assert_eq!(wrap_label("Computer Science"), "Computer Science");
    }

    #[test]
    fn wrap_label_needs_both_length_and_word_count() {
        // long but only three words
        assert_eq!(
            wrap_label("Telecommunicationsystems Engineering Science"),
            "Telecommunicationsystems Engineering Science"
        );
        assert_eq!(
            wrap_label("Computer Science Artificial Intelligence Methods"),
            "Computer Science\nArtificial Intelligence Methods"
        );
    }

    #[test]
    fn render_yearly_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let counts = YearlyCounts::from_years([2019, 2019, 2021]);
        let path = render_yearly(dir.path(), "deep learning", &counts).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "deep_learning_yearly_trend.png"
        );
        assert!(path.exists());
    }

    #[test]
    fn render_categories_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let top = vec![
            ("Computer Science, Artificial Intelligence Theory".to_owned(), 4),
            ("Engineering".to_owned(), 2),
        ];
        let path = render_categories(dir.path(), "deep learning", &top).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "deep_learning_categories.png"
        );
        assert!(path.exists());
    }
}
