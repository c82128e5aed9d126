//! Errors and error-related utilities.

use std::{error, fmt, result};

/// The result type used throughout this library.
pub type Result<T> = result::Result<T, Box<dyn error::Error>>;

/// Invalid input from the caller, e.g. a blank keyword.
#[derive(Debug)]
pub struct InvalidInput(pub String);

/// The source file is missing, unreadable, or undecodable.
#[derive(Debug)]
pub struct DataLoadError(pub String);

/// One or more required columns are absent from the dataset.
#[derive(Debug)]
pub struct SchemaError(pub Vec<String>);

/// The matching records carry no category tokens at all.
#[derive(Debug)]
pub struct NoCategoryData;

/// Chart rendering failed.
#[derive(Debug)]
pub struct RenderError(pub String);

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid input: {}", self.0)
    }
}

impl fmt::Display for DataLoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "failed to load dataset: {}", self.0)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "missing required columns: {}", self.0.join(", "))
    }
}

impl fmt::Display for NoCategoryData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "no category data in matching records")
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "chart rendering failed: {}", self.0)
    }
}

impl error::Error for InvalidInput {}

impl error::Error for DataLoadError {}

impl error::Error for SchemaError {}

impl error::Error for NoCategoryData {}

impl error::Error for RenderError {}

/// A helper for constructing [InvalidInput].
pub fn invalid_input(s: String) -> Box<dyn error::Error> {
    InvalidInput(s).into()
}

/// A helper for constructing [InvalidInput].
pub fn invalid_input_ref(s: &str) -> Box<dyn error::Error> {
    InvalidInput(s.to_owned()).into()
}

/// A helper for constructing [DataLoadError].
pub fn data_load_error(s: String) -> Box<dyn error::Error> {
    DataLoadError(s).into()
}

/// A helper for constructing [SchemaError].
pub fn schema_error(columns: Vec<String>) -> Box<dyn error::Error> {
    SchemaError(columns).into()
}

/// A helper for constructing [NoCategoryData].
pub fn no_category_data() -> Box<dyn error::Error> {
    NoCategoryData.into()
}

/// A helper for constructing [RenderError].
pub fn render_error(s: String) -> Box<dyn error::Error> {
    RenderError(s).into()
}
