pub mod chart;
pub mod counts;
pub mod dataset;
pub mod driver;
pub mod errors;
pub mod filter;
pub mod output;
