// Analyzer module: descriptive statistics over a price series.

pub mod price_analysis;

pub use price_analysis::{Analyzer, AnalyzerImpl};
