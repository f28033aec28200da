pub mod series_parser;

pub use series_parser::{Parser, PriceSeriesParser};
