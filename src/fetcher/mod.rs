pub mod rapidapi;
pub mod traits;

pub use rapidapi::RapidApiFetcher;
pub use traits::HistoricalDataSource;
