//! Market data acquisition.

pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use provider::{DataError, MarketDataProvider, RawBar};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
