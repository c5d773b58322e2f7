//! Ready-made tools for the stepwise engine: stock quotes, weather, and a
//! news feed.
//!
//! Every tool is backed by a deterministic synthetic data source so demos
//! and tests run without network access or API keys. The data is stable
//! per input (a given symbol, location, or query always yields the same
//! values) but varies across inputs.

#![warn(missing_docs, clippy::pedantic)]

mod hash;
pub mod news;
pub mod quotes;
pub mod weather;

pub use news::NewsFeedTool;
pub use quotes::StockPriceTool;
pub use weather::WeatherTool;
