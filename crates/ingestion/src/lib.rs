//! Input preparation for the trade direction engine.
//!
//! This crate handles:
//! - Row table parsing and required-column checks
//! - Trade/quote projections of a mixed feed
//! - Trade aggregation (same symbol, date, time and price)
//! - Quote compaction (midpoint revisions only)

pub mod aggregator;
pub mod quotes;
pub mod table;

pub use aggregator::{aggregate_prints, AggregationStats, TradeAggregator};
pub use quotes::{CompactionStats, QuoteCompactor};
pub use table::{parse_quote_rows, parse_trade_rows, ParsedRows};
