//! Lee-Ready trade direction classification.
//!
//! This crate handles:
//! - Tick test (price momentum)
//! - Trade/quote merge with late-report adjustment
//! - Quote test with tick test fallback
//! - Spread and order flow measures
//! - Partition-parallel classification runs

pub mod direction;
pub mod downstream;
pub mod engine;
pub mod merger;
pub mod order_flow;
pub mod partition;
pub mod spread;
pub mod stats;
pub mod tick;

pub use direction::{classify_direction, Decision};
pub use downstream::{kyle_inputs, spread_inputs, KyleInput, SpreadInput};
pub use engine::{ClassificationEngine, ClassificationOutput};
pub use merger::QuoteCursor;
pub use order_flow::{DailyFlowSummary, OrderFlowAggregator};
pub use partition::{classify_partition, split_partitions, Partition, PartitionContext};
pub use stats::ClassificationStats;
pub use tick::TickTest;
