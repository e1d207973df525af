//! Daily order flow aggregation.
//!
//! Aggregates classified trades into per-(symbol, date) order flow and
//! spread summaries.

use leeready_core::{ClassifiedTrade, Direction, PartitionKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Order flow and spread summary for one symbol on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFlowSummary {
    pub key: PartitionKey,
    /// Number of aggregated trades.
    pub trades: u64,
    /// Total volume.
    pub total_volume: u64,
    /// Buyer-initiated volume.
    pub buy_volume: u64,
    /// Seller-initiated volume.
    pub sell_volume: u64,
    /// Unclassified volume.
    pub unclassified_volume: u64,
    /// buy_volume - sell_volume.
    pub net_order_flow: i64,
    /// net_order_flow / total_volume.
    pub net_order_flow_norm: f64,
    /// Volume-weighted effective spread over trades with a known quote.
    pub avg_effective_spread: Option<f64>,
    /// Volume-weighted relative spread over trades with a known quote.
    pub avg_relative_spread: Option<f64>,
}

/// Accumulator for one day.
#[derive(Debug, Clone, Default)]
struct DayAccumulator {
    trades: u64,
    buy_volume: u64,
    sell_volume: u64,
    unclassified_volume: u64,
    quoted_volume: u64,
    effective_spread_sum: f64,
    relative_spread_sum: f64,
}

impl DayAccumulator {
    fn add(&mut self, trade: &ClassifiedTrade) {
        let volume = trade.trade.volume;
        self.trades += 1;
        match trade.direction {
            Direction::Buy => self.buy_volume = self.buy_volume.saturating_add(volume),
            Direction::Sell => self.sell_volume = self.sell_volume.saturating_add(volume),
            Direction::Unclassified => {
                self.unclassified_volume = self.unclassified_volume.saturating_add(volume)
            }
        }

        if let (Some(effective), Some(relative)) =
            (trade.metrics.effective_spread, trade.metrics.relative_spread)
        {
            self.quoted_volume = self.quoted_volume.saturating_add(volume);
            self.effective_spread_sum += effective * volume as f64;
            self.relative_spread_sum += relative * volume as f64;
        }
    }

    fn to_summary(&self, key: PartitionKey) -> DailyFlowSummary {
        let total_volume = self
            .buy_volume
            .saturating_add(self.sell_volume)
            .saturating_add(self.unclassified_volume);
        let net_order_flow = Direction::Buy
            .signed_volume(self.buy_volume)
            .saturating_add(Direction::Sell.signed_volume(self.sell_volume));
        let net_order_flow_norm = if total_volume > 0 {
            net_order_flow as f64 / total_volume as f64
        } else {
            0.0
        };
        let weighted = |sum: f64| {
            (self.quoted_volume > 0).then(|| sum / self.quoted_volume as f64)
        };

        DailyFlowSummary {
            key,
            trades: self.trades,
            total_volume,
            buy_volume: self.buy_volume,
            sell_volume: self.sell_volume,
            unclassified_volume: self.unclassified_volume,
            net_order_flow,
            net_order_flow_norm,
            avg_effective_spread: weighted(self.effective_spread_sum),
            avg_relative_spread: weighted(self.relative_spread_sum),
        }
    }
}

/// Order flow aggregator keyed by (symbol, date).
#[derive(Debug, Default)]
pub struct OrderFlowAggregator {
    days: BTreeMap<PartitionKey, DayAccumulator>,
}

impl OrderFlowAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a classified trade.
    pub fn add_trade(&mut self, trade: &ClassifiedTrade) {
        self.days
            .entry(trade.trade.partition_key())
            .or_default()
            .add(trade);
    }

    /// Add multiple trades.
    pub fn add_trades(&mut self, trades: &[ClassifiedTrade]) {
        for trade in trades {
            self.add_trade(trade);
        }
    }

    /// Summary for one symbol and day.
    pub fn get(&self, key: &PartitionKey) -> Option<DailyFlowSummary> {
        self.days.get(key).map(|acc| acc.to_summary(key.clone()))
    }

    /// All summaries, ordered by (symbol, date).
    pub fn summaries(&self) -> Vec<DailyFlowSummary> {
        self.days
            .iter()
            .map(|(key, acc)| acc.to_summary(key.clone()))
            .collect()
    }

    /// Get the number of days tracked.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}
