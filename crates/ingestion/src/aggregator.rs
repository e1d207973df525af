//! Aggregation of simultaneous trade prints.
//!
//! Prints sharing (symbol, date, time, price) are collapsed into one trade
//! carrying the summed volume and the number of contributing prints.

use leeready_core::{AggregatedTrade, RawTrade};
use ordered_float::OrderedFloat;
use tracing::warn;

/// Whether a trade price can be used at all.
#[inline]
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Statistics from the most recent aggregation.
#[derive(Debug, Clone, Default)]
pub struct AggregationStats {
    /// Records received.
    pub input_trades: u64,
    /// Records dropped for a non-positive or non-finite price.
    pub malformed_trades: u64,
    /// Aggregated trades produced.
    pub output_trades: u64,
}

/// Collapses trade prints into one record per (symbol, date, time, price).
#[derive(Debug, Default)]
pub struct TradeAggregator {
    stats: AggregationStats,
}

impl TradeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate raw prints.
    ///
    /// Output is sorted by (symbol, date, time, price) whatever the input
    /// order. Feeding already-aggregated trades back in returns them
    /// unchanged, since `trade_count` is summed rather than recounted.
    pub fn aggregate<T, I>(&mut self, trades: I) -> Vec<AggregatedTrade>
    where
        T: Into<AggregatedTrade>,
        I: IntoIterator<Item = T>,
    {
        let mut stats = AggregationStats::default();

        let mut valid: Vec<AggregatedTrade> = trades
            .into_iter()
            .map(Into::into)
            .filter(|trade: &AggregatedTrade| {
                stats.input_trades += 1;
                if is_valid_price(trade.price) {
                    true
                } else {
                    stats.malformed_trades += 1;
                    false
                }
            })
            .collect();

        valid.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut result: Vec<AggregatedTrade> = Vec::with_capacity(valid.len());
        for trade in valid {
            match result.last_mut() {
                Some(last) if same_key(last, &trade) => {
                    last.volume = last.volume.saturating_add(trade.volume);
                    last.trade_count = last.trade_count.saturating_add(trade.trade_count);
                }
                _ => result.push(trade),
            }
        }

        stats.output_trades = result.len() as u64;
        if stats.malformed_trades > 0 {
            warn!(
                malformed = stats.malformed_trades,
                total = stats.input_trades,
                "dropped trade prints with invalid price"
            );
        }
        self.stats = stats;

        result
    }

    /// Statistics from the most recent call to [`TradeAggregator::aggregate`].
    pub fn stats(&self) -> &AggregationStats {
        &self.stats
    }
}

fn same_key(a: &AggregatedTrade, b: &AggregatedTrade) -> bool {
    a.symbol == b.symbol
        && a.date == b.date
        && a.time == b.time
        && OrderedFloat(a.price) == OrderedFloat(b.price)
}

/// Convenience wrapper for one-shot aggregation of raw prints.
pub fn aggregate_prints(prints: Vec<RawTrade>) -> (Vec<AggregatedTrade>, AggregationStats) {
    let mut aggregator = TradeAggregator::new();
    let trades = aggregator.aggregate(prints);
    (trades, aggregator.stats)
}
