//! Per-partition classification.
//!
//! A partition is one symbol on one trading day. All state (tick window and
//! quote in force) lives in a [`PartitionContext`] that is created fresh for
//! each partition and folded over its trades in time order.

use crate::direction::classify_direction;
use crate::merger::QuoteCursor;
use crate::spread::trade_metrics;
use crate::tick::TickTest;
use leeready_core::config::ClassificationConfig;
use leeready_core::{AggregatedTrade, ClassifiedTrade, PartitionKey, QuoteEvent};
use std::collections::BTreeMap;

/// Trades and quote revisions of one (symbol, date).
#[derive(Debug, Clone)]
pub struct Partition {
    pub key: PartitionKey,
    /// Aggregated trades, ordered by (time, price).
    pub trades: Vec<AggregatedTrade>,
    /// Quote revisions, ordered by time.
    pub revisions: Vec<QuoteEvent>,
}

/// Group time-ordered trades and revisions by (symbol, date).
///
/// Partitions without trades are dropped: they produce no output.
pub fn split_partitions(trades: Vec<AggregatedTrade>, revisions: Vec<QuoteEvent>) -> Vec<Partition> {
    let mut partitions: BTreeMap<PartitionKey, Partition> = BTreeMap::new();

    for trade in trades {
        let key = trade.partition_key();
        partitions
            .entry(key.clone())
            .or_insert_with(|| Partition::empty(key))
            .trades
            .push(trade);
    }

    for revision in revisions {
        if let Some(partition) = partitions.get_mut(&revision.partition_key()) {
            partition.revisions.push(revision);
        }
    }

    partitions.into_values().collect()
}

impl Partition {
    fn empty(key: PartitionKey) -> Self {
        Self {
            key,
            trades: Vec::new(),
            revisions: Vec::new(),
        }
    }
}

/// Classification state carried across the trades of one partition.
pub struct PartitionContext<'a> {
    tick: TickTest,
    quotes: QuoteCursor<'a>,
    price_tolerance: f64,
}

impl<'a> PartitionContext<'a> {
    pub fn new(revisions: &'a [QuoteEvent], config: &ClassificationConfig) -> Self {
        Self {
            tick: TickTest::new(config.price_tolerance),
            quotes: QuoteCursor::new(revisions, config.report_lag()),
            price_tolerance: config.price_tolerance,
        }
    }

    /// Classify the next trade. Trades must arrive in time order.
    pub fn step(&mut self, trade: &AggregatedTrade) -> ClassifiedTrade {
        let tick = self.tick.next(trade.price);
        let quote = self.quotes.state_at(trade.time);
        let decision = classify_direction(trade.price, &quote, tick, self.price_tolerance);
        let metrics = trade_metrics(trade.price, trade.volume, &quote, decision.direction);

        ClassifiedTrade {
            trade: trade.clone(),
            quote,
            tick,
            direction: decision.direction,
            basis: decision.basis,
            metrics,
        }
    }

    /// Quote revisions consumed so far.
    pub fn revisions_applied(&self) -> usize {
        self.quotes.applied()
    }
}

/// Classify every trade of a partition.
pub fn classify_partition(partition: &Partition, config: &ClassificationConfig) -> Vec<ClassifiedTrade> {
    debug_assert!(partition.trades.windows(2).all(|w| w[0].time <= w[1].time));

    let mut context = PartitionContext::new(&partition.revisions, config);
    let classified: Vec<ClassifiedTrade> = partition
        .trades
        .iter()
        .map(|trade| context.step(trade))
        .collect();

    tracing::debug!(
        symbol = %partition.key.symbol,
        date = %partition.key.date,
        trades = classified.len(),
        revisions = partition.revisions.len(),
        revisions_applied = context.revisions_applied(),
        "classified partition"
    );

    classified
}
