//! Classification engine.
//!
//! Combines input preparation and per-partition classification into one run:
//! aggregate trades, compact quotes, split by (symbol, date), classify the
//! partitions in parallel and concatenate the results.

use crate::order_flow::{DailyFlowSummary, OrderFlowAggregator};
use crate::partition::{classify_partition, split_partitions, Partition};
use crate::stats::ClassificationStats;
use leeready_core::config::ClassificationConfig;
use leeready_core::{
    ClassifiedTrade, Config, Diagnostics, Error, MarketEvent, RawQuote, RawTrade, Result,
};
use leeready_ingestion::{table, QuoteCompactor, TradeAggregator};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde_json::Value;
use tracing::info;

/// Result of a classification run.
#[derive(Debug, Clone)]
pub struct ClassificationOutput {
    /// Classified trades, ordered by (symbol, date, time, price).
    pub trades: Vec<ClassifiedTrade>,
    /// Classification quality.
    pub stats: ClassificationStats,
    /// Order flow and spread per (symbol, date).
    pub daily_flow: Vec<DailyFlowSummary>,
    /// Input record counts.
    pub diagnostics: Diagnostics,
}

/// Lee-Ready classification engine.
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    config: Config,
}

impl ClassificationEngine {
    /// Create an engine, rejecting an unusable configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classify raw trade prints against raw quotes.
    pub fn run(&self, prints: Vec<RawTrade>, quotes: Vec<RawQuote>) -> Result<ClassificationOutput> {
        let mut aggregator = TradeAggregator::new();
        let trades = aggregator.aggregate(prints);

        let mut compactor = QuoteCompactor::new(self.config.classification.price_tolerance);
        let revisions = compactor.compact(quotes);

        let agg_stats = aggregator.stats();
        let quote_stats = compactor.stats();
        let diagnostics = Diagnostics {
            raw_trades: agg_stats.input_trades,
            malformed_trades: agg_stats.malformed_trades,
            aggregated_trades: agg_stats.output_trades,
            raw_quotes: quote_stats.input_quotes,
            malformed_quotes: quote_stats.malformed_quotes,
            retained_quotes: quote_stats.retained_quotes,
        };

        let partitions = split_partitions(trades, revisions);
        let classified = self.classify_partitions(&partitions)?;
        let stats = ClassificationStats::from_trades(&classified);
        let mut flow = OrderFlowAggregator::new();
        flow.add_trades(&classified);

        info!(
            partitions = partitions.len(),
            trades = stats.total_trades,
            buy = stats.buy_trades,
            sell = stats.sell_trades,
            unclassified = stats.unclassified_trades,
            unclassified_frac = stats.unclassified_frac(),
            malformed_trades = diagnostics.malformed_trades,
            malformed_quotes = diagnostics.malformed_quotes,
            "classification run complete"
        );

        Ok(ClassificationOutput {
            trades: classified,
            stats,
            daily_flow: flow.summaries(),
            diagnostics,
        })
    }

    /// Classify a mixed trade-and-quote feed.
    pub fn run_feed(&self, events: &[MarketEvent]) -> Result<ClassificationOutput> {
        self.run(table::trades(events), table::quotes(events))
    }

    /// Classify JSON row tables. Both tables are checked for required columns
    /// before anything is classified.
    pub fn run_rows(&self, trade_rows: &[Value], quote_rows: &[Value]) -> Result<ClassificationOutput> {
        let trades = table::parse_trade_rows(trade_rows)?;
        let quotes = table::parse_quote_rows(quote_rows)?;

        let mut output = self.run(trades.rows, quotes.rows)?;
        output.diagnostics.merge(&Diagnostics {
            raw_trades: trades.malformed,
            malformed_trades: trades.malformed,
            raw_quotes: quotes.malformed,
            malformed_quotes: quotes.malformed,
            ..Diagnostics::default()
        });
        Ok(output)
    }

    fn classify_partitions(&self, partitions: &[Partition]) -> Result<Vec<ClassifiedTrade>> {
        let config = &self.config.classification;

        let mut classified: Vec<ClassifiedTrade> = match self.config.execution.workers {
            Some(1) => partitions
                .iter()
                .flat_map(|p| classify_partition(p, config))
                .collect(),
            Some(threads) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::thread_pool(e.to_string()))?;
                pool.install(|| classify_parallel(partitions, config))
            }
            None => classify_parallel(partitions, config),
        };

        // Presentation order only; partitions are independent.
        classified.sort_by(|a, b| a.trade.sort_key().cmp(&b.trade.sort_key()));
        Ok(classified)
    }
}

fn classify_parallel(partitions: &[Partition], config: &ClassificationConfig) -> Vec<ClassifiedTrade> {
    partitions
        .par_iter()
        .flat_map_iter(|p| classify_partition(p, config))
        .collect()
}
