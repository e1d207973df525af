//! Inputs for the downstream market-microstructure estimators.
//!
//! Both projections drop unclassified trades, which the estimators must
//! never see.

use chrono::{NaiveDate, NaiveTime};
use leeready_core::{ClassifiedTrade, Direction, Volume};
use serde::{Deserialize, Serialize};

/// Row for price-impact (Kyle's lambda) estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KyleInput {
    pub symbol: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub price: f64,
    pub volume: Volume,
    pub direction: Direction,
}

/// Row for spread decomposition (Huang-Stoll, Lin-Sanger-Booth).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadInput {
    pub symbol: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub absolute_spread: f64,
    pub midpoint: f64,
    pub direction: Direction,
}

/// Price-impact rows for every classified trade.
pub fn kyle_inputs(trades: &[ClassifiedTrade]) -> Vec<KyleInput> {
    trades
        .iter()
        .filter(|t| t.is_classified())
        .map(|t| KyleInput {
            symbol: t.trade.symbol.clone(),
            date: t.trade.date,
            time: t.trade.time,
            price: t.trade.price,
            volume: t.trade.volume,
            direction: t.direction,
        })
        .collect()
}

/// Spread decomposition rows for every classified trade.
pub fn spread_inputs(trades: &[ClassifiedTrade]) -> Vec<SpreadInput> {
    trades
        .iter()
        .filter(|t| t.is_classified())
        .filter_map(|t| {
            Some(SpreadInput {
                symbol: t.trade.symbol.clone(),
                date: t.trade.date,
                time: t.trade.time,
                absolute_spread: t.metrics.absolute_spread?,
                midpoint: t.quote.midpoint?,
                direction: t.direction,
            })
        })
        .collect()
}
