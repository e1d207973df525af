//! Core data types for the trade direction engine.

use chrono::{NaiveDate, NaiveTime};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Price type with ordering support.
pub type Price = OrderedFloat<f64>;

/// Trade volume (shares).
pub type Volume = u64;

/// Compare two prices, treating values within `tolerance` as equal.
#[inline]
pub fn compare_prices(a: f64, b: f64, tolerance: f64) -> Ordering {
    if (a - b).abs() <= tolerance {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Independent unit of classification: one security on one trading day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartitionKey {
    pub symbol: String,
    pub date: NaiveDate,
}

/// A single trade print as reported by the tape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrade {
    pub symbol: String,
    pub date: NaiveDate,
    /// Reported time of day.
    pub time: NaiveTime,
    pub price: f64,
    pub volume: Volume,
}

/// All prints at one (symbol, date, time, price), collapsed into one trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTrade {
    pub symbol: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub price: f64,
    /// Summed volume of the contributing prints.
    pub volume: Volume,
    /// Number of contributing prints.
    pub trade_count: u32,
}

impl AggregatedTrade {
    /// Partition this trade belongs to.
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey {
            symbol: self.symbol.clone(),
            date: self.date,
        }
    }

    /// Full identity and presentation order: (symbol, date, time, price).
    pub fn sort_key(&self) -> (&str, NaiveDate, NaiveTime, Price) {
        (&self.symbol, self.date, self.time, OrderedFloat(self.price))
    }
}

impl From<RawTrade> for AggregatedTrade {
    fn from(trade: RawTrade) -> Self {
        Self {
            symbol: trade.symbol,
            date: trade.date,
            time: trade.time,
            price: trade.price,
            volume: trade.volume,
            trade_count: 1,
        }
    }
}

/// A raw best bid/offer update. Either side may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    pub symbol: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

/// A quote with its midpoint fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteEvent {
    pub symbol: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    /// (bid + ask) / 2, unknown when either side is missing.
    pub midpoint: Option<f64>,
}

impl QuoteEvent {
    /// Partition this quote belongs to.
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey {
            symbol: self.symbol.clone(),
            date: self.date,
        }
    }

    /// Book state carried by this quote.
    #[inline]
    pub fn state(&self) -> QuoteState {
        QuoteState {
            bid: self.bid,
            ask: self.ask,
            midpoint: self.midpoint,
        }
    }
}

impl From<RawQuote> for QuoteEvent {
    fn from(quote: RawQuote) -> Self {
        let midpoint = match (quote.bid, quote.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        };
        Self {
            symbol: quote.symbol,
            date: quote.date,
            time: quote.time,
            bid: quote.bid,
            ask: quote.ask,
            midpoint,
        }
    }
}

/// Quote book in force for a trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteState {
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub midpoint: Option<f64>,
}

impl QuoteState {
    /// No quote observed yet.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether the quote test can be applied.
    #[inline]
    pub fn is_known(&self) -> bool {
        self.midpoint.is_some()
    }

    /// Quoted spread (ask - bid).
    #[inline]
    pub fn spread(&self) -> Option<f64> {
        Some(self.ask? - self.bid?)
    }
}

/// Inferred initiator of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
#[repr(i8)]
pub enum Direction {
    /// Buyer-initiated.
    Buy = 1,
    /// Seller-initiated.
    Sell = -1,
    /// Neither the quote test nor the tick test gave a signal.
    Unclassified = 0,
}

impl Direction {
    /// Get the sign as i8.
    #[inline]
    pub fn sign(self) -> i8 {
        self as i8
    }

    /// Direction implied by a price comparison (`Greater` = up-move = buy).
    #[inline]
    pub fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => Direction::Buy,
            Ordering::Less => Direction::Sell,
            Ordering::Equal => Direction::Unclassified,
        }
    }

    #[inline]
    pub fn is_classified(self) -> bool {
        self != Direction::Unclassified
    }

    /// Volume signed by direction, saturating at the `i64` range.
    #[inline]
    pub fn signed_volume(self, volume: Volume) -> i64 {
        let magnitude = i64::try_from(volume).unwrap_or(i64::MAX);
        magnitude.saturating_mul(i64::from(self.sign()))
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.sign()
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Buy),
            -1 => Ok(Direction::Sell),
            0 => Ok(Direction::Unclassified),
            other => Err(format!("direction must be -1, 0 or 1, got {other}")),
        }
    }
}

/// Which rule produced a trade's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationBasis {
    /// No quote in force; the trade is unclassified.
    NoQuote,
    /// Price away from the midpoint.
    QuoteTest,
    /// Price at the midpoint; the tick test decided.
    TickTest,
}

/// Spread and order-flow measures of one classified trade.
///
/// Every field is `None` when the quote state was unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    /// 2 * |price - midpoint|.
    pub effective_spread: Option<f64>,
    /// ask - bid.
    pub absolute_spread: Option<f64>,
    /// absolute_spread / price.
    pub relative_spread: Option<f64>,
    /// direction * volume.
    pub net_order_flow: Option<i64>,
}

/// An aggregated trade with its inferred direction and quote context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTrade {
    /// Aggregated trade, at its original reporting time.
    #[serde(flatten)]
    pub trade: AggregatedTrade,
    /// Quote in force at the lag-adjusted time.
    #[serde(flatten)]
    pub quote: QuoteState,
    /// Tick test result, kept for auditing the fallback.
    pub tick: Direction,
    /// Final Lee-Ready direction.
    pub direction: Direction,
    /// Rule that produced `direction`.
    pub basis: ClassificationBasis,
    #[serde(flatten)]
    pub metrics: TradeMetrics,
}

impl ClassifiedTrade {
    /// Whether downstream consumers should see this trade.
    #[inline]
    pub fn is_classified(&self) -> bool {
        self.direction.is_classified()
    }
}

/// One record of a mixed trade-and-quote feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarketEvent {
    Trade(RawTrade),
    Quote(RawQuote),
}

/// Counts of records seen, kept and dropped while preparing the inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Raw trade prints received.
    pub raw_trades: u64,
    /// Prints dropped as malformed.
    pub malformed_trades: u64,
    /// Trades after aggregation.
    pub aggregated_trades: u64,
    /// Raw quotes received.
    pub raw_quotes: u64,
    /// Quotes dropped as malformed.
    pub malformed_quotes: u64,
    /// Quotes kept as midpoint revisions.
    pub retained_quotes: u64,
}

impl Diagnostics {
    /// Add another set of counts to this one.
    pub fn merge(&mut self, other: &Diagnostics) {
        self.raw_trades += other.raw_trades;
        self.malformed_trades += other.malformed_trades;
        self.aggregated_trades += other.aggregated_trades;
        self.raw_quotes += other.raw_quotes;
        self.malformed_quotes += other.malformed_quotes;
        self.retained_quotes += other.retained_quotes;
    }
}
