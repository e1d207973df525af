//! Classification quality statistics.

use leeready_core::{ClassificationBasis, ClassifiedTrade, Direction};
use serde::{Deserialize, Serialize};

/// Statistics about trade classification quality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationStats {
    /// Total trades classified.
    pub total_trades: u64,
    /// Trades classified as buy.
    pub buy_trades: u64,
    /// Trades classified as sell.
    pub sell_trades: u64,
    /// Trades left unclassified.
    pub unclassified_trades: u64,
    /// Total volume processed.
    pub total_volume: u64,
    /// Buy volume.
    pub buy_volume: u64,
    /// Sell volume.
    pub sell_volume: u64,
    /// Unclassified volume.
    pub unclassified_volume: u64,
    /// Trades with no quote in force.
    pub unknown_quote_trades: u64,
    /// Trades at the midpoint, handed to the tick test.
    pub tick_test_trades: u64,
}

impl ClassificationStats {
    /// Record one classified trade.
    pub fn record(&mut self, trade: &ClassifiedTrade) {
        let volume = trade.trade.volume;
        self.total_trades += 1;
        self.total_volume = self.total_volume.saturating_add(volume);

        match trade.direction {
            Direction::Buy => {
                self.buy_trades += 1;
                self.buy_volume = self.buy_volume.saturating_add(volume);
            }
            Direction::Sell => {
                self.sell_trades += 1;
                self.sell_volume = self.sell_volume.saturating_add(volume);
            }
            Direction::Unclassified => {
                self.unclassified_trades += 1;
                self.unclassified_volume = self.unclassified_volume.saturating_add(volume);
            }
        }

        match trade.basis {
            ClassificationBasis::NoQuote => self.unknown_quote_trades += 1,
            ClassificationBasis::TickTest => self.tick_test_trades += 1,
            ClassificationBasis::QuoteTest => {}
        }
    }

    /// Collect statistics over a set of classified trades.
    pub fn from_trades(trades: &[ClassifiedTrade]) -> Self {
        let mut stats = Self::default();
        for trade in trades {
            stats.record(trade);
        }
        stats
    }

    /// Get the fraction of unclassified volume.
    pub fn unclassified_frac(&self) -> f64 {
        if self.total_volume > 0 {
            self.unclassified_volume as f64 / self.total_volume as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use leeready_core::{AggregatedTrade, QuoteState, TradeMetrics};

    fn make_classified(volume: u64, direction: Direction, basis: ClassificationBasis) -> ClassifiedTrade {
        ClassifiedTrade {
            trade: AggregatedTrade {
                symbol: "ABC".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                price: 10.0,
                volume,
                trade_count: 1,
            },
            quote: QuoteState::unknown(),
            tick: Direction::Unclassified,
            direction,
            basis,
            metrics: TradeMetrics::default(),
        }
    }

    #[test]
    fn test_stats() {
        let trades = vec![
            make_classified(100, Direction::Buy, ClassificationBasis::QuoteTest),
            make_classified(200, Direction::Sell, ClassificationBasis::TickTest),
            make_classified(300, Direction::Unclassified, ClassificationBasis::NoQuote),
            make_classified(400, Direction::Unclassified, ClassificationBasis::TickTest),
        ];

        let stats = ClassificationStats::from_trades(&trades);

        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.buy_trades, 1);
        assert_eq!(stats.sell_trades, 1);
        assert_eq!(stats.unclassified_trades, 2);
        assert_eq!(stats.unknown_quote_trades, 1);
        assert_eq!(stats.tick_test_trades, 2);
        assert!((stats.unclassified_frac() - 0.7).abs() < 1e-10);
    }

    #[test]
    fn test_empty_stats() {
        let stats = ClassificationStats::from_trades(&[]);
        assert_eq!(stats.unclassified_frac(), 0.0);
    }
}
