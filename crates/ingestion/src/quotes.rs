//! Quote compaction.
//!
//! Reduces a raw quote feed to the revisions that move the midpoint. The
//! first quote of each (symbol, date) is always kept, even when its midpoint
//! is unknown.

use leeready_core::{compare_prices, QuoteEvent, RawQuote};
use std::cmp::Ordering;
use tracing::warn;

/// Whether a raw quote is usable: present sides positive and finite, ask >= bid.
pub fn is_valid_quote(quote: &RawQuote) -> bool {
    let side_ok = |side: Option<f64>| side.map_or(true, |px| px.is_finite() && px > 0.0);
    if !side_ok(quote.bid) || !side_ok(quote.ask) {
        return false;
    }
    match (quote.bid, quote.ask) {
        (Some(bid), Some(ask)) => ask >= bid,
        _ => true,
    }
}

/// Statistics from the most recent compaction.
#[derive(Debug, Clone, Default)]
pub struct CompactionStats {
    /// Quotes received.
    pub input_quotes: u64,
    /// Quotes dropped as malformed.
    pub malformed_quotes: u64,
    /// Quotes kept as midpoint revisions.
    pub retained_quotes: u64,
}

/// Filters a quote feed down to midpoint revisions.
#[derive(Debug)]
pub struct QuoteCompactor {
    /// Midpoints closer than this count as unchanged.
    price_tolerance: f64,
    stats: CompactionStats,
}

impl QuoteCompactor {
    pub fn new(price_tolerance: f64) -> Self {
        Self {
            price_tolerance,
            stats: CompactionStats::default(),
        }
    }

    /// Compact a raw quote feed.
    ///
    /// Output is sorted by (symbol, date, time); quotes with equal keys keep
    /// their feed order.
    pub fn compact<I>(&mut self, quotes: I) -> Vec<QuoteEvent>
    where
        I: IntoIterator<Item = RawQuote>,
    {
        let mut stats = CompactionStats::default();

        let mut events: Vec<QuoteEvent> = quotes
            .into_iter()
            .filter(|quote| {
                stats.input_quotes += 1;
                if is_valid_quote(quote) {
                    true
                } else {
                    stats.malformed_quotes += 1;
                    false
                }
            })
            .map(QuoteEvent::from)
            .collect();

        // Stable: same-time quotes stay in feed order.
        events.sort_by(|a, b| {
            (&a.symbol, a.date, a.time).cmp(&(&b.symbol, b.date, b.time))
        });

        let mut retained: Vec<QuoteEvent> = Vec::new();
        for event in events {
            let keep = match retained.last() {
                Some(prev) if prev.symbol == event.symbol && prev.date == event.date => {
                    self.midpoint_changed(prev.midpoint, event.midpoint)
                }
                // First quote of the partition.
                _ => true,
            };
            if keep {
                retained.push(event);
            }
        }

        stats.retained_quotes = retained.len() as u64;
        if stats.malformed_quotes > 0 {
            warn!(
                malformed = stats.malformed_quotes,
                total = stats.input_quotes,
                "dropped malformed quotes"
            );
        }
        self.stats = stats;

        retained
    }

    fn midpoint_changed(&self, prev: Option<f64>, next: Option<f64>) -> bool {
        match (prev, next) {
            (Some(a), Some(b)) => compare_prices(a, b, self.price_tolerance) != Ordering::Equal,
            (None, None) => false,
            _ => true,
        }
    }

    /// Statistics from the most recent call to [`QuoteCompactor::compact`].
    pub fn stats(&self) -> &CompactionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn make_quote(symbol: &str, day: u32, secs: u32, bid: Option<f64>, ask: Option<f64>) -> RawQuote {
        RawQuote {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            time: NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap(),
            bid,
            ask,
        }
    }

    #[test]
    fn test_unchanged_midpoints_collapse() {
        let quotes = vec![
            make_quote("ABC", 1, 100, Some(10.00), Some(10.10)),
            make_quote("ABC", 1, 110, Some(10.00), Some(10.10)),
            // Wider but same midpoint.
            make_quote("ABC", 1, 120, Some(9.95), Some(10.15)),
            make_quote("ABC", 1, 200, Some(10.00), Some(10.20)),
        ];

        let mut compactor = QuoteCompactor::new(1e-9);
        let retained = compactor.compact(quotes);

        assert_eq!(retained.len(), 2);
        assert_eq!(retained[0].time, NaiveTime::from_hms_opt(0, 1, 40).unwrap());
        assert_eq!(retained[1].time, NaiveTime::from_hms_opt(0, 3, 20).unwrap());
        assert_eq!(compactor.stats().retained_quotes, 2);
    }

    #[test]
    fn test_first_quote_of_each_partition_kept() {
        let quotes = vec![
            make_quote("ABC", 1, 100, Some(10.00), Some(10.10)),
            make_quote("ABC", 2, 100, Some(10.00), Some(10.10)),
            make_quote("DEF", 1, 100, Some(10.00), Some(10.10)),
        ];

        let retained = QuoteCompactor::new(1e-9).compact(quotes);

        assert_eq!(retained.len(), 3);
    }

    #[test]
    fn test_unknown_midpoint_first_quote_kept() {
        let quotes = vec![
            make_quote("ABC", 1, 100, None, Some(10.10)),
            make_quote("ABC", 1, 105, Some(10.00), None),
            make_quote("ABC", 1, 110, Some(10.00), Some(10.10)),
            make_quote("ABC", 1, 120, None, None),
        ];

        let retained = QuoteCompactor::new(1e-9).compact(quotes);

        // unknown, (unknown again dropped), known, unknown
        assert_eq!(retained.len(), 3);
        assert!(retained[0].midpoint.is_none());
        assert!(retained[1].midpoint.is_some());
        assert!(retained[2].midpoint.is_none());
    }

    #[test]
    fn test_malformed_quotes_dropped() {
        let quotes = vec![
            make_quote("ABC", 1, 100, Some(10.20), Some(10.10)), // crossed
            make_quote("ABC", 1, 101, Some(-1.0), Some(10.10)),
            make_quote("ABC", 1, 102, Some(10.00), Some(f64::INFINITY)),
            make_quote("ABC", 1, 103, Some(10.00), Some(10.10)),
        ];

        let mut compactor = QuoteCompactor::new(1e-9);
        let retained = compactor.compact(quotes);

        assert_eq!(retained.len(), 1);
        assert_eq!(compactor.stats().malformed_quotes, 3);
        assert_eq!(compactor.stats().input_quotes, 4);
    }

    #[test]
    fn test_output_time_ordered_without_repeats() {
        let quotes = vec![
            make_quote("ABC", 1, 300, Some(10.00), Some(10.30)),
            make_quote("ABC", 1, 100, Some(10.00), Some(10.10)),
            make_quote("ABC", 1, 200, Some(10.00), Some(10.10)),
            make_quote("ABC", 1, 250, Some(10.10), Some(10.20)),
        ];

        let retained = QuoteCompactor::new(1e-9).compact(quotes);

        for pair in retained.windows(2) {
            assert!(pair[0].time <= pair[1].time);
            assert_ne!(pair[0].midpoint, pair[1].midpoint);
        }
        // 10.05 @100, 10.15 @250; 10.15 @300 is a repeat
        assert_eq!(retained.len(), 2);
    }
}
