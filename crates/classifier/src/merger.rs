//! Trade/quote stream merge with late-report adjustment.
//!
//! Trades are reported later than the quotes they executed against, so each
//! trade looks up the quote book as of `time - lag`. A revision posted exactly
//! at the adjusted time is already in effect.

use chrono::{Duration, NaiveTime};
use leeready_core::{QuoteEvent, QuoteState};

/// Time at which to read the quote book for a trade reported at `time`.
///
/// `None` when the adjustment would cross back over midnight, i.e. before
/// any quote of the trade's day could exist.
pub fn lookup_time(time: NaiveTime, lag: Duration) -> Option<NaiveTime> {
    let (shifted, wrapped_secs) = time.overflowing_sub_signed(lag);
    (wrapped_secs == 0).then_some(shifted)
}

/// Forward-only cursor over one partition's quote revisions.
///
/// Trades must be presented in non-decreasing time order; the cursor never
/// moves backwards.
#[derive(Debug, Clone)]
pub struct QuoteCursor<'a> {
    revisions: &'a [QuoteEvent],
    /// Index of the first revision not yet in effect.
    next: usize,
    /// Last bid/ask/midpoint in effect.
    current: QuoteState,
    lag: Duration,
}

impl<'a> QuoteCursor<'a> {
    /// `revisions` must be time-ordered and belong to a single partition.
    pub fn new(revisions: &'a [QuoteEvent], lag: Duration) -> Self {
        Self {
            revisions,
            next: 0,
            current: QuoteState::unknown(),
            lag,
        }
    }

    /// Quote state in force for a trade reported at `trade_time`.
    pub fn state_at(&mut self, trade_time: NaiveTime) -> QuoteState {
        let Some(at) = lookup_time(trade_time, self.lag) else {
            return QuoteState::unknown();
        };

        while let Some(revision) = self.revisions.get(self.next) {
            if revision.time > at {
                break;
            }
            self.current = revision.state();
            self.next += 1;
        }

        self.current
    }

    /// Number of revisions already applied.
    pub fn applied(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use leeready_core::RawQuote;

    fn at(secs: u32) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap()
    }

    fn make_revision(secs: u32, bid: f64, ask: f64) -> QuoteEvent {
        QuoteEvent::from(RawQuote {
            symbol: "ABC".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            time: at(secs),
            bid: Some(bid),
            ask: Some(ask),
        })
    }

    #[test]
    fn test_lookup_time_shifts_back() {
        assert_eq!(lookup_time(at(103), Duration::seconds(5)), Some(at(98)));
        assert_eq!(lookup_time(at(3), Duration::seconds(5)), None);
        assert_eq!(lookup_time(at(5), Duration::seconds(5)), Some(at(0)));
    }

    #[test]
    fn test_no_quote_yet_is_unknown() {
        let revisions = vec![make_revision(100, 10.00, 10.10)];
        let mut cursor = QuoteCursor::new(&revisions, Duration::seconds(5));

        assert!(!cursor.state_at(at(103)).is_known());
        assert_eq!(cursor.applied(), 0);
    }

    #[test]
    fn test_tie_counts_as_in_effect() {
        let revisions = vec![make_revision(100, 10.00, 10.10)];
        let mut cursor = QuoteCursor::new(&revisions, Duration::seconds(5));

        let state = cursor.state_at(at(105));

        assert_eq!(state.bid, Some(10.00));
        assert_eq!(state.ask, Some(10.10));
    }

    #[test]
    fn test_latest_revision_wins() {
        let revisions = vec![
            make_revision(100, 10.00, 10.10),
            make_revision(200, 10.00, 10.20),
            make_revision(300, 10.10, 10.30),
        ];
        let mut cursor = QuoteCursor::new(&revisions, Duration::seconds(5));

        assert_eq!(cursor.state_at(at(150)).ask, Some(10.10));
        // Quote at 200 is not yet visible to a trade reported at 204.
        assert_eq!(cursor.state_at(at(204)).ask, Some(10.10));
        assert_eq!(cursor.state_at(at(250)).ask, Some(10.20));
        assert_eq!(cursor.state_at(at(400)).ask, Some(10.30));
        assert_eq!(cursor.applied(), 3);
    }

    #[test]
    fn test_zero_lag_uses_trade_time() {
        let revisions = vec![make_revision(100, 10.00, 10.10)];
        let mut cursor = QuoteCursor::new(&revisions, Duration::zero());

        assert!(cursor.state_at(at(100)).is_known());
    }

    #[test]
    fn test_one_sided_revision_clears_midpoint() {
        let mut revisions = vec![make_revision(100, 10.00, 10.10)];
        revisions.push(QuoteEvent::from(RawQuote {
            symbol: "ABC".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            time: at(200),
            bid: Some(10.00),
            ask: None,
        }));
        let mut cursor = QuoteCursor::new(&revisions, Duration::seconds(5));

        assert!(cursor.state_at(at(150)).is_known());
        let state = cursor.state_at(at(250));

        assert!(!state.is_known());
        assert_eq!(state.bid, Some(10.00));
        assert!(state.ask.is_none());
        assert_eq!(cursor.applied(), 2);
    }
}
