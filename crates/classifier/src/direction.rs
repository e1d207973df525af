//! Lee-Ready direction rule.
//!
//! The quote test decides whenever the trade prints away from the midpoint;
//! at the midpoint the tick test decides.

use leeready_core::{compare_prices, ClassificationBasis, Direction, QuoteState};
use std::cmp::Ordering;

/// Outcome of the direction rule for one trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub basis: ClassificationBasis,
}

/// Classify a trade from its price, the quote in force and its tick.
pub fn classify_direction(
    price: f64,
    quote: &QuoteState,
    tick: Direction,
    price_tolerance: f64,
) -> Decision {
    let Some(midpoint) = quote.midpoint else {
        return Decision {
            direction: Direction::Unclassified,
            basis: ClassificationBasis::NoQuote,
        };
    };

    let by_quote = |direction| Decision {
        direction,
        basis: ClassificationBasis::QuoteTest,
    };
    match compare_prices(price, midpoint, price_tolerance) {
        Ordering::Less => by_quote(Direction::Sell),
        Ordering::Greater => by_quote(Direction::Buy),
        Ordering::Equal => Decision {
            direction: tick,
            basis: ClassificationBasis::TickTest,
        },
    }
}
