//! Tick test.
//!
//! Classifies a trade from price momentum alone: an up-tick is a buy, a
//! down-tick a sell, and a zero-tick takes the direction of the previous
//! price change. The look-back stops after one step; a longer run of equal
//! prices stays unclassified.

use leeready_core::{compare_prices, Direction};
use std::cmp::Ordering;

/// Tick test state for one (symbol, date) partition.
#[derive(Debug, Clone)]
pub struct TickTest {
    /// Most recent trade price.
    last: Option<f64>,
    /// Price before `last`.
    prev: Option<f64>,
    price_tolerance: f64,
}

impl TickTest {
    pub fn new(price_tolerance: f64) -> Self {
        Self {
            last: None,
            prev: None,
            price_tolerance,
        }
    }

    /// Classify the next trade price and push it into the window.
    ///
    /// The first two trades of a partition always get `Unclassified`.
    pub fn next(&mut self, price: f64) -> Direction {
        let tick = match (self.last, self.prev) {
            (Some(last), Some(prev)) => match compare_prices(price, last, self.price_tolerance) {
                Ordering::Equal => {
                    Direction::from_ordering(compare_prices(last, prev, self.price_tolerance))
                }
                moved => Direction::from_ordering(moved),
            },
            _ => Direction::Unclassified,
        };

        self.prev = self.last;
        self.last = Some(price);
        tick
    }
}
