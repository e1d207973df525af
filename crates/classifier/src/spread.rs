//! Spread and order-flow measures of a classified trade.

use leeready_core::{Direction, QuoteState, TradeMetrics, Volume};

/// Compute effective, absolute and relative spread and net order flow.
///
/// All measures are unknown when the quote state is unknown.
pub fn trade_metrics(
    price: f64,
    volume: Volume,
    quote: &QuoteState,
    direction: Direction,
) -> TradeMetrics {
    let Some(midpoint) = quote.midpoint else {
        return TradeMetrics::default();
    };

    let absolute_spread = quote.spread();
    TradeMetrics {
        effective_spread: Some(2.0 * (price - midpoint).abs()),
        absolute_spread,
        relative_spread: absolute_spread.map(|spread| spread / price),
        net_order_flow: Some(direction.signed_volume(volume)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_metrics_with_known_quote() {
        let quote = QuoteState {
            bid: Some(10.00),
            ask: Some(10.10),
            midpoint: Some(10.05),
        };

        let metrics = trade_metrics(10.10, 50, &quote, Direction::Buy);

        assert_relative_eq!(metrics.effective_spread.unwrap(), 0.10, epsilon = 1e-12);
        assert_relative_eq!(metrics.absolute_spread.unwrap(), 0.10, epsilon = 1e-12);
        assert_relative_eq!(metrics.relative_spread.unwrap(), 0.10 / 10.10, epsilon = 1e-12);
        assert_eq!(metrics.net_order_flow, Some(50));
    }

    #[test]
    fn test_sell_flow_is_negative() {
        let quote = QuoteState {
            bid: Some(10.00),
            ask: Some(10.10),
            midpoint: Some(10.05),
        };

        let metrics = trade_metrics(10.00, 300, &quote, Direction::Sell);

        assert_eq!(metrics.net_order_flow, Some(-300));
    }

    #[test]
    fn test_unknown_quote_propagates() {
        let metrics = trade_metrics(10.00, 300, &QuoteState::unknown(), Direction::Unclassified);

        assert_eq!(metrics, TradeMetrics::default());
        assert!(metrics.net_order_flow.is_none());
    }

    #[test]
    fn test_midpoint_unclassified_flow_is_zero() {
        let quote = QuoteState {
            bid: Some(10.00),
            ask: Some(10.20),
            midpoint: Some(10.10),
        };

        let metrics = trade_metrics(10.10, 400, &quote, Direction::Unclassified);

        assert_eq!(metrics.net_order_flow, Some(0));
        assert_relative_eq!(metrics.effective_spread.unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flow_saturates_on_huge_volume() {
        let quote = QuoteState {
            bid: Some(10.00),
            ask: Some(10.10),
            midpoint: Some(10.05),
        };

        let metrics = trade_metrics(10.00, u64::MAX, &quote, Direction::Sell);

        assert_eq!(metrics.net_order_flow, Some(-i64::MAX));
    }
}
