//! Input tables.
//!
//! Converts JSON row objects into typed trade and quote records, and splits a
//! mixed feed into its trade and quote projections. Column presence is
//! checked on every row before any row is converted.

use chrono::{NaiveDate, NaiveTime};
use leeready_core::{Error, MarketEvent, RawQuote, RawTrade, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Columns a trade table must carry.
pub const TRADE_COLUMNS: [&str; 5] = ["symbol", "date", "time", "price", "volume"];

/// Columns a quote table must carry. Bid and ask may be null.
pub const QUOTE_COLUMNS: [&str; 5] = ["symbol", "date", "time", "bid", "ask"];

/// Typed rows from a table, with the count of rows dropped as malformed.
#[derive(Debug, Clone)]
pub struct ParsedRows<T> {
    pub rows: Vec<T>,
    pub malformed: u64,
}

impl<T> Default for ParsedRows<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            malformed: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TradeRow {
    symbol: String,
    date: NaiveDate,
    time: NaiveTime,
    price: f64,
    volume: i64,
}

/// Fail unless every row is an object carrying every required column.
pub fn check_columns(table: &str, rows: &[Value], required: &[&str]) -> Result<()> {
    for (idx, row) in rows.iter().enumerate() {
        let object = row
            .as_object()
            .ok_or_else(|| Error::schema(format!("{table} row {idx} is not an object")))?;
        if let Some(missing) = required.iter().find(|col| !object.contains_key(**col)) {
            return Err(Error::schema(format!(
                "{table} row {idx} is missing required column `{missing}`"
            )));
        }
    }
    Ok(())
}

/// Parse a trade table.
///
/// Rows whose values cannot be read (null or wrongly typed) and rows with
/// negative volume are dropped and counted.
pub fn parse_trade_rows(rows: &[Value]) -> Result<ParsedRows<RawTrade>> {
    check_columns("trade", rows, &TRADE_COLUMNS)?;

    let mut parsed = ParsedRows::default();
    for (idx, row) in rows.iter().enumerate() {
        let row = match TradeRow::deserialize(row) {
            Ok(row) => row,
            Err(err) => {
                warn!(row = idx, error = %err, "dropped unreadable trade row");
                parsed.malformed += 1;
                continue;
            }
        };
        let Ok(volume) = u64::try_from(row.volume) else {
            warn!(row = idx, volume = row.volume, "dropped trade row with negative volume");
            parsed.malformed += 1;
            continue;
        };
        parsed.rows.push(RawTrade {
            symbol: row.symbol,
            date: row.date,
            time: row.time,
            price: row.price,
            volume,
        });
    }

    Ok(parsed)
}

/// Parse a quote table. Rows whose values cannot be read are dropped and
/// counted; a null bid or ask is a missing side, not a malformed row.
pub fn parse_quote_rows(rows: &[Value]) -> Result<ParsedRows<RawQuote>> {
    check_columns("quote", rows, &QUOTE_COLUMNS)?;

    let mut parsed = ParsedRows::default();
    for (idx, row) in rows.iter().enumerate() {
        match RawQuote::deserialize(row) {
            Ok(quote) => parsed.rows.push(quote),
            Err(err) => {
                warn!(row = idx, error = %err, "dropped unreadable quote row");
                parsed.malformed += 1;
            }
        }
    }

    Ok(parsed)
}

/// Trade projection of a mixed feed.
pub fn trades(events: &[MarketEvent]) -> Vec<RawTrade> {
    events
        .iter()
        .filter_map(|event| match event {
            MarketEvent::Trade(trade) => Some(trade.clone()),
            MarketEvent::Quote(_) => None,
        })
        .collect()
}

/// Quote projection of a mixed feed.
pub fn quotes(events: &[MarketEvent]) -> Vec<RawQuote> {
    events
        .iter()
        .filter_map(|event| match event {
            MarketEvent::Quote(quote) => Some(quote.clone()),
            MarketEvent::Trade(_) => None,
        })
        .collect()
}
