//! Entry sizing and exit settlement.
//!
//! Entries allocate a fixed fraction of current cash, floor-divided to a
//! whole number of units at the bar's open. Exits always sell the full
//! position. Cash moves only here.

use chrono::NaiveDate;

use super::account::Account;
use super::position::{Position, Trade, TradeReason, TradeSide};

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryResult {
    Entered { quantity: i64 },
    /// Floor sizing produced zero units; the account stays flat and no
    /// trade is recorded.
    SizedToZero,
}

/// Open a position from flat. The caller supplies the ledger side and
/// reason: a bearish signal opens the same long-style lot as a bullish
/// one, distinguished only by its label.
pub fn enter_position(
    account: &mut Account,
    date: NaiveDate,
    price: f64,
    allocation_fraction: f64,
    side: TradeSide,
    reason: TradeReason,
) -> EntryResult {
    debug_assert!(account.is_flat());

    let allocated = account.balance * allocation_fraction;
    let quantity = (allocated / price).floor() as i64;

    if quantity == 0 {
        return EntryResult::SizedToZero;
    }

    account.balance -= quantity as f64 * price;
    account.position = Some(Position {
        quantity,
        entry_price: price,
        entry_date: date,
    });
    account.record_trade(Trade {
        date,
        side,
        quantity,
        price,
        reason,
    });

    EntryResult::Entered { quantity }
}

/// Close the open position at `price`, crediting the full proceeds back
/// to cash. No-op returning `None` if the account is already flat.
pub fn exit_position(
    account: &mut Account,
    date: NaiveDate,
    price: f64,
    reason: TradeReason,
) -> Option<i64> {
    let position = account.position.take()?;

    account.balance += position.quantity as f64 * price;
    account.record_trade(Trade {
        date,
        side: TradeSide::Sell,
        quantity: position.quantity,
        price,
        reason,
    });

    Some(position.quantity)
}
