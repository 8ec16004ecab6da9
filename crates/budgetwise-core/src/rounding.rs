use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

/// Scale for balances and payments.
pub const MONEY_SCALE: u32 = 2;

/// Scale retained for intermediate interest-rate arithmetic.
pub const RATE_SCALE: u32 = 6;

/// Round a monetary value to 2 fractional digits, half-up.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Round an intermediate rate to 6 fractional digits, half-up.
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Debt-completion test used consistently across the engine: a balance
/// whose rounded value is <= 0.00 is fully paid, any fractional residual
/// is discarded.
pub fn is_zero_or_negative(value: Decimal) -> bool {
    round_money(value) <= Decimal::ZERO
}

/// Compare two monetary values at money scale. All ordering and tie-break
/// decisions go through this so sub-cent noise cannot flip an ordering.
pub fn compare(a: Decimal, b: Decimal) -> Ordering {
    round_money(a).cmp(&round_money(b))
}

/// Compare two rates at rate scale (money scale would collapse 18.99% and
/// 18.50% into a tie).
pub fn compare_rate(a: Decimal, b: Decimal) -> Ordering {
    round_rate(a).cmp(&round_rate(b))
}
