use rust_decimal::{Decimal, RoundingStrategy};

/// Arredondamento comercial em 2 casas (meio para cima), o mesmo das colunas NUMERIC(14, 2).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
