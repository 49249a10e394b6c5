//! Server-authoritative checkout pricing.
//!
//! All amounts are integer minor units. The tax rate is the single
//! flat goods-and-services rate; shipping is a flat fee with no weight or
//! distance component.

/// Flat tax rate applied to the subtotal, in percent.
pub const TAX_RATE_PERCENT: u64 = 18;

/// Flat shipping fee in minor units.
pub const SHIPPING_FEE: u64 = 50_00;

/// Monetary breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total: u64,
}

/// Total for one line: unit price times quantity.
#[must_use]
pub fn line_total(unit_price: u64, quantity: u32) -> u64 {
    unit_price * u64::from(quantity)
}

/// Compute the order totals from a subtotal.
///
/// Tax is rounded half-up to the nearest minor unit.
#[must_use]
pub fn compute_totals(subtotal: u64) -> OrderTotals {
    let tax = (subtotal * TAX_RATE_PERCENT + 50) / 100;

    OrderTotals {
        subtotal,
        tax,
        shipping: SHIPPING_FEE,
        total: subtotal + tax + SHIPPING_FEE,
    }
}
