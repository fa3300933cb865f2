//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are `Decimal` values with two decimal places in the API and integer
//! cents in storage. All arithmetic happens on `Decimal`, so line subtotals
//! and order totals never accumulate floating-point drift.

use rust_decimal::prelude::*;
use shared::error::{AppError, AppResult, ErrorCode};

/// Monetary scale (2 decimal places)
pub const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed dish price (99,999,999.99)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Maximum allowed quantity per cart line
pub const MAX_QUANTITY: i64 = 9999;

/// Maximum stock a dish can hold
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Validate a dish price: positive, at most two decimal places, bounded
pub fn validate_price(price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::DishInvalidPrice,
            format!("price must be positive, got {price}"),
        ));
    }
    if price.normalize().scale() > DECIMAL_PLACES {
        return Err(AppError::with_message(
            ErrorCode::DishInvalidPrice,
            format!("price must have at most {DECIMAL_PLACES} decimal places, got {price}"),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::DishInvalidPrice,
            format!("price exceeds maximum allowed ({MAX_PRICE}), got {price}"),
        ));
    }
    Ok(())
}

/// Validate a cart/order quantity (1..=MAX_QUANTITY)
pub fn validate_quantity(quantity: i64) -> AppResult<()> {
    if quantity < 1 {
        return Err(AppError::with_message(
            ErrorCode::CartInvalidQuantity,
            format!("quantity must be at least 1, got {quantity}"),
        ));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"),
        ));
    }
    Ok(())
}

/// Validate a stock level (0..=MAX_STOCK)
pub fn validate_stock(stock: i64) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("stock_quantity must not be negative, got {stock}"),
        ));
    }
    if stock > MAX_STOCK {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("stock_quantity exceeds maximum allowed ({MAX_STOCK}), got {stock}"),
        ));
    }
    Ok(())
}

/// Convert a price into integer cents for storage
pub fn to_cents(value: Decimal) -> AppResult<i64> {
    (value.round_dp(DECIMAL_PLACES) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("amount {value} does not fit in storage"),
            )
        })
}

/// Convert stored integer cents back into a two-place Decimal
#[inline]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, DECIMAL_PLACES)
}

/// unit_price × quantity, kept at two decimal places
pub fn line_subtotal(unit_price: Decimal, quantity: i64) -> Decimal {
    let mut subtotal = unit_price * Decimal::from(quantity);
    subtotal.rescale(DECIMAL_PLACES);
    subtotal
}

/// Sum of subtotals, kept at two decimal places
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    let mut total: Decimal = amounts.into_iter().sum();
    total.rescale(DECIMAL_PLACES);
    total
}
