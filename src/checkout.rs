// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Checkout processing.
//!
//! The [`Checkout`] takes a customer and a cart through a single pass:
//!
//! ```text
//!  empty? ──► affordable? ──► still available? ──► settle ──► ship ──► receipt
//!    │             │                 │
//!    └─────────────┴─────────────────┴──► one diagnostic line, nothing changed
//! ```
//!
//! Every check runs before the first mutation, so a rejected checkout leaves
//! product stock and the customer balance exactly as they were.

use crate::CheckoutError;
use crate::cart::{Cart, CartEntry};
use crate::customer::Customer;
use crate::product::Product;
use crate::receipt::{Receipt, ReceiptLine};
use crate::shipping::ShipmentNotice;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;

/// Validates and settles carts.
///
/// # Invariants
///
/// - A successful checkout charges exactly `subtotal + shipping`.
/// - Each product's stock drops by exactly the units bought, never below zero.
/// - A failed checkout changes nothing.
#[derive(Debug, Clone)]
pub struct Checkout {
    /// Charged once per order when anything needs shipping.
    shipping_fee: Decimal,
    /// Instant used for expiry checks. `None` means the wall clock.
    now: Option<DateTime<Utc>>,
}

impl Checkout {
    pub fn new() -> Self {
        Checkout {
            shipping_fee: Cart::FLAT_SHIPPING_FEE,
            now: None,
        }
    }

    /// Charges `shipping_fee` instead of [`Cart::FLAT_SHIPPING_FEE`].
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidShippingFee`] if the fee is negative.
    pub fn with_shipping_fee(mut self, shipping_fee: Decimal) -> Result<Self, CheckoutError> {
        if shipping_fee < Decimal::ZERO {
            return Err(CheckoutError::InvalidShippingFee);
        }
        self.shipping_fee = shipping_fee;
        Ok(self)
    }

    /// Evaluates product expiry at `now` instead of the current time.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn shipping_fee(&self) -> Decimal {
        self.shipping_fee
    }

    pub fn shipping_cost(&self, cart: &Cart) -> Decimal {
        if cart.requires_shipping() {
            self.shipping_fee
        } else {
            Decimal::ZERO
        }
    }

    /// Runs the checkout and prints its outcome to `out`.
    ///
    /// On success the shipment notice (if any) is printed, followed by the
    /// receipt. On failure a single `Error: ...` line is printed; `settle`
    /// rejects only with an empty cart, a short balance or missing stock.
    ///
    /// # Errors
    ///
    /// Everything [`Checkout::settle`] returns, plus
    /// [`CheckoutError::Output`] if writing to `out` fails.
    pub fn process<W: Write>(
        &self,
        customer: &mut Customer,
        cart: &Cart,
        out: &mut W,
    ) -> Result<Receipt, CheckoutError> {
        let receipt = match self.settle(customer, cart) {
            Ok(receipt) => receipt,
            Err(error) => {
                let message = match &error {
                    CheckoutError::EmptyCart => "Error: Cart is empty.",
                    CheckoutError::InsufficientBalance => "Error: Insufficient balance.",
                    _ => "Error: One or more products are out of stock or expired.",
                };
                writeln!(out, "{message}")?;
                return Err(error);
            }
        };

        if let Some(notice) = receipt.shipment() {
            notice.render(out)?;
        }
        receipt.render(out)?;

        Ok(receipt)
    }

    /// Validates the cart against the customer and current stock, then
    /// deducts stock and balance. Prints nothing.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] - The cart has no entries.
    /// - [`CheckoutError::InsufficientBalance`] - Balance is below subtotal plus shipping,
    ///   or the total is too large to represent.
    /// - [`CheckoutError::OutOfStockOrExpired`] - A product ran out or expired since it was added.
    pub fn settle(&self, customer: &mut Customer, cart: &Cart) -> Result<Receipt, CheckoutError> {
        if cart.is_empty() {
            tracing::debug!(customer = customer.name(), "checkout rejected: cart is empty");
            return Err(CheckoutError::EmptyCart);
        }

        let shipping = self.shipping_cost(cart);
        let priced = cart
            .entries()
            .iter()
            .map(ReceiptLine::from_entry)
            .collect::<Option<Vec<_>>>()
            .and_then(|lines| {
                let subtotal = lines.iter().try_fold(Decimal::ZERO, |sum, line| {
                    sum.checked_add(line.total_price())
                })?;
                let total = subtotal.checked_add(shipping)?;
                Some((lines, subtotal, total))
            });
        // No balance can cover a total beyond Decimal::MAX.
        let Some((lines, subtotal, total)) = priced else {
            tracing::debug!(customer = customer.name(), "checkout rejected: total overflows");
            return Err(CheckoutError::InsufficientBalance);
        };

        if !customer.can_afford(total) {
            tracing::debug!(
                customer = customer.name(),
                balance = %customer.balance(),
                %total,
                "checkout rejected: insufficient balance"
            );
            return Err(CheckoutError::InsufficientBalance);
        }

        let now = self.now.unwrap_or_else(Utc::now);
        for (product, requested) in demand(cart.entries())? {
            if !product.is_available_at(requested, now) {
                tracing::debug!(
                    customer = customer.name(),
                    product = product.name(),
                    requested,
                    in_stock = product.quantity(),
                    "checkout rejected: out of stock or expired"
                );
                return Err(CheckoutError::OutOfStockOrExpired);
            }
        }

        // All checks passed; from here on nothing can fail.
        for entry in cart.entries() {
            entry.product().reduce_quantity(entry.quantity());
        }
        customer.deduct(total);

        tracing::info!(
            customer = customer.name(),
            %subtotal,
            %shipping,
            %total,
            balance_after = %customer.balance(),
            "checkout settled"
        );

        Ok(Receipt {
            lines,
            subtotal,
            shipping,
            total,
            balance_after: customer.balance(),
            shipment: ShipmentNotice::from_units(&cart.shippable_units()),
        })
    }
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new()
    }
}

/// Total units requested per distinct product.
///
/// A product listed in several entries is checked against the sum of those
/// entries, so settling can never take more than is in stock.
fn demand(entries: &[CartEntry]) -> Result<Vec<(&Arc<Product>, u32)>, CheckoutError> {
    let mut demand: Vec<(&Arc<Product>, u32)> = Vec::with_capacity(entries.len());
    for entry in entries {
        match demand
            .iter_mut()
            .find(|(product, _)| Arc::ptr_eq(product, entry.product()))
        {
            Some((_, requested)) => {
                *requested = requested
                    .checked_add(entry.quantity())
                    .ok_or(CheckoutError::OutOfStockOrExpired)?;
            }
            None => demand.push((entry.product(), entry.quantity())),
        }
    }
    Ok(demand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn product(name: &str, price: Decimal, quantity: u32) -> Arc<Product> {
        Arc::new(Product::new(name, price, quantity).unwrap())
    }

    #[test]
    fn demand_sums_repeated_products() {
        let pens = product("Pen", dec!(5), 10);
        let ink = product("Ink", dec!(12), 2);

        let mut cart = Cart::new();
        cart.try_add(&pens, 3).unwrap();
        cart.try_add(&ink, 1).unwrap();
        cart.try_add(&pens, 4).unwrap();

        let demand = demand(cart.entries()).unwrap();
        assert_eq!(demand.len(), 2);
        assert!(Arc::ptr_eq(demand[0].0, &pens));
        assert_eq!(demand[0].1, 7);
        assert_eq!(demand[1].1, 1);
    }

    #[test]
    fn repeated_entries_cannot_oversell() {
        let pens = product("Pen", dec!(5), 5);
        let mut cart = Cart::new();
        cart.try_add(&pens, 3).unwrap();
        cart.try_add(&pens, 3).unwrap();

        let mut customer = Customer::new("Mina", dec!(100));
        let result = Checkout::new().settle(&mut customer, &cart);

        assert_eq!(result, Err(CheckoutError::OutOfStockOrExpired));
        assert_eq!(pens.quantity(), 5);
        assert_eq!(customer.balance(), dec!(100));
    }

    #[test]
    fn custom_shipping_fee() {
        let parcel = Arc::new(
            Product::new("Parcel", dec!(10), 1)
                .unwrap()
                .with_weight(dec!(3))
                .unwrap(),
        );
        let mut cart = Cart::new();
        cart.try_add(&parcel, 1).unwrap();

        let mut customer = Customer::new("Mina", dec!(100));
        let receipt = Checkout::new()
            .with_shipping_fee(dec!(12.5))
            .unwrap()
            .settle(&mut customer, &cart)
            .unwrap();

        assert_eq!(receipt.shipping(), dec!(12.5));
        assert_eq!(cart.shipping_cost(), Cart::FLAT_SHIPPING_FEE);
        assert_eq!(receipt.total(), dec!(22.5));
        assert_eq!(customer.balance(), dec!(77.5));
    }

    #[test]
    fn negative_shipping_fee_is_rejected() {
        let result = Checkout::new().with_shipping_fee(dec!(-5));
        assert_eq!(result.err(), Some(CheckoutError::InvalidShippingFee));

        let free = Checkout::new().with_shipping_fee(Decimal::ZERO).unwrap();
        assert_eq!(free.shipping_fee(), Decimal::ZERO);
    }

    #[test]
    fn demand_overflow_is_out_of_stock() {
        let bolts = product("Bolt", Decimal::ZERO, u32::MAX);
        let mut cart = Cart::new();
        cart.try_add(&bolts, i64::from(u32::MAX)).unwrap();
        cart.try_add(&bolts, 1).unwrap();

        assert_eq!(demand(cart.entries()).err(), Some(CheckoutError::OutOfStockOrExpired));

        let mut customer = Customer::new("Mina", dec!(100));
        let result = Checkout::new().settle(&mut customer, &cart);

        assert_eq!(result, Err(CheckoutError::OutOfStockOrExpired));
        assert_eq!(bolts.quantity(), u32::MAX);
        assert_eq!(customer.balance(), dec!(100));
    }

    #[test]
    fn overflowing_line_total_is_unaffordable() {
        let gold = product("Gold", Decimal::MAX, 5);
        let mut cart = Cart::new();
        cart.try_add(&gold, 2).unwrap();

        let mut customer = Customer::new("Mina", Decimal::MAX);
        let mut out = Vec::new();
        let result = Checkout::new().process(&mut customer, &cart, &mut out);

        assert_eq!(result, Err(CheckoutError::InsufficientBalance));
        assert_eq!(String::from_utf8(out).unwrap(), "Error: Insufficient balance.\n");
        assert_eq!(gold.quantity(), 5);
        assert_eq!(customer.balance(), Decimal::MAX);
    }

    #[test]
    fn overflowing_shipping_total_is_unaffordable() {
        let gold = Arc::new(
            Product::new("Gold", Decimal::MAX, 5)
                .unwrap()
                .with_weight(dec!(1))
                .unwrap(),
        );
        let mut cart = Cart::new();
        cart.try_add(&gold, 1).unwrap();

        let mut customer = Customer::new("Mina", Decimal::MAX);
        let result = Checkout::new().settle(&mut customer, &cart);

        assert_eq!(result, Err(CheckoutError::InsufficientBalance));
        assert_eq!(gold.quantity(), 5);
        assert_eq!(customer.balance(), Decimal::MAX);
    }

    #[test]
    fn expiry_is_evaluated_at_checkout_instant() {
        let now = Utc::now();
        let milk = Arc::new(
            Product::new("Milk", dec!(20), 4)
                .unwrap()
                .with_expiry(now + Duration::hours(1)),
        );
        let mut cart = Cart::new();
        cart.try_add(&milk, 1).unwrap();
        let mut customer = Customer::new("Mina", dec!(100));

        let late = Checkout::new().at(now + Duration::hours(2));
        assert_eq!(
            late.settle(&mut customer, &cart),
            Err(CheckoutError::OutOfStockOrExpired)
        );

        let on_time = Checkout::new().at(now);
        assert!(on_time.settle(&mut customer, &cart).is_ok());
        assert_eq!(milk.quantity(), 3);
    }
}
