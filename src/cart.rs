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

//! Shopping cart.
//!
//! Entries are kept in insertion order and never merged: adding the same
//! product twice yields two entries. Every entry passed the availability
//! check when it was added, but stock and expiry are checked again at
//! checkout.

use crate::CheckoutError;
use crate::product::Product;
use crate::shipping::ShippableUnit;
use rust_decimal::Decimal;
use std::io::Write;
use std::iter;
use std::sync::Arc;

/// A product and the number of units requested.
#[derive(Debug, Clone)]
pub struct CartEntry {
    product: Arc<Product>,
    quantity: u32,
}

impl CartEntry {
    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns `price * quantity`, or `None` if it overflows.
    pub fn total_price(&self) -> Option<Decimal> {
        self.product.price().checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Flat surcharge applied once to any order with a shippable entry.
    pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product`, writing a one-line diagnostic to
    /// `out` if the request is rejected.
    ///
    /// The rejection is also returned, so callers are free to ignore it and
    /// carry on the way a till operator would after reading the message.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidQuantity`] - `quantity` is zero or negative.
    /// - [`CheckoutError::OutOfStockOrExpired`] - not enough stock, or expired.
    /// - [`CheckoutError::Output`] - the diagnostic could not be written.
    pub fn add<W: Write>(
        &mut self,
        product: &Arc<Product>,
        quantity: i64,
        out: &mut W,
    ) -> Result<(), CheckoutError> {
        let result = self.try_add(product, quantity);
        match &result {
            Ok(()) => {}
            Err(CheckoutError::InvalidQuantity) => writeln!(out, "Invalid quantity.")?,
            // try_add rejects with nothing else.
            Err(_) => writeln!(out, "Product is either out of stock or expired.")?,
        }
        result
    }

    /// Adds `quantity` units of `product` without printing anything.
    ///
    /// # Errors
    ///
    /// Same validation as [`Cart::add`]. A rejected request leaves the cart
    /// untouched.
    pub fn try_add(&mut self, product: &Arc<Product>, quantity: i64) -> Result<(), CheckoutError> {
        if quantity <= 0 {
            tracing::debug!(
                product = product.name(),
                quantity,
                "rejected cart add: invalid quantity"
            );
            return Err(CheckoutError::InvalidQuantity);
        }

        // Anything beyond u32 can never be in stock.
        let Some(quantity) = u32::try_from(quantity)
            .ok()
            .filter(|&requested| product.is_available(requested))
        else {
            tracing::debug!(
                product = product.name(),
                quantity,
                in_stock = product.quantity(),
                "rejected cart add: out of stock or expired"
            );
            return Err(CheckoutError::OutOfStockOrExpired);
        };

        self.entries.push(CartEntry {
            product: Arc::clone(product),
            quantity,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every entry's `price * quantity`, or `None` if it overflows.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.entries.iter().try_fold(Decimal::ZERO, |sum, entry| {
            sum.checked_add(entry.total_price()?)
        })
    }

    /// True if at least one entry holds a shippable product.
    pub fn requires_shipping(&self) -> bool {
        self.entries.iter().any(|entry| entry.product.is_shippable())
    }

    /// Returns [`Cart::FLAT_SHIPPING_FEE`] if anything needs shipping, else
    /// zero. Weight and unit count do not matter.
    ///
    /// This is always the default fee. A [`Checkout`] built with a different
    /// fee charges [`Checkout::shipping_cost`] instead.
    ///
    /// [`Checkout`]: crate::Checkout
    /// [`Checkout::shipping_cost`]: crate::Checkout::shipping_cost
    pub fn shipping_cost(&self) -> Decimal {
        if self.requires_shipping() {
            Self::FLAT_SHIPPING_FEE
        } else {
            Decimal::ZERO
        }
    }

    /// One [`ShippableUnit`] per physical unit of every shippable entry, in
    /// entry order.
    pub fn shippable_units(&self) -> Vec<ShippableUnit<'_>> {
        self.entries
            .iter()
            .filter_map(|entry| {
                ShippableUnit::of(&entry.product).map(|unit| (unit, entry.quantity as usize))
            })
            .flat_map(|(unit, count)| iter::repeat_n(unit, count))
            .collect()
    }
}
