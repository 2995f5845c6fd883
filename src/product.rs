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

//! Product catalog entries.
//!
//! A product may expire, may need shipping, both, or neither. Both
//! capabilities are optional fields on one type:
//!
//! | expiry | weight | kind |
//! |--------|--------|------|
//! | `None` | `None` | non-perishable, no shipping (e.g. a scratch card) |
//! | `Some` | `None` | perishable, no shipping |
//! | `None` | `Some` | shippable |
//! | `Some` | `Some` | perishable and shippable (e.g. cheese) |
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use checkout_demo_rs::Product;
//! use rust_decimal_macros::dec;
//!
//! let cheese = Product::new("Cheese", dec!(100), 5)
//!     .unwrap()
//!     .with_expiry(Utc::now() + Duration::days(3))
//!     .with_weight(dec!(0.2))
//!     .unwrap();
//!
//! assert!(cheese.is_shippable());
//! assert!(cheese.is_available(5));
//! assert!(!cheese.is_available(6));
//! ```

use crate::CheckoutError;
use crate::base::Weight;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;

/// A product with stock on hand.
///
/// Stock is behind a [`Mutex`] so the same product can be referenced by a
/// catalog and by any number of carts (as `Arc<Product>`) while checkout
/// still deducts from it.
#[derive(Debug)]
pub struct Product {
    name: String,
    price: Decimal,
    expiry: Option<DateTime<Utc>>,
    weight: Option<Weight>,
    stock: Mutex<u32>,
}

impl Product {
    /// Creates a non-perishable, non-shippable product.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidPrice`] if `price` is negative.
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Result<Self, CheckoutError> {
        if price < Decimal::ZERO {
            return Err(CheckoutError::InvalidPrice);
        }
        Ok(Self {
            name: name.into(),
            price,
            expiry: None,
            weight: None,
            stock: Mutex::new(quantity),
        })
    }

    /// Marks the product as perishable.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Marks the product as shippable, with a per-unit weight in kilograms.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidWeight`] unless `kilograms` is positive.
    pub fn with_weight(mut self, kilograms: Decimal) -> Result<Self, CheckoutError> {
        let weight = Weight::from_kilograms(kilograms);
        if !weight.is_positive() {
            return Err(CheckoutError::InvalidWeight);
        }
        self.weight = Some(weight);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Units currently in stock.
    pub fn quantity(&self) -> u32 {
        *self.stock.lock()
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Per-unit weight, present only for shippable products.
    pub fn weight(&self) -> Option<Weight> {
        self.weight
    }

    pub fn is_shippable(&self) -> bool {
        self.weight.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A product without an expiry never expires; otherwise it is expired
    /// once `now` is strictly past the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry < now)
    }

    pub fn is_available(&self, requested: u32) -> bool {
        self.is_available_at(requested, Utc::now())
    }

    pub fn is_available_at(&self, requested: u32, now: DateTime<Utc>) -> bool {
        self.quantity() >= requested && !self.is_expired_at(now)
    }

    /// Removes `quantity` units from stock.
    ///
    /// Callers confirm availability first. Stock floors at zero.
    pub fn reduce_quantity(&self, quantity: u32) {
        let mut stock = self.stock.lock();
        debug_assert!(
            *stock >= quantity,
            "Invariant violated: reducing {} by {quantity} with only {} in stock",
            self.name,
            *stock
        );
        *stock = stock.saturating_sub(quantity);
    }
}
