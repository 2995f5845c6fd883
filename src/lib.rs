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

//! # Checkout Demo
//!
//! This library models a retail checkout: products with stock and optional
//! expiry or shipping weight, a cart, a customer balance, and a checkout that
//! validates availability and funds before deducting stock and balance and
//! printing a shipment notice and receipt.
//!
//! ## Core Components
//!
//! - [`Product`]: Stocked item, optionally perishable and/or shippable
//! - [`Cart`]: Ordered entries, validated as they are added
//! - [`Customer`]: Name and spendable balance
//! - [`Checkout`]: Validation and settlement of a cart against a customer
//! - [`Receipt`] and [`ShipmentNotice`]: What a successful checkout prints
//! - [`CheckoutError`]: Reasons a cart add or checkout is rejected
//!
//! ## Example
//!
//! ```
//! use checkout_demo_rs::{Cart, Checkout, Customer, Product};
//! use chrono::{Duration, Utc};
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//!
//! let expiry = Utc::now() + Duration::days(3);
//! let cheese = Arc::new(
//!     Product::new("Cheese", dec!(100), 5).unwrap()
//!         .with_expiry(expiry)
//!         .with_weight(dec!(0.2)).unwrap(),
//! );
//! let scratch_card = Arc::new(Product::new("Scratch Card", dec!(50), 10).unwrap());
//!
//! let mut out = Vec::new();
//! let mut cart = Cart::new();
//! cart.add(&cheese, 2, &mut out).unwrap();
//! cart.add(&scratch_card, 1, &mut out).unwrap();
//!
//! let mut customer = Customer::new("Abanoub", dec!(1000));
//! let receipt = Checkout::new().process(&mut customer, &cart, &mut out).unwrap();
//!
//! assert_eq!(receipt.total(), dec!(280));
//! assert_eq!(customer.balance(), dec!(720));
//! assert_eq!(cheese.quantity(), 3);
//! ```
//!
//! ## Output
//!
//! Nothing here writes to stdout directly. Diagnostics, shipment notices and
//! receipts go to whatever [`std::io::Write`] the caller passes in.

mod base;
mod cart;
mod checkout;
mod customer;
pub mod error;
mod product;
mod receipt;
mod shipping;

pub use base::Weight;
pub use cart::{Cart, CartEntry};
pub use checkout::Checkout;
pub use customer::Customer;
pub use error::CheckoutError;
pub use product::Product;
pub use receipt::{Receipt, ReceiptLine};
pub use shipping::{ShipmentLine, ShipmentNotice, ShippableUnit};
