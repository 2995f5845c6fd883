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

//! Error types for cart and checkout operations.

use std::io;
use thiserror::Error;

/// Cart and checkout errors.
///
/// Every variant aborts only the call that produced it. Cart rejections never
/// create an entry, and checkout rejections are raised before any stock or
/// balance is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Requested quantity is zero or negative
    #[error("invalid quantity (must be positive)")]
    InvalidQuantity,

    /// Not enough stock, or the product is past its expiry
    #[error("product is out of stock or expired")]
    OutOfStockOrExpired,

    /// Checkout was attempted with no cart entries
    #[error("cart is empty")]
    EmptyCart,

    /// Customer balance does not cover subtotal plus shipping
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Product price is negative
    #[error("invalid price (must not be negative)")]
    InvalidPrice,

    /// Shipping fee is negative
    #[error("invalid shipping fee (must not be negative)")]
    InvalidShippingFee,

    /// Product weight is zero or negative
    #[error("invalid weight (must be positive)")]
    InvalidWeight,

    /// The injected output writer failed
    #[error("failed to write output: {0}")]
    Output(String),
}

impl From<io::Error> for CheckoutError {
    fn from(error: io::Error) -> Self {
        CheckoutError::Output(error.to_string())
    }
}
