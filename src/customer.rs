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

//! Customer accounts.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use checkout_demo_rs::Customer;
//!
//! let customer = Customer::new("Abanoub", dec!(1000));
//! assert_eq!(customer.balance(), dec!(1000));
//! ```

use rust_decimal::Decimal;

/// A paying customer.
///
/// The balance only changes through a successful checkout, which confirms the
/// customer can afford the order before calling [`Customer::deduct`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    name: String,
    balance: Decimal,
}

impl Customer {
    pub fn new(name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn can_afford(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// Decreases the balance by `amount`.
    pub(crate) fn deduct(&mut self, amount: Decimal) {
        debug_assert!(
            self.can_afford(amount),
            "Invariant violated: charging {amount} against a balance of {}",
            self.balance
        );
        self.balance -= amount;
    }
}
