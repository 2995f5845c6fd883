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

//! Core value types shared across the checkout.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

/// Physical weight of a shippable unit, in kilograms.
///
/// Wraps a [`Decimal`] so that package totals add up exactly
/// (`0.2 + 0.2 + 0.7` is `1.1`, not `1.0999999999999999`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Weight(Decimal);

impl Weight {
    pub const ZERO: Weight = Weight(Decimal::ZERO);

    const GRAMS_PER_KILOGRAM: Decimal = Decimal::ONE_THOUSAND;

    pub const fn from_kilograms(kilograms: Decimal) -> Self {
        Weight(kilograms)
    }

    pub const fn kilograms(&self) -> Decimal {
        self.0
    }

    /// Returns the weight converted to grams, normalized (`0.2kg` is `200`).
    pub fn grams(&self) -> Decimal {
        (self.0 * Self::GRAMS_PER_KILOGRAM).normalize()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Add for Weight {
    type Output = Weight;

    fn add(self, rhs: Weight) -> Weight {
        Weight(self.0 + rhs.0)
    }
}

impl Mul<u32> for Weight {
    type Output = Weight;

    fn mul(self, rhs: u32) -> Weight {
        Weight(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Weight {
        iter.fold(Weight::ZERO, Add::add)
    }
}

/// Formats as kilograms with one decimal place, e.g. `1.1kg`.
impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{rounded:.1}kg")
    }
}
