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

//! Checkout receipts.

use crate::cart::CartEntry;
use crate::shipping::ShipmentNotice;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::{self, Write};

/// One purchased cart entry as it appears on the receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    quantity: u32,
    name: String,
    total_price: Decimal,
}

impl ReceiptLine {
    /// `None` if the entry's total overflows.
    pub(crate) fn from_entry(entry: &CartEntry) -> Option<Self> {
        Some(Self {
            quantity: entry.quantity(),
            name: entry.product().name().to_owned(),
            total_price: entry.total_price()?,
        })
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }
}

/// Outcome of a settled checkout.
///
/// `total` is `subtotal + shipping`, and `balance_after` is the customer's
/// balance once `total` was charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub(crate) lines: Vec<ReceiptLine>,
    pub(crate) subtotal: Decimal,
    pub(crate) shipping: Decimal,
    pub(crate) total: Decimal,
    pub(crate) balance_after: Decimal,
    pub(crate) shipment: Option<ShipmentNotice>,
}

impl Receipt {
    const SEPARATOR: &'static str = "----------------------";

    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn shipping(&self) -> Decimal {
        self.shipping
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn balance_after(&self) -> Decimal {
        self.balance_after
    }

    /// The shipment notice, if anything in the order needs shipping.
    pub fn shipment(&self) -> Option<&ShipmentNotice> {
        self.shipment.as_ref()
    }

    /// Writes the receipt block. Line totals are rounded to whole currency
    /// units; the labeled amounts are printed without trailing zeros.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "** Checkout receipt **")?;
        for line in &self.lines {
            let rounded = line
                .total_price
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            writeln!(out, "{}x {} {rounded:.0}", line.quantity, line.name)?;
        }
        writeln!(out, "{}", Self::SEPARATOR)?;
        writeln!(out, "Subtotal {}", self.subtotal.normalize())?;
        writeln!(out, "Shipping {}", self.shipping.normalize())?;
        writeln!(out, "Amount {}", self.total.normalize())?;
        writeln!(out, "Balance after payment: {}", self.balance_after.normalize())
    }
}
