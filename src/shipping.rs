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

//! Shipment notices.
//!
//! A notice groups the physical units of an order by product name and
//! reports the unit weight of each group and the total package weight:
//!
//! ```text
//! ** Shipment notice **
//! 2x Cheese 200g
//! 1x Biscuits 700g
//! Total package weight 1.1kg
//! ```

use crate::base::Weight;
use crate::product::Product;
use std::io::{self, Write};

/// One physical unit that has to be shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippableUnit<'a> {
    name: &'a str,
    weight: Weight,
}

impl<'a> ShippableUnit<'a> {
    pub fn new(name: &'a str, weight: Weight) -> Self {
        Self { name, weight }
    }

    /// Returns `None` for products that carry no weight.
    pub fn of(product: &'a Product) -> Option<Self> {
        product.weight().map(|weight| Self::new(product.name(), weight))
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }
}

/// Units of one product name within a shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentLine {
    name: String,
    count: u32,
    unit_weight: Weight,
}

impl ShipmentLine {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit_weight(&self) -> Weight {
        self.unit_weight
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentNotice {
    lines: Vec<ShipmentLine>,
    total_weight: Weight,
}

impl ShipmentNotice {
    /// Groups `units` by name, in order of first appearance.
    ///
    /// Returns `None` when there is nothing to ship. If units sharing a name
    /// disagree on weight, the last one seen sets the line's unit weight,
    /// while the total still sums every unit's own weight.
    pub fn from_units(units: &[ShippableUnit<'_>]) -> Option<Self> {
        if units.is_empty() {
            return None;
        }

        let mut lines: Vec<ShipmentLine> = Vec::new();
        for unit in units {
            match lines.iter_mut().find(|line| line.name == unit.name) {
                Some(line) => {
                    line.count += 1;
                    line.unit_weight = unit.weight;
                }
                None => lines.push(ShipmentLine {
                    name: unit.name.to_owned(),
                    count: 1,
                    unit_weight: unit.weight,
                }),
            }
        }

        Some(Self {
            lines,
            total_weight: units.iter().map(ShippableUnit::weight).sum(),
        })
    }

    pub fn lines(&self) -> &[ShipmentLine] {
        &self.lines
    }

    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "** Shipment notice **")?;
        for line in &self.lines {
            writeln!(
                out,
                "{}x {} {}g",
                line.count,
                line.name,
                line.unit_weight.grams()
            )?;
        }
        writeln!(out, "Total package weight {}", self.total_weight)
    }
}
