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

use checkout_demo_rs::{Cart, Checkout, CheckoutError, Customer, Product, Receipt};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Checkout Demo - Run a retail checkout
///
/// Without arguments, runs the built-in demo order. With `--catalog` and
/// `--order`, reads products and order lines from CSV files instead.
/// Shipment notice and receipt are written to stdout; logs go to stderr
/// (set RUST_LOG=debug to see why items are rejected).
#[derive(Parser, Debug)]
#[command(name = "checkout-demo-rs")]
#[command(about = "A retail checkout that prints shipment notices and receipts", long_about = None)]
struct Args {
    /// Path to CSV file with products
    ///
    /// Expected format: name,price,quantity,expiry,weight
    /// `expiry` is an RFC 3339 timestamp and `weight` is in kg; both may be empty.
    #[arg(long, value_name = "FILE", requires = "order")]
    catalog: Option<PathBuf>,

    /// Path to CSV file with order lines
    ///
    /// Expected format: product,quantity
    #[arg(long, value_name = "FILE", requires = "catalog")]
    order: Option<PathBuf>,

    /// Customer name
    #[arg(long, default_value = "Customer")]
    customer: String,

    /// Customer balance before checkout
    #[arg(long, value_name = "AMOUNT", default_value = "1000")]
    balance: Decimal,

    /// Flat fee charged when any item needs shipping
    #[arg(long, value_name = "AMOUNT", default_value = "30")]
    shipping_fee: Decimal,
}

/// Products indexed by name.
type Catalog = HashMap<String, Arc<Product>>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let (catalog, order) = match (&args.catalog, &args.order) {
        (Some(catalog_path), Some(order_path)) => (
            read_or_exit(catalog_path, load_catalog),
            read_or_exit(order_path, load_order),
        ),
        _ => demo_scenario(Utc::now()),
    };

    let mut customer = Customer::new(args.customer, args.balance);
    let checkout = match Checkout::new().with_shipping_fee(args.shipping_fee) {
        Ok(checkout) => checkout,
        Err(e) => {
            tracing::error!("Error in --shipping-fee {}: {e}", args.shipping_fee);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run_checkout(&catalog, &order, &mut customer, &checkout, &mut out) {
        tracing::error!("Error writing output: {e}");
        process::exit(1);
    }
}

/// Open `path` and parse it with `load`, exiting the process on failure.
fn read_or_exit<T>(path: &Path, load: fn(BufReader<File>) -> Result<T, csv::Error>) -> T {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("Error opening file '{}': {e}", path.display());
            process::exit(1);
        }
    };

    match load(BufReader::new(file)) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Error reading file '{}': {e}", path.display());
            process::exit(1);
        }
    }
}

/// One requested product in an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct OrderLine {
    product: String,
    quantity: i64,
}

/// Raw CSV record matching the catalog format.
///
/// Fields: `name, price, quantity, expiry, weight`
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    name: String,
    price: Decimal,
    quantity: u32,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    expiry: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    weight: Option<Decimal>,
}

impl CatalogRecord {
    fn into_product(self) -> Result<Product, CheckoutError> {
        let mut product = Product::new(self.name, self.price, self.quantity)?;
        if let Some(expiry) = self.expiry {
            product = product.with_expiry(expiry);
        }
        if let Some(weight) = self.weight {
            product = product.with_weight(weight)?;
        }
        Ok(product)
    }
}

/// The sample order: two perishable shippable products and a scratch card,
/// for a customer who can afford them.
fn demo_scenario(now: DateTime<Utc>) -> (Catalog, Vec<OrderLine>) {
    let expiry = now + Duration::days(3);
    let products = [
        Product::new("Cheese", dec!(100), 5)
            .map(|product| product.with_expiry(expiry))
            .and_then(|product| product.with_weight(dec!(0.2))),
        Product::new("Biscuits", dec!(150), 2)
            .map(|product| product.with_expiry(expiry))
            .and_then(|product| product.with_weight(dec!(0.7))),
        Product::new("Scratch Card", dec!(50), 10),
    ];

    let catalog = products
        .into_iter()
        .flatten()
        .map(|product| (product.name().to_owned(), Arc::new(product)))
        .collect();

    let order = [("Cheese", 2), ("Biscuits", 1), ("Scratch Card", 1)]
        .into_iter()
        .map(|(product, quantity)| OrderLine {
            product: product.to_owned(),
            quantity,
        })
        .collect();

    (catalog, order)
}

/// Read a product catalog from a CSV reader.
///
/// Malformed rows and rows describing an invalid product (negative price,
/// non-positive weight) are skipped. A later row with the same name replaces
/// an earlier one.
///
/// # Example
///
/// ```csv
/// name,price,quantity,expiry,weight
/// Cheese,100,5,2030-01-01T00:00:00Z,0.2
/// Scratch Card,50,10,,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the header row cannot be read.
fn load_catalog<R: Read>(reader: R) -> Result<Catalog, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);
    rdr.headers()?;

    let mut catalog = Catalog::new();
    for result in rdr.deserialize::<CatalogRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Skipping malformed catalog row: {e}");
                continue;
            }
        };

        let name = record.name.clone();
        match record.into_product() {
            Ok(product) => {
                if catalog.insert(name.clone(), Arc::new(product)).is_some() {
                    tracing::warn!(product = %name, "duplicate catalog entry replaced");
                }
            }
            Err(e) => tracing::debug!(product = %name, "Skipping catalog row: {e}"),
        }
    }

    Ok(catalog)
}

/// Read order lines from a CSV reader.
///
/// Malformed rows are skipped. Quantities are passed to the cart as given, so
/// a zero or negative quantity is reported by the cart, not here.
///
/// # Errors
///
/// Returns a CSV error if the header row cannot be read.
fn load_order<R: Read>(reader: R) -> Result<Vec<OrderLine>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);
    rdr.headers()?;

    let mut order = Vec::new();
    for result in rdr.deserialize::<OrderLine>() {
        match result {
            Ok(line) => order.push(line),
            Err(e) => tracing::debug!("Skipping malformed order row: {e}"),
        }
    }

    Ok(order)
}

/// Fill a cart from `order` and check it out for `customer`.
///
/// Rejected order lines and a rejected checkout are reported on `out` and
/// are not errors: the returned receipt is `None` when checkout was refused.
///
/// # Errors
///
/// Returns [`CheckoutError::Output`] if writing to `out` fails.
fn run_checkout<W: Write>(
    catalog: &Catalog,
    order: &[OrderLine],
    customer: &mut Customer,
    checkout: &Checkout,
    out: &mut W,
) -> Result<Option<Receipt>, CheckoutError> {
    let mut cart = Cart::new();
    for line in order {
        let Some(product) = catalog.get(&line.product) else {
            writeln!(out, "Unknown product: {}", line.product)?;
            continue;
        };
        // The cart prints its own rejection; only a broken writer stops the run.
        if let Err(CheckoutError::Output(message)) = cart.add(product, line.quantity, out) {
            return Err(CheckoutError::Output(message));
        }
    }

    writeln!(out, "Processing checkout...")?;

    match checkout.process(customer, &cart, out) {
        Ok(receipt) => Ok(Some(receipt)),
        Err(CheckoutError::Output(message)) => Err(CheckoutError::Output(message)),
        Err(_) => Ok(None),
    }
}
