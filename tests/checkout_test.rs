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

//! Checkout public API integration tests.

use checkout_demo_rs::{Cart, Checkout, CheckoutError, Customer, Product, Weight};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io;
use std::sync::Arc;

// === Helper Functions ===

fn make_perishable_shippable(
    name: &str,
    price: Decimal,
    quantity: u32,
    kg: Decimal,
) -> Arc<Product> {
    Arc::new(
        Product::new(name, price, quantity)
            .unwrap()
            .with_expiry(Utc::now() + Duration::days(3))
            .with_weight(kg)
            .unwrap(),
    )
}

fn make_plain(name: &str, price: Decimal, quantity: u32) -> Arc<Product> {
    Arc::new(Product::new(name, price, quantity).unwrap())
}

fn add(cart: &mut Cart, product: &Arc<Product>, quantity: i64) {
    cart.add(product, quantity, &mut io::sink()).unwrap();
}

fn process(customer: &mut Customer, cart: &Cart) -> (Result<Decimal, CheckoutError>, String) {
    let mut out = Vec::new();
    let result = Checkout::new()
        .process(customer, cart, &mut out)
        .map(|receipt| receipt.total());
    (result, String::from_utf8(out).unwrap())
}

// === Settlement ===

#[test]
fn sample_order_settles() {
    let cheese = make_perishable_shippable("Cheese", dec!(100), 5, dec!(0.2));
    let biscuits = make_perishable_shippable("Biscuits", dec!(150), 2, dec!(0.7));
    let scratch_card = make_plain("Scratch Card", dec!(50), 10);

    let mut cart = Cart::new();
    add(&mut cart, &cheese, 2);
    add(&mut cart, &biscuits, 1);
    add(&mut cart, &scratch_card, 1);
    let mut customer = Customer::new("Abanoub", dec!(1000));

    let receipt = Checkout::new()
        .process(&mut customer, &cart, &mut io::sink())
        .unwrap();

    assert_eq!(receipt.subtotal(), dec!(400));
    assert_eq!(receipt.shipping(), dec!(30));
    assert_eq!(receipt.total(), dec!(430));
    assert_eq!(receipt.balance_after(), dec!(570));
    assert_eq!(customer.balance(), dec!(570));

    assert_eq!(cheese.quantity(), 3);
    assert_eq!(biscuits.quantity(), 1);
    assert_eq!(scratch_card.quantity(), 9);

    let names: Vec<_> = receipt.lines().iter().map(|line| line.name()).collect();
    assert_eq!(names, ["Cheese", "Biscuits", "Scratch Card"]);

    let notice = receipt.shipment().unwrap();
    assert_eq!(notice.lines().len(), 2);
    assert_eq!(notice.total_weight(), Weight::from_kilograms(dec!(1.1)));
}

#[test]
fn sample_order_output() {
    let cheese = make_perishable_shippable("Cheese", dec!(100), 5, dec!(0.2));
    let biscuits = make_perishable_shippable("Biscuits", dec!(150), 2, dec!(0.7));
    let scratch_card = make_plain("Scratch Card", dec!(50), 10);

    let mut cart = Cart::new();
    add(&mut cart, &cheese, 2);
    add(&mut cart, &biscuits, 1);
    add(&mut cart, &scratch_card, 1);
    let mut customer = Customer::new("Abanoub", dec!(1000));

    let (result, output) = process(&mut customer, &cart);

    assert_eq!(result, Ok(dec!(430)));
    assert_eq!(
        output,
        "** Shipment notice **\n\
         2x Cheese 200g\n\
         1x Biscuits 700g\n\
         Total package weight 1.1kg\n\
         ** Checkout receipt **\n\
         2x Cheese 200\n\
         1x Biscuits 150\n\
         1x Scratch Card 50\n\
         ----------------------\n\
         Subtotal 400\n\
         Shipping 30\n\
         Amount 430\n\
         Balance after payment: 570\n"
    );
}

#[test]
fn no_shipment_notice_without_shippable_items() {
    let scratch_card = make_plain("Scratch Card", dec!(50), 10);
    let mut cart = Cart::new();
    add(&mut cart, &scratch_card, 2);
    let mut customer = Customer::new("Mina", dec!(100));

    let (result, output) = process(&mut customer, &cart);

    assert_eq!(result, Ok(dec!(100)));
    assert!(output.starts_with("** Checkout receipt **\n"));
    assert!(output.contains("Shipping 0\n"));
    assert_eq!(customer.balance(), Decimal::ZERO);
}

#[test]
fn shipping_is_flat_regardless_of_weight() {
    let piano = make_perishable_shippable("Piano", dec!(10), 3, dec!(250));
    let mut cart = Cart::new();
    add(&mut cart, &piano, 3);
    let mut customer = Customer::new("Mina", dec!(1000));

    let (result, output) = process(&mut customer, &cart);

    assert_eq!(result, Ok(dec!(60)));
    assert!(output.contains("3x Piano 250000g\n"));
    assert!(output.contains("Total package weight 750.0kg\n"));
}

#[test]
fn same_product_twice_keeps_two_lines() {
    let cheese = make_perishable_shippable("Cheese", dec!(100), 5, dec!(0.2));
    let mut cart = Cart::new();
    add(&mut cart, &cheese, 1);
    add(&mut cart, &cheese, 2);
    let mut customer = Customer::new("Mina", dec!(1000));

    let (result, output) = process(&mut customer, &cart);

    assert_eq!(result, Ok(dec!(330)));
    assert!(output.contains("3x Cheese 200g\n"));
    assert!(output.contains("1x Cheese 100\n2x Cheese 200\n"));
    assert_eq!(cheese.quantity(), 2);
}

// === Rejections ===

#[test]
fn empty_cart_is_rejected() {
    let cart = Cart::new();
    let mut customer = Customer::new("Mina", dec!(1000));

    let (result, output) = process(&mut customer, &cart);

    assert_eq!(result, Err(CheckoutError::EmptyCart));
    assert_eq!(output, "Error: Cart is empty.\n");
    assert_eq!(customer.balance(), dec!(1000));
}

#[test]
fn insufficient_balance_changes_nothing() {
    let cheese = make_perishable_shippable("Cheese", dec!(100), 5, dec!(0.2));
    let mut cart = Cart::new();
    add(&mut cart, &cheese, 2);
    // 200 + 30 shipping
    let mut customer = Customer::new("Mina", dec!(229.99));

    let (result, output) = process(&mut customer, &cart);

    assert_eq!(result, Err(CheckoutError::InsufficientBalance));
    assert_eq!(output, "Error: Insufficient balance.\n");
    assert_eq!(customer.balance(), dec!(229.99));
    assert_eq!(cheese.quantity(), 5);
}

#[test]
fn exact_balance_is_enough() {
    let cheese = make_perishable_shippable("Cheese", dec!(100), 5, dec!(0.2));
    let mut cart = Cart::new();
    add(&mut cart, &cheese, 2);
    let mut customer = Customer::new("Mina", dec!(230));

    let (result, _) = process(&mut customer, &cart);

    assert_eq!(result, Ok(dec!(230)));
    assert_eq!(customer.balance(), Decimal::ZERO);
}

#[test]
fn stock_sold_elsewhere_is_rejected() {
    let biscuits = make_perishable_shippable("Biscuits", dec!(150), 2, dec!(0.7));
    let scratch_card = make_plain("Scratch Card", dec!(50), 10);

    let mut first = Cart::new();
    add(&mut first, &biscuits, 2);
    let mut second = Cart::new();
    add(&mut second, &scratch_card, 1);
    add(&mut second, &biscuits, 1);

    let mut alice = Customer::new("Alice", dec!(1000));
    let mut bob = Customer::new("Bob", dec!(1000));

    assert!(process(&mut alice, &first).0.is_ok());
    assert_eq!(biscuits.quantity(), 0);

    let (result, output) = process(&mut bob, &second);

    assert_eq!(result, Err(CheckoutError::OutOfStockOrExpired));
    assert_eq!(
        output,
        "Error: One or more products are out of stock or expired.\n"
    );
    assert_eq!(bob.balance(), dec!(1000));
    // No partial settlement of the entries that were still available.
    assert_eq!(scratch_card.quantity(), 10);
}

#[test]
fn product_expired_since_add_is_rejected() {
    let now = Utc::now();
    let milk = Arc::new(
        Product::new("Milk", dec!(20), 4)
            .unwrap()
            .with_expiry(now + Duration::minutes(30)),
    );
    let mut cart = Cart::new();
    add(&mut cart, &milk, 1);
    let mut customer = Customer::new("Mina", dec!(100));

    let result = Checkout::new()
        .at(now + Duration::hours(1))
        .process(&mut customer, &cart, &mut io::sink());

    assert_eq!(result, Err(CheckoutError::OutOfStockOrExpired));
    assert_eq!(milk.quantity(), 4);
    assert_eq!(customer.balance(), dec!(100));
}

#[test]
fn broken_writer_surfaces_output_error() {
    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let cart = Cart::new();
    let mut customer = Customer::new("Mina", dec!(10));

    let result = Checkout::new().process(&mut customer, &cart, &mut Broken);

    assert_eq!(result, Err(CheckoutError::Output("closed".to_string())));
}
