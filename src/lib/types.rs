use std::fmt;

use im::Vector;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::utils::PushImmut;

/// 1-based physical line position in the input file. The header is line 1.
#[derive(Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Copy)]
pub struct LineNumber(usize);

impl LineNumber {
    pub fn new(value: usize) -> Self {
        Self(value)
    }

    pub fn value(&self) -> usize {
        self.0
    }

    /// Every ten physical lines share a bucket: 2..=9, 10..=19, 20..=29, ...
    pub fn bucket(&self) -> usize {
        self.0 / 10
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Debug)]
pub struct MonetaryAmount(Decimal);

impl MonetaryAmount {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn checked_add(&self, rhs: MonetaryAmount) -> Option<MonetaryAmount> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_line_amount(&self, quantity: i64) -> Option<MonetaryAmount> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Rounded half-to-even on the exact decimal value, always two fractional digits. Sub-cent
    /// midpoints round on their decimal value (`2.675` -> `2.68`), not on a binary float
    /// approximation of it.
    pub fn two_decimals(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        format!("{:.2}", rounded)
    }

    /// Plain decimal notation without trailing zeros, keeping at least one fractional digit:
    /// `5.00` -> `5.0`, `1.250` -> `1.25`. Never switches to exponent notation and keeps every
    /// significant digit of the input.
    pub fn float_text(&self) -> String {
        let normalized = self.0.normalize();
        if normalized.scale() == 0 {
            format!("{}.0", normalized)
        } else {
            normalized.to_string()
        }
    }
}

/// `YYYY-MM-DD` text produced by the date normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalDate(String);

impl CanonicalDate {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Efectivo,
    Yape,
    Plin,
    Tarjeta,
    Transferencia,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Efectivo => "Efectivo",
            PaymentMethod::Yape => "Yape",
            PaymentMethod::Plin => "Plin",
            PaymentMethod::Tarjeta => "Tarjeta",
            PaymentMethod::Transferencia => "Transferencia",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a normalizer. Both variants carry a usable value; `Fallback` marks that the input
/// was not understood and the default was substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized<T> {
    Recognized(T),
    Fallback(T),
}

impl<T> Normalized<T> {
    pub fn value(&self) -> &T {
        match self {
            Normalized::Recognized(v) | Normalized::Fallback(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Normalized::Recognized(v) | Normalized::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Normalized::Fallback(_))
    }
}

/// One sold line of the point-of-sale export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    pub date_raw: String,
    pub product: String,
    pub unit_price: MonetaryAmount,
    pub quantity: i64,
    pub payment_method_raw: String,
    pub customer: String,
    /// unit_price × quantity
    pub amount: MonetaryAmount,
}

impl ParsedItem {
    pub fn descriptor(&self) -> ItemDescriptor {
        ItemDescriptor {
            product: self.product.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
        }
    }
}

/// A data line with too few fields. Reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub line: LineNumber,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Blank,
    Rejected(RejectedLine),
    Item(ParsedItem),
}

/// Rendered as `product:unitPrice:quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDescriptor {
    pub product: String,
    pub unit_price: MonetaryAmount,
    pub quantity: i64,
}

impl fmt::Display for ItemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.product,
            self.unit_price.float_text(),
            self.quantity
        )
    }
}

/// `date_method_customer_bucket`. Distinct tuples that render to the same text share a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(
        date: &CanonicalDate,
        method: PaymentMethod,
        customer: &str,
        line: LineNumber,
    ) -> Self {
        Self(format!("{}_{}_{}_{}", date, method, customer, line.bucket()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A synthetic order: every item whose line maps to the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderGroup {
    pub key: GroupKey,
    pub items: Vector<ItemDescriptor>,
    pub subtotal: MonetaryAmount,
    pub total: MonetaryAmount,
    pub date: CanonicalDate,
    pub payment_method: PaymentMethod,
    pub customer: String,
}

impl OrderGroup {
    pub fn open(
        key: GroupKey,
        item: ItemDescriptor,
        amount: MonetaryAmount,
        date: CanonicalDate,
        payment_method: PaymentMethod,
        customer: String,
    ) -> Self {
        Self {
            key,
            items: Vector::unit(item),
            subtotal: amount,
            total: amount,
            date,
            payment_method,
            customer,
        }
    }

    /// `None` when a running total would overflow.
    pub fn with_item(&self, item: ItemDescriptor, amount: MonetaryAmount) -> Option<Self> {
        let subtotal = self.subtotal.checked_add(amount)?;
        let total = self.total.checked_add(amount)?;
        Some(
            self.map_items(|items| items.push(item))
                .map_subtotal(|_| subtotal)
                .map_total(|_| total),
        )
    }

    pub fn map_items<F>(&self, f: F) -> Self
    where
        F: FnOnce(&Vector<ItemDescriptor>) -> Vector<ItemDescriptor>,
    {
        Self {
            items: f(&self.items),
            ..self.clone()
        }
    }

    pub fn map_subtotal<F: FnOnce(MonetaryAmount) -> MonetaryAmount>(&self, f: F) -> Self {
        Self {
            subtotal: f(self.subtotal),
            ..self.clone()
        }
    }

    pub fn map_total<F: FnOnce(MonetaryAmount) -> MonetaryAmount>(&self, f: F) -> Self {
        Self {
            total: f(self.total),
            ..self.clone()
        }
    }
}
