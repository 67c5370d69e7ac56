use im::{HashMap, Vector};
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::types::{CanonicalDate, GroupKey, LineNumber, OrderGroup, ParsedItem, PaymentMethod};

/// Buckets parsed items into synthetic orders.
///
/// Items sharing date, payment method, customer and line bucket (see [`LineNumber::bucket`])
/// land in the same group. Groups come out in the order their first item went in. A running
/// total that no longer fits the decimal type fails the insert with
/// [`ConvertError::AmountOverflow`].
#[derive(Debug, Default)]
pub struct OrderAggregator {
    groups: Vector<OrderGroup>,
    positions: HashMap<GroupKey, usize>,
}

impl OrderAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        item: ParsedItem,
        line: LineNumber,
        date: CanonicalDate,
        method: PaymentMethod,
    ) -> Result<()> {
        let key = GroupKey::new(&date, method, &item.customer, line);
        let descriptor = item.descriptor();

        match self.positions.get(&key) {
            Some(&idx) => {
                let group = self.groups[idx]
                    .with_item(descriptor, item.amount)
                    .ok_or(ConvertError::AmountOverflow { line })?;
                self.groups.set(idx, group);
            }
            None => {
                debug!(key = key.as_str(), line = line.value(), "order group opened");
                self.positions.insert(key.clone(), self.groups.len());
                self.groups.push_back(OrderGroup::open(
                    key,
                    descriptor,
                    item.amount,
                    date,
                    method,
                    item.customer,
                ));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Hands over every group in first-seen order and leaves the aggregator empty.
    pub fn drain(&mut self) -> Vector<OrderGroup> {
        self.positions = HashMap::new();
        std::mem::take(&mut self.groups)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use crate::error::ConvertError;
    use crate::types::{
        CanonicalDate, GroupKey, LineNumber, MonetaryAmount, ParsedItem, PaymentMethod,
    };

    use super::OrderAggregator;

    fn amount(text: &str) -> MonetaryAmount {
        MonetaryAmount::new(Decimal::from_str(text).unwrap())
    }

    fn item(product: &str, price: &str, quantity: i64, customer: &str) -> ParsedItem {
        let unit_price = amount(price);
        ParsedItem {
            date_raw: String::from("01/01/25"),
            product: product.to_string(),
            unit_price,
            quantity,
            payment_method_raw: String::from("efectivo"),
            customer: customer.to_string(),
            amount: unit_price.checked_line_amount(quantity).unwrap(),
        }
    }

    fn date() -> CanonicalDate {
        CanonicalDate::new("2025-01-01")
    }

    #[test]
    fn first_item_opens_a_group() {
        let mut sut = OrderAggregator::new();
        sut.insert(
            item("Cola", "5.00", 2, "Maria"),
            LineNumber::new(2),
            date(),
            PaymentMethod::Efectivo,
        )
        .unwrap();

        let groups = sut.drain();
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(
            group.key,
            GroupKey::new(&date(), PaymentMethod::Efectivo, "Maria", LineNumber::new(2))
        );
        assert_eq!(group.items.len(), 1);
        assert_eq!(group.subtotal, amount("10"));
        assert_eq!(group.total, amount("10"));
        assert_eq!(group.customer, "Maria");
        assert_eq!(group.payment_method, PaymentMethod::Efectivo);
    }

    #[test]
    fn same_key_accumulates_items_and_totals() {
        let mut sut = OrderAggregator::new();
        sut.insert(
            item("Cola", "5.00", 2, "Maria"),
            LineNumber::new(2),
            date(),
            PaymentMethod::Efectivo,
        )
        .unwrap();
        sut.insert(
            item("Burger", "10.00", 1, "Maria"),
            LineNumber::new(3),
            date(),
            PaymentMethod::Efectivo,
        )
        .unwrap();

        let groups = sut.drain();
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        let items: Vec<String> = group.items.iter().map(|i| i.to_string()).collect();
        assert_eq!(items, vec!["Cola:5.0:2", "Burger:10.0:1"]);
        assert_eq!(group.subtotal, amount("20"));
        assert_eq!(group.subtotal, group.total);
    }

    #[test]
    fn bucket_boundary_starts_a_new_group() {
        let mut sut = OrderAggregator::new();
        for line in 2..=20 {
            sut.insert(
                item("Cola", "1", 1, "Maria"),
                LineNumber::new(line),
                date(),
                PaymentMethod::Efectivo,
            )
            .unwrap();
        }

        let sizes: Vec<usize> = sut.drain().iter().map(|g| g.items.len()).collect();
        assert_eq!(sizes, vec![8, 10, 1]);
    }

    #[test]
    fn different_method_or_customer_splits_groups() {
        let mut sut = OrderAggregator::new();
        let inserts = [
            ("A", "Ana", 2, PaymentMethod::Yape),
            ("B", "Ana", 3, PaymentMethod::Plin),
            ("C", "Luis", 4, PaymentMethod::Yape),
            ("D", "Ana", 5, PaymentMethod::Yape),
        ];
        for (product, customer, line, method) in inserts {
            sut.insert(item(product, "1", 1, customer), LineNumber::new(line), date(), method)
                .unwrap();
        }

        assert_eq!(sut.len(), 3);
        let groups = sut.drain();
        let first: Vec<String> = groups[0].items.iter().map(|i| i.product.clone()).collect();
        assert_eq!(first, vec!["A", "D"]);
        assert_eq!(groups[1].payment_method, PaymentMethod::Plin);
        assert_eq!(groups[2].customer, "Luis");
    }

    #[test]
    fn overflowing_running_total_fails_the_insert() {
        let max = Decimal::MAX.to_string();
        let mut sut = OrderAggregator::new();
        sut.insert(item("X", &max, 1, "A"), LineNumber::new(2), date(), PaymentMethod::Yape)
            .unwrap();

        let result = sut.insert(
            item("X", &max, 1, "A"),
            LineNumber::new(3),
            date(),
            PaymentMethod::Yape,
        );
        assert!(matches!(
            result,
            Err(ConvertError::AmountOverflow { line }) if line == LineNumber::new(3)
        ));

        let groups = sut.drain();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items.len(), 1);
        assert_eq!(groups[0].total, MonetaryAmount::new(Decimal::MAX));
    }

    #[test]
    fn drain_empties_the_aggregator() {
        let mut sut = OrderAggregator::new();
        sut.insert(item("A", "1", 1, ""), LineNumber::new(2), date(), PaymentMethod::Yape)
            .unwrap();

        assert_eq!(sut.drain().len(), 1);
        assert!(sut.is_empty());
        assert!(sut.drain().is_empty());
    }
}
