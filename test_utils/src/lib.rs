use serde::Serialize;

const HEADER: [&str; 14] = [
    "items",
    "subtotal",
    "discount",
    "total",
    "orderType",
    "paymentStatus",
    "orderStatus",
    "paymentMethod",
    "customerName",
    "customerPhone",
    "tableNumber",
    "deliveryAddress",
    "fecha",
    "hora",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderRow {
    items: String,
    subtotal: &'static str,
    discount: &'static str,
    total: &'static str,
    order_type: &'static str,
    payment_status: &'static str,
    order_status: &'static str,
    payment_method: &'static str,
    customer_name: &'static str,
    customer_phone: &'static str,
    table_number: &'static str,
    delivery_address: &'static str,
    fecha: &'static str,
    hora: &'static str,
}

impl OrderRow {
    fn new(
        items: &'static str,
        amount: &'static str,
        payment_method: &'static str,
        customer_name: &'static str,
        fecha: &'static str,
    ) -> Self {
        Self {
            items: format!("\"{}\"", items),
            subtotal: amount,
            discount: "0",
            total: amount,
            order_type: "Mesa",
            payment_status: "Pagado",
            order_status: "Cerrada",
            payment_method,
            customer_name,
            customer_phone: "",
            table_number: "",
            delivery_address: "",
            fecha,
            hora: "12:00:00",
        }
    }
}

/// Expected import file. Each row is `[items, amount, paymentMethod, customerName, fecha]`;
/// the fixed columns are filled in.
pub fn create_csv(rows: Vec<[&'static str; 5]>) -> String {
    let order_rows: Vec<OrderRow> = rows
        .into_iter()
        .map(|r| OrderRow::new(r[0], r[1], r[2], r[3], r[4]))
        .collect();

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(vec![]);
    wtr.write_record(HEADER).unwrap();
    for r in order_rows {
        wtr.serialize(r).unwrap();
    }
    wtr.flush().unwrap();
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

/// Every value of one named column, in row order.
pub fn column(csv: &str, name: &str) -> Vec<String> {
    let mut rdr = csv::Reader::from_reader(csv.as_bytes());
    let idx = rdr
        .headers()
        .unwrap()
        .iter()
        .position(|h| h == name)
        .unwrap_or_else(|| panic!("column {} not found", name));
    rdr.records()
        .map(|r| r.unwrap()[idx].to_string())
        .collect()
}

/// Splits an `items` field back into `(product, price, quantity)` triples.
pub fn item_triples(items: &str) -> Vec<(String, String, String)> {
    items
        .trim_matches('"')
        .split(';')
        .map(|item| {
            let parts: Vec<&str> = item.split(':').collect();
            assert_eq!(parts.len(), 3, "malformed item descriptor {}", item);
            (
                parts[0].to_string(),
                parts[1].to_string(),
                parts[2].to_string(),
            )
        })
        .collect()
}
