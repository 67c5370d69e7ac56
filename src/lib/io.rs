use std::{fs, io::Write, path::Path};

use ::serde::{Serialize, Serializer};
use im::Vector;
use tempfile::NamedTempFile;

use crate::error::{ConvertError, Result};
use crate::types::{MonetaryAmount, OrderGroup};

const UTF8_BOM: char = '\u{feff}';

pub const OUTPUT_HEADER: [&str; 14] = [
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

/// Whole input file as text, byte-order mark removed.
pub fn read_export(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|source| ConvertError::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match content.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

fn two_decimals<S: Serializer>(x: &MonetaryAmount, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&x.two_decimals())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRowEntity<'a> {
    items: String,
    #[serde(serialize_with = "two_decimals")]
    subtotal: MonetaryAmount,
    discount: &'static str,
    #[serde(serialize_with = "two_decimals")]
    total: MonetaryAmount,
    order_type: &'static str,
    payment_status: &'static str,
    order_status: &'static str,
    payment_method: &'static str,
    customer_name: &'a str,
    customer_phone: &'static str,
    table_number: &'static str,
    delivery_address: &'static str,
    fecha: &'a str,
    hora: &'static str,
}

impl<'a> OrderRowEntity<'a> {
    pub fn from_group(group: &'a OrderGroup) -> Self {
        let joined = group
            .items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(";");

        Self {
            // literal quotes are part of the field text; the writer escapes them again
            items: format!("\"{}\"", joined),
            subtotal: group.subtotal,
            discount: "0",
            total: group.total,
            order_type: "Mesa",
            payment_status: "Pagado",
            order_status: "Cerrada",
            payment_method: group.payment_method.label(),
            customer_name: &group.customer,
            customer_phone: "",
            table_number: "",
            delivery_address: "",
            fecha: group.date.as_str(),
            hora: "12:00:00",
        }
    }
}

pub fn output_csv(groups: &Vector<OrderGroup>) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(vec![]);

    wtr.write_record(OUTPUT_HEADER)?;
    for group in groups {
        wtr.serialize(OrderRowEntity::from_group(group))?
    }

    wtr.flush().map_err(csv::Error::from)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    let data = String::from_utf8(bytes)?;
    Ok(data)
}

/// Writes to a temporary file next to `path` and renames it into place, so a failed run never
/// leaves a half-written output behind.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    let to_error = |source: std::io::Error| ConvertError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(to_error)?;
    file.write_all(contents.as_bytes()).map_err(to_error)?;
    file.flush().map_err(to_error)?;
    file.persist(path).map_err(|e| to_error(e.error))?;
    Ok(())
}
