use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{ConvertError, Result};
use crate::types::{LineNumber, MonetaryAmount, ParsedItem, ParsedLine, RejectedLine};

const FIELD_SEPARATOR: char = ';';
const MIN_FIELDS: usize = 5;

/// Physical lines after the header, numbered from 2. `\n`, `\r\n` and a lone `\r` all end a line.
pub fn data_lines(content: &str) -> impl Iterator<Item = (LineNumber, &str)> + '_ {
    content
        .split('\n')
        .flat_map(|chunk| chunk.strip_suffix('\r').unwrap_or(chunk).split('\r'))
        .enumerate()
        .skip(1)
        .map(|(idx, line)| (LineNumber::new(idx + 1), line))
}

/// Splits one raw line into a [`ParsedItem`].
///
/// Lines with fewer than five fields come back as [`ParsedLine::Rejected`] so the caller can
/// report them and carry on. A price or quantity that is not a number, or a line amount out of
/// decimal range, is an error for the whole run.
pub fn parse_line(raw: &str, line: LineNumber) -> Result<ParsedLine> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(ParsedLine::Blank);
    }

    let fields: Vec<&str> = trimmed.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return Ok(ParsedLine::Rejected(RejectedLine {
            line,
            raw: trimmed.to_string(),
        }));
    }

    let unit_price = parse_price(fields[2]).ok_or_else(|| ConvertError::FieldConversion {
        line,
        field: "unit price",
        value: fields[2].to_string(),
    })?;
    let quantity = fields[3]
        .parse::<i64>()
        .map_err(|_| ConvertError::FieldConversion {
            line,
            field: "quantity",
            value: fields[3].to_string(),
        })?;
    let amount = unit_price
        .checked_line_amount(quantity)
        .ok_or(ConvertError::AmountOverflow { line })?;

    Ok(ParsedLine::Item(ParsedItem {
        date_raw: fields[0].to_string(),
        product: fields[1].to_string(),
        unit_price,
        quantity,
        payment_method_raw: fields[4].to_string(),
        customer: fields.get(5).map(|c| c.to_string()).unwrap_or_default(),
        amount,
    }))
}

fn parse_price(text: &str) -> Option<MonetaryAmount> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .map(MonetaryAmount::new)
}
