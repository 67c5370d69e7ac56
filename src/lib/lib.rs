mod config;
mod error;
mod io;
mod normalize;
mod orders;
mod parser;
mod types;
mod utils;

use std::{fmt, path::PathBuf};

use tracing::{debug, info, warn};

use io::{output_csv, read_export, write_output};
use parser::data_lines;

pub use config::{Config, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};
pub use error::{ConvertError, Result};
pub use io::OUTPUT_HEADER;
pub use normalize::{normalize_date, normalize_payment_method, FALLBACK_DATE};
pub use orders::OrderAggregator;
pub use parser::parse_line;
pub use types::{
    CanonicalDate, GroupKey, ItemDescriptor, LineNumber, MonetaryAmount, Normalized, OrderGroup,
    ParsedItem, ParsedLine, PaymentMethod, RejectedLine,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub order_count: usize,
    pub rejected: Vec<RejectedLine>,
    pub date_fallbacks: usize,
    pub payment_fallbacks: usize,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input file: {}", self.input_path.display())?;
        writeln!(f, "Output file: {}", self.output_path.display())?;
        writeln!(f, "Order groups written: {}", self.order_count)?;
        write!(f, "Rejected lines: {}", self.rejected.len())
    }
}

/// Reads the point-of-sale export at `config.input_path`, groups its lines into orders and
/// writes the import CSV to `config.output_path`.
///
/// Malformed lines are skipped and listed in the report. Unreadable input, non-numeric prices
/// or quantities, amounts out of decimal range and write failures abort the run before the
/// output file exists.
pub fn convert_orders(config: &Config) -> Result<ConversionReport> {
    let content = read_export(&config.input_path)?;

    let mut aggregator = OrderAggregator::new();
    let mut rejected = Vec::new();
    let mut date_fallbacks = 0;
    let mut payment_fallbacks = 0;

    for (line, raw) in data_lines(&content) {
        let item = match parse_line(raw, line)? {
            ParsedLine::Blank => continue,
            ParsedLine::Rejected(r) => {
                warn!(line = %r.line, raw = %r.raw, "malformed line skipped");
                rejected.push(r);
                continue;
            }
            ParsedLine::Item(item) => item,
        };

        let date = normalize_date(&item.date_raw);
        if date.is_fallback() {
            debug!(
                %line,
                date = %item.date_raw,
                "unparseable date, using {}",
                FALLBACK_DATE
            );
            date_fallbacks += 1;
        }
        let method = normalize_payment_method(&item.payment_method_raw);
        if method.is_fallback() {
            debug!(
                %line,
                method = %item.payment_method_raw,
                "unknown payment method, using {}",
                method.value()
            );
            payment_fallbacks += 1;
        }

        aggregator.insert(item, line, date.into_value(), method.into_value())?;
    }

    let groups = aggregator.drain();
    let data = output_csv(&groups)?;
    write_output(&config.output_path, &data)?;
    info!(
        output = %config.output_path.display(),
        orders = groups.len(),
        rejected = rejected.len(),
        "import file written"
    );

    Ok(ConversionReport {
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        order_count: groups.len(),
        rejected,
        date_fallbacks,
        payment_fallbacks,
    })
}
