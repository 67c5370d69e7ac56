use std::{io, path::PathBuf, string::FromUtf8Error};

use thiserror::Error;

use crate::types::LineNumber;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot read input file {}: {source}", .path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Unit price or quantity is not a number. Aborts the whole run.
    #[error("line {line}: cannot convert {field} {value:?}")]
    FieldConversion {
        line: LineNumber,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: line amount is out of range")]
    AmountOverflow { line: LineNumber },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("output is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),

    #[error("cannot write output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
