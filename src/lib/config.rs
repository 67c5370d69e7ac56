use std::{ffi::OsString, path::PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "_pedidos local.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "pedidos_import_completo.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Positional arguments: `[input] [output]`. Missing ones use the defaults.
    pub fn from_args<I: IntoIterator<Item = OsString>>(args: I) -> Self {
        let mut args = args.into_iter();
        let input_path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH));
        let output_path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));
        Self {
            input_path,
            output_path,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH)
    }
}
