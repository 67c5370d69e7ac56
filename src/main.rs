use std::{env, process};

use pos_orders_lib::{convert_orders, Config};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let config = Config::from_args(env::args_os().skip(1));
    match convert_orders(&config) {
        Ok(report) => {
            println!("{}", report);
            process::exit(0);
        }
        Err(e) => {
            error!("conversion failed: {}", e);
            process::exit(1);
        }
    }
}
