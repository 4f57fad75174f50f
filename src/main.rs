use env_logger::{Builder, Env};
use log::error;

fn init_logger() {
    // RUST_LOG overrides, e.g. RUST_LOG=debug flatrec verify --path accounts.dat
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = flatrec::cli::run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
