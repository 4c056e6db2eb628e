//! Logger setup.
//!
//! Lines go to stderr as `2026-01-31 12:00:00,123 - crsd_figures::smooth - INFO - message`.
//! The level defaults to `info` and can be changed through `RUST_LOG`.

use std::io::Write;

use env_logger::{Builder, Env};

pub fn init() {
    let env = Env::default().default_filter_or("info");
    // A second init (e.g. from tests) is harmless; keep the first logger.
    let _ = Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .try_init();
}
