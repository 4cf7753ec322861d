//! Process-wide logger.
//!
//! Everything logs through the `log` facade; this wires it to `env_logger`.
//! `RUST_LOG` overrides the default `info` level (e.g. `RUST_LOG=little_orrery=debug`).

use env_logger::Env;

pub fn init() {
    // try_init so tests or embedders that already installed a logger keep theirs.
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
