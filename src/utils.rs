use std::env;

use log::LevelFilter;

/// Initializes the diagnostic logger. Reads `RUST_LOG` for the level
/// filter, defaulting to `INFO` when it is unset or unparseable. Never
/// touches the program's required stdout output.
pub fn init_logger() {
    env_logger::builder()
        .filter(
            None,
            env::var("RUST_LOG")
                .unwrap_or_default()
                .parse::<LevelFilter>()
                .unwrap_or(LevelFilter::Info),
        )
        .format_timestamp(None)
        .init();
}
