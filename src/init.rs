use std::io::Write;

use log::LevelFilter;

/// Initialize logger. `RUST_LOG` overrides the given default level.
pub fn init_logger(default: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(default)
        // sqlx logs every statement at info.
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            let ts = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f");
            let src = record.module_path().unwrap_or("unknown");

            match record.level() {
                log::Level::Info => writeln!(buf, "{} {} {}", ts, src, record.args()),
                lvl => writeln!(buf, "{} {} [{}] {}", ts, src, lvl, record.args()),
            }
        })
        .init();
}
