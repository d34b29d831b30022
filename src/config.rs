use std::path::{Path, PathBuf};

use crate::models::Config;

const SAMPLE_CONFIG: &str = include_str!("../config.sample.toml");

const DEFAULT_ADDRESS: &str = "0.0.0.0:8082";
const DEFAULT_DB_PATH: &str = "states.db";
const DEFAULT_MAX_CONNS: u32 = 5;

/// Load and merge one or more config files. Missing values fall back to
/// built-in defaults.
pub fn load_all(paths: &[PathBuf]) -> Config {
    let mut config: Option<Config> = None;

    for path in paths {
        log::info!("loading config: {}", path.display());
        match read_file(path) {
            Ok(c) => {
                if let Some(ref mut existing) = config {
                    merge(existing, c);
                } else {
                    config = Some(c);
                }
            }
            Err(e) => {
                log::error!("error loading config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    let mut config = config.unwrap_or_else(|| {
        log::error!("no config files specified");
        std::process::exit(1);
    });
    apply_defaults(&mut config);
    config
}

/// Generate sample config file.
pub fn generate_sample(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        return Err("config file already exists".into());
    }
    std::fs::write(path, SAMPLE_CONFIG)?;
    Ok(())
}

/// Load configuration from a given TOML file.
fn read_file(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

fn parse(content: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let cfg: Config = toml::from_str(content)?;
    Ok(cfg)
}

/// Merge the given src config into the dest config struct. Empty values in
/// src leave dest untouched.
fn merge(dest: &mut Config, src: Config) {
    if !src.app.address.is_empty() {
        dest.app.address = src.app.address;
    }
    if !src.app.allowed_origins.is_empty() {
        dest.app.allowed_origins = src.app.allowed_origins;
    }

    if !src.db.path.is_empty() {
        dest.db.path = src.db.path;
    }
    if src.db.max_conns > 0 {
        dest.db.max_conns = src.db.max_conns;
    }
}

fn apply_defaults(cfg: &mut Config) {
    if cfg.app.address.is_empty() {
        cfg.app.address = DEFAULT_ADDRESS.to_string();
    }
    if cfg.db.path.is_empty() {
        cfg.db.path = DEFAULT_DB_PATH.to_string();
    }
    if cfg.db.max_conns == 0 {
        cfg.db.max_conns = DEFAULT_MAX_CONNS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let cfg = parse(SAMPLE_CONFIG).unwrap();
        assert_eq!(cfg.app.address, DEFAULT_ADDRESS);
        assert_eq!(cfg.app.allowed_origins, vec!["http://localhost:8083"]);
        assert_eq!(cfg.db.path, DEFAULT_DB_PATH);
        assert_eq!(cfg.db.max_conns, DEFAULT_MAX_CONNS);
    }

    #[test]
    fn later_files_override_set_values() {
        let mut base = parse(SAMPLE_CONFIG).unwrap();
        let over = parse(
            r#"
            [app]
            address = "127.0.0.1:9000"

            [db]
            max_conns = 2
            "#,
        )
        .unwrap();

        merge(&mut base, over);
        assert_eq!(base.app.address, "127.0.0.1:9000");
        assert_eq!(base.app.allowed_origins, vec!["http://localhost:8083"]);
        assert_eq!(base.db.path, DEFAULT_DB_PATH);
        assert_eq!(base.db.max_conns, 2);
    }

    #[test]
    fn empty_config_gets_defaults() {
        let mut cfg = parse("").unwrap();
        apply_defaults(&mut cfg);
        assert_eq!(cfg.app.address, DEFAULT_ADDRESS);
        assert_eq!(cfg.db.path, DEFAULT_DB_PATH);
        assert_eq!(cfg.db.max_conns, DEFAULT_MAX_CONNS);
        assert!(cfg.app.allowed_origins.is_empty());
    }
}
