use anyhow::Context;
use dnsleak_domain::{CliOverrides, Config};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    Config::load(path, overrides).context("Failed to load configuration")
}
