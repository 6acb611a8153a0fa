use crate::cmd::store_failure;
use crate::output::{OutputMode, render};
use anyhow::Context as _;
use clap::Args;
use referral_core::NetworkStore;
use referral_core::config::StoreConfig;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite `.referral/config.toml` with the default template.
    #[arg(long)]
    pub reset_config: bool,
}

const CONFIG_TOML: &str = "[rank]\n\
    iterations = 10\n\
    max_nodes = 50000\n\
    max_edges = 500000\n\
    \n\
    [store]\n\
    lock_timeout_ms = 2000\n";

#[derive(Debug, Serialize)]
struct InitOutput {
    dir: String,
    created: bool,
    config_written: bool,
}

/// Execute `refer init`. Creates the store skeleton:
///
/// ```text
/// .referral/
///   network.json   (empty users/connections/ratings document)
///   config.toml    (default project config template)
///   lock           (advisory lock file, created on first write)
/// ```
///
/// Running it again is harmless: an existing document is left untouched.
///
/// # Errors
///
/// Returns an error if any filesystem operation fails.
pub fn run_init(
    args: &InitArgs,
    output: OutputMode,
    project_root: &Path,
    store_config: &StoreConfig,
) -> anyhow::Result<()> {
    let (store, created) = match NetworkStore::init(project_root, store_config) {
        Ok(pair) => pair,
        Err(e) => return store_failure(output, &e),
    };

    let config_path = store.dir().join("config.toml");
    let config_written = args.reset_config || !config_path.exists();
    if config_written {
        std::fs::write(&config_path, CONFIG_TOML)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    let out = InitOutput {
        dir: store.dir().display().to_string(),
        created,
        config_written,
    };
    render(output, &out, |o, w| {
        if o.created {
            writeln!(w, "Initialized referral network in {}", o.dir)
        } else {
            writeln!(w, "Referral network already initialized in {}", o.dir)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use referral_core::config::ProjectConfig;

    #[test]
    fn config_template_parses_to_defaults() {
        let parsed: ProjectConfig = toml::from_str(CONFIG_TOML).expect("template parses");
        assert_eq!(parsed.rank, ProjectConfig::default().rank);
        assert_eq!(parsed.store, ProjectConfig::default().store);
    }
}
