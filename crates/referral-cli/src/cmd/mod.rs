pub mod completions;
pub mod connect;
pub mod find_referrer;
pub mod graph;
pub mod init;
pub mod ping;
pub mod rate;
pub mod register;
pub mod suggest;

use crate::output::{CliError, OutputMode, render_error};
use referral_core::config::StoreConfig;
use referral_core::error::ErrorCode;
use referral_core::{NetworkStore, StoreError};
use std::path::Path;

/// Render a store failure in the active output mode, then bail.
pub fn store_failure<T>(output: OutputMode, err: &StoreError) -> anyhow::Result<T> {
    render_error(output, &CliError::from(err))?;
    anyhow::bail!("{err}")
}

/// Render a coded failure in the active output mode, then bail.
pub fn coded_failure<T>(
    output: OutputMode,
    message: impl Into<String>,
    code: ErrorCode,
) -> anyhow::Result<T> {
    let error = CliError::from_code(message, code);
    render_error(output, &error)?;
    anyhow::bail!("{}", error.message)
}

/// Open the store under `project_root`, pointing at `refer init` when missing.
pub fn open_store(
    project_root: &Path,
    config: &StoreConfig,
    output: OutputMode,
) -> anyhow::Result<NetworkStore> {
    match NetworkStore::open(project_root, config) {
        Ok(store) => Ok(store),
        Err(e) => store_failure(output, &e),
    }
}
