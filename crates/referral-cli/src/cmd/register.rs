//! `refer register`: record the acting user's role and company.

use crate::cmd::{coded_failure, open_store, store_failure};
use crate::identity;
use crate::output::{OutputMode, render};
use clap::Args;
use referral_core::RolePriority;
use referral_core::config::EffectiveConfig;
use referral_core::error::ErrorCode;
use std::io::Write;
use std::path::Path;
use tracing::debug;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Job role (Manager, SDE3, SDE2, SDE1 or Others).
    pub role: String,

    /// Company you work at.
    pub company: String,
}

pub fn run_register(
    args: &RegisterArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
    config: &EffectiveConfig,
) -> anyhow::Result<()> {
    let Ok(name) = identity::require_user(user_flag, config.user.user.as_deref()) else {
        return coded_failure(
            output,
            "no user identity; set --user or REFERRAL_USER",
            ErrorCode::MissingIdentity,
        );
    };

    if RolePriority::from_role(&args.role) == RolePriority::Unranked {
        debug!(role = %args.role, "role has no priority; it ranks below Others");
    }

    let store = open_store(project_root, &config.project.store, output)?;
    let record = match store.register(&name, &args.role, &args.company) {
        Ok(r) => r,
        Err(e) => return store_failure(output, &e),
    };

    render(output, &record, |r, w| {
        writeln!(
            w,
            "{} registered with role: {} and company: {}",
            r.name, r.role, r.company
        )
    })
}
