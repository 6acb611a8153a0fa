//! `refer suggest`: look up users by role or company.

use crate::cmd::{open_store, store_failure};
use crate::output::{OutputMode, pretty_section, render_mode};
use clap::Args;
use referral_core::UserRecord;
use referral_core::config::StoreConfig;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Role or company pattern (regex, case-insensitive); words are joined with spaces.
    #[arg(required = true)]
    pub query: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SuggestOutput {
    query: String,
    users: Vec<UserRecord>,
}

pub fn run_suggest(
    args: &SuggestArgs,
    output: OutputMode,
    project_root: &Path,
    store_config: &StoreConfig,
) -> anyhow::Result<()> {
    let query = args.query.join(" ");
    let store = open_store(project_root, store_config, output)?;
    let snapshot = match store.snapshot() {
        Ok(s) => s,
        Err(e) => return store_failure(output, &e),
    };

    let users = match snapshot.suggest(&query) {
        Ok(users) => users.into_iter().cloned().collect(),
        Err(e) => return store_failure(output, &e),
    };
    let out = SuggestOutput { users, query };

    render_mode(
        output,
        &out,
        |o, w| {
            for u in &o.users {
                writeln!(w, "{}\t{}\t{}", u.name, u.role, u.company)?;
            }
            Ok(())
        },
        |o, w| {
            if o.users.is_empty() {
                return writeln!(w, "No users match '{}'.", o.query);
            }
            pretty_section(w, &format!("Suggested referrers for '{}'", o.query))?;
            for u in &o.users {
                writeln!(w, "  {:<20} {:<10} {}", u.name, u.role, u.company)?;
            }
            Ok(())
        },
    )
}
