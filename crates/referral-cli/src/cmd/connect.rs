//! `refer connect`: record a connection between two users.

use crate::cmd::{open_store, store_failure};
use crate::output::{OutputMode, render};
use clap::Args;
use referral_core::config::StoreConfig;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// First user.
    pub user1: String,

    /// Second user.
    pub user2: String,
}

#[derive(Debug, Serialize)]
struct ConnectOutput<'a> {
    user1: &'a str,
    user2: &'a str,
    created: bool,
}

pub fn run_connect(
    args: &ConnectArgs,
    output: OutputMode,
    project_root: &Path,
    store_config: &StoreConfig,
) -> anyhow::Result<()> {
    let store = open_store(project_root, store_config, output)?;
    let created = match store.connect(&args.user1, &args.user2) {
        Ok(c) => c,
        Err(e) => return store_failure(output, &e),
    };

    let out = ConnectOutput {
        user1: args.user1.trim(),
        user2: args.user2.trim(),
        created,
    };
    render(output, &out, |o, w| {
        if o.created {
            writeln!(w, "{} is now connected to {}", o.user1, o.user2)
        } else {
            writeln!(w, "{} is already connected to {}", o.user1, o.user2)
        }
    })
}
