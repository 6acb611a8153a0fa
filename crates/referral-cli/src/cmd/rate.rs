//! `refer rate`: leave a 1-5 rating for a registered user.

use crate::cmd::{open_store, store_failure};
use crate::output::{OutputMode, render};
use clap::Args;
use referral_core::Rating;
use referral_core::config::StoreConfig;
use referral_core::store::RatingSummary;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct RateArgs {
    /// User to rate.
    #[arg(value_name = "USER")]
    pub target: String,

    /// Score from 1 to 5.
    #[arg(allow_negative_numbers = true)]
    pub score: i64,
}

#[derive(Debug, Serialize)]
struct RateOutput {
    rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<RatingSummary>,
}

pub fn run_rate(
    args: &RateArgs,
    output: OutputMode,
    project_root: &Path,
    store_config: &StoreConfig,
) -> anyhow::Result<()> {
    let store = open_store(project_root, store_config, output)?;
    let rating = match store.rate(&args.target, args.score) {
        Ok(r) => r,
        Err(e) => return store_failure(output, &e),
    };
    let summary = match store.snapshot() {
        Ok(snap) => snap.rating_summary(&rating.user),
        Err(e) => return store_failure(output, &e),
    };

    let out = RateOutput { rating, summary };
    render(output, &out, |o, w| {
        write!(w, "Rated {} {}/5", o.rating.user, o.rating.score)?;
        match o.summary {
            Some(s) => writeln!(w, " (average {:.1} over {} ratings)", s.average, s.count),
            None => writeln!(w),
        }
    })
}
