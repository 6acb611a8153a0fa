//! `refer find-referrer`: best-placed referrer at a company.

use crate::cmd::{coded_failure, open_store, store_failure};
use crate::identity;
use crate::output::{CliError, OutputMode, pretty_kv, render_error, render_mode};
use clap::Args;
use referral_core::config::EffectiveConfig;
use referral_core::error::ErrorCode;
use referral_core::store::RatingSummary;
use referral_rank::{ReferralQuery, Selection, find_best_referrer};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct FindReferrerArgs {
    /// Company you want a referral into (exact, case-sensitive).
    pub company: String,
}

#[derive(Debug, Serialize)]
struct FindReferrerOutput {
    company: String,
    referral: Selection,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<RatingSummary>,
    message: String,
}

/// The one-line answer shown to the requester.
pub fn referral_message(selection: &Selection, company: &str) -> String {
    match selection.referrer() {
        Some(referrer) => format!("{referrer} can refer you for a job at {company}!"),
        None => format!(
            "No referrer found for {company}. Try expanding your network with `refer connect`."
        ),
    }
}

pub fn run_find_referrer(
    args: &FindReferrerArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
    config: &EffectiveConfig,
) -> anyhow::Result<()> {
    let company = args.company.trim();
    if company.is_empty() {
        return coded_failure(
            output,
            "company must be non-empty",
            ErrorCode::InvalidIdentifier,
        );
    }

    let requester = identity::resolve_user(user_flag, config.user.user.as_deref())
        .unwrap_or_else(|| "anonymous".to_string());

    let store = open_store(project_root, &config.project.store, output)?;
    let snapshot = match store.snapshot() {
        Ok(s) => s,
        Err(e) => return store_failure(output, &e),
    };

    let query = ReferralQuery {
        requester: &requester,
        company,
    };
    let selection = match find_best_referrer(
        snapshot.connections(),
        &snapshot,
        query,
        &config.project.rank,
    ) {
        Ok(s) => s,
        Err(e) => {
            render_error(output, &CliError::from_code(e.to_string(), e.code()))?;
            anyhow::bail!("{e}");
        }
    };

    let out = FindReferrerOutput {
        company: company.to_string(),
        rating: selection
            .referrer()
            .and_then(|id| snapshot.rating_summary(id)),
        message: referral_message(&selection, company),
        referral: selection,
    };

    render_mode(
        output,
        &out,
        |o, w| writeln!(w, "{}", o.message),
        |o, w| {
            writeln!(w, "{}", o.message)?;
            if let Some(c) = o.referral.candidate() {
                pretty_kv(w, "Role", &c.role)?;
                pretty_kv(w, "Authority", format!("{:.1}", c.authority))?;
                if let Some(r) = o.rating {
                    pretty_kv(w, "Rating", format!("{:.1}/5 ({} ratings)", r.average, r.count))?;
                }
            }
            Ok(())
        },
    )
}
