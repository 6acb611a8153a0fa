#![no_main]

use libfuzzer_sys::fuzz_target;
use referral_core::config::RankConfig;
use referral_core::store::{NetworkDocument, NetworkSnapshot};
use referral_rank::{ReferralQuery, find_best_referrer};

// Any document that parses must rank without panicking.
fuzz_target!(|data: &[u8]| {
    let Ok(doc) = serde_json::from_slice::<NetworkDocument>(data) else {
        return;
    };
    let snapshot = NetworkSnapshot::new(doc);
    let company = snapshot
        .users()
        .first()
        .map(|u| u.company.clone())
        .unwrap_or_default();
    let _ = find_best_referrer(
        snapshot.connections(),
        &snapshot,
        ReferralQuery {
            requester: "fuzz",
            company: &company,
        },
        &RankConfig::default(),
    );
});
