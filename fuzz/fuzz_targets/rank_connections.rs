#![no_main]

use libfuzzer_sys::fuzz_target;
use referral_core::Connection;
use referral_rank::{AdjacencyMap, hits};

// Each input line is `a b`; the adjacency must stay symmetric and scores
// must be identical across two runs.
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let conns: Vec<Connection> = text
        .lines()
        .map(|line| {
            let mut parts = line.splitn(2, ' ');
            Connection::new(parts.next().unwrap_or(""), parts.next().unwrap_or(""))
        })
        .collect();

    let adj = AdjacencyMap::build(&conns);
    for id in adj.identifiers() {
        for n in adj.neighbors(id) {
            assert!(adj.neighbors(n).contains(&id));
        }
    }

    let first = hits(&adj, 10);
    let second = hits(&adj, 10);
    assert_eq!(first, second);
});
