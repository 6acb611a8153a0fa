use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use referral_core::config::RankConfig;
use referral_core::{Connection, Profile};
use referral_rank::{AdjacencyMap, DEFAULT_ITERATIONS, ReferralQuery, find_best_referrer, hits};

struct Tier {
    name: &'static str,
    users: usize,
    fanout: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "small",
        users: 100,
        fanout: 3,
    },
    Tier {
        name: "medium",
        users: 2_000,
        fanout: 8,
    },
    Tier {
        name: "large",
        users: 20_000,
        fanout: 12,
    },
];

const COMPANIES: [&str; 4] = ["Acme", "Globex", "Initech", "Umbrella"];
const ROLES: [&str; 5] = ["Manager", "SDE3", "SDE2", "SDE1", "Others"];

/// Deterministic pseudo-random network: each user links to `fanout` others
/// picked by a linear congruential walk.
fn synthetic_network(tier: &Tier) -> (Vec<Connection>, HashMap<String, Profile>) {
    let mut state: u64 = 0x5EED_u64 ^ tier.users as u64;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as usize
    };

    let name = |i: usize| format!("user-{i:05}");
    let mut conns = Vec::with_capacity(tier.users * tier.fanout);
    let mut profiles = HashMap::with_capacity(tier.users);
    for i in 0..tier.users {
        profiles.insert(
            name(i),
            Profile::new(COMPANIES[next() % COMPANIES.len()], ROLES[next() % ROLES.len()]),
        );
        for _ in 0..tier.fanout {
            conns.push(Connection::new(name(i), name(next() % tier.users)));
        }
    }
    (conns, profiles)
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking.tiered");

    for tier in &TIERS {
        let (conns, profiles) = synthetic_network(tier);
        group.throughput(Throughput::Elements(conns.len() as u64));

        group.bench_with_input(BenchmarkId::new("build", tier.name), &conns, |b, conns| {
            b.iter(|| black_box(AdjacencyMap::build(conns)));
        });

        let adj = AdjacencyMap::build(&conns);
        group.bench_with_input(BenchmarkId::new("hits", tier.name), &adj, |b, adj| {
            b.iter(|| black_box(hits(adj, DEFAULT_ITERATIONS)));
        });

        group.bench_with_input(
            BenchmarkId::new("find_best_referrer", tier.name),
            &(conns, profiles),
            |b, (conns, profiles)| {
                b.iter(|| {
                    black_box(find_best_referrer(
                        conns,
                        profiles,
                        ReferralQuery {
                            requester: "bench",
                            company: "Acme",
                        },
                        &RankConfig::default(),
                    ))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_ranking);
criterion_main!(benches);
