//! Behavioural properties of the public lock API.
//!
//! Coverage:
//! - determinism, including across threads
//! - avalanche between credentials one character apart
//! - non-stabilization of the default rule over 100 seeds
//! - parameter mismatch on verification
//! - degenerate grids and the zero-generation short circuit
//! - the pinned end-to-end lock and derive/verify round trips

use inkverify_core::audit::{avalanche, probe_stability};
use inkverify_core::lock::seeded_grid;
use inkverify_core::{
    derive_lock, verify_lock, Lock, LockConfig, LockParams, LockPipeline, Rule, Seed,
};

const ALICE: [&str; 2] = ["alice", "correct-horse"];

#[test]
fn derive_is_deterministic() {
    let a = derive_lock(&ALICE, 20, 14, 30).unwrap();
    let b = derive_lock(&ALICE, 20, 14, 30).unwrap();
    assert_eq!(a, b);
}

#[test]
fn independent_invocations_agree_across_threads() {
    let expected = derive_lock(&ALICE, 24, 24, 40).unwrap();
    let locks: Vec<Lock> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| derive_lock(&ALICE, 24, 24, 40).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(locks.iter().all(|lock| *lock == expected));
}

#[test]
fn single_character_edits_avalanche() {
    let pairs = (0..64).map(|i| {
        let user = format!("user{}", i);
        let a = derive_lock(&[user.clone(), format!("password{}", i)], 16, 16, 50).unwrap();
        let b = derive_lock(&[user, format!("passwOrd{}", i)], 16, 16, 50).unwrap();
        assert_ne!(a, b, "pair {} collided", i);
        (a, b)
    });
    let ratio = avalanche(pairs);
    assert!((0.44..0.56).contains(&ratio), "mean bit difference {:.4}", ratio);
}

#[test]
fn default_rule_never_settles_before_target() {
    let params = LockParams::new(32, 32, 1000, Rule::default()).unwrap();
    for i in 0..100u64 {
        let seed = Seed::derive(&[format!("user{}", i), format!("pw-{}", i * 7919)]);
        let report = probe_stability(&seed, &params, 1000).unwrap();
        assert!(
            !report.stabilized(),
            "seed {} cycled: {:?}",
            i,
            report.cycle
        );
        assert_eq!(report.generations, 1000);
    }
}

#[test]
#[ignore = "production-size sweep; run with --ignored --release"]
fn default_rule_never_settles_at_production_size() {
    let params = LockConfig::default().params().unwrap();
    for i in 0..100u64 {
        let seed = Seed::derive(&[format!("prod-user{}", i), format!("prod-pw-{}", i)]);
        let report = probe_stability(&seed, &params, params.generations() as usize).unwrap();
        assert!(!report.stabilized(), "seed {} cycled: {:?}", i, report.cycle);
    }
}

#[test]
fn parameter_mismatch_fails_verification() {
    let lock = derive_lock(&ALICE, 16, 16, 20).unwrap();
    let stored = lock.as_bytes();
    assert!(verify_lock(&ALICE, 16, 16, 20, stored));
    assert!(!verify_lock(&ALICE, 16, 17, 20, stored));
    assert!(!verify_lock(&ALICE, 17, 16, 20, stored));
    assert!(!verify_lock(&ALICE, 16, 16, 21, stored));
    assert!(!verify_lock(&ALICE, 16, 16, 0, stored));
    assert!(!verify_lock(&ALICE, 0, 0, 20, stored));

    let life = LockConfig {
        rule: Rule::Life,
        ..LockConfig::with_dimensions(16, 16, 20)
    };
    assert!(!LockPipeline::new(&life).unwrap().verify(&ALICE, stored));
}

#[test]
fn degenerate_grids_do_not_crash() {
    for (w, h) in [(1, 1), (1, 7), (7, 1), (2, 2)] {
        let lock = derive_lock(&ALICE, w, h, 25).unwrap();
        assert!(verify_lock(&ALICE, w, h, 25, lock.as_bytes()), "{}x{}", w, h);
    }
}

#[test]
fn zero_generations_hashes_initial_grid() {
    let params = LockParams::new(9, 5, 0, Rule::default()).unwrap();
    let initial = seeded_grid(&Seed::derive(&ALICE), &params).unwrap();
    let expected = Lock::of_final_state(&initial, &params);
    assert_eq!(derive_lock(&ALICE, 9, 5, 0).unwrap(), expected);
    assert_ne!(derive_lock(&ALICE, 9, 5, 1).unwrap(), expected);
}

#[test]
fn pinned_end_to_end_lock() {
    let lock = derive_lock(&ALICE, 8, 8, 10).unwrap();
    assert_eq!(
        lock.to_hex(),
        "a98bdd36d5ef11735d59beb11037ad0a8207c89b4c3cb59d0cf7980efdc85ae0"
    );
}

#[test]
fn round_trip_over_varied_inputs() {
    let cases: [(&[&str], usize, usize, u64); 5] = [
        (&["alice", "correct-horse"], 8, 8, 10),
        (&["bob", "hunter2"], 31, 17, 64),
        (&["ümlaut", "пароль", "🔑"], 12, 12, 5),
        (&["x"], 3, 40, 1),
        (&["carol", "a much longer passphrase with spaces"], 50, 50, 30),
    ];
    for (parts, w, h, g) in cases {
        let lock = derive_lock(parts, w, h, g).unwrap();
        assert!(verify_lock(parts, w, h, g, lock.as_bytes()), "{:?}", parts);
    }
}
