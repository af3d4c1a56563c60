// Property-based tests for matching and classification.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use proptest::prelude::*;
use rollcall_recon::config::Policy;
use rollcall_recon::engine::run;
use rollcall_recon::matcher::{best_match, ratio, Scorer, TokenSortRatio};
use rollcall_recon::model::{AttendanceStatus, Roster, SessionAttendance};
use rollcall_recon::observer::NoopObserver;
use rollcall_recon::reconcile::reconcile;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_word() -> impl Strategy<Value = String> {
    r"[A-Za-z]{1,8}"
}

/// "First Last", optionally with a middle token.
fn arb_name() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_word(), 2..=3).prop_map(|parts| parts.join(" "))
}

fn arb_roster() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_name(), 0..8)
}

fn arb_records() -> impl Strategy<Value = Vec<SessionAttendance>> {
    prop::collection::vec(
        (arb_name(), prop_oneof![3 => 0.0..120.0f64, 1 => Just(0.0)]),
        0..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(name, minutes)| SessionAttendance::new(name, minutes))
            .collect()
    })
}

fn arb_policy() -> impl Strategy<Value = Policy> {
    (0u8..=100, 0.0..60.0f64).prop_map(|(m, d)| Policy::new(m, d))
}

// ---------------------------------------------------------------------------
// Scorer properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn score_in_range_and_symmetric(a in arb_name(), b in arb_name()) {
        let ab = TokenSortRatio.score(&a, &b);
        let ba = TokenSortRatio.score(&b, &a);
        prop_assert!((0.0..=100.0).contains(&ab));
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn identical_after_normalization_scores_100(words in prop::collection::vec(arb_word(), 1..4)) {
        let forward = words.join(" ");
        let mut reversed = words.clone();
        reversed.reverse();
        let backward = reversed.join("   ").to_uppercase();
        prop_assert_eq!(TokenSortRatio.score(&forward, &backward), 100.0);
    }

    #[test]
    fn ratio_self_is_100(s in r"[ -~]{1,20}") {
        prop_assert_eq!(ratio(&s, &s), 100.0);
    }

    #[test]
    fn best_match_is_first_maximum(query in arb_name(), roster in arb_roster()) {
        if let Some(m) = best_match(&query, &roster, &TokenSortRatio) {
            for (i, name) in roster.iter().enumerate() {
                let s = TokenSortRatio.score(&query, name);
                prop_assert!(s <= m.score);
                if i < m.index {
                    prop_assert!(s < m.score);
                }
            }
        } else {
            prop_assert!(roster.is_empty());
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciliation properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn classification_is_total(roster in arb_roster(), records in arb_records(), policy in arb_policy()) {
        let mut roster = Roster::from_names(roster);
        run(&mut roster, &records, &policy, &mut NoopObserver);
        prop_assert!(roster.entries.iter().all(|e| e.status.is_terminal()));
    }

    #[test]
    fn no_show_iff_never_matched(roster in arb_roster(), records in arb_records(), policy in arb_policy()) {
        let mut roster = Roster::from_names(roster);
        let result = run(&mut roster, &records, &policy, &mut NoopObserver);
        let matched: HashSet<&str> = result
            .observations
            .iter()
            .filter_map(|o| o.matched_name.as_deref())
            .collect();
        for entry in &roster.entries {
            let no_show = entry.status == AttendanceStatus::NoShow;
            prop_assert_eq!(no_show, !matched.contains(entry.canonical_name.as_str()));
        }
    }

    #[test]
    fn unmatched_are_exactly_below_threshold(roster in arb_roster(), records in arb_records(), policy in arb_policy()) {
        let out = reconcile(&records, &roster, &policy, &mut NoopObserver);
        let expected: Vec<String> = records
            .iter()
            .filter(|r| {
                best_match(&r.display_name, &roster, &TokenSortRatio)
                    .map_or(true, |m| m.score < f64::from(policy.match_threshold))
            })
            .map(|r| r.display_name.clone())
            .collect();
        prop_assert_eq!(out.unmatched, expected);
    }

    #[test]
    fn unmatched_output_sorted(roster in arb_roster(), records in arb_records(), policy in arb_policy()) {
        let mut roster = Roster::from_names(roster);
        let result = run(&mut roster, &records, &policy, &mut NoopObserver);
        for pair in result.unmatched.windows(2) {
            prop_assert!(pair[0].to_lowercase() <= pair[1].to_lowercase());
        }
    }

    #[test]
    fn reordering_distinct_targets_keeps_statuses(
        roster in arb_roster(),
        records in arb_records(),
        policy in arb_policy(),
    ) {
        let names = Roster::from_names(roster.clone()).names();
        let out = reconcile(&records, &names, &policy, &mut NoopObserver);
        let targets: Vec<&str> = out
            .observations
            .iter()
            .filter_map(|o| o.matched_name.as_deref())
            .collect();
        let distinct: HashSet<&str> = targets.iter().copied().collect();
        prop_assume!(distinct.len() == targets.len());

        let mut reversed = records.clone();
        reversed.reverse();

        let mut forward = Roster::from_names(roster.clone());
        let mut backward = Roster::from_names(roster);
        run(&mut forward, &records, &policy, &mut NoopObserver);
        run(&mut backward, &reversed, &policy, &mut NoopObserver);

        let a: Vec<AttendanceStatus> = forward.entries.iter().map(|e| e.status).collect();
        let b: Vec<AttendanceStatus> = backward.entries.iter().map(|e| e.status).collect();
        prop_assert_eq!(a, b);
    }
}
