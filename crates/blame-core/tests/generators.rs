//! Proptest strategies for well-formed delta streams and filters.

#![allow(dead_code)]

use blame_core::{Delta, DeltaValue, FilterPredicate};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::BTreeSet;

pub const USERS: &[&str] = &["alice", "bob", "carol", "dave"];
pub const RECORDS: &[&str] = &["101", "102", "103", "104", "105"];
pub const COLUMNS: &[&str] = &["Gender", "Party", "Status", "Notes"];
pub const VALUES: &[&str] = &["F", "M", "D", "R", "Open", "Closed", ""];

/// Window the generated timestamps fall into, in minutes after [`base_time`].
pub const SPAN_MINUTES: i64 = 10_000;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 3, 1, 0, 0, 0).unwrap()
}

/// A delta whose columns are all aligned with its `RecId`.
pub fn arb_delta() -> impl Strategy<Value = Delta> {
    (
        0_u64..1_000,
        prop::sample::select(USERS),
        0..SPAN_MINUTES,
        prop::collection::vec(prop::sample::select(RECORDS), 0..4),
        prop::collection::btree_set(prop::sample::select(COLUMNS), 0..3),
    )
        .prop_flat_map(|(version, user, minutes, recs, cols)| {
            let values = prop::collection::vec(
                prop::collection::vec(prop::sample::select(VALUES), recs.len()),
                cols.len(),
            );
            (
                Just(version),
                Just(user),
                Just(minutes),
                Just(recs),
                Just(cols),
                values,
            )
        })
        .prop_map(|(version, user, minutes, recs, cols, values)| {
            build_delta(version, user, minutes, &recs, &cols, values)
        })
}

fn build_delta(
    version: u64,
    user: &str,
    minutes: i64,
    recs: &[&str],
    cols: &BTreeSet<&str>,
    values: Vec<Vec<&str>>,
) -> Delta {
    let mut value = DeltaValue::new(recs.iter().copied());
    for (col, vals) in cols.iter().zip(values) {
        value = value.with_column(col, vals);
    }
    Delta {
        version,
        user: user.to_string(),
        app: "proptest".to_string(),
        timestamp: base_time() + Duration::minutes(minutes),
        value,
    }
}

pub fn arb_stream() -> impl Strategy<Value = Vec<Delta>> {
    prop::collection::vec(arb_delta(), 0..24)
}

fn arb_bound() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    prop::option::of((0..SPAN_MINUTES).prop_map(|m| base_time() + Duration::minutes(m)))
}

/// Any filter, including the identity and inverted ranges.
pub fn arb_filter() -> impl Strategy<Value = FilterPredicate> {
    (
        prop::option::of(prop::sample::select(USERS)),
        arb_bound(),
        arb_bound(),
    )
        .prop_map(|(user, start, end)| {
            FilterPredicate::identity()
                .with_user(user.unwrap_or_default())
                .with_range(start, end)
        })
}
