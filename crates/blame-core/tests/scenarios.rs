//! Integration tests: end-to-end scenarios over a parsed delta batch.
//!
//! Covers:
//!   - Overwrite + contention on a single cell
//!   - Category tallies for a discrete column
//!   - User filter rebuilding the view from a 5-delta stream
//!   - Rejection of a misaligned delta without touching existing state
//!   - Session reset restoring the unfiltered view

use blame_core::config::BlameConfig;
use blame_core::store::DiscreteColumns;
use blame_core::{
    Delta, DeltaError, DeltaStore, FilterPhase, FilterPredicate, RecordId, Session, ViewError,
    build_view, parse_batch, per_user_edit_counts,
};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn delta_json(version: u64, user: &str, day: u32, value: &str) -> String {
    format!(
        r#"{{"Version":{version},"User":"{user}","App":"canvass","Timestamp":"2016-03-{day:02}T09:30:00Z","Value":{value}}}"#
    )
}

fn batch(deltas: &[String]) -> Vec<Delta> {
    let json = format!(r#"{{"Results":[{}]}}"#, deltas.join(","));
    parse_batch(&json).expect("batch should parse")
}

fn rec(id: &str) -> RecordId {
    RecordId::from(id)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn overwrite_by_second_user_is_contended() {
    let raw = batch(&[
        delta_json(1, "alice", 1, r#"{"RecId":[101],"Status":["Open"]}"#),
        delta_json(2, "bob", 2, r#"{"RecId":[101],"Status":["Closed"]}"#),
    ]);
    let mut store = DeltaStore::default();
    for delta in &raw {
        store.add(delta).expect("add");
    }

    let id = rec("101");
    assert_eq!(store.latest_grid()[&id]["Status"].as_str(), "Closed");
    assert_eq!(store.editor_count(&id, "Status"), 2);

    let history = store.cell_history(&id, "Status");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].user, "alice");
    assert_eq!(history[1].user, "bob");

    let rows = store.grid_rows(BlameConfig::default().contention.min_editors);
    assert!(rows[0].cells[0].contended);
    assert_eq!(rows[0].cells[0].annotated(), "Closed [2 changes] [users: 2]");
}

#[test]
fn discrete_column_histogram() {
    let raw = batch(&[
        delta_json(1, "alice", 1, r#"{"RecId":["1"],"Gender":["F"]}"#),
        delta_json(2, "bob", 1, r#"{"RecId":["2"],"Gender":["M"]}"#),
        delta_json(3, "alice", 2, r#"{"RecId":["3"],"Gender":["F"]}"#),
    ]);
    let discrete = BlameConfig::default().store.discrete_columns;
    let view = build_view(&raw, &FilterPredicate::identity(), &discrete).expect("build");

    let expected = BTreeMap::from([("F".to_string(), 2), ("M".to_string(), 1)]);
    assert_eq!(view.store.category_tally("Gender").to_map(), expected);
    assert!(view.store.category_tally("Status").is_empty());
    assert!(view.store.category_tally("Party").is_empty());
}

#[test]
fn user_filter_over_five_deltas() {
    let raw = batch(&[
        delta_json(1, "alice", 1, r#"{"RecId":["1"],"Status":["a"]}"#),
        delta_json(2, "bob", 1, r#"{"RecId":["2"],"Status":["b"]}"#),
        delta_json(3, "carol", 2, r#"{"RecId":["3"],"Party":["D"]}"#),
        delta_json(4, "alice", 3, r#"{"RecId":["4","5"],"Notes":["x","y"]}"#),
        delta_json(5, "bob", 4, r#"{"RecId":["1"],"Status":["c"]}"#),
    ]);
    let filter = FilterPredicate::identity().with_user("alice");
    let view = build_view(&raw, &filter, &DiscreteColumns::default()).expect("build");

    assert_eq!(view.filtered.len(), 2);
    assert!(view.filtered.iter().all(|d| d.user == "alice"));

    let records: Vec<&str> = view.store.records().map(RecordId::as_str).collect();
    assert_eq!(records, ["1", "4", "5"]);
    assert_eq!(view.store.columns(), ["Notes", "Status"]);
    assert_eq!(
        view.store.latest_value(&rec("1"), "Status").map(|v| v.as_str()),
        Some("a")
    );
    assert!(view.store.cell_history(&rec("3"), "Party").is_empty());

    let counts = per_user_edit_counts(view.filtered.iter().copied());
    assert_eq!(counts.len(), 1);
    assert_eq!(counts["alice"], 2);
}

#[test]
fn misaligned_delta_is_rejected_atomically() {
    let raw = batch(&[
        delta_json(1, "alice", 1, r#"{"RecId":["1"],"Gender":["F"]}"#),
        delta_json(2, "bob", 2, r#"{"RecId":["1","2","3"],"Gender":["M","M"]}"#),
    ]);
    let mut store = DeltaStore::new(DiscreteColumns::new(["Gender"]));
    store.add(&raw[0]).expect("first delta is fine");

    let err = store.add(&raw[1]).expect_err("second delta is misaligned");
    assert_eq!(
        err,
        DeltaError::ColumnLengthMismatch {
            version: 2,
            column: "Gender".into(),
            expected: 3,
            found: 2,
        }
    );

    assert_eq!(store.delta_count(), 1);
    assert_eq!(store.records().count(), 1);
    assert_eq!(store.editor_count(&rec("1"), "Gender"), 1);
    assert_eq!(store.category_tally("Gender").get("F"), 1);
    assert_eq!(store.category_tally("Gender").get("M"), 0);

    let view_err = build_view(&raw, &FilterPredicate::identity(), &DiscreteColumns::default())
        .expect_err("view build fails");
    assert!(matches!(view_err, ViewError::Malformed { index: 1, .. }));
}

#[test]
fn missing_rec_id_in_batch_is_reported_at_ingest() {
    let raw = batch(&[delta_json(9, "alice", 1, r#"{"Status":["a"]}"#)]);
    let mut store = DeltaStore::default();
    assert_eq!(
        store.add(&raw[0]),
        Err(DeltaError::MissingRecordIds { version: 9 })
    );
}

#[test]
fn time_range_and_reset_through_session() {
    let raw = batch(&[
        delta_json(1, "alice", 1, r#"{"RecId":["1"],"Status":["a"]}"#),
        delta_json(2, "bob", 5, r#"{"RecId":["1"],"Status":["b"]}"#),
        delta_json(3, "carol", 9, r#"{"RecId":["1"],"Status":["c"]}"#),
    ]);
    let mut session = Session::new(&raw, DiscreteColumns::default());

    let filter: FilterPredicate =
        serde_json::from_str(r#"{"timestampStart":"2016-03-02","timestampEnd":"2016-03-06"}"#)
            .expect("filter");
    let view = session.apply(filter).expect("apply");
    assert_eq!(session.phase(), FilterPhase::Filtered);
    assert_eq!(view.filtered.len(), 1);
    assert_eq!(
        view.store.latest_value(&rec("1"), "Status").map(|v| v.as_str()),
        Some("b")
    );
    assert_eq!(view.store.editor_count(&rec("1"), "Status"), 1);

    let view = session.reset().expect("reset");
    assert_eq!(session.phase(), FilterPhase::Default);
    assert_eq!(view.filtered.len(), 3);
    assert_eq!(view.store.editor_count(&rec("1"), "Status"), 3);
    let edits = view.store.cell_edits(&rec("1"), "Status");
    let written: Vec<&str> = edits
        .iter()
        .filter_map(|e| e.value.map(|v| v.as_str()))
        .collect();
    assert_eq!(written, ["a", "b", "c"]);
}
