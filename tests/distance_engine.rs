// tests/distance_engine.rs
//
// Snapshot JSON → distances, including the pasted-snapshot path.
use chapero::distance::{compute_distances, compute_distances_with, TieBreak};
use chapero::{Door, Error, Snapshot};

const SNAPSHOT: &str = r#"{
  "doors": { "LAB": "10001", "FES": "10003", "NOC": "99999", "NOC-FES": "10005" },
  "ordered": [
    { "raw": "10001", "norm": "10001", "isNoContratado": false },
    { "raw": "10002", "norm": "10002", "isNoContratado": true },
    { "raw": "10003", "norm": "10003", "isNoContratado": false },
    { "raw": "10004", "norm": "10004", "isNoContratado": true },
    { "raw": "10005", "norm": "10005", "isNoContratado": false },
    { "raw": "10006", "norm": "10006", "isNoContratado": true }
  ]
}"#;

#[test]
fn report_for_pasted_snapshot() {
    let snap = Snapshot::from_json(SNAPSHOT).unwrap();
    let rep = compute_distances("10004", &snap).unwrap();

    let by_door = |d: Door| rep.results.iter().find(|r| r.door == d).unwrap();
    // LAB at 0 → 1,2,3: B flagged → 1
    assert_eq!(by_door(Door::Lab).distance, Some(1));
    // FES at 2 → 3: nothing strictly between
    assert_eq!(by_door(Door::Fes).distance, Some(0));
    // NOC-FES at 4 → 5,0,1,2: 10006 and 10002 → 2
    assert_eq!(by_door(Door::NocFes).distance, Some(2));
    // NOC not in roster
    assert_eq!(by_door(Door::Noc).distance, None);
    assert!(by_door(Door::Noc).error.is_some());

    let ranked: Vec<Door> = rep.ranked.iter().map(|r| r.door).collect();
    assert_eq!(ranked, vec![Door::Fes, Door::Lab, Door::NocFes]);
    assert_eq!(rep.recommended.as_ref().unwrap().door, Door::Fes);
    assert_eq!(rep.meta.total_chapas, 6);
    assert_eq!(rep.meta.no_contratadas, 3);
}

#[test]
fn user_is_matched_by_censo_key() {
    let snap = Snapshot::from_json(SNAPSHOT).unwrap();
    // "0004" → 70004, censo key 0004 → roster 10004
    let rep = compute_distances("0004", &snap).unwrap();
    assert_eq!(rep.results[0].user_idx, Some(3));
}

#[test]
fn unknown_user_is_an_error() {
    let snap = Snapshot::from_json(SNAPSHOT).unwrap();
    assert!(matches!(compute_distances("10007", &snap), Err(Error::UserNotFound { .. })));
    assert!(matches!(compute_distances("", &snap), Err(Error::InvalidInput(_))));
}

#[test]
fn priority_breaks_ties_only() {
    let snap = Snapshot::from_json(SNAPSHOT).unwrap();
    let policy = TieBreak::Priority(vec![Door::NocFes]);
    let rep = compute_distances_with("10004", &snap, &policy).unwrap();
    // distances differ, so the ranking is unchanged
    assert_eq!(rep.recommended.unwrap().door, Door::Fes);
}
