use annotator_core::{AnnotationRecord, ConceptAnnotation, Snapshot};
use annotator_recon::{
    compute_modified, control_default, insert_after, reconcile, ConceptComparison, ControlChoice,
    ModifiedControl, ReconcilePolicy,
};

/// One reconciliation pass over every record, the way a session runs it after
/// each interaction.
fn pass(records: &mut [AnnotationRecord], snapshot: &Snapshot, controls: &[ModifiedControl], policy: ReconcilePolicy) {
    for (i, rec) in records.iter_mut().enumerate() {
        let computed = compute_modified(rec, snapshot.get(i).unwrap(), policy.concepts);
        rec.modified = reconcile(rec.modified, computed, controls[i], policy);
    }
}

fn load(records: Vec<AnnotationRecord>) -> (Vec<AnnotationRecord>, Snapshot, Vec<ModifiedControl>) {
    let snapshot = Snapshot::capture(&records);
    let controls = vec![ModifiedControl::Unset; records.len()];
    (records, snapshot, controls)
}

// -------------------------------------------------------------------------
// Detection
// -------------------------------------------------------------------------

#[test]
fn simple_edit_raises_flag() {
    let (mut records, snapshot, controls) =
        load(vec![AnnotationRecord::new("A", "P", false, false, vec![])]);
    let policy = ReconcilePolicy::default();

    pass(&mut records, &snapshot, &controls, policy);
    assert!(!records[0].modified);

    records[0].sentence = "B".into();
    pass(&mut records, &snapshot, &controls, policy);
    assert!(records[0].modified);
}

// -------------------------------------------------------------------------
// Sticky override
// -------------------------------------------------------------------------

#[test]
fn reverted_edit_keeps_flag_until_explicit_no() {
    let (mut records, snapshot, mut controls) =
        load(vec![AnnotationRecord::new("A", "P", false, false, vec![])]);
    let policy = ReconcilePolicy::default();

    records[0].sentence = "B".into();
    pass(&mut records, &snapshot, &controls, policy);
    assert!(records[0].modified);
    assert_eq!(control_default(records[0].modified), ControlChoice::Yes);

    records[0].sentence = "A".into();
    pass(&mut records, &snapshot, &controls, policy);
    assert!(!compute_modified(&records[0], snapshot.get(0).unwrap(), policy.concepts));
    assert!(records[0].modified, "flag must persist after reverting the edit");

    controls[0] = ControlChoice::No.into();
    pass(&mut records, &snapshot, &controls, policy);
    assert!(!records[0].modified);

    // Explicit "no" holds even through later edits.
    records[0].negated = true;
    pass(&mut records, &snapshot, &controls, policy);
    assert!(!records[0].modified);
}

#[test]
fn loaded_flag_survives_untouched_record() {
    let (mut records, snapshot, controls) =
        load(vec![AnnotationRecord::new("A", "P", false, true, vec![])]);
    pass(&mut records, &snapshot, &controls, ReconcilePolicy::default());
    assert!(records[0].modified);
}

#[test]
fn policy_without_control_ignores_choices() {
    let (mut records, snapshot, mut controls) =
        load(vec![AnnotationRecord::new("A", "P", false, false, vec![])]);
    let policy = ReconcilePolicy { override_control: false, ..ReconcilePolicy::default() };

    records[0].sentence = "B".into();
    controls[0] = ModifiedControl::No;
    pass(&mut records, &snapshot, &controls, policy);
    assert!(records[0].modified);
}

// -------------------------------------------------------------------------
// Concept sequences
// -------------------------------------------------------------------------

#[test]
fn appended_concept_alone_is_not_a_modification() {
    let (mut records, snapshot, controls) = load(vec![AnnotationRecord::new(
        "A",
        "P",
        false,
        false,
        vec![ConceptAnnotation::new("HP:0001250", "Seizure")],
    )]);
    records[0].concepts.push(ConceptAnnotation::new("HP:0001945", "Fever"));

    pass(&mut records, &snapshot, &controls, ReconcilePolicy::default());
    assert!(!records[0].modified);

    let strict = ReconcilePolicy { concepts: ConceptComparison::Strict, ..ReconcilePolicy::default() };
    pass(&mut records, &snapshot, &controls, strict);
    assert!(records[0].modified);
}

// -------------------------------------------------------------------------
// Insertion
// -------------------------------------------------------------------------

#[test]
fn inserted_record_is_independent_and_unmodified() {
    let (mut records, mut snapshot, mut controls) = load(vec![
        AnnotationRecord::new("A", "P", false, false, vec![]),
        AnnotationRecord::new("B", "P", false, false, vec![]),
    ]);
    let (pos, id) = insert_after(&mut records, &mut snapshot, 0, AnnotationRecord::blank).unwrap();
    controls.insert(pos, ModifiedControl::Unset);

    pass(&mut records, &snapshot, &controls, ReconcilePolicy::default());
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].id, id);
    assert!(!records[1].modified);
    assert!(records.iter().filter(|r| r.id == id).count() == 1);

    records[1].sentence = "new sentence".into();
    pass(&mut records, &snapshot, &controls, ReconcilePolicy::default());
    assert!(records[1].modified);
    assert!(!records[0].modified);
    assert!(!records[2].modified);
}
