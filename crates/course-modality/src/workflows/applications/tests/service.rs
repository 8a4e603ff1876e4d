use super::common::*;
use std::io::Cursor;
use std::sync::Arc;

use crate::workflows::applications::{
    AccessPolicy, ApplicationWorkflow, LookupOutcome, Pin, TransitionOutcome, WorkflowError,
};
use crate::workflows::records::{
    AppliedStatus, CourseApplicationRecord, CourseField, CourseFilter, CourseRepository,
    InMemoryCourseStore, LoadError, RecordId, RepositoryError,
};

#[test]
fn apply_then_revoke_round_trips_status_and_reason() {
    let (workflow, store) = build_workflow();

    let outcome = workflow
        .apply(apply_request("Kim", 1, "1234", Some("travel")))
        .expect("apply succeeds");
    match outcome {
        TransitionOutcome::Applied(view) => {
            assert_eq!(view.course.applied_status, "YES");
            assert_eq!(view.reason_for_applying.as_deref(), Some("travel"));
        }
        other => panic!("expected applied outcome, got {other:?}"),
    }

    let record = stored(&store, 1);
    assert_eq!(record.applied_status(), AppliedStatus::Applied);
    assert_eq!(record.application.reason_for_applying(), Some("travel"));

    let outcome = workflow
        .apply(apply_request("Kim", 1, "0000", Some("changed")))
        .expect("apply runs");
    assert_eq!(outcome, TransitionOutcome::NoMatchingRecord);
    assert_eq!(
        stored(&store, 1).application.reason_for_applying(),
        Some("travel")
    );

    let outcome = workflow
        .revoke(revoke_request("Kim", 1, "1234"))
        .expect("revoke succeeds");
    assert!(matches!(outcome, TransitionOutcome::Revoked(_)));

    let record = stored(&store, 1);
    assert_eq!(record.applied_status().label(), "");
    assert_eq!(record.application.reason_for_applying(), None);
    assert_eq!(record.application.password(), "1234");
}

#[test]
fn rows_sharing_a_name_are_gated_by_their_own_password() {
    let (workflow, store) = build_workflow();

    let outcome = workflow
        .apply(apply_request("Kim", 2, "1234", Some("travel")))
        .expect("apply runs");
    assert_eq!(outcome, TransitionOutcome::NoMatchingRecord);
    assert!(!stored(&store, 2).is_applied());

    let outcome = workflow
        .apply(apply_request("Kim", 2, "5678", None))
        .expect("apply runs");
    assert!(matches!(outcome, TransitionOutcome::Applied(_)));
    assert!(stored(&store, 2).is_applied());
    assert!(!stored(&store, 1).is_applied(), "sibling row untouched");
}

#[test]
fn row_id_of_another_applicant_is_indistinguishable_from_wrong_pin() {
    let (workflow, store) = build_workflow();

    let foreign_row = workflow
        .revoke(revoke_request("Kim", 3, "0042"))
        .expect("revoke runs");
    let unknown_name = workflow
        .revoke(revoke_request("Park", 3, "0042"))
        .expect("revoke runs");

    assert_eq!(foreign_row, TransitionOutcome::NoMatchingRecord);
    assert_eq!(unknown_name, TransitionOutcome::NoMatchingRecord);
    assert!(stored(&store, 3).is_applied());
}

#[test]
fn malformed_pin_disables_controls_without_touching_state() {
    let (workflow, store) = build_workflow();

    for pin in ["123", "12345", ""] {
        let outcome = workflow
            .apply(apply_request("Kim", 1, pin, Some("travel")))
            .expect("apply runs");
        assert_eq!(outcome, TransitionOutcome::ControlsDisabled);
    }
    assert!(!stored(&store, 1).is_applied());
}

#[test]
fn blank_reason_is_stored_as_none() {
    let (workflow, store) = build_workflow();

    workflow
        .apply(apply_request("Kim", 1, "1234", Some("   ")))
        .expect("apply succeeds");

    let record = stored(&store, 1);
    assert!(record.is_applied());
    assert_eq!(record.application.reason_for_applying(), None);
}

#[test]
fn reapplying_replaces_the_reason() {
    let (workflow, store) = build_workflow();

    workflow
        .apply(apply_request("Lee", 3, "0042", Some("visa renewal")))
        .expect("apply succeeds");

    let record = stored(&store, 3);
    assert!(record.is_applied());
    assert_eq!(
        record.application.reason_for_applying(),
        Some("visa renewal")
    );
}

#[test]
fn lookup_reveals_reason_only_for_authorized_rows() {
    let (workflow, _) = build_workflow();

    match workflow.lookup("Kim", Some("5678")).expect("lookup") {
        LookupOutcome::Found {
            records,
            controls_enabled,
        } => {
            assert!(controls_enabled);
            assert_eq!(records.len(), 2);
            assert!(!records[0].editable);
            assert!(records[1].editable);
        }
        other => panic!("expected rows, got {other:?}"),
    }

    match workflow.lookup("Lee", None).expect("lookup") {
        LookupOutcome::Found {
            records,
            controls_enabled,
        } => {
            assert!(!controls_enabled);
            assert_eq!(records[0].course.applied_status, "YES");
            assert_eq!(records[0].reason_for_applying, None);
        }
        other => panic!("expected rows, got {other:?}"),
    }
}

#[test]
fn lookup_with_malformed_pin_keeps_rows_read_only() {
    let (workflow, _) = build_workflow();

    match workflow.lookup("Lee", Some("42")).expect("lookup") {
        LookupOutcome::Found {
            records,
            controls_enabled,
        } => {
            assert!(!controls_enabled);
            assert!(records.iter().all(|record| !record.editable));
        }
        other => panic!("expected rows, got {other:?}"),
    }
}

#[test]
fn lookup_of_unknown_name_is_not_found() {
    let (workflow, _) = build_workflow();
    assert_eq!(
        workflow
            .lookup("no-such-person", Some("1234"))
            .expect("lookup"),
        LookupOutcome::NotFound
    );
}

#[test]
fn search_composes_name_and_format_filters() {
    let (workflow, _) = build_workflow();

    let filter = CourseFilter::new()
        .contains(CourseField::ApplicantName, "Ki")
        .contains(CourseField::CourseFormat, "Hyb");
    let views = workflow.search(&filter).expect("search");

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].record_id, RecordId(2));
}

#[test]
fn upload_appends_duplicates_with_fresh_ids() {
    let (workflow, store) = build_workflow();

    let ids = workflow
        .upload(Cursor::new(COURSES_CSV))
        .expect("upload succeeds");

    assert_eq!(ids, vec![RecordId(4), RecordId(5), RecordId(6)]);
    assert_eq!(store.len(), 6);
    assert_eq!(store.find_by_name("Kim").expect("lookup").len(), 4);
}

#[test]
fn upload_with_incompatible_schema_appends_nothing() {
    let (workflow, store) = build_workflow();

    let error = workflow
        .upload(Cursor::new("Name,Password\nKim,1234\n"))
        .expect_err("schema rejected");

    assert!(matches!(
        error,
        WorkflowError::Load(LoadError::MissingColumn { .. })
    ));
    assert_eq!(store.len(), 3);
}

#[test]
fn admin_override_requires_the_admin_pin() {
    let (workflow, _) = build_workflow();

    assert!(matches!(
        workflow.admin_records("1234"),
        Err(WorkflowError::AdminDenied)
    ));

    let records = workflow.admin_records(ADMIN_PIN).expect("admin read");
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].password, "0042");
    assert_eq!(records[2].reason_for_applying.as_deref(), Some("conference"));
}

#[test]
fn admin_pin_does_not_authorize_mutations() {
    let (workflow, store) = build_workflow();

    let outcome = workflow
        .apply(apply_request("Kim", 1, ADMIN_PIN, Some("override")))
        .expect("apply runs");

    assert_eq!(outcome, TransitionOutcome::NoMatchingRecord);
    assert!(!stored(&store, 1).is_applied());
}

#[test]
fn full_export_reflects_session_changes_and_reloads() {
    let (workflow, store) = build_workflow();
    workflow
        .apply(apply_request("Kim", 1, "1234", Some("travel")))
        .expect("apply succeeds");

    let csv = workflow.admin_export(ADMIN_PIN, None).expect("export");
    assert!(csv.contains("Minsu Kim"));

    let reloaded = InMemoryCourseStore::from_reader(Cursor::new(csv)).expect("reload");
    let original = store.all().expect("all rows");
    let reloaded = reloaded.all().expect("all rows");
    assert_eq!(reloaded, original);
    assert_eq!(reloaded[0].application.reason_for_applying(), Some("travel"));
}

#[test]
fn reason_with_surrounding_whitespace_survives_export_and_reload() {
    let (workflow, store) = build_workflow();
    workflow
        .apply(apply_request("Kim", 1, "1234", Some("  travel to Seoul ")))
        .expect("apply succeeds");
    assert_eq!(
        stored(&store, 1).application.reason_for_applying(),
        Some("travel to Seoul")
    );

    let csv = workflow.admin_export(ADMIN_PIN, None).expect("export");
    let reloaded = InMemoryCourseStore::from_reader(Cursor::new(csv)).expect("reload");
    assert_eq!(reloaded.all().expect("all rows"), store.all().expect("all rows"));
}

#[test]
fn semester_export_contains_only_that_semester() {
    let (workflow, _) = build_workflow();

    let csv = workflow
        .admin_export(ADMIN_PIN, Some("2025-2"))
        .expect("export");

    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("Lee,2025-2"));
}

#[test]
fn repository_failures_propagate() {
    let workflow = ApplicationWorkflow::new(
        Arc::new(UnavailableRepository),
        directory(),
        admin_pin(),
    );

    match workflow.apply(apply_request("Kim", 1, "1234", None)) {
        Err(WorkflowError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository error, got {other:?}"),
    }
}

struct DenyAll;

impl AccessPolicy for DenyAll {
    fn authorize(&self, _record: &CourseApplicationRecord, _pin: &Pin) -> bool {
        false
    }
}

#[test]
fn access_policy_can_be_swapped() {
    let store = Arc::new(
        InMemoryCourseStore::from_reader(Cursor::new(COURSES_CSV)).expect("course fixture"),
    );
    let workflow = ApplicationWorkflow::with_policy(
        store.clone(),
        Arc::new(DenyAll),
        directory(),
        admin_pin(),
    );

    let outcome = workflow
        .apply(apply_request("Kim", 1, "1234", Some("travel")))
        .expect("apply runs");

    assert_eq!(outcome, TransitionOutcome::NoMatchingRecord);
    assert!(!stored(&store, 1).is_applied());
}
