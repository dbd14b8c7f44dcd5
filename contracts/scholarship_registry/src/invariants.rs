#![allow(dead_code)]

extern crate std;

use crate::types::{ApplicationStatus, Scholarship};

/// INV-1: Escrowed funds are never negative and never exceed the award.
pub fn assert_escrow_within_award(scholarship: &Scholarship, escrow: i128) {
    assert!(
        escrow >= 0 && escrow <= scholarship.amount,
        "INV-1 violated: scholarship {} escrow {} outside [0, {}]",
        scholarship.id,
        escrow,
        scholarship.amount
    );
}

/// INV-2: Scholarship IDs are sequential starting from 0.
pub fn assert_sequential_ids(scholarships: &[Scholarship]) {
    for (i, scholarship) in scholarships.iter().enumerate() {
        assert_eq!(
            scholarship.id, i as u64,
            "INV-2 violated: expected id {}, got {}",
            i, scholarship.id
        );
    }
}

/// INV-3: Only forward transitions are allowed:
///   Pending  -> Approved | Rejected
///   Approved -> Claimed
///   Rejected -> (none)
///   Claimed  -> (none)
pub fn assert_valid_status_transition(from: ApplicationStatus, to: ApplicationStatus) {
    let valid = matches!(
        (from, to),
        (ApplicationStatus::Pending, ApplicationStatus::Approved)
            | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
            | (ApplicationStatus::Approved, ApplicationStatus::Claimed)
    );

    assert!(
        valid,
        "INV-3 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-4: Fields fixed at creation (id, title, description, amount) never change.
pub fn assert_scholarship_immutable_fields(original: &Scholarship, current: &Scholarship) {
    assert_eq!(original.id, current.id, "INV-4 violated: scholarship id changed");
    assert_eq!(
        original.title, current.title,
        "INV-4 violated: scholarship title changed"
    );
    assert_eq!(
        original.description, current.description,
        "INV-4 violated: scholarship description changed"
    );
    assert_eq!(
        original.amount, current.amount,
        "INV-4 violated: scholarship amount changed"
    );
}

/// INV-5: A claim moves exactly `amount` from the registry to the applicant.
pub fn assert_claim_conserves_funds(
    registry_before: i128,
    registry_after: i128,
    applicant_before: i128,
    applicant_after: i128,
    amount: i128,
) {
    assert_eq!(
        registry_after,
        registry_before - amount,
        "INV-5 violated: registry balance {} - {} != {}",
        registry_before,
        amount,
        registry_after
    );
    assert_eq!(
        applicant_after,
        applicant_before + amount,
        "INV-5 violated: applicant balance {} + {} != {}",
        applicant_before,
        amount,
        applicant_after
    );
}

/// Run all stateless scholarship invariants.
pub fn assert_all_scholarship_invariants(scholarship: &Scholarship, escrow: i128) {
    assert!(
        scholarship.amount >= 0,
        "scholarship {} has negative amount",
        scholarship.id
    );
    assert_escrow_within_award(scholarship, escrow);
}
