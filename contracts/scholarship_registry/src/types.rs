//! # Types
//!
//! Shared data structures used across all modules of the scholarship registry.
//!
//! ## Config / State split
//!
//! A `Scholarship` is stored as two ledger entries:
//!
//! - [`ScholarshipConfig`]: written once at creation; never mutated.
//! - [`ScholarshipState`]: written when the scholarship is closed or paid out.
//!
//! The public API exposes the reconstructed [`Scholarship`] struct.
//!
//! ## Application lifecycle
//!
//! ```text
//! (none) ──submit──► Pending ──approve──► Approved ──claim──► Claimed
//!                       │
//!                       └──reject──► Rejected
//! ```
//!
//! `Rejected` and `Claimed` are terminal.

use soroban_sdk::{contracttype, Address, String};

/// Position of an application in its lifecycle.
///
/// Discriminants match the registry ABI consumed by the front-end.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApplicationStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
    Claimed = 3,
}

impl ApplicationStatus {
    /// Whether an application in `self` may move to `next`.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Pending, ApplicationStatus::Approved)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
                | (ApplicationStatus::Approved, ApplicationStatus::Claimed)
        )
    }
}

/// Immutable scholarship configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScholarshipConfig {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub amount: i128,
}

/// Mutable scholarship state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScholarshipState {
    pub is_active: bool,
    /// Escrowed funds not yet paid out.
    pub balance: i128,
}

/// Public view of a scholarship.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scholarship {
    /// Sequential, zero-based identifier.
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Award escrowed at creation, in stroops of the bound token.
    pub amount: i128,
    /// `true` while the scholarship accepts applications.
    pub is_active: bool,
}

/// An application, keyed by `(scholarship_id, applicant)`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Application {
    pub applicant: Address,
    /// Opaque pointer to the application content; never parsed on-chain.
    pub metadata_uri: String,
    pub status: ApplicationStatus,
}
