//! # Events
//!
//! Every state change publishes one event. Topics are `(symbol, scholarship_id)`
//! so indexers can filter per scholarship; data is a typed struct.
//!
//! | Topic      | Data                   |
//! |------------|------------------------|
//! | `init`     | `(admin, token)`       |
//! | `created`  | [`ScholarshipCreated`] |
//! | `closed`   | [`ScholarshipClosed`]  |
//! | `applied`  | [`ApplicationSubmitted`] |
//! | `approved` | [`ApplicationReviewed`] |
//! | `rejected` | [`ApplicationReviewed`] |
//! | `claimed`  | [`FundsClaimed`]       |
//!
//! The registry keeps no list of applicants; `applied` is the only way to
//! discover who applied to a scholarship.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::types::ApplicationStatus;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScholarshipCreated {
    pub scholarship_id: u64,
    pub admin: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScholarshipClosed {
    pub scholarship_id: u64,
    pub admin: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApplicationSubmitted {
    pub scholarship_id: u64,
    pub applicant: Address,
    pub metadata_uri: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApplicationReviewed {
    pub scholarship_id: u64,
    pub applicant: Address,
    pub status: ApplicationStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsClaimed {
    pub scholarship_id: u64,
    pub applicant: Address,
    pub amount: i128,
}

pub fn emit_initialized(env: &Env, admin: Address, token: Address) {
    env.events().publish((symbol_short!("init"),), (admin, token));
}

pub fn emit_scholarship_created(env: &Env, scholarship_id: u64, admin: Address, amount: i128) {
    let data = ScholarshipCreated {
        scholarship_id,
        admin,
        amount,
    };
    env.events()
        .publish((symbol_short!("created"), scholarship_id), data);
}

pub fn emit_scholarship_closed(env: &Env, scholarship_id: u64, admin: Address) {
    let data = ScholarshipClosed {
        scholarship_id,
        admin,
    };
    env.events()
        .publish((symbol_short!("closed"), scholarship_id), data);
}

pub fn emit_application_submitted(
    env: &Env,
    scholarship_id: u64,
    applicant: Address,
    metadata_uri: String,
) {
    let data = ApplicationSubmitted {
        scholarship_id,
        applicant,
        metadata_uri,
    };
    env.events()
        .publish((symbol_short!("applied"), scholarship_id), data);
}

/// Publish `approved` or `rejected` depending on the new status.
pub fn emit_application_reviewed(
    env: &Env,
    scholarship_id: u64,
    applicant: Address,
    status: ApplicationStatus,
) {
    let topic = match status {
        ApplicationStatus::Approved => symbol_short!("approved"),
        _ => symbol_short!("rejected"),
    };
    let data = ApplicationReviewed {
        scholarship_id,
        applicant,
        status,
    };
    env.events().publish((topic, scholarship_id), data);
}

pub fn emit_funds_claimed(env: &Env, scholarship_id: u64, applicant: Address, amount: i128) {
    let data = FundsClaimed {
        scholarship_id,
        applicant,
        amount,
    };
    env.events()
        .publish((symbol_short!("claimed"), scholarship_id), data);
}
