//! # Scholarship Registry Contract
//!
//! A single Soroban contract that holds every scholarship and its
//! applications, gates admin actions, and custodies the award funds.
//!
//! | Phase        | Entry Point(s)                                        |
//! |--------------|-------------------------------------------------------|
//! | Bootstrap    | [`ScholarshipRegistry::init`]                         |
//! | Admin        | `create_scholarship`, `close_scholarship`             |
//! | Review       | `approve_application`, `reject_application`           |
//! | Applicant    | `submit_application`, `claim_funds`                   |
//! | Queries      | `get_scholarship`, `get_application`, `get_application_status`, `scholarship_count`, `escrow_balance`, `admin`, `is_admin`, `token` |
//!
//! ## Architecture
//!
//! Authorization is delegated to [`access`], storage to [`storage`] and event
//! emission to [`events`]. Every entry point validates all of its
//! preconditions before the first write, so a failed call leaves no trace.
//!
//! Funds are escrowed in the token bound at `init` (the native asset contract
//! in deployment). Each scholarship pays out its `amount` exactly once.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env, String};

pub mod access;
pub mod events;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use types::{Application, ApplicationStatus, Scholarship};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller does not hold the role the entry point requires.
    Unauthorized = 1,
    /// Unknown scholarship or application key.
    NotFound = 2,
    /// Scholarship is closed to new applications.
    Inactive = 3,
    /// Application status does not allow the requested transition.
    InvalidTransition = 4,
    /// Nothing left in escrow to disburse.
    InsufficientFunds = 5,
    AlreadyInitialized = 6,
    NotInitialized = 7,
    /// Escrow amount is negative.
    InvalidAmount = 8,
}

#[contract]
pub struct ScholarshipRegistry;

#[contractimpl]
impl ScholarshipRegistry {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Bind the registry to its admin and escrow token.
    ///
    /// Must be called exactly once after deployment; later calls fail with
    /// `AlreadyInitialized`.
    pub fn init(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        storage::set_admin(&env, &admin);
        storage::set_token(&env, &token);

        events::emit_initialized(&env, admin, token);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Admin actions
    // ─────────────────────────────────────────────────────────

    /// Create a scholarship and escrow `amount` of the bound token.
    ///
    /// The amount is pulled from `caller`, who must be the admin. A zero
    /// amount is accepted; such a scholarship can never be claimed.
    pub fn create_scholarship(
        env: Env,
        caller: Address,
        title: String,
        description: String,
        amount: i128,
    ) -> Result<Scholarship, Error> {
        access::require_admin(&env, &caller)?;

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let token = storage::get_token(&env)?;
        if amount > 0 {
            token::Client::new(&env, &token).transfer(
                &caller,
                &env.current_contract_address(),
                &amount,
            );
        }

        let id = storage::get_and_increment_scholarship_id(&env);
        let scholarship = Scholarship {
            id,
            title,
            description,
            amount,
            is_active: true,
        };
        storage::save_scholarship(&env, &scholarship);

        events::emit_scholarship_created(&env, id, caller, amount);
        Ok(scholarship)
    }

    /// Stop accepting applications for `scholarship_id`.
    ///
    /// Existing applications keep their status; an approved applicant can
    /// still claim.
    pub fn close_scholarship(env: Env, caller: Address, scholarship_id: u64) -> Result<(), Error> {
        access::require_admin(&env, &caller)?;

        let mut state =
            storage::load_scholarship_state(&env, scholarship_id).ok_or(Error::NotFound)?;
        if !state.is_active {
            return Err(Error::Inactive);
        }

        state.is_active = false;
        storage::save_scholarship_state(&env, scholarship_id, &state);

        events::emit_scholarship_closed(&env, scholarship_id, caller);
        Ok(())
    }

    /// Move a `Pending` application to `Approved`.
    pub fn approve_application(
        env: Env,
        caller: Address,
        scholarship_id: u64,
        applicant: Address,
    ) -> Result<(), Error> {
        Self::review(&env, &caller, scholarship_id, applicant, ApplicationStatus::Approved)
    }

    /// Move a `Pending` application to `Rejected`.
    pub fn reject_application(
        env: Env,
        caller: Address,
        scholarship_id: u64,
        applicant: Address,
    ) -> Result<(), Error> {
        Self::review(&env, &caller, scholarship_id, applicant, ApplicationStatus::Rejected)
    }

    // ─────────────────────────────────────────────────────────
    // Applicant actions
    // ─────────────────────────────────────────────────────────

    /// Apply to an active scholarship.
    ///
    /// A pending application may be resubmitted, which replaces its metadata.
    /// Once reviewed (or claimed) it can no longer be resubmitted.
    pub fn submit_application(
        env: Env,
        applicant: Address,
        scholarship_id: u64,
        metadata_uri: String,
    ) -> Result<(), Error> {
        applicant.require_auth();

        let state =
            storage::load_scholarship_state(&env, scholarship_id).ok_or(Error::NotFound)?;
        if !state.is_active {
            return Err(Error::Inactive);
        }

        if let Some(existing) = storage::load_application(&env, scholarship_id, &applicant) {
            if existing.status != ApplicationStatus::Pending {
                return Err(Error::InvalidTransition);
            }
        }

        let application = Application {
            applicant: applicant.clone(),
            metadata_uri: metadata_uri.clone(),
            status: ApplicationStatus::Pending,
        };
        storage::save_application(&env, scholarship_id, &application);

        events::emit_application_submitted(&env, scholarship_id, applicant, metadata_uri);
        Ok(())
    }

    /// Pay the escrowed award to an approved applicant.
    ///
    /// The `Claimed` status and the reduced escrow are persisted before the
    /// outbound transfer, so a re-entrant or repeated claim observes
    /// `Claimed` and fails with `InvalidTransition`. A failed transfer traps
    /// and the host reverts the whole invocation.
    pub fn claim_funds(env: Env, applicant: Address, scholarship_id: u64) -> Result<i128, Error> {
        applicant.require_auth();

        let mut application = storage::load_application(&env, scholarship_id, &applicant)
            .ok_or(Error::Unauthorized)?;
        if !application.status.can_transition_to(ApplicationStatus::Claimed) {
            return Err(Error::InvalidTransition);
        }

        let (config, mut state) = storage::load_scholarship_pair(&env, scholarship_id)?;
        if config.amount <= 0 || state.balance < config.amount {
            return Err(Error::InsufficientFunds);
        }
        let token = storage::get_token(&env)?;

        application.status = ApplicationStatus::Claimed;
        state.balance -= config.amount;
        storage::save_application(&env, scholarship_id, &application);
        storage::save_scholarship_state(&env, scholarship_id, &state);

        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &applicant,
            &config.amount,
        );

        events::emit_funds_claimed(&env, scholarship_id, applicant, config.amount);
        Ok(config.amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Retrieve a scholarship, or `None` if `id >= scholarship_count()`.
    pub fn get_scholarship(env: Env, id: u64) -> Option<Scholarship> {
        storage::load_scholarship(&env, id)
    }

    /// Number of scholarships ever created.
    pub fn scholarship_count(env: Env) -> u64 {
        storage::scholarship_count(&env)
    }

    /// Retrieve an application, or `None` if `applicant` never applied.
    pub fn get_application(env: Env, scholarship_id: u64, applicant: Address) -> Option<Application> {
        storage::load_application(&env, scholarship_id, &applicant)
    }

    /// Status of an application, or `None` if `applicant` never applied.
    pub fn get_application_status(
        env: Env,
        scholarship_id: u64,
        applicant: Address,
    ) -> Option<ApplicationStatus> {
        storage::load_application(&env, scholarship_id, &applicant).map(|a| a.status)
    }

    /// Funds still escrowed for `scholarship_id`; `0` for unknown IDs.
    pub fn escrow_balance(env: Env, scholarship_id: u64) -> i128 {
        storage::load_scholarship_state(&env, scholarship_id)
            .map(|s| s.balance)
            .unwrap_or(0)
    }

    /// The registry admin; fails with `NotInitialized` before `init`.
    pub fn admin(env: Env) -> Result<Address, Error> {
        storage::get_admin(&env)
    }

    /// Return `true` if `address` is the registry admin.
    pub fn is_admin(env: Env, address: Address) -> bool {
        access::is_admin(&env, &address)
    }

    /// Token contract the escrow is held in.
    pub fn token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env)
    }
}

impl ScholarshipRegistry {
    fn review(
        env: &Env,
        caller: &Address,
        scholarship_id: u64,
        applicant: Address,
        next: ApplicationStatus,
    ) -> Result<(), Error> {
        access::require_admin(env, caller)?;

        let mut application =
            storage::load_application(env, scholarship_id, &applicant).ok_or(Error::NotFound)?;
        if !application.status.can_transition_to(next) {
            return Err(Error::InvalidTransition);
        }

        application.status = next;
        storage::save_application(env, scholarship_id, &application);

        events::emit_application_reviewed(env, scholarship_id, applicant, next);
        Ok(())
    }
}
