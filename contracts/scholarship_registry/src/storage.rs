//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the registry.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                | Type      | Description                          |
//! |--------------------|-----------|--------------------------------------|
//! | `Admin`            | `Address` | Address allowed to run admin actions |
//! | `Token`            | `Address` | Token contract holding the escrow    |
//! | `ScholarshipCount` | `u64`     | Auto-increment scholarship ID        |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                        | Type                | Description              |
//! |----------------------------|---------------------|--------------------------|
//! | `SchConfig(id)`            | `ScholarshipConfig` | Immutable configuration  |
//! | `SchState(id)`             | `ScholarshipState`  | Active flag and escrow   |
//! | `Application(id, address)` | `Application`       | One entry per applicant  |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//! Lookups of absent keys return `None` and leave TTLs alone.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Application, Scholarship, ScholarshipConfig, ScholarshipState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Registry administrator (Instance).
    Admin,
    /// Escrow token contract (Instance).
    Token,
    /// Number of scholarships created so far (Instance).
    ScholarshipCount,
    /// Immutable scholarship configuration keyed by ID (Persistent).
    SchConfig(u64),
    /// Mutable scholarship state keyed by ID (Persistent).
    SchState(u64),
    /// Application keyed by scholarship ID and applicant (Persistent).
    Application(u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    bump_instance(env);
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    let admin = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)?;
    bump_instance(env);
    Ok(admin)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

pub fn get_token(env: &Env) -> Result<Address, Error> {
    let token = env
        .storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)?;
    bump_instance(env);
    Ok(token)
}

pub fn scholarship_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ScholarshipCount)
        .unwrap_or(0)
}

/// Reads, increments, and stores the scholarship counter.
/// Returns the ID to use for the *current* scholarship (pre-increment value).
pub fn get_and_increment_scholarship_id(env: &Env) -> u64 {
    bump_instance(env);
    let current = scholarship_count(env);
    env.storage()
        .instance()
        .set(&DataKey::ScholarshipCount, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn load_persistent<T>(env: &Env, key: &DataKey) -> Option<T>
where
    T: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get(key)?;
    bump_persistent(env, key);
    Some(value)
}

/// Save the config and the initial state of a new scholarship.
/// The whole award starts out in escrow.
pub fn save_scholarship(env: &Env, scholarship: &Scholarship) {
    let config_key = DataKey::SchConfig(scholarship.id);
    let state_key = DataKey::SchState(scholarship.id);

    let config = ScholarshipConfig {
        id: scholarship.id,
        title: scholarship.title.clone(),
        description: scholarship.description.clone(),
        amount: scholarship.amount,
    };

    let state = ScholarshipState {
        is_active: scholarship.is_active,
        balance: scholarship.amount,
    };

    env.storage().persistent().set(&config_key, &config);
    env.storage().persistent().set(&state_key, &state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

pub fn load_scholarship_config(env: &Env, id: u64) -> Option<ScholarshipConfig> {
    load_persistent(env, &DataKey::SchConfig(id))
}

pub fn load_scholarship_state(env: &Env, id: u64) -> Option<ScholarshipState> {
    load_persistent(env, &DataKey::SchState(id))
}

/// Load config and state together, failing with `NotFound` for unknown IDs.
pub fn load_scholarship_pair(
    env: &Env,
    id: u64,
) -> Result<(ScholarshipConfig, ScholarshipState), Error> {
    let config = load_scholarship_config(env, id).ok_or(Error::NotFound)?;
    let state = load_scholarship_state(env, id).ok_or(Error::NotFound)?;
    Ok((config, state))
}

/// Rebuild the public `Scholarship` view, or `None` for unknown IDs.
pub fn load_scholarship(env: &Env, id: u64) -> Option<Scholarship> {
    let config = load_scholarship_config(env, id)?;
    let state = load_scholarship_state(env, id)?;
    Some(Scholarship {
        id: config.id,
        title: config.title,
        description: config.description,
        amount: config.amount,
        is_active: state.is_active,
    })
}

pub fn save_scholarship_state(env: &Env, id: u64, state: &ScholarshipState) {
    let key = DataKey::SchState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

pub fn load_application(env: &Env, scholarship_id: u64, applicant: &Address) -> Option<Application> {
    load_persistent(env, &DataKey::Application(scholarship_id, applicant.clone()))
}

pub fn save_application(env: &Env, scholarship_id: u64, application: &Application) {
    let key = DataKey::Application(scholarship_id, application.applicant.clone());
    env.storage().persistent().set(&key, application);
    bump_persistent(env, &key);
}
