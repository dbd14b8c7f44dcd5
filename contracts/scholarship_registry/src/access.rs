//! # Access control
//!
//! The registry has a single admin, injected by `init`. Admin-only entry
//! points call [`require_admin`]; the comparison is exact `Address` identity.

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::Error;

/// Authenticate `caller` and check that it is the registry admin.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let admin = storage::get_admin(env)?;
    if *caller != admin {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

/// Return `true` if `address` is the registry admin.
/// An uninitialised registry has no admin.
pub fn is_admin(env: &Env, address: &Address) -> bool {
    match storage::get_admin(env) {
        Ok(admin) => admin == *address,
        Err(_) => false,
    }
}
