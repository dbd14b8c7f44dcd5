//! Canonical event types emitted by the scholarship registry contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/scholarship_registry/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the registry contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Registry bound to its admin and token (`init` topic).
    Initialized,
    /// A scholarship was created and funded (`created` topic).
    ScholarshipCreated,
    /// A scholarship stopped accepting applications (`closed` topic).
    ScholarshipClosed,
    /// An applicant applied or resubmitted (`applied` topic).
    ApplicationSubmitted,
    /// The admin approved an application (`approved` topic).
    ApplicationApproved,
    /// The admin rejected an application (`rejected` topic).
    ApplicationRejected,
    /// An approved applicant claimed the award (`claimed` topic).
    FundsClaimed,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "init" => Self::Initialized,
            "created" => Self::ScholarshipCreated,
            "closed" => Self::ScholarshipClosed,
            "applied" => Self::ApplicationSubmitted,
            "approved" => Self::ApplicationApproved,
            "rejected" => Self::ApplicationRejected,
            "claimed" => Self::FundsClaimed,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::ScholarshipCreated => "scholarship_created",
            Self::ScholarshipClosed => "scholarship_closed",
            Self::ApplicationSubmitted => "application_submitted",
            Self::ApplicationApproved => "application_approved",
            Self::ApplicationRejected => "application_rejected",
            Self::FundsClaimed => "funds_claimed",
            Self::Unknown => "unknown",
        }
    }

    /// Application status an event of this kind leaves behind, if any.
    pub fn resulting_status(&self) -> Option<ApplicationStatus> {
        match self {
            Self::ApplicationSubmitted => Some(ApplicationStatus::Pending),
            Self::ApplicationApproved => Some(ApplicationStatus::Approved),
            Self::ApplicationRejected => Some(ApplicationStatus::Rejected),
            Self::FundsClaimed => Some(ApplicationStatus::Claimed),
            _ => None,
        }
    }
}

/// Application status as tracked off-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Claimed,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Claimed => "claimed",
        }
    }
}

/// A fully decoded registry event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// RPC-assigned id, unique per contract event.
    pub event_id: String,
    pub kind: EventKind,
    pub scholarship_id: Option<String>,
    /// Applicant for application events, admin for scholarship events.
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub metadata_uri: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

impl RegistryEvent {
    pub fn status(&self) -> Option<ApplicationStatus> {
        self.kind.resulting_status()
    }
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub scholarship_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub metadata_uri: Option<String>,
    pub status: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Current state of one application, projected from the event stream.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationRecord {
    pub scholarship_id: String,
    pub applicant: String,
    pub metadata_uri: String,
    pub status: String,
    pub submitted_ledger: i64,
    pub updated_ledger: i64,
}
