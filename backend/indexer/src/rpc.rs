//! Soroban RPC client: polls `getEvents` and decodes registry events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//!
//! ## Confirmation
//!
//! Events raised by a contract call that ultimately failed are reported with
//! `inSuccessfulContractCall = false`; they never changed registry state and
//! are dropped during decoding.
//!
//! ## Encoding
//!
//! Topics and data arrive as base64 XDR `ScVal`s. They are decoded with
//! `stellar-xdr` and flattened to JSON (maps keyed by symbol, numbers wider
//! than 64 bits as decimal strings) before fields are picked out.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use stellar_xdr::curr::{Limits, ReadXdr, ScVal};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, RegistryEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;
/// Upper bound on the size of a single decoded `ScVal`.
const XDR_LEN_LIMIT: usize = 32_768;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    /// Malformed requests and unknown methods will not succeed on retry.
    fn is_hard(&self) -> bool {
        self.code == -32600 || self.code == -32601
    }
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Unique event id assigned by the RPC (`<toid>-<index>`).
    pub id: String,
    /// Base64 XDR `ScVal` per topic
    pub topic: Vec<String>,
    /// Base64 XDR `ScVal` event data. Older RPC versions wrap it as `{"xdr": "..."}`.
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// One page of `getEvents` results.
#[derive(Debug)]
pub struct EventsPage {
    pub events: Vec<RawEvent>,
    /// Opaque cursor to continue paging from, if any.
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

/// Doubling retry delay, capped at [`MAX_BACKOFF_SECS`].
struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    fn current(&self) -> u64 {
        self.secs
    }

    async fn wait(&mut self) {
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
    }
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of registry events from the RPC.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive); ignored
///   when `cursor` is set.
/// * `cursor`: optional opaque pagination cursor from a previous page.
/// * `limit`: maximum number of events to return.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventsPage> {
    let mut backoff = Backoff::new();
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let resp = match client.post(rpc_url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    "RPC request failed (will retry in {}s): {e}",
                    backoff.current()
                );
                backoff.wait().await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {}s)", backoff.current());
            backoff.wait().await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if err.is_hard() {
                return Err(IndexerError::EventParse(format!(
                    "RPC hard error {}: {}",
                    err.code, err.message
                )));
            }
            warn!(
                "RPC soft error (will retry in {}s): {} {}",
                backoff.current(),
                err.code,
                err.message
            );
            backoff.wait().await;
            continue;
        }

        let result = body.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventsPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "base64"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`RegistryEvent`] structs, dropping
/// events from failed contract calls.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<RegistryEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<RegistryEvent> {
    let topics = match decode_topics(&raw.topic) {
        Ok(topics) => topics,
        Err(e) => {
            warn!("Skipping event {}: {e}", raw.id);
            return None;
        }
    };

    // The leading topic symbol determines the event type.
    let kind = EventKind::from_topic(topics.first()?.as_str()?);

    let value = decode_value(&raw.value).unwrap_or_else(|e| {
        warn!("Event {} has undecodable data: {e}", raw.id);
        Value::Null
    });

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let scholarship_id = topics
        .get(1)
        .and_then(scalar_to_string)
        .or_else(|| extract_field(&value, &["scholarship_id"]));

    let data = decode_data(&value, kind);

    Some(RegistryEvent {
        event_id: raw.id.clone(),
        kind,
        scholarship_id,
        actor: data.actor,
        amount: data.amount,
        metadata_uri: data.metadata_uri,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

#[derive(Debug, Default)]
struct EventData {
    actor: Option<String>,
    amount: Option<String>,
    metadata_uri: Option<String>,
}

/// Pick the indexed fields out of the flattened event data.
fn decode_data(value: &Value, kind: EventKind) -> EventData {
    match kind {
        EventKind::Initialized => {
            // Data is the `(admin, token)` tuple.
            let actor = value
                .as_array()
                .and_then(|items| items.first())
                .and_then(scalar_to_string);
            EventData {
                actor,
                ..Default::default()
            }
        }
        EventKind::ScholarshipCreated => EventData {
            actor: extract_field(value, &["admin"]),
            amount: extract_field(value, &["amount"]),
            metadata_uri: None,
        },
        EventKind::ScholarshipClosed => EventData {
            actor: extract_field(value, &["admin"]),
            ..Default::default()
        },
        EventKind::ApplicationSubmitted => EventData {
            actor: extract_field(value, &["applicant"]),
            metadata_uri: extract_field(value, &["metadata_uri"]),
            amount: None,
        },
        EventKind::ApplicationApproved | EventKind::ApplicationRejected => EventData {
            actor: extract_field(value, &["applicant"]),
            ..Default::default()
        },
        EventKind::FundsClaimed => EventData {
            actor: extract_field(value, &["applicant"]),
            amount: extract_field(value, &["amount"]),
            metadata_uri: None,
        },
        EventKind::Unknown => EventData::default(),
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(scalar_to_string)
}

// ─────────────────────────────────────────────────────────
// XDR
// ─────────────────────────────────────────────────────────

fn decode_scval(xdr: &str) -> Result<ScVal> {
    let bytes = STANDARD
        .decode(xdr.trim())
        .map_err(|e| IndexerError::EventParse(format!("invalid base64 XDR: {e}")))?;
    ScVal::from_xdr(&bytes, Limits::len(XDR_LEN_LIMIT))
        .map_err(|e| IndexerError::EventParse(format!("invalid ScVal XDR: {e}")))
}

fn decode_topics(topics: &[String]) -> Result<Vec<Value>> {
    topics
        .iter()
        .map(|t| decode_scval(t).map(|v| scval_to_json(&v)))
        .collect()
}

fn decode_value(value: &Value) -> Result<Value> {
    let xdr = value
        .as_str()
        .or_else(|| value.get("xdr").and_then(Value::as_str));
    match xdr {
        Some(xdr) => Ok(scval_to_json(&decode_scval(xdr)?)),
        None if value.is_null() => Ok(Value::Null),
        None => Err(IndexerError::EventParse(format!(
            "event value is not XDR: {value}"
        ))),
    }
}

/// Flatten an `ScVal` into JSON. Symbols, strings and addresses become
/// strings; 128-bit integers become decimal strings.
fn scval_to_json(val: &ScVal) -> Value {
    match val {
        ScVal::Void => Value::Null,
        ScVal::Bool(b) => json!(b),
        ScVal::U32(v) => json!(v),
        ScVal::I32(v) => json!(v),
        ScVal::U64(v) => json!(v),
        ScVal::I64(v) => json!(v),
        ScVal::U128(parts) => {
            let v = (u128::from(parts.hi) << 64) | u128::from(parts.lo);
            json!(v.to_string())
        }
        ScVal::I128(parts) => {
            let v = (i128::from(parts.hi) << 64) | i128::from(parts.lo);
            json!(v.to_string())
        }
        ScVal::Symbol(sym) => json!(sym.0.to_utf8_string_lossy()),
        ScVal::String(s) => json!(s.0.to_utf8_string_lossy()),
        ScVal::Address(addr) => json!(addr.to_string()),
        ScVal::Vec(Some(items)) => Value::Array(items.0.iter().map(scval_to_json).collect()),
        ScVal::Map(Some(entries)) => {
            let map: Map<String, Value> = entries
                .0
                .iter()
                .filter_map(|entry| {
                    let key = scalar_to_string(&scval_to_json(&entry.key))?;
                    Some((key, scval_to_json(&entry.val)))
                })
                .collect();
            Value::Object(map)
        }
        other => {
            debug!("Unhandled ScVal variant: {other:?}");
            Value::Null
        }
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use stellar_xdr::curr::{Int128Parts, UInt128Parts};

    use super::*;
    use crate::db;
    use crate::db::tests::memory_pool;
    use crate::events::ApplicationStatus;

    // Base64 XDR exactly as `getEvents` returns it.
    const TOPIC_INIT: &str = "AAAADwAAAARpbml0";
    const TOPIC_CREATED: &str = "AAAADwAAAAdjcmVhdGVkAA==";
    const TOPIC_APPLIED: &str = "AAAADwAAAAdhcHBsaWVkAA==";
    const TOPIC_APPROVED: &str = "AAAADwAAAAhhcHByb3ZlZA==";
    const TOPIC_CLAIMED: &str = "AAAADwAAAAdjbGFpbWVkAA==";
    const TOPIC_CLOSED: &str = "AAAADwAAAAZjbG9zZWQAAA==";
    const ID_0: &str = "AAAABQAAAAAAAAAA";
    const ID_7: &str = "AAAABQAAAAAAAAAH";

    /// `{ admin, token }` tuple.
    const INIT_DATA: &str = "AAAAEAAAAAEAAAACAAAAEgAAAAAAAAAABwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcAAAASAAAAAQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJ";
    /// `{ admin, amount: 50_000_000, scholarship_id: 0 }`.
    const CREATED_DATA: &str = "AAAAEQAAAAEAAAADAAAADwAAAAVhZG1pbgAAAAAAABIAAAAAAAAAAAcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHAAAADwAAAAZhbW91bnQAAAAAAAoAAAAAAAAAAAAAAAAC+vCAAAAADwAAAA5zY2hvbGFyc2hpcF9pZAAAAAAABQAAAAAAAAAA";
    /// `{ applicant, metadata_uri: "ipfs://bafy", scholarship_id: 7 }`.
    const APPLIED_DATA: &str = "AAAAEQAAAAEAAAADAAAADwAAAAlhcHBsaWNhbnQAAAAAAAASAAAAAAAAAAABAgMEBQYHCAkKCwwNDg8QERITFBUWFxgZGhscHR4fIAAAAA8AAAAMbWV0YWRhdGFfdXJpAAAADgAAAAtpcGZzOi8vYmFmeQAAAAAPAAAADnNjaG9sYXJzaGlwX2lkAAAAAAAFAAAAAAAAAAc=";
    /// `{ applicant, scholarship_id: 9, status: 1 }`.
    const APPROVED_DATA: &str = "AAAAEQAAAAEAAAADAAAADwAAAAlhcHBsaWNhbnQAAAAAAAASAAAAAAAAAAABAgMEBQYHCAkKCwwNDg8QERITFBUWFxgZGhscHR4fIAAAAA8AAAAOc2Nob2xhcnNoaXBfaWQAAAAAAAUAAAAAAAAACQAAAA8AAAAGc3RhdHVzAAAAAAADAAAAAQ==";
    /// `{ amount: 50_000_000, applicant, scholarship_id: 7 }`.
    const CLAIMED_DATA: &str = "AAAAEQAAAAEAAAADAAAADwAAAAZhbW91bnQAAAAAAAoAAAAAAAAAAAAAAAAC+vCAAAAADwAAAAlhcHBsaWNhbnQAAAAAAAASAAAAAAAAAAABAgMEBQYHCAkKCwwNDg8QERITFBUWFxgZGhscHR4fIAAAAA8AAAAOc2Nob2xhcnNoaXBfaWQAAAAAAAUAAAAAAAAABw==";

    const ADMIN: &str = "GADQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOZPI";
    const APPLICANT: &str = "GAAQEAYEAUDAOCAJBIFQYDIOB4IBCEQTCQKRMFYYDENBWHA5DYPSABOV";

    fn raw_event(id: &str, topics: &[&str], value: &str) -> RawEvent {
        RawEvent {
            id: id.to_string(),
            topic: topics.iter().map(|t| t.to_string()).collect(),
            value: json!(value),
            contract_id: Some("CREG".to_string()),
            tx_hash: Some("TX1".to_string()),
            ledger: Some(1000),
            ledger_closed_at: Some("2024-01-01T00:00:00Z".to_string()),
            in_successful_contract_call: Some(true),
        }
    }

    #[test]
    fn event_kind_from_topic() {
        assert_eq!(EventKind::from_topic("init"), EventKind::Initialized);
        assert_eq!(EventKind::from_topic("created"), EventKind::ScholarshipCreated);
        assert_eq!(EventKind::from_topic("closed"), EventKind::ScholarshipClosed);
        assert_eq!(EventKind::from_topic("applied"), EventKind::ApplicationSubmitted);
        assert_eq!(EventKind::from_topic("approved"), EventKind::ApplicationApproved);
        assert_eq!(EventKind::from_topic("rejected"), EventKind::ApplicationRejected);
        assert_eq!(EventKind::from_topic("claimed"), EventKind::FundsClaimed);
        assert_eq!(EventKind::from_topic("funded"), EventKind::Unknown);
    }

    #[test]
    fn event_kind_as_str() {
        assert_eq!(EventKind::ScholarshipCreated.as_str(), "scholarship_created");
        assert_eq!(EventKind::ApplicationSubmitted.as_str(), "application_submitted");
        assert_eq!(EventKind::ApplicationApproved.as_str(), "application_approved");
        assert_eq!(EventKind::ApplicationRejected.as_str(), "application_rejected");
        assert_eq!(EventKind::FundsClaimed.as_str(), "funds_claimed");
    }

    #[test]
    fn topics_decode_from_xdr() {
        let topics = decode_topics(&[TOPIC_APPLIED.to_string(), ID_0.to_string()]).unwrap();
        assert_eq!(topics, vec![json!("applied"), json!(0)]);
    }

    #[test]
    fn wide_integers_become_decimal_strings() {
        let negative = ScVal::I128(Int128Parts { hi: -1, lo: u64::MAX });
        assert_eq!(scval_to_json(&negative), json!("-1"));

        let big = ScVal::U128(UInt128Parts { hi: 1, lo: 0 });
        assert_eq!(scval_to_json(&big), json!("18446744073709551616"));

        assert_eq!(scval_to_json(&ScVal::U64(7)), json!(7));
        assert_eq!(scval_to_json(&ScVal::Void), Value::Null);
    }

    #[test]
    fn decode_application_submitted() {
        let raw = raw_event("0000004294971392-0000000001", &[TOPIC_APPLIED, ID_7], APPLIED_DATA);

        let events = decode_events(&[raw], "CREG");
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.event_id, "0000004294971392-0000000001");
        assert_eq!(ev.kind, EventKind::ApplicationSubmitted);
        assert_eq!(ev.status(), Some(ApplicationStatus::Pending));
        assert_eq!(ev.scholarship_id.as_deref(), Some("7"));
        assert_eq!(ev.actor.as_deref(), Some(APPLICANT));
        assert_eq!(ev.metadata_uri.as_deref(), Some("ipfs://bafy"));
        assert_eq!(ev.ledger, 1000);
        assert_eq!(ev.timestamp, 1_704_067_200);
    }

    #[test]
    fn decode_funds_claimed() {
        let raw = raw_event("e1", &[TOPIC_CLAIMED, ID_7], CLAIMED_DATA);

        let events = decode_events(&[raw], "CREG");
        assert_eq!(events[0].kind, EventKind::FundsClaimed);
        assert_eq!(events[0].actor.as_deref(), Some(APPLICANT));
        assert_eq!(events[0].amount.as_deref(), Some("50000000"));
        assert_eq!(events[0].status(), Some(ApplicationStatus::Claimed));
    }

    #[test]
    fn decode_scholarship_created() {
        let raw = raw_event("e1", &[TOPIC_CREATED, ID_0], CREATED_DATA);

        let events = decode_events(&[raw], "CREG");
        assert_eq!(events[0].kind, EventKind::ScholarshipCreated);
        assert_eq!(events[0].scholarship_id.as_deref(), Some("0"));
        assert_eq!(events[0].actor.as_deref(), Some(ADMIN));
        assert_eq!(events[0].amount.as_deref(), Some("50000000"));
        assert_eq!(events[0].status(), None);
    }

    #[test]
    fn decode_init_tuple() {
        let raw = raw_event("e1", &[TOPIC_INIT], INIT_DATA);

        let events = decode_events(&[raw], "CREG");
        assert_eq!(events[0].kind, EventKind::Initialized);
        assert_eq!(events[0].scholarship_id, None);
        assert_eq!(events[0].actor.as_deref(), Some(ADMIN));
    }

    #[test]
    fn scholarship_id_falls_back_to_data() {
        let mut raw = raw_event("e1", &[TOPIC_APPROVED], APPROVED_DATA);
        raw.contract_id = None;

        let events = decode_events(&[raw], "CFALLBACK");
        assert_eq!(events[0].scholarship_id.as_deref(), Some("9"));
        assert_eq!(events[0].actor.as_deref(), Some(APPLICANT));
        assert_eq!(events[0].contract_id, "CFALLBACK");
    }

    #[test]
    fn legacy_wrapped_value_is_accepted() {
        let mut raw = raw_event("e1", &[TOPIC_APPLIED, ID_7], "");
        raw.value = json!({ "xdr": APPLIED_DATA });

        let events = decode_events(&[raw], "CREG");
        assert_eq!(events[0].actor.as_deref(), Some(APPLICANT));
    }

    #[test]
    fn undecodable_topics_are_skipped() {
        let json_topic = raw_event("e1", &[r#"{"type":"symbol","value":"applied"}"#], APPLIED_DATA);
        let bad_xdr = raw_event("e2", &["AAAADw=="], APPLIED_DATA);
        assert!(decode_events(&[json_topic, bad_xdr], "CREG").is_empty());
    }

    #[test]
    fn undecodable_value_keeps_topic_fields() {
        let raw = raw_event("e1", &[TOPIC_CLOSED, ID_0], "not-xdr");

        let events = decode_events(&[raw], "CREG");
        assert_eq!(events[0].kind, EventKind::ScholarshipClosed);
        assert_eq!(events[0].scholarship_id.as_deref(), Some("0"));
        assert_eq!(events[0].actor, None);
    }

    #[test]
    fn failed_calls_are_dropped() {
        let mut failed = raw_event("e1", &[TOPIC_APPLIED, ID_7], APPLIED_DATA);
        failed.in_successful_contract_call = Some(false);
        let mut unknown = raw_event("e2", &[TOPIC_APPLIED, ID_7], APPLIED_DATA);
        unknown.in_successful_contract_call = None;

        let events = decode_events(&[failed, unknown], "CREG");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, "e2");
    }

    #[test]
    fn empty_topic_is_skipped() {
        let raw = raw_event("e1", &[], APPLIED_DATA);
        assert!(decode_events(&[raw], "CREG").is_empty());
    }

    #[tokio::test]
    async fn rpc_page_populates_applications() {
        let page: EventsResult = serde_json::from_value(json!({
            "events": [
                {
                    "type": "contract",
                    "ledger": 1000,
                    "ledgerClosedAt": "2024-01-01T00:00:00Z",
                    "contractId": "CREG",
                    "id": "0000004294971392-0000000001",
                    "inSuccessfulContractCall": true,
                    "txHash": "ab01",
                    "topic": [TOPIC_APPLIED, ID_7],
                    "value": APPLIED_DATA
                },
                {
                    "type": "contract",
                    "ledger": 1001,
                    "ledgerClosedAt": "2024-01-01T00:00:05Z",
                    "contractId": "CREG",
                    "id": "0000004299266048-0000000001",
                    "inSuccessfulContractCall": true,
                    "txHash": "ab02",
                    "topic": [TOPIC_CLAIMED, ID_7],
                    "value": CLAIMED_DATA
                }
            ],
            "cursor": "0000004299266048-0000000001",
            "latestLedger": 1001
        }))
        .unwrap();

        let pool = memory_pool().await;
        let decoded = decode_events(&page.events, "CREG");
        assert_eq!(db::insert_events(&pool, &decoded).await.unwrap(), 2);

        let apps = db::get_applications(&pool, "7").await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].applicant, APPLICANT);
        assert_eq!(apps[0].metadata_uri, "ipfs://bafy");
        assert_eq!(apps[0].status, "claimed");
    }

    #[test]
    fn params_prefer_cursor_over_start_ledger() {
        let fresh = build_params("CREG", 500, None, 25);
        assert_eq!(fresh["startLedger"], json!(500));
        assert_eq!(fresh["pagination"]["limit"], json!(25));
        assert_eq!(fresh["filters"][0]["contractIds"][0], json!("CREG"));
        assert_eq!(fresh["xdrFormat"], json!("base64"));

        let resumed = build_params("CREG", 500, Some("0000500-1"), 25);
        assert!(resumed.get("startLedger").is_none());
        assert_eq!(resumed["pagination"]["cursor"], json!("0000500-1"));
    }

    #[test]
    fn hard_rpc_errors() {
        let hard = RpcError {
            code: -32601,
            message: "method not found".to_string(),
        };
        let soft = RpcError {
            code: -32603,
            message: "internal".to_string(),
        };
        assert!(hard.is_hard());
        assert!(!soft.is_hard());
    }

    #[test]
    fn parse_iso_timestamp() {
        let ts = parse_iso_to_unix("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(ts, 1_704_067_200);
        assert_eq!(parse_iso_to_unix("yesterday"), None);
    }
}
