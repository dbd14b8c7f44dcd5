extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{
    ApplicationReviewed, ApplicationSubmitted, FundsClaimed, ScholarshipClosed, ScholarshipCreated,
};
use crate::{ApplicationStatus, ScholarshipRegistry, ScholarshipRegistryClient};

const AMOUNT: i128 = 10_000_000;

fn setup_with_init() -> (Env, ScholarshipRegistryClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ScholarshipRegistry, ());
    let client = ScholarshipRegistryClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(token_admin);
    token::StellarAssetClient::new(&env, &token.address()).mint(&admin, &(10 * AMOUNT));
    client.init(&admin, &token.address());
    (env, client, admin)
}

fn create_scholarship(env: &Env, client: &ScholarshipRegistryClient, admin: &Address) -> u64 {
    client
        .create_scholarship(
            admin,
            &String::from_str(env, "CS Award"),
            &String::from_str(env, "Computer science"),
            &AMOUNT,
        )
        .id
}

#[test]
fn test_initialized_event() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ScholarshipRegistry, ());
    let client = ScholarshipRegistryClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    let token = Address::generate(&env);

    client.init(&admin, &token);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("init").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let (event_admin, event_token): (Address, Address) = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_admin, admin);
    assert_eq!(event_token, token);
}

#[test]
fn test_scholarship_created_event() {
    let (env, client, admin) = setup_with_init();
    let id = create_scholarship(&env, &client, &admin);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("created"), scholarship_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ScholarshipCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ScholarshipCreated {
            scholarship_id: id,
            admin: admin.clone(),
            amount: AMOUNT,
        }
    );
}

#[test]
fn test_application_submitted_event() {
    let (env, client, admin) = setup_with_init();
    let applicant = Address::generate(&env);
    let id = create_scholarship(&env, &client, &admin);
    let uri = String::from_str(&env, "data:application/json,%7B%7D");

    client.submit_application(&applicant, &id, &uri);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("applied"), scholarship_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("applied").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ApplicationSubmitted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ApplicationSubmitted {
            scholarship_id: id,
            applicant: applicant.clone(),
            metadata_uri: uri,
        }
    );
}

#[test]
fn test_application_approved_event() {
    let (env, client, admin) = setup_with_init();
    let applicant = Address::generate(&env);
    let id = create_scholarship(&env, &client, &admin);
    client.submit_application(&applicant, &id, &String::from_str(&env, "ipfs://a"));

    client.approve_application(&admin, &id, &applicant);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("approved").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ApplicationReviewed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ApplicationReviewed {
            scholarship_id: id,
            applicant: applicant.clone(),
            status: ApplicationStatus::Approved,
        }
    );
}

#[test]
fn test_application_rejected_event() {
    let (env, client, admin) = setup_with_init();
    let applicant = Address::generate(&env);
    let id = create_scholarship(&env, &client, &admin);
    client.submit_application(&applicant, &id, &String::from_str(&env, "ipfs://b"));

    client.reject_application(&admin, &id, &applicant);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("rejected").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ApplicationReviewed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data.status, ApplicationStatus::Rejected);
    assert_eq!(event_data.applicant, applicant);
}

#[test]
fn test_funds_claimed_event() {
    let (env, client, admin) = setup_with_init();
    let applicant = Address::generate(&env);
    let id = create_scholarship(&env, &client, &admin);
    client.submit_application(&applicant, &id, &String::from_str(&env, "ipfs://c"));
    client.approve_application(&admin, &id, &applicant);

    client.claim_funds(&applicant, &id);

    // The token transfer event precedes ours; the claim event is last.
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("claimed").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FundsClaimed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        FundsClaimed {
            scholarship_id: id,
            applicant: applicant.clone(),
            amount: AMOUNT,
        }
    );
}

#[test]
fn test_scholarship_closed_event() {
    let (env, client, admin) = setup_with_init();
    let id = create_scholarship(&env, &client, &admin);

    client.close_scholarship(&admin, &id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("closed").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ScholarshipClosed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ScholarshipClosed {
            scholarship_id: id,
            admin: admin.clone(),
        }
    );
}
