//! Integration tests for the wallet session: credential lifecycle,
//! endpoint failover, balance queries, transfers and stale-result handling.
//!
//! The chain is a `NullChainClient`; credentials live in either the
//! in-memory `NullCredentialStore` or a real LMDB store in a temp dir.

use std::sync::Arc;

use solvault_crypto::{keypair_from_mnemonic, verify_signature, Mnemonic};
use solvault_nullables::{NullChainClient, NullCredentialStore};
use solvault_rpc::{ChainClient, RpcError, SignatureStatus, TokenAccount};
use solvault_store::CredentialStore;
use solvault_store_lmdb::LmdbCredentialStore;
use solvault_types::{Asset, Commitment, NetworkId, PublicKey, Signature};
use solvault_wallet_core::{SessionState, WalletConfig, WalletError, WalletSession};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon \
    abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon \
    abandon abandon abandon abandon abandon art";

const ENDPOINT: &str = "null://primary";

fn owner() -> PublicKey {
    keypair_from_mnemonic(PHRASE).unwrap().public
}

fn recipient() -> PublicKey {
    PublicKey::new([9u8; 32])
}

fn test_config() -> WalletConfig {
    WalletConfig {
        endpoints: vec![ENDPOINT.to_string()],
        failover_backoff_ms: 0,
        confirm_poll_interval_ms: 10,
        confirm_timeout_secs: 1,
        ..WalletConfig::default()
    }
}

fn usdc_mint() -> PublicKey {
    test_config().token("USDC").unwrap().mint
}

fn opener(
    chain: &Arc<NullChainClient>,
) -> impl Fn(&str) -> Result<Arc<dyn ChainClient>, RpcError> {
    let chain = chain.clone();
    move |_| Ok(chain.clone() as Arc<dyn ChainClient>)
}

struct Harness {
    session: Arc<WalletSession<NullCredentialStore>>,
    chain: Arc<NullChainClient>,
}

/// A started, connected session holding the test phrase.
async fn active_with(config: WalletConfig) -> Harness {
    let store = NullCredentialStore::with_mnemonic(&Mnemonic::parse(PHRASE).unwrap());
    let session = Arc::new(WalletSession::new(config, store));
    assert_eq!(session.start().unwrap(), SessionState::Active);
    let chain = Arc::new(NullChainClient::new(ENDPOINT));
    session.connect_with(opener(&chain)).await.unwrap();
    Harness { session, chain }
}

async fn active() -> Harness {
    active_with(test_config()).await
}

fn fresh_session() -> WalletSession<NullCredentialStore> {
    let session = WalletSession::new(test_config(), NullCredentialStore::new());
    session.start().unwrap();
    session
}

// ---------------------------------------------------------------------------
// Credential lifecycle
// ---------------------------------------------------------------------------

#[test]
fn start_without_credential_awaits_import() {
    let session = WalletSession::new(test_config(), NullCredentialStore::new());
    assert_eq!(session.start().unwrap(), SessionState::AwaitingImportOrCreate);
    assert!(session.public_key().is_none());
}

#[test]
fn start_twice_is_rejected() {
    let session = fresh_session();
    assert!(matches!(session.start(), Err(WalletError::InvalidState(_))));
}

#[test]
fn import_activates_and_persists() {
    let session = fresh_session();
    let address = session.import(PHRASE).unwrap();
    assert_eq!(address, owner());
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.public_key(), Some(owner()));
    assert_eq!(
        session.store().load().unwrap(),
        Some(Mnemonic::parse(PHRASE).unwrap())
    );
}

#[test]
fn import_tolerates_irregular_whitespace() {
    let session = fresh_session();
    let messy = format!("  {}  ", PHRASE.replace(' ', "   "));
    assert_eq!(session.import(&messy).unwrap(), owner());
}

#[test]
fn import_invalid_phrase_changes_nothing() {
    let session = fresh_session();
    let bad_checksum = PHRASE.replace(" art", " abandon");
    assert!(matches!(
        session.import(&bad_checksum),
        Err(WalletError::InvalidMnemonic(_))
    ));
    assert!(matches!(
        session.import("abandon abandon abandon"),
        Err(WalletError::InvalidMnemonic(_))
    ));
    assert_eq!(session.state(), SessionState::AwaitingImportOrCreate);
    assert!(session.store().raw().is_none());
}

#[test]
fn import_with_failing_store_leaves_no_partial_state() {
    let session = fresh_session();
    session.store().fail_writes(true);
    assert!(matches!(session.import(PHRASE), Err(WalletError::Storage(_))));
    assert_eq!(session.state(), SessionState::AwaitingImportOrCreate);
    assert!(session.public_key().is_none());
    assert!(session.store().raw().is_none());
}

#[test]
fn create_then_confirm_persists_the_shown_phrase() {
    let session = fresh_session();
    let shown = session.create_new().unwrap();
    assert_eq!(shown.word_count(), 24);
    assert_eq!(session.state(), SessionState::AwaitingConfirmation);
    assert!(session.store().raw().is_none(), "nothing persisted before confirm");

    let address = session.confirm().unwrap();
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(address, shown.to_keypair().unwrap().public);
    assert_eq!(session.store().load().unwrap(), Some(shown));
}

#[test]
fn create_then_abandon_discards() {
    let session = fresh_session();
    session.create_new().unwrap();
    session.abandon().unwrap();
    assert_eq!(session.state(), SessionState::AwaitingImportOrCreate);
    assert!(session.store().raw().is_none());
    assert!(matches!(session.confirm(), Err(WalletError::InvalidState(_))));
}

#[test]
fn confirm_with_failing_store_keeps_pending_phrase() {
    let session = fresh_session();
    let shown = session.create_new().unwrap();
    session.store().fail_writes(true);
    assert!(matches!(session.confirm(), Err(WalletError::Storage(_))));
    assert_eq!(session.state(), SessionState::AwaitingConfirmation);

    session.store().fail_writes(false);
    session.confirm().unwrap();
    assert_eq!(session.store().load().unwrap(), Some(shown));
}

#[test]
fn each_creation_yields_a_new_phrase() {
    let session = fresh_session();
    let first = session.create_new().unwrap();
    session.abandon().unwrap();
    let second = session.create_new().unwrap();
    assert_ne!(first, second);
}

#[test]
fn start_restores_stored_credential() {
    let store = NullCredentialStore::with_mnemonic(&Mnemonic::parse(PHRASE).unwrap());
    let session = WalletSession::new(test_config(), store);
    assert_eq!(session.start().unwrap(), SessionState::Active);
    assert_eq!(session.public_key(), Some(owner()));
}

#[test]
fn start_treats_corrupt_record_as_absent() {
    let store = NullCredentialStore::new();
    store.put_raw("abandon abandon abandon");
    let session = WalletSession::new(test_config(), store);
    assert_eq!(session.start().unwrap(), SessionState::AwaitingImportOrCreate);
}

#[test]
fn start_surfaces_storage_failure() {
    let store = NullCredentialStore::new();
    store.fail_reads(true);
    let session = WalletSession::new(test_config(), store);
    assert!(matches!(session.start(), Err(WalletError::Storage(_))));
    assert_eq!(session.state(), SessionState::Uninitialized);
}

#[test]
fn logout_clears_credential_and_key() {
    let session = fresh_session();
    session.import(PHRASE).unwrap();
    session.logout().unwrap();
    assert_eq!(session.state(), SessionState::AwaitingImportOrCreate);
    assert!(session.public_key().is_none());
    assert!(session.store().raw().is_none());
}

#[test]
fn logout_with_failing_store_stays_active() {
    let session = fresh_session();
    session.import(PHRASE).unwrap();
    session.store().fail_writes(true);
    assert!(matches!(session.logout(), Err(WalletError::Storage(_))));
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn lmdb_credential_survives_restart() {
    let dir = tempfile::tempdir().expect("temp dir");

    let first = WalletSession::new(test_config(), LmdbCredentialStore::open(dir.path()).unwrap());
    first.start().unwrap();
    first.import(PHRASE).unwrap();
    drop(first);

    let second = WalletSession::new(test_config(), LmdbCredentialStore::open(dir.path()).unwrap());
    assert_eq!(second.start().unwrap(), SessionState::Active);
    assert_eq!(second.public_key(), Some(owner()));
    second.logout().unwrap();
    drop(second);

    let third = WalletSession::new(test_config(), LmdbCredentialStore::open(dir.path()).unwrap());
    assert_eq!(third.start().unwrap(), SessionState::AwaitingImportOrCreate);
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_connects_to_first_live_endpoint() {
    let config = WalletConfig {
        endpoints: vec!["null://a".into(), "null://b".into(), "null://c".into()],
        ..test_config()
    };
    let session = WalletSession::new(config, NullCredentialStore::new());
    let a = Arc::new(NullChainClient::unreachable("null://a"));
    let b = Arc::new(NullChainClient::new("null://b"));
    let c = Arc::new(NullChainClient::new("null://c"));
    let clients = [a.clone(), b.clone(), c.clone()];
    let conn = session
        .connect_with(|url| {
            let client = clients
                .iter()
                .find(|c| c.endpoint() == url)
                .cloned()
                .expect("known endpoint");
            Ok(client as Arc<dyn ChainClient>)
        })
        .await
        .unwrap();
    assert_eq!(conn.endpoint, "null://b");
    assert_eq!(session.endpoint().as_deref(), Some("null://b"));
    assert_eq!(a.call_count("getVersion"), 1);
    assert!(c.calls().is_empty());
}

#[tokio::test]
async fn session_reports_all_endpoints_unreachable() {
    let config = WalletConfig {
        endpoints: vec!["null://a".into(), "null://b".into()],
        ..test_config()
    };
    let session = WalletSession::new(config, NullCredentialStore::new());
    let down = Arc::new(NullChainClient::unreachable("null://down"));
    let err = session.connect_with(opener(&down)).await.unwrap_err();
    assert!(matches!(err, WalletError::AllEndpointsUnreachable { attempted: 2 }));
    assert_eq!(down.call_count("getVersion"), 2);
    assert!(session.endpoint().is_none());
}

#[tokio::test]
async fn queries_require_a_connection() {
    let store = NullCredentialStore::with_mnemonic(&Mnemonic::parse(PHRASE).unwrap());
    let session = WalletSession::new(test_config(), store);
    session.start().unwrap();
    assert!(matches!(
        session.get_balance(&Asset::Native).await,
        Err(WalletError::NotConnected)
    ));
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

#[tokio::test]
async fn native_balance() {
    let h = active().await;
    h.chain.set_balance(owner(), 1_500_000_000);
    let balance = h.session.get_balance(&Asset::Native).await.unwrap();
    assert_eq!(balance.raw, 1_500_000_000);
    assert_eq!(balance.to_string(), "1.500000000");
}

#[tokio::test]
async fn token_without_account_is_zero() {
    let h = active().await;
    let balance = h
        .session
        .get_balance(&Asset::from_symbol("usdc"))
        .await
        .unwrap();
    assert!(balance.is_zero());
    assert_eq!(balance.decimals, 6);
}

#[tokio::test]
async fn token_balance_from_account() {
    let h = active().await;
    h.chain.set_token_account(
        owner(),
        usdc_mint(),
        TokenAccount {
            address: PublicKey::new([11; 32]),
            amount: 2_500_000,
            decimals: 6,
        },
    );
    let balance = h.session.get_balance(&Asset::from_symbol("USDC")).await.unwrap();
    assert_eq!(balance.raw, 2_500_000);
    assert_eq!(balance.to_string(), "2.500000");
}

#[tokio::test]
async fn unknown_token_is_rejected_without_network() {
    let h = active().await;
    let before = h.chain.calls().len();
    assert!(matches!(
        h.session.get_balance(&Asset::from_symbol("DOGE")).await,
        Err(WalletError::UnknownAsset(_))
    ));
    assert_eq!(h.chain.calls().len(), before);
}

#[tokio::test]
async fn all_balances_lists_sol_then_tokens() {
    let h = active().await;
    h.chain.set_balance(owner(), 7);
    let rows = h.session.get_all_balances().await.unwrap();
    let symbols: Vec<_> = rows.iter().map(|r| r.asset.symbol().to_string()).collect();
    assert_eq!(symbols, vec!["SOL", "USDC", "USDT"]);
    assert_eq!(rows[0].balance.as_ref().unwrap().raw, 7);
    assert!(rows[1].balance.as_ref().unwrap().is_zero());
}

#[tokio::test]
async fn mint_unknown_to_the_cluster_reads_as_zero() {
    // Default devnet config with the mainnet stablecoin mints.
    let h = active().await;
    let usdt_mint = test_config().token("USDT").unwrap().mint;
    h.chain.forget_mint(usdc_mint());
    h.chain.forget_mint(usdt_mint);

    let balance = h.session.get_balance(&Asset::from_symbol("USDC")).await.unwrap();
    assert!(balance.is_zero());
    assert_eq!(balance.to_string(), "0.000000");

    let rows = h.session.get_all_balances().await.unwrap();
    assert_eq!(rows.len(), 3);
    for row in &rows[1..] {
        assert!(row.balance.as_ref().unwrap().is_zero(), "{}", row.asset);
    }
}

#[tokio::test]
async fn failed_sol_lookup_still_lists_tokens() {
    let h = active().await;
    h.chain.fail_native_balance_with(RpcError::Timeout(ENDPOINT.to_string()));
    h.chain.set_token_account(
        owner(),
        usdc_mint(),
        TokenAccount {
            address: PublicKey::new([11; 32]),
            amount: 3_000_000,
            decimals: 6,
        },
    );
    let rows = h.session.get_all_balances().await.unwrap();
    let symbols: Vec<_> = rows.iter().map(|r| r.asset.symbol().to_string()).collect();
    assert_eq!(symbols, vec!["SOL", "USDC", "USDT"]);
    assert!(matches!(rows[0].balance, Err(WalletError::Timeout(_))));
    assert_eq!(rows[1].balance.as_ref().unwrap().raw, 3_000_000);
    assert!(rows[2].balance.as_ref().unwrap().is_zero());
}

#[tokio::test]
async fn failed_token_lookup_is_reported_per_row() {
    let h = active().await;
    h.chain.set_balance(owner(), 5);
    h.chain.fail_token_lookups_with(RpcError::Http {
        endpoint: ENDPOINT.to_string(),
        status: 503,
    });
    let rows = h.session.get_all_balances().await.unwrap();
    assert_eq!(rows[0].balance.as_ref().unwrap().raw, 5);
    assert!(rows[1..]
        .iter()
        .all(|r| matches!(r.balance, Err(WalletError::Rpc(RpcError::Http { status: 503, .. })))));
}

#[tokio::test]
async fn balance_requires_active_session() {
    let session = fresh_session();
    assert!(matches!(
        session.get_balance(&Asset::Native).await,
        Err(WalletError::InvalidState(_))
    ));
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_recipient_fails_before_any_network_call() {
    let h = active().await;
    let before = h.chain.calls();
    // The last entry is valid base58 but decodes to 31 bytes.
    for bad in ["", "not-an-address", "0OIl", "tVojvhToWjQ8Xvo4UPx2Xz9eRy7auyYMmZBjc2XfN"] {
        let err = h.session.send(bad, &Asset::Native, "1").await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidRecipient(_)), "{bad:?}: {err:?}");
    }
    assert_eq!(h.chain.calls(), before);
}

#[tokio::test]
async fn malformed_recipient_is_reported_even_when_unconnected() {
    let store = NullCredentialStore::with_mnemonic(&Mnemonic::parse(PHRASE).unwrap());
    let session = WalletSession::new(test_config(), store);
    session.start().unwrap();
    let err = session
        .send("not-an-address", &Asset::Native, "1")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidRecipient(_)), "{err:?}");
    assert!(matches!(
        session.send(&recipient().to_base58(), &Asset::Native, "1").await,
        Err(WalletError::NotConnected)
    ));
}

#[tokio::test]
async fn excess_precision_is_rejected_before_any_network_call() {
    let h = active().await;
    let before = h.chain.calls();
    let to = recipient().to_base58();
    for bad in ["0.0000000001", "0", "-1", "abc", "1.2.3"] {
        let err = h.session.send(&to, &Asset::Native, bad).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)), "{bad:?}: {err:?}");
    }
    assert_eq!(h.chain.calls(), before);
}

#[tokio::test]
async fn native_transfer_is_signed_and_submitted() {
    let h = active().await;
    let signature = h
        .session
        .send(&recipient().to_base58(), &Asset::Native, "0.25")
        .await
        .unwrap();

    let submitted = h.chain.submitted();
    assert_eq!(submitted.len(), 1);
    let wire = &submitted[0];
    assert_eq!(wire[0], 1, "one signature");
    let sig = Signature(wire[1..65].try_into().unwrap());
    assert!(verify_signature(&wire[65..], &sig, &owner()));

    let mut expected_data = vec![2, 0, 0, 0];
    expected_data.extend_from_slice(&250_000_000u64.to_le_bytes());
    assert!(wire.ends_with(&expected_data));
    assert!(wire
        .windows(32)
        .any(|w| w == recipient().as_bytes().as_slice()));

    assert_ne!(signature, Signature([0; 64]));
    assert!(h.chain.call_count("getSignatureStatuses") >= 1);
}

#[tokio::test]
async fn token_transfer_uses_token_accounts() {
    let h = active().await;
    let mint = usdc_mint();
    let source = PublicKey::new([11; 32]);
    let destination = PublicKey::new([22; 32]);
    h.chain.set_mint_decimals(mint, 6);
    h.chain.set_token_account(
        owner(),
        mint,
        TokenAccount { address: source, amount: 5_000_000, decimals: 6 },
    );
    h.chain.set_token_account(
        recipient(),
        mint,
        TokenAccount { address: destination, amount: 0, decimals: 6 },
    );

    h.session
        .send(&recipient().to_base58(), &Asset::from_symbol("usdc"), "1.25")
        .await
        .unwrap();

    let wire = &h.chain.submitted()[0];
    let mut expected_data = vec![3];
    expected_data.extend_from_slice(&1_250_000u64.to_le_bytes());
    assert!(wire.ends_with(&expected_data));
    assert!(wire.windows(32).any(|w| w == source.as_bytes().as_slice()));
    assert!(wire.windows(32).any(|w| w == destination.as_bytes().as_slice()));
}

#[tokio::test]
async fn token_transfer_to_recipient_without_account_is_a_submission_error() {
    let h = active().await;
    let mint = usdc_mint();
    h.chain.set_mint_decimals(mint, 6);
    h.chain.set_token_account(
        owner(),
        mint,
        TokenAccount { address: PublicKey::new([11; 32]), amount: 5_000_000, decimals: 6 },
    );
    let err = h
        .session
        .send(&recipient().to_base58(), &Asset::from_symbol("USDC"), "1")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Submission(_)), "{err:?}");
    assert!(h.chain.submitted().is_empty());
}

#[tokio::test]
async fn insufficient_funds_keeps_node_message() {
    let h = active().await;
    let message = "Transaction simulation failed: Attempt to debit an account but found no record of a prior credit.";
    h.chain.fail_sends_with(RpcError::Node {
        code: -32002,
        message: message.to_string(),
        data: None,
    });
    let err = h
        .session
        .send(&recipient().to_base58(), &Asset::Native, "1")
        .await
        .unwrap_err();
    match err {
        WalletError::InsufficientFunds(m) => assert_eq!(m, message),
        other => panic!("expected insufficient funds, got {other:?}"),
    }
}

#[tokio::test]
async fn other_node_rejections_are_submission_errors() {
    let h = active().await;
    h.chain.fail_sends_with(RpcError::Node {
        code: -32002,
        message: "Transaction simulation failed: Blockhash not found".into(),
        data: None,
    });
    let err = h
        .session
        .send(&recipient().to_base58(), &Asset::Native, "1")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Submission(_)), "{err:?}");
    assert_eq!(h.chain.call_count("sendTransaction"), 1, "never resubmitted");
}

#[tokio::test]
async fn failed_transaction_status_is_a_submission_error() {
    let h = active().await;
    h.chain.settle_with(Some(SignatureStatus {
        slot: 3,
        confirmation: Some(Commitment::Processed),
        err: Some(r#"{"InstructionError":[0,{"Custom":1}]}"#.into()),
    }));
    let err = h
        .session
        .send(&recipient().to_base58(), &Asset::Native, "1")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Submission(_)), "{err:?}");
}

#[tokio::test]
async fn confirmation_waits_for_configured_commitment() {
    let h = active().await;
    h.chain.script_statuses([
        None,
        Some(SignatureStatus { slot: 1, confirmation: Some(Commitment::Processed), err: None }),
    ]);
    h.session
        .send(&recipient().to_base58(), &Asset::Native, "1")
        .await
        .unwrap();
    assert_eq!(h.chain.call_count("getSignatureStatuses"), 3);
}

#[tokio::test(start_paused = true)]
async fn unconfirmed_transfer_times_out() {
    let h = active().await;
    h.chain.settle_with(None);
    let err = h
        .session
        .send(&recipient().to_base58(), &Asset::Native, "1")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Timeout(_)), "{err:?}");
    assert_eq!(h.chain.submitted().len(), 1);
}

// ---------------------------------------------------------------------------
// Faucet
// ---------------------------------------------------------------------------

#[tokio::test]
async fn faucet_grants_configured_amount() {
    let h = active().await;
    h.session.request_test_funds().await.unwrap();
    assert_eq!(h.chain.airdrops(), vec![(owner(), 2_000_000_000)]);
}

#[tokio::test]
async fn faucet_is_refused_on_mainnet() {
    let h = active_with(WalletConfig {
        network: NetworkId::MainnetBeta,
        ..test_config()
    })
    .await;
    assert!(matches!(
        h.session.request_test_funds().await,
        Err(WalletError::FaucetUnavailable(_))
    ));
    assert_eq!(h.chain.call_count("requestAirdrop"), 0);
}

// ---------------------------------------------------------------------------
// Stale results
// ---------------------------------------------------------------------------

#[tokio::test]
async fn balance_in_flight_across_logout_is_discarded() {
    let h = active().await;
    h.chain.set_balance(owner(), 42);
    let gate = h.chain.gate_next();
    let task = {
        let session = h.session.clone();
        tokio::spawn(async move { session.get_balance(&Asset::Native).await })
    };
    gate.entered().await;
    h.session.logout().unwrap();
    gate.release();
    assert!(matches!(task.await.unwrap(), Err(WalletError::SessionChanged)));
    assert_eq!(h.session.state(), SessionState::AwaitingImportOrCreate);
}

#[tokio::test]
async fn transfer_in_flight_across_logout_is_never_signed() {
    let h = active().await;
    let gate = h.chain.gate_next();
    let task = {
        let session = h.session.clone();
        let to = recipient().to_base58();
        tokio::spawn(async move { session.send(&to, &Asset::Native, "1").await })
    };
    gate.entered().await;
    h.session.logout().unwrap();
    h.session.import(PHRASE).unwrap();
    gate.release();
    assert!(matches!(task.await.unwrap(), Err(WalletError::SessionChanged)));
    assert!(h.chain.submitted().is_empty());
}
