//! # Chain Integrity Properties
//!
//! Property tests over randomly generated transaction sequences: every
//! appended chain is sequential, linked and reproducible, and any single
//! edit to a stored block is caught at that block or the one after it.

use proptest::prelude::*;
use textrace_core::{BatchId, PartyName, Stage};
use textrace_ledger::{
    verify_blocks, ChainSnapshot, HashChainLedger, Transaction, Verification,
    GENESIS_PREVIOUS_HASH,
};

fn party() -> impl Strategy<Value = PartyName> {
    "[A-Za-z][A-Za-z ]{0,20}".prop_map(|s| PartyName::new(s).unwrap())
}

fn batch_id() -> impl Strategy<Value = BatchId> {
    "[A-Z]{3}-[0-9]{3}".prop_map(|s| BatchId::new(s).unwrap())
}

fn stage() -> impl Strategy<Value = Stage> {
    prop::sample::select(Stage::all().to_vec())
}

fn transaction() -> impl Strategy<Value = Transaction> {
    prop_oneof![
        (batch_id(), party(), stage(), party(), party()).prop_map(|(b, o, s, l, v)| {
            Transaction::create_batch(b, o, s, l, v)
        }),
        (batch_id(), stage(), party(), party())
            .prop_map(|(b, s, l, h)| Transaction::update_stage(b, s, l, h)),
        (batch_id(), party(), party())
            .prop_filter("owners differ", |(_, f, t)| f != t)
            .prop_map(|(b, f, t)| Transaction::transfer_ownership(b, f, t)),
        batch_id().prop_map(Transaction::archive_batch),
    ]
}

fn ledger_of(txs: Vec<Transaction>) -> HashChainLedger {
    let ledger = HashChainLedger::new();
    for tx in txs {
        ledger.append(tx).unwrap();
    }
    ledger
}

proptest! {
    /// Indices are positions, links point backwards, hashes recompute.
    #[test]
    fn appended_chains_hold_invariants(txs in prop::collection::vec(transaction(), 0..24)) {
        let n = txs.len();
        let ledger = ledger_of(txs);
        let chain = ledger.chain();

        prop_assert_eq!(chain.len(), n);
        prop_assert_eq!(ledger.stats().total_blocks, n as u64);
        for (i, block) in chain.iter().enumerate() {
            prop_assert_eq!(block.index, i as u64);
            prop_assert_eq!(block.nonce, 0);
            prop_assert_eq!(&block.compute_hash().unwrap(), &block.hash);
            let expected = if i == 0 { GENESIS_PREVIOUS_HASH } else { chain[i - 1].hash.as_str() };
            prop_assert_eq!(block.previous_hash.as_str(), expected);
        }
        prop_assert_eq!(ledger.verify(), Verification::Valid { total_blocks: n as u64 });
    }

    /// An edited, un-rehashed block is reported as tampered at its own index.
    #[test]
    fn edited_block_is_flagged(
        txs in prop::collection::vec(transaction(), 1..16),
        pick in any::<prop::sample::Index>(),
        replacement in transaction(),
    ) {
        let mut chain = ledger_of(txs).chain();
        let i = pick.index(chain.len());
        prop_assume!(chain[i].transaction != replacement);
        chain[i].transaction = replacement;

        prop_assert_eq!(verify_blocks(&chain), Verification::Tampered { block_index: i as u64 });
    }

    /// An edited and rehashed block breaks the link of its successor.
    #[test]
    fn rehashed_block_breaks_next_link(
        txs in prop::collection::vec(transaction(), 2..16),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut chain = ledger_of(txs).chain();
        let i = pick.index(chain.len() - 1);
        chain[i].nonce = 1;
        chain[i].hash = chain[i].compute_hash().unwrap();

        prop_assert_eq!(
            verify_blocks(&chain),
            Verification::Unlinked { block_index: i as u64 + 1 }
        );
    }

    /// An exported snapshot verifies the same way after a JSON round trip.
    #[test]
    fn exported_snapshot_still_verifies(txs in prop::collection::vec(transaction(), 0..12)) {
        let ledger = ledger_of(txs);
        let json = serde_json::to_string(&ChainSnapshot::from(&ledger)).unwrap();
        let snapshot: ChainSnapshot = serde_json::from_str(&json).unwrap();

        prop_assert!(snapshot.length_matches());
        prop_assert_eq!(verify_blocks(&snapshot.chain), ledger.verify());
    }
}

// ── Exported JSON edits ─────────────────────────────────────────────
//
// An edit to an exported chain must either fail to parse or fail to
// verify. Parsing never normalizes a stored value into one that matches
// its hash again.

fn exported_chain() -> serde_json::Value {
    let id = BatchId::new("COT-001").unwrap();
    let name = |s: &str| PartyName::new(s).unwrap();
    let ledger = ledger_of(vec![
        Transaction::create_batch(id.clone(), name("Ayesha Farms"), Stage::RawCotton, name("Multan"), name("Desi")),
        Transaction::update_stage(id.clone(), Stage::Ginned, name("Multan"), name("Rashid Ginning")),
        Transaction::transfer_ownership(id, name("Ayesha Farms"), name("Lahore Spinners")),
    ]);
    serde_json::to_value(ledger.chain()).unwrap()
}

fn parse(value: serde_json::Value) -> Result<Vec<textrace_ledger::Block>, serde_json::Error> {
    serde_json::from_value(value)
}

#[test]
fn untouched_export_parses_and_verifies() {
    let chain = parse(exported_chain()).unwrap();
    assert_eq!(verify_blocks(&chain), Verification::Valid { total_blocks: 3 });
}

#[test]
fn injected_keys_are_rejected() {
    let mut json = exported_chain();
    json[1]["transaction"]["note"] = "relabelled".into();
    assert!(parse(json).is_err());

    let mut json = exported_chain();
    json[0]["signature"] = "00".into();
    assert!(parse(json).is_err());
}

#[test]
fn submillisecond_timestamp_rewrite_is_rejected() {
    for path in [&["timestamp"][..], &["transaction", "timestamp"][..]] {
        let mut json = exported_chain();
        let mut field = &mut json[1];
        for key in path {
            field = &mut field[*key];
        }
        let rewritten = field.as_str().unwrap().replace('Z', "999Z");
        *field = rewritten.into();
        assert!(parse(json).is_err(), "{path:?}");
    }
}

#[test]
fn padded_names_are_rejected() {
    let mut json = exported_chain();
    json[1]["transaction"]["handler"] = "Rashid Ginning ".into();
    assert!(parse(json).is_err());

    let mut json = exported_chain();
    json[2]["transaction"]["batchId"] = " COT-001".into();
    assert!(parse(json).is_err());
}

#[test]
fn well_formed_content_edit_is_flagged() {
    let mut json = exported_chain();
    json[1]["transaction"]["handler"] = "Someone Else".into();
    let chain = parse(json).unwrap();
    assert_eq!(verify_blocks(&chain), Verification::Tampered { block_index: 1 });
}
