//! Integration tests against a live PostgreSQL. Skipped unless
//! `VOTEWEB_TEST_DATABASE_URL` is set.

use std::sync::Arc;

use rand::RngCore;
use voteweb_store::{InnovationStore, InsertOutcome, Ledger, VoteStore};
use voteweb_store_pg::{check_integrity, connect, Migrator, PgLedger, PgOptions};
use voteweb_types::{IdentityToken, NewInnovation, NewVote};

async fn ledger() -> Option<PgLedger> {
    let url = std::env::var("VOTEWEB_TEST_DATABASE_URL").ok()?;
    let pool = connect(&PgOptions::new(url)).await.unwrap();
    Migrator::run(&pool).await.unwrap();
    Some(PgLedger::new(pool))
}

fn random_token() -> IdentityToken {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    IdentityToken::new(bytes)
}

fn unique_group() -> String {
    format!("test-{:016x}", rand::thread_rng().next_u64())
}

#[tokio::test]
async fn migration_is_idempotent_and_schema_is_healthy() {
    let Some(ledger) = ledger().await else { return };
    Migrator::run(ledger.pool()).await.unwrap();
    let report = check_integrity(ledger.pool()).await.unwrap();
    assert!(report.is_healthy(), "{:?}", report.errors);
    ledger.ping().await.unwrap();
}

#[tokio::test]
async fn upsert_keeps_id_and_updates_fields() {
    let Some(ledger) = ledger().await else { return };
    let group = unique_group();

    let first = ledger
        .upsert_innovation(NewInnovation::new(&group, "alpha", "Alpha"))
        .await
        .unwrap();
    let second = ledger
        .upsert_innovation(NewInnovation::new(&group, "alpha", "Alpha Renamed").with_division("Div"))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Alpha Renamed");
    assert_eq!(second.division.as_deref(), Some("Div"));

    let found = ledger.innovation_by_slug(&group, "alpha").await.unwrap().unwrap();
    assert_eq!(found.id, first.id);
    assert!(ledger.innovation_by_slug(&group, "missing").await.unwrap().is_none());
}

#[tokio::test]
async fn second_insert_with_same_token_conflicts() {
    let Some(ledger) = ledger().await else { return };
    let group = unique_group();
    let a = ledger.upsert_innovation(NewInnovation::new(&group, "a", "A")).await.unwrap();
    let b = ledger.upsert_innovation(NewInnovation::new(&group, "b", "B")).await.unwrap();
    let token = random_token();

    let first = ledger.insert_vote(NewVote::new(a.id, token, Some("ua"))).await.unwrap();
    assert!(matches!(first, InsertOutcome::Inserted(_)));

    let second = ledger.insert_vote(NewVote::new(b.id, token, None)).await.unwrap();
    assert_eq!(second, InsertOutcome::Conflict);

    assert!(ledger.has_voted(&token).await.unwrap());
    assert!(ledger.has_voted_for(&a.id, &token).await.unwrap());
    assert!(!ledger.has_voted_for(&b.id, &token).await.unwrap());
    assert_eq!(ledger.voted_innovation(&token).await.unwrap().unwrap().id, a.id);
    assert_eq!(ledger.vote_count(&a.id).await.unwrap(), 1);
    assert_eq!(ledger.vote_count(&b.id).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_store_exactly_one_vote() {
    let Some(ledger) = ledger().await else { return };
    let ledger = Arc::new(ledger);
    let group = unique_group();
    let innovation = ledger
        .upsert_innovation(NewInnovation::new(&group, "race", "Race"))
        .await
        .unwrap();
    let token = random_token();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move {
                ledger
                    .insert_vote(NewVote::new(innovation.id, token, None))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut inserted = 0;
    for handle in handles {
        if matches!(handle.await.unwrap(), InsertOutcome::Inserted(_)) {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1);
    assert_eq!(ledger.vote_count(&innovation.id).await.unwrap(), 1);
}
