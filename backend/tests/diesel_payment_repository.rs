//! Integration tests for the Diesel adapters against embedded PostgreSQL.
//!
//! Each test gets a temporary database on a throwaway cluster started with
//! `pg-embedded-setup-unpriv`, migrated with the embedded migrations. Set
//! `SKIP_TEST_CLUSTER=1` to skip when the cluster cannot start.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use pg_embedded_setup_unpriv::{TemporaryDatabase, TestCluster};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

use payments_api::domain::ports::{
    PaymentCommand, PaymentPersistenceError, PaymentRepository, UserRepository,
};
use payments_api::domain::{
    ConflictRetryPolicy, ExternalId, NewPayment, NewUser, PaymentOutcome, PaymentRequest,
    PaymentService,
};
use payments_api::outbound::persistence::{
    DbPool, DieselPaymentRepository, DieselUserRepository, PoolConfig,
};

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::test_cluster;
use support::{handle_cluster_setup_failure, migrate_schema};

// Fields drop in order: pool handles, then the runtime driving their
// connections, then the database and the cluster.
struct TestContext {
    payments: Arc<DieselPaymentRepository>,
    users: DieselUserRepository,
    runtime: Runtime,
    _database: TemporaryDatabase,
    _cluster: TestCluster,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let database = cluster
        .temporary_database(format!("payments_{}", Uuid::new_v4().simple()).as_str())
        .map_err(|err| format!("{err:?}"))?;
    migrate_schema(database.url())?;

    let config = PoolConfig::new(database.url()).with_max_size(16);
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        payments: Arc::new(DieselPaymentRepository::new(pool.clone())),
        users: DieselUserRepository::new(pool),
        runtime,
        _database: database,
        _cluster: cluster,
    })
}

#[fixture]
fn db_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn external_id(value: &str) -> ExternalId {
    ExternalId::new(value).expect("valid external id")
}

#[rstest]
fn second_insert_reports_duplicate_external_id(db_context: Option<TestContext>) {
    let Some(context) = db_context else {
        eprintln!("SKIP-TEST-CLUSTER: second_insert_reports_duplicate_external_id skipped");
        return;
    };
    let repo = Arc::clone(&context.payments);

    let (stored, err, found) = context.runtime.block_on(async {
        let stored = repo
            .insert(&NewPayment::new(external_id("abc"), 1000))
            .await
            .expect("first insert");
        let err = repo
            .insert(&NewPayment::new(external_id("abc"), 2000))
            .await
            .expect_err("second insert conflicts");
        let found = repo
            .find_by_external_id(&external_id("abc"))
            .await
            .expect("lookup");
        (stored, err, found)
    });

    assert!(matches!(
        err,
        PaymentPersistenceError::DuplicateExternalId { .. }
    ));
    assert_eq!(found, Some(stored));
    assert_eq!(found.map(|payment| payment.amount()), Some(1000));
}

#[rstest]
fn unknown_external_id_is_absent(db_context: Option<TestContext>) {
    let Some(context) = db_context else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_external_id_is_absent skipped");
        return;
    };
    let repo = Arc::clone(&context.payments);

    let found = context
        .runtime
        .block_on(async { repo.find_by_external_id(&external_id("missing")).await })
        .expect("lookup");

    assert!(found.is_none());
}

#[rstest]
fn concurrent_creates_share_one_row(db_context: Option<TestContext>) {
    const CALLERS: usize = 50;
    let Some(context) = db_context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_creates_share_one_row skipped");
        return;
    };
    let service = PaymentService::new(Arc::clone(&context.payments))
        .with_conflict_retry(ConflictRetryPolicy::new(20, Duration::from_millis(10)));

    let receipts = context.runtime.block_on(async {
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create_payment(PaymentRequest {
                            external_id: "ext-X".to_owned(),
                            amount: 250,
                        })
                        .await
                })
            })
            .collect();

        let mut receipts = Vec::with_capacity(CALLERS);
        for handle in handles {
            receipts.push(
                handle
                    .await
                    .expect("task completes")
                    .expect("every caller succeeds"),
            );
        }
        receipts
    });

    let ids: HashSet<_> = receipts.iter().map(|r| r.payment.id()).collect();
    let created = receipts
        .iter()
        .filter(|r| r.outcome == PaymentOutcome::Created)
        .count();
    let repo = Arc::clone(&context.payments);
    let stored = context
        .runtime
        .block_on(async { repo.find_by_external_id(&external_id("ext-X")).await })
        .expect("lookup")
        .expect("row exists");

    assert_eq!(receipts.len(), CALLERS);
    assert_eq!(ids, HashSet::from([stored.id()]), "all callers see the stored row");
    assert_eq!(created, 1, "exactly one caller creates the row");
}

#[rstest]
fn distinct_external_ids_get_distinct_rows(db_context: Option<TestContext>) {
    let Some(context) = db_context else {
        eprintln!("SKIP-TEST-CLUSTER: distinct_external_ids_get_distinct_rows skipped");
        return;
    };
    let repo = Arc::clone(&context.payments);

    let (one, two) = context.runtime.block_on(async {
        let one = repo
            .insert(&NewPayment::new(external_id("ext-1"), 5))
            .await
            .expect("ext-1 insert");
        let two = repo
            .insert(&NewPayment::new(external_id("ext-2"), 5))
            .await
            .expect("ext-2 insert");
        (one, two)
    });

    assert_ne!(one.id(), two.id());
}

#[rstest]
fn inserted_users_are_listed_in_id_order(db_context: Option<TestContext>) {
    let Some(context) = db_context else {
        eprintln!("SKIP-TEST-CLUSTER: inserted_users_are_listed_in_id_order skipped");
        return;
    };
    let users = &context.users;

    let (ana, bo, listed) = context.runtime.block_on(async {
        let ana = users
            .insert(&NewUser::try_new("Ana", "a@x.com").expect("valid user"))
            .await
            .expect("insert Ana");
        let bo = users
            .insert(&NewUser::try_new("Bo", "b@x.com").expect("valid user"))
            .await
            .expect("insert Bo");
        let listed = users.list().await.expect("list users");
        (ana, bo, listed)
    });

    assert_eq!(listed, vec![ana, bo]);
}
