//! Repository and transaction behaviour against SQLite, mostly in memory.
//!
//! Set `RUST_LOG=tabula_db=debug` to see the statements each test runs.

use chrono::{DateTime, SubsecRound, Utc};
use tabula_db::{select, DbConfig, DbError, Entity, Field, Registry, Repo, Value};

#[derive(Debug, Clone, PartialEq, Default, sqlx::FromRow)]
struct EntitySample {
    id: String,
    enabled: bool,
    created: DateTime<Utc>,
}

impl Entity for EntitySample {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("id", &self.id),
            Field::new("enabled", self.enabled),
            Field::new("created", &self.created),
        ]
    }

    fn pre_insert(&mut self) {
        self.created = Utc::now().trunc_subsecs(6);
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
struct Unregistered {
    id: String,
}

impl Entity for Unregistered {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn fields(&self) -> Vec<Field> {
        vec![Field::new("id", &self.id)]
    }
}

const SCHEMA: &str = "CREATE TABLE entity_sample (
    id TEXT PRIMARY KEY NOT NULL,
    enabled BOOLEAN NOT NULL,
    created TIMESTAMP NOT NULL
)";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

async fn setup() -> Repo {
    init_tracing();

    let registry = Registry::new().register::<EntitySample>();
    let repo = Repo::new(DbConfig::in_memory(), registry).await.unwrap();
    sqlx::query(SCHEMA).execute(repo.pool()).await.unwrap();
    repo
}

async fn all_samples(repo: &Repo) -> Vec<EntitySample> {
    repo.find(select(["*"]).from("entity_sample").order_by("id"))
        .await
        .unwrap()
}

// =============================================================================
// Create / Get
// =============================================================================

#[tokio::test]
async fn test_create_and_get() {
    let repo = setup().await;

    let mut entity = EntitySample::default();
    repo.create(&mut entity).await.unwrap();
    assert!(!entity.id.is_empty());
    assert_ne!(entity.created, DateTime::<Utc>::default());

    let stored: EntitySample = repo.get_by_id(&entity.id).await.unwrap();
    assert_eq!(stored, entity);
}

#[tokio::test]
async fn test_create_given_id() {
    let repo = setup().await;

    let mut entity = EntitySample {
        id: "given-id".to_string(),
        ..Default::default()
    };
    repo.create(&mut entity).await.unwrap();
    assert_eq!(entity.id, "given-id");

    let stored: EntitySample = repo.get_by_id("given-id").await.unwrap();
    assert_eq!(stored.id, "given-id");

    let mut duplicate = EntitySample {
        id: "given-id".to_string(),
        ..Default::default()
    };
    let err = repo.create(&mut duplicate).await.unwrap_err();
    assert!(err.is_already_exists(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_get_not_found() {
    let repo = setup().await;

    let err = repo
        .get_by_id::<EntitySample>("no-such-id")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, DbError::NotFound));
}

#[tokio::test]
async fn test_update_none() {
    let repo = setup().await;

    let mut entity = EntitySample {
        id: "missing".to_string(),
        ..Default::default()
    };
    let err = repo.update(&mut entity).await.unwrap_err();
    assert!(matches!(err, DbError::UnexpectedUpdateCount(0)));
}

#[tokio::test]
async fn test_update_existing() {
    let repo = setup().await;

    let mut entity = EntitySample::default();
    repo.create(&mut entity).await.unwrap();

    entity.enabled = true;
    repo.update(&mut entity).await.unwrap();

    let stored: EntitySample = repo.get_by_id(&entity.id).await.unwrap();
    assert!(stored.enabled);
}

#[tokio::test]
async fn test_get_count() {
    let repo = setup().await;

    for _ in 0..3 {
        repo.create(&mut EntitySample::default()).await.unwrap();
    }

    let (count,): (i64,) = repo
        .get(select(["count(id)"]).from("entity_sample"))
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_find() {
    let repo = setup().await;

    let mut created = Vec::new();
    for _ in 0..5 {
        let mut entity = EntitySample::default();
        repo.create(&mut entity).await.unwrap();
        created.push(entity);
    }

    let found: Vec<EntitySample> = repo
        .find(select(["*"]).from("entity_sample"))
        .await
        .unwrap();
    assert!(found.len() >= created.len());
    for entity in &created {
        assert!(found.contains(entity), "missing {}", entity.id);
    }
}

#[tokio::test]
async fn test_find_with_predicate() {
    let repo = setup().await;

    let mut on = EntitySample {
        enabled: true,
        ..Default::default()
    };
    repo.create(&mut on).await.unwrap();
    repo.create(&mut EntitySample::default()).await.unwrap();

    let found: Vec<EntitySample> = repo
        .find(select(["*"]).from("entity_sample").where_eq("enabled", true))
        .await
        .unwrap();
    assert_eq!(found, vec![on]);

    let none: Vec<EntitySample> = repo
        .find(select(["*"]).from("entity_sample").where_eq("id", "nope"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

// =============================================================================
// Transactions
// =============================================================================

#[tokio::test]
async fn test_tx_commit() {
    let repo = setup().await;

    let mut entity = EntitySample::default();
    repo.create(&mut entity).await.unwrap();

    let mut tx = repo.begin().await.unwrap();
    let mut in_tx: EntitySample = tx.get_by_id(&entity.id).await.unwrap();
    assert!(!in_tx.enabled);

    in_tx.enabled = true;
    tx.update(&mut in_tx).await.unwrap();

    let reread: EntitySample = tx.get_by_id(&entity.id).await.unwrap();
    assert!(reread.enabled);

    tx.commit().await.unwrap();
    assert!(!tx.is_active());

    let after = all_samples(&repo).await;
    assert_eq!(after.len(), 1);
    assert!(after[0].enabled);
}

#[tokio::test]
async fn test_tx_rollback() {
    let repo = setup().await;

    let mut entity = EntitySample::default();
    repo.create(&mut entity).await.unwrap();

    let mut tx = repo.begin().await.unwrap();
    let mut in_tx: EntitySample = tx.get_by_id(&entity.id).await.unwrap();
    in_tx.enabled = true;
    tx.update(&mut in_tx).await.unwrap();

    let reread: Vec<EntitySample> = tx
        .find(select(["*"]).from("entity_sample"))
        .await
        .unwrap();
    assert!(reread[0].enabled);

    tx.rollback().await.unwrap();

    let after = all_samples(&repo).await;
    assert_eq!(after, vec![entity]);
    assert!(!after[0].enabled);
}

#[tokio::test]
async fn test_tx_create_and_count() {
    let repo = setup().await;

    let mut tx = repo.begin().await.unwrap();
    tx.create(&mut EntitySample::default()).await.unwrap();
    tx.create(&mut EntitySample::default()).await.unwrap();

    let (count,): (i64,) = tx
        .get(select(["count(*)"]).from("entity_sample"))
        .await
        .unwrap();
    assert_eq!(count, 2);
    tx.commit().await.unwrap();

    assert_eq!(all_samples(&repo).await.len(), 2);
}

#[tokio::test]
async fn test_tx_dropped_rolls_back() {
    let repo = setup().await;

    {
        let mut tx = repo.begin().await.unwrap();
        tx.create(&mut EntitySample::default()).await.unwrap();
    }

    assert!(all_samples(&repo).await.is_empty());
}

#[tokio::test]
async fn test_tx_closed_after_commit() {
    let repo = setup().await;

    let mut tx = repo.begin().await.unwrap();
    tx.commit().await.unwrap();

    assert!(matches!(
        tx.commit().await.unwrap_err(),
        DbError::TransactionClosed
    ));
    assert!(matches!(
        tx.rollback().await.unwrap_err(),
        DbError::TransactionClosed
    ));
}

#[tokio::test]
async fn test_tx_closed_after_rollback() {
    let repo = setup().await;

    let mut tx = repo.begin().await.unwrap();
    tx.rollback().await.unwrap();

    let err = tx
        .create(&mut EntitySample::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::TransactionClosed));

    let err = tx
        .find::<EntitySample>(select(["*"]).from("entity_sample"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::TransactionClosed));
}

// =============================================================================
// Failure Classification
// =============================================================================

#[tokio::test]
async fn test_unregistered_type() {
    let repo = setup().await;

    let mut entity = Unregistered { id: String::new() };
    let err = repo.create(&mut entity).await.unwrap_err();
    assert!(matches!(err, DbError::UnknownTable(ref name) if name == "Unregistered"));
    assert!(entity.id.is_empty());

    let err = repo.get_by_id::<Unregistered>("x").await.unwrap_err();
    assert!(matches!(err, DbError::UnknownTable(_)));
}

#[tokio::test]
async fn test_malformed_query() {
    let repo = setup().await;

    let err = repo
        .find::<EntitySample>(select(Vec::<String>::new()).from("entity_sample"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Query(_)));

    let err = repo
        .get::<(i64,)>(
            select(["count(*)"])
                .from("entity_sample")
                .where_raw("enabled = ? AND id = ?", [Value::from(true)]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Query(_)));
}

#[tokio::test]
async fn test_invalid_sql_is_database_error() {
    let repo = setup().await;

    let err = repo
        .find::<EntitySample>(select(["*"]).from("no_such_table"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Database(_)));
}

#[tokio::test]
async fn test_register_as_custom_table() {
    init_tracing();

    let registry = Registry::new().register_as::<EntitySample>("samples");
    let repo = Repo::new(DbConfig::in_memory(), registry).await.unwrap();
    sqlx::query("CREATE TABLE samples (id TEXT PRIMARY KEY NOT NULL, enabled BOOLEAN NOT NULL, created TIMESTAMP NOT NULL)")
        .execute(repo.pool())
        .await
        .unwrap();

    let mut entity = EntitySample::default();
    repo.create(&mut entity).await.unwrap();

    let stored: EntitySample = repo.get_by_id(&entity.id).await.unwrap();
    assert_eq!(stored, entity);
}

#[derive(Debug, Clone, PartialEq, Default, sqlx::FromRow)]
#[sqlx(rename_all = "UPPERCASE")]
struct Shouted {
    id: String,
    enabled: bool,
}

impl Entity for Shouted {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("id", &self.id),
            Field::new("enabled", self.enabled),
        ]
    }
}

#[tokio::test]
async fn test_custom_name_mapper_round_trip() {
    init_tracing();

    fn upper(name: &str) -> String {
        name.to_uppercase()
    }

    let registry = Registry::new().with_name_mapper(upper).register::<Shouted>();
    let repo = Repo::new(DbConfig::in_memory(), registry).await.unwrap();
    sqlx::query("CREATE TABLE SHOUTED (ID TEXT PRIMARY KEY NOT NULL, ENABLED BOOLEAN NOT NULL)")
        .execute(repo.pool())
        .await
        .unwrap();

    let mut entity = Shouted::default();
    repo.create(&mut entity).await.unwrap();

    entity.enabled = true;
    repo.update(&mut entity).await.unwrap();

    let stored: Shouted = repo.get_by_id(&entity.id).await.unwrap();
    assert_eq!(stored, entity);

    let mut tx = repo.begin().await.unwrap();
    entity.enabled = false;
    tx.update(&mut entity).await.unwrap();
    tx.commit().await.unwrap();

    let stored: Shouted = repo.get_by_id(&entity.id).await.unwrap();
    assert!(!stored.enabled);
}

// =============================================================================
// Concurrency & Isolation
// =============================================================================

#[tokio::test]
async fn test_concurrent_creates_share_one_connection() {
    let repo = setup().await;
    assert_eq!(repo.pool().options().get_max_connections(), 1);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move {
                let mut entity = EntitySample::default();
                repo.create(&mut entity).await.map(|_| entity.id)
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);

    let (count,): (i64,) = repo
        .get(select(["count(*)"]).from("entity_sample"))
        .await
        .unwrap();
    assert_eq!(count, 8);
}

#[tokio::test]
async fn test_tx_writes_hidden_until_commit() {
    init_tracing();

    let path = std::env::temp_dir().join(format!("tabula-{}.db", uuid::Uuid::new_v4()));
    let config = DbConfig::new(format!("sqlite://{}", path.display())).max_connections(2);
    let registry = Registry::new().register::<EntitySample>();
    let repo = Repo::new(config, registry).await.unwrap();
    sqlx::query(SCHEMA).execute(repo.pool()).await.unwrap();

    let mut entity = EntitySample::default();
    repo.create(&mut entity).await.unwrap();

    let mut tx = repo.begin().await.unwrap();
    let mut in_tx = entity.clone();
    in_tx.enabled = true;
    tx.update(&mut in_tx).await.unwrap();

    let outside: EntitySample = repo.get_by_id(&entity.id).await.unwrap();
    assert!(!outside.enabled);
    let inside: EntitySample = tx.get_by_id(&entity.id).await.unwrap();
    assert!(inside.enabled);

    tx.commit().await.unwrap();

    let after: EntitySample = repo.get_by_id(&entity.id).await.unwrap();
    assert!(after.enabled);

    repo.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
