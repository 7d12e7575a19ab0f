use request_bot::db::{
    self, DbKind, QueueFilter, QueuePatch, Repository, RequestFilter, RequestPatch, SqlRepository,
};
use request_bot::error::ErrorCode;
use request_bot::types::{Queue, QueueType, Request, RequestStatus, User};
use sqlx::AnyPool;
use tempfile::TempDir;

async fn create_test_pool(dir: &TempDir) -> AnyPool {
    sqlx::any::install_default_drivers();
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    let pool = AnyPool::connect(&db_url).await.unwrap();
    db::init_db(&pool, DbKind::Sqlite).await.unwrap();
    pool
}

#[tokio::test]
async fn test_init_db_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let pool = create_test_pool(&dir).await;
    db::init_db(&pool, DbKind::Sqlite).await.unwrap();

    let queues: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queues")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(queues, 0);
}

#[tokio::test]
async fn test_queue_roundtrip() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<Queue>::new(create_test_pool(&dir).await, DbKind::Sqlite);

    let queue = Queue::channel("Design reviews", "U1", "C1");
    repo.create(&queue).await.unwrap();

    let stored = repo.get_by_id(&queue.id).await.unwrap().unwrap();
    assert_eq!(stored, queue);
    assert_eq!(stored.queue_type, QueueType::Channel);
    assert_eq!(stored.channel.as_deref(), Some("C1"));
}

#[tokio::test]
async fn test_queues_without_owner_or_channel_roundtrip() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<Queue>::new(create_test_pool(&dir).await, DbKind::Sqlite);

    let personal = Queue::personal("My Personal Queue", "U1");
    let default = Queue::default_queue("Bugs");
    repo.create(&personal).await.unwrap();
    repo.create(&default).await.unwrap();

    let stored = repo.get_by_id(&personal.id).await.unwrap().unwrap();
    assert_eq!(stored, personal);
    assert_eq!(stored.owner.as_deref(), Some("U1"));
    assert!(stored.channel.is_none());

    let stored = repo.get_by_id(&default.id).await.unwrap().unwrap();
    assert_eq!(stored, default);
    assert!(stored.owner.is_none() && stored.channel.is_none());

    let all = repo.list(&QueueFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_new_request_reads_back_unassigned() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<Request>::new(create_test_pool(&dir).await, DbKind::Sqlite);

    let request = Request::new("q1", "Rotate the staging keys", "U3");
    repo.create(&request).await.unwrap();

    assert_eq!(repo.get_by_id(&request.id).await.unwrap(), Some(request.clone()));
    let listed = repo
        .list(&RequestFilter {
            status: Some(RequestStatus::Idle),
            ..RequestFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(listed, vec![request]);
}

#[tokio::test]
async fn test_queue_filters() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<Queue>::new(create_test_pool(&dir).await, DbKind::Sqlite);

    repo.create(&Queue::channel("One", "U1", "C1")).await.unwrap();
    repo.create(&Queue::channel("Two", "U2", "C1")).await.unwrap();
    repo.create(&Queue::channel("Elsewhere", "U1", "C2")).await.unwrap();
    repo.create(&Queue::personal("Mine", "U1")).await.unwrap();

    let in_c1 = repo
        .list(&QueueFilter {
            queue_type: Some(QueueType::Channel),
            channel: Some("C1".to_string()),
            ..QueueFilter::default()
        })
        .await
        .unwrap();
    let names: Vec<&str> = in_c1.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(in_c1.len(), 2);
    assert!(names.contains(&"One") && names.contains(&"Two"));

    let personal = repo
        .list(&QueueFilter {
            queue_type: Some(QueueType::Personal),
            owner: Some("U1".to_string()),
            ..QueueFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(personal.len(), 1);
    assert_eq!(personal[0].name, "Mine");
    assert!(personal[0].channel.is_none());

    assert_eq!(repo.list(&QueueFilter::default()).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_one_personal_queue_per_owner() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<Queue>::new(create_test_pool(&dir).await, DbKind::Sqlite);

    repo.create(&Queue::personal("Mine", "U1")).await.unwrap();
    let err = repo.create(&Queue::personal("Also mine", "U1")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DataAccess);

    repo.create(&Queue::personal("Theirs", "U2")).await.unwrap();
}

#[tokio::test]
async fn test_queue_update_and_delete() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<Queue>::new(create_test_pool(&dir).await, DbKind::Sqlite);

    let queue = Queue::channel("Old name", "U1", "C1");
    repo.create(&queue).await.unwrap();

    let patch = QueuePatch {
        name: Some("New name".to_string()),
    };
    let updated = repo.update(&queue.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.name, "New name");
    assert!(updated.updated_at >= queue.updated_at);

    assert!(repo.delete(&queue.id).await.unwrap());
    assert!(!repo.delete(&queue.id).await.unwrap());
    assert!(repo.get_by_id(&queue.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_request_lifecycle_has_no_guard() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<Request>::new(create_test_pool(&dir).await, DbKind::Sqlite);

    let request = Request::new("q1", "Need VPN access", "U1");
    repo.create(&request).await.unwrap();
    let stored = repo.get_by_id(&request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Idle);
    assert!(stored.assignee.is_none());

    let accepted = repo
        .update(
            &request.id,
            &RequestPatch {
                status: Some(RequestStatus::InProgress),
                assignee: Some("U2".to_string()),
                ..RequestPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted.status, RequestStatus::InProgress);
    assert_eq!(accepted.assignee.as_deref(), Some("U2"));

    let rejected = repo
        .update(
            &request.id,
            &RequestPatch {
                status: Some(RequestStatus::Rejected),
                ..RequestPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(rejected.assignee.as_deref(), Some("U2"));

    let by_queue = repo
        .list(&RequestFilter {
            queue_id: Some("q1".to_string()),
            ..RequestFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_queue.len(), 1);
}

#[tokio::test]
async fn test_update_missing_row_returns_none() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<Request>::new(create_test_pool(&dir).await, DbKind::Sqlite);

    let patch = RequestPatch {
        status: Some(RequestStatus::Rejected),
        ..RequestPatch::default()
    };
    assert!(repo.update("nope", &patch).await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_roundtrip() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<User>::new(create_test_pool(&dir).await, DbKind::Sqlite);

    let user = User::new("U1", "ada");
    repo.create(&user).await.unwrap();
    assert_eq!(repo.get_by_id("U1").await.unwrap(), Some(user));
    assert!(repo.get_by_id("U2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_seed_default_queues_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let repo = SqlRepository::<Queue>::new(create_test_pool(&dir).await, DbKind::Sqlite);
    let names = vec!["Bugs".to_string(), "Access".to_string(), "  ".to_string()];

    assert_eq!(db::seed_default_queues(&repo, &names).await.unwrap(), 2);
    assert_eq!(db::seed_default_queues(&repo, &names).await.unwrap(), 0);

    let defaults = repo
        .list(&QueueFilter {
            queue_type: Some(QueueType::Default),
            ..QueueFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(defaults.len(), 2);
    assert!(defaults.iter().all(|q| q.owner.is_none()));
}
