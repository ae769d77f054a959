//! CRUD integration tests for accounts, groups, templates and media
//! against a real PostgreSQL database. Each test runs in an isolated
//! temporary database.

use uuid::Uuid;

use outpost_db::models::AccountStatus;
use outpost_db::queries::groups::NewGroup;
use outpost_db::queries::{accounts, groups, media, templates};
use outpost_test_utils::{create_test_db, drop_test_db};

#[tokio::test]
async fn account_crud_lifecycle() {
    let (pool, db_name) = create_test_db().await;

    let account = accounts::insert_account(&pool, "Main Poster", "100001", Some("chrome-1"), None)
        .await
        .expect("insert should succeed");
    assert_eq!(account.name, "Main Poster");
    assert_eq!(account.status, AccountStatus::Active);
    assert_eq!(account.browser_tag.as_deref(), Some("chrome-1"));

    let fetched = accounts::get_account(&pool, account.id)
        .await
        .expect("get should succeed")
        .expect("account should exist");
    assert_eq!(fetched.fb_id, "100001");

    accounts::update_account_status(&pool, account.id, AccountStatus::Limited)
        .await
        .expect("status update should succeed");
    let fetched = accounts::get_account(&pool, account.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.status, AccountStatus::Limited);

    accounts::delete_account(&pool, account.id)
        .await
        .expect("delete should succeed");
    assert!(accounts::get_account(&pool, account.id)
        .await
        .unwrap()
        .is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn list_active_accounts_filters_and_orders() {
    let (pool, db_name) = create_test_db().await;

    let a = accounts::insert_account(&pool, "A", "1", None, None)
        .await
        .unwrap();
    let b = accounts::insert_account(&pool, "B", "2", None, None)
        .await
        .unwrap();
    let c = accounts::insert_account(&pool, "C", "3", None, None)
        .await
        .unwrap();

    accounts::update_account_status(&pool, b.id, AccountStatus::Banned)
        .await
        .unwrap();

    let active = accounts::list_active_accounts(&pool).await.unwrap();
    let ids: Vec<Uuid> = active.iter().map(|x| x.id).collect();
    assert_eq!(ids, vec![a.id, c.id], "banned account excluded, oldest first");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn group_crud_and_warning_counter() {
    let (pool, db_name) = create_test_db().await;

    let new = NewGroup {
        name: "Lisbon Makers",
        url: "https://facebook.com/groups/lisbon-makers",
        member_count: 3400,
        language: Some("pt"),
        tags: &["maker".to_string(), "local".to_string()],
        owner_account_id: None,
    };
    let group = groups::insert_group(&pool, &new)
        .await
        .expect("insert should succeed");
    assert_eq!(group.member_count, 3400);
    assert_eq!(group.warning_count, 0);
    assert_eq!(group.tags, vec!["maker", "local"]);

    let count = groups::increment_warning_count(&pool, group.id)
        .await
        .expect("increment should succeed");
    assert_eq!(count, 1);
    let count = groups::increment_warning_count(&pool, group.id).await.unwrap();
    assert_eq!(count, 2);

    let listed = groups::list_groups(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].warning_count, 2);

    groups::delete_group(&pool, group.id)
        .await
        .expect("delete should succeed");
    assert!(groups::get_group(&pool, group.id).await.unwrap().is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn template_update_roundtrip() {
    let (pool, db_name) = create_test_db().await;

    let template = templates::insert_template(&pool, "Intro", "Hello there")
        .await
        .expect("insert should succeed");

    templates::update_template(&pool, template.id, "Intro v2", "Hello again")
        .await
        .expect("update should succeed");

    let fetched = templates::get_template(&pool, template.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.title, "Intro v2");
    assert_eq!(fetched.body, "Hello again");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn media_crud_lifecycle() {
    let (pool, db_name) = create_test_db().await;

    let item = media::insert_media(
        &pool,
        "promo.jpg",
        "/var/lib/outpost/media/promo.jpg",
        "file:///var/lib/outpost/media/promo.jpg",
        204800,
        "image/jpeg",
    )
    .await
    .expect("insert should succeed");
    assert_eq!(item.file_name, "promo.jpg");
    assert_eq!(item.size_bytes, 204800);

    let listed = media::list_media(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);

    media::delete_media(&pool, item.id)
        .await
        .expect("delete should succeed");
    assert!(media::list_media(&pool).await.unwrap().is_empty());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn deletes_of_missing_rows_fail() {
    let (pool, db_name) = create_test_db().await;

    let missing = Uuid::new_v4();
    assert!(accounts::delete_account(&pool, missing).await.is_err());
    assert!(groups::delete_group(&pool, missing).await.is_err());
    assert!(groups::increment_warning_count(&pool, missing).await.is_err());
    assert!(templates::delete_template(&pool, missing).await.is_err());
    assert!(media::delete_media(&pool, missing).await.is_err());

    pool.close().await;
    drop_test_db(&db_name).await;
}
