//! Integration tests for the page builder repositories.
//!
//! Exercises layouts, blocks, translations and versions against a real
//! database:
//! - Route and block-key uniqueness helpers and constraints
//! - Blocks listed in render order with translations attached
//! - Translation replacement on block update
//! - Cascading deletes from layouts and blocks
//! - Version numbering, published-version protection and retention cleanup
//! - Duplicate and snapshot-restore transactions

use chrono::Utc;
use pagebuilder_core::snapshot::PageSnapshot;
use pagebuilder_db::models::block_translation::NewTranslation;
use pagebuilder_db::models::content_block::{
    BlockOrder, ContentBlockChanges, NewContentBlock,
};
use pagebuilder_db::models::page_layout::{CreatePageLayout, PageLayout, UpdatePageLayout};
use pagebuilder_db::repositories::{
    BlockTranslationRepo, ContentBlockRepo, PageLayoutRepo, PageVersionRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_page(name: &str, route: &str) -> CreatePageLayout {
    CreatePageLayout {
        name: name.to_string(),
        page_type: "landing".to_string(),
        route: route.to_string(),
        title: Some(format!("{name} title")),
        description: None,
        is_active: None,
    }
}

fn new_block(layout_id: i64, key: &str, block_type: &str, order: i32) -> NewContentBlock {
    NewContentBlock {
        layout_id,
        block_type: block_type.to_string(),
        block_key: key.to_string(),
        display_order: order,
        is_visible: true,
        configuration: "{}".to_string(),
    }
}

fn tr(locale: &str, content: &str) -> NewTranslation {
    NewTranslation {
        locale: locale.to_string(),
        content: content.to_string(),
    }
}

async fn page(pool: &PgPool, route: &str) -> PageLayout {
    PageLayoutRepo::create(pool, &new_page("Page", route), Some(1))
        .await
        .unwrap()
}

async fn snapshot_of(pool: &PgPool, layout_id: i64) -> PageSnapshot {
    let layout = PageLayoutRepo::find_by_id(pool, layout_id)
        .await
        .unwrap()
        .unwrap();
    let blocks = ContentBlockRepo::list_with_translations(pool, layout_id)
        .await
        .unwrap();
    PageSnapshot::capture(layout.into(), blocks, Some(1), Utc::now())
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_starts_unpublished_and_active(pool: PgPool) {
    let layout = page(&pool, "/home").await;
    assert!(!layout.is_published);
    assert!(layout.is_active);
    assert_eq!(layout.created_by, Some(1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn route_uniqueness(pool: PgPool) {
    let layout = page(&pool, "/test").await;

    assert!(PageLayoutRepo::route_exists(&pool, "/test", None).await.unwrap());
    assert!(!PageLayoutRepo::route_exists(&pool, "/test", Some(layout.id))
        .await
        .unwrap());
    assert!(!PageLayoutRepo::route_exists(&pool, "/other", None).await.unwrap());

    // The constraint backs up the pre-check.
    let err = PageLayoutRepo::create(&pool, &new_page("Again", "/test"), None)
        .await
        .unwrap_err();
    let constraint = err
        .as_database_error()
        .and_then(|e| e.constraint())
        .map(str::to_string);
    assert_eq!(constraint.as_deref(), Some("uq_page_layouts_route"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_keeps_other_fields(pool: PgPool) {
    let layout = page(&pool, "/about").await;
    let updated = PageLayoutRepo::update(
        &pool,
        layout.id,
        &UpdatePageLayout {
            name: Some("About us".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "About us");
    assert_eq!(updated.route, "/about");
    assert_eq!(updated.title, layout.title);

    assert!(PageLayoutRepo::update(&pool, 999_999, &UpdatePageLayout::default())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn published_lookup_requires_active_and_published(pool: PgPool) {
    let layout = page(&pool, "/news").await;
    assert!(PageLayoutRepo::find_published_by_route(&pool, "/news")
        .await
        .unwrap()
        .is_none());

    PageLayoutRepo::publish(&pool, layout.id).await.unwrap();
    assert!(PageLayoutRepo::find_published_by_route(&pool, "/news")
        .await
        .unwrap()
        .is_some());

    PageLayoutRepo::update(
        &pool,
        layout.id,
        &UpdatePageLayout {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(PageLayoutRepo::find_published_by_route(&pool, "/news")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_layout_cascades(pool: PgPool) {
    let layout = page(&pool, "/gone").await;
    let block = ContentBlockRepo::create(
        &pool,
        &new_block(layout.id, "hero-1", "hero", 0),
        &[tr("en", r#"{"title":"A"}"#)],
    )
    .await
    .unwrap();
    PageVersionRepo::create(&pool, layout.id, "{}", false, None)
        .await
        .unwrap();

    assert!(PageLayoutRepo::delete(&pool, layout.id).await.unwrap());

    assert!(ContentBlockRepo::find_by_id(&pool, block.id).await.unwrap().is_none());
    assert!(BlockTranslationRepo::list_by_block(&pool, block.id)
        .await
        .unwrap()
        .is_empty());
    assert!(PageVersionRepo::list_by_layout(&pool, layout.id)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn block_key_unique_per_layout(pool: PgPool) {
    let a = page(&pool, "/a").await;
    let b = page(&pool, "/b").await;

    let first = ContentBlockRepo::create(&pool, &new_block(a.id, "hero-1", "hero", 0), &[])
        .await
        .unwrap();
    assert!(ContentBlockRepo::key_exists(&pool, a.id, "hero-1", None).await.unwrap());
    assert!(!ContentBlockRepo::key_exists(&pool, a.id, "hero-1", Some(first.id))
        .await
        .unwrap());

    // Same key on another layout is fine.
    ContentBlockRepo::create(&pool, &new_block(b.id, "hero-1", "hero", 0), &[])
        .await
        .unwrap();

    let err = ContentBlockRepo::create(&pool, &new_block(a.id, "hero-1", "text", 1), &[])
        .await
        .unwrap_err();
    let constraint = err
        .as_database_error()
        .and_then(|e| e.constraint())
        .map(str::to_string);
    assert_eq!(constraint.as_deref(), Some("uq_content_blocks_layout_key"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blocks_listed_in_order_with_translations(pool: PgPool) {
    let layout = page(&pool, "/ordered").await;
    ContentBlockRepo::create(
        &pool,
        &new_block(layout.id, "second", "text", 5),
        &[tr("ms", r#"{"body":"B"}"#), tr("en", r#"{"body":"A"}"#)],
    )
    .await
    .unwrap();
    ContentBlockRepo::create(&pool, &new_block(layout.id, "first", "hero", 1), &[])
        .await
        .unwrap();

    let blocks = ContentBlockRepo::list_with_translations(&pool, layout.id)
        .await
        .unwrap();
    let keys: Vec<&str> = blocks.iter().map(|b| b.block_key.as_str()).collect();
    assert_eq!(keys, ["first", "second"]);
    assert!(blocks[0].translations.is_empty());
    let locales: Vec<&str> = blocks[1]
        .translations
        .iter()
        .map(|t| t.locale.as_str())
        .collect();
    assert_eq!(locales, ["en", "ms"]);

    // Reading twice gives the same result.
    let again = ContentBlockRepo::list_with_translations(&pool, layout.id)
        .await
        .unwrap();
    assert_eq!(again, blocks);

    assert_eq!(
        ContentBlockRepo::max_display_order(&pool, layout.id).await.unwrap(),
        Some(5)
    );
    assert_eq!(
        ContentBlockRepo::count_by_type(&pool, layout.id, "hero").await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn max_display_order_empty_layout(pool: PgPool) {
    let layout = page(&pool, "/empty").await;
    assert_eq!(
        ContentBlockRepo::max_display_order(&pool, layout.id).await.unwrap(),
        None
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_replaces_translations(pool: PgPool) {
    let layout = page(&pool, "/replace").await;
    let block = ContentBlockRepo::create(
        &pool,
        &new_block(layout.id, "intro", "text", 0),
        &[tr("en", r#"{"body":"A"}"#), tr("ms", r#"{"body":"B"}"#)],
    )
    .await
    .unwrap();

    let updated = ContentBlockRepo::update(
        &pool,
        block.id,
        &ContentBlockChanges {
            configuration: Some(r#"{"width":"wide"}"#.into()),
            ..Default::default()
        },
        Some(&[tr("en", r#"{"body":"C"}"#)][..]),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.configuration, r#"{"width":"wide"}"#);
    assert_eq!(updated.block_key, "intro");

    let translations = BlockTranslationRepo::list_by_block(&pool, block.id)
        .await
        .unwrap();
    assert_eq!(translations.len(), 1);
    assert_eq!(translations[0].locale, "en");
    assert_eq!(translations[0].content, r#"{"body":"C"}"#);

    // Without a translation set the existing rows stay.
    ContentBlockRepo::update(
        &pool,
        block.id,
        &ContentBlockChanges {
            is_visible: Some(false),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();
    assert!(BlockTranslationRepo::find(&pool, block.id, "en")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn toggle_reorder_and_delete(pool: PgPool) {
    let layout = page(&pool, "/misc").await;
    let a = ContentBlockRepo::create(&pool, &new_block(layout.id, "a", "text", 0), &[])
        .await
        .unwrap();
    let b = ContentBlockRepo::create(
        &pool,
        &new_block(layout.id, "b", "text", 1),
        &[tr("en", "{}")],
    )
    .await
    .unwrap();

    let toggled = ContentBlockRepo::toggle_visibility(&pool, a.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!toggled.is_visible);

    ContentBlockRepo::reorder(
        &pool,
        layout.id,
        &[
            BlockOrder { id: a.id, display_order: 1 },
            BlockOrder { id: b.id, display_order: 0 },
        ],
    )
    .await
    .unwrap();
    let keys: Vec<String> = ContentBlockRepo::list_by_layout(&pool, layout.id)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.block_key)
        .collect();
    assert_eq!(keys, ["b", "a"]);

    let mut ids = ContentBlockRepo::ids_for_layout(&pool, layout.id).await.unwrap();
    ids.sort();
    assert_eq!(ids, vec![a.id, b.id]);

    assert!(ContentBlockRepo::delete(&pool, b.id).await.unwrap());
    assert!(!ContentBlockRepo::delete(&pool, b.id).await.unwrap());
    assert!(BlockTranslationRepo::list_by_block(&pool, b.id)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn version_numbers_increase_per_layout(pool: PgPool) {
    let a = page(&pool, "/va").await;
    let b = page(&pool, "/vb").await;

    assert_eq!(PageVersionRepo::latest_version_number(&pool, a.id).await.unwrap(), 0);

    for expected in 1..=3 {
        let v = PageVersionRepo::create(&pool, a.id, "{}", false, None)
            .await
            .unwrap();
        assert_eq!(v.version_number, expected);
    }
    let other = PageVersionRepo::create(&pool, b.id, "{}", false, None)
        .await
        .unwrap();
    assert_eq!(other.version_number, 1);

    let numbers: Vec<i32> = PageVersionRepo::list_by_layout(&pool, a.id)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.version_number)
        .collect();
    assert_eq!(numbers, [3, 2, 1]);

    // Gaps left by deleted versions are never refilled.
    let middle = PageVersionRepo::list_by_layout(&pool, a.id).await.unwrap()[1].clone();
    assert!(PageVersionRepo::delete_unpublished(&pool, middle.id).await.unwrap());
    let next = PageVersionRepo::create(&pool, a.id, "{}", false, None)
        .await
        .unwrap();
    assert_eq!(next.version_number, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_head_version_number_is_not_reused(pool: PgPool) {
    let layout = page(&pool, "/head").await;
    PageVersionRepo::create(&pool, layout.id, "{}", false, None)
        .await
        .unwrap();
    let head = PageVersionRepo::create(&pool, layout.id, "{}", false, None)
        .await
        .unwrap();
    assert_eq!(head.version_number, 2);

    assert!(PageVersionRepo::delete_unpublished(&pool, head.id).await.unwrap());
    assert_eq!(PageVersionRepo::latest_version_number(&pool, layout.id).await.unwrap(), 1);

    let next = PageVersionRepo::create(&pool, layout.id, "{}", false, None)
        .await
        .unwrap();
    assert_eq!(next.version_number, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn published_versions_are_protected(pool: PgPool) {
    let layout = page(&pool, "/protected").await;
    let published = PageVersionRepo::create(&pool, layout.id, "{}", true, None)
        .await
        .unwrap();

    assert!(!PageVersionRepo::delete_unpublished(&pool, published.id)
        .await
        .unwrap());
    assert!(PageVersionRepo::find_by_id(&pool, published.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cleanup_removes_only_old_unpublished(pool: PgPool) {
    let layout = page(&pool, "/cleanup").await;
    let old_draft = PageVersionRepo::create(&pool, layout.id, "{}", false, None)
        .await
        .unwrap();
    let old_published = PageVersionRepo::create(&pool, layout.id, "{}", true, None)
        .await
        .unwrap();
    let recent = PageVersionRepo::create(&pool, layout.id, "{}", false, None)
        .await
        .unwrap();

    sqlx::query("UPDATE page_versions SET created_at = NOW() - INTERVAL '40 days' WHERE id = ANY($1)")
        .bind(vec![old_draft.id, old_published.id])
        .execute(&pool)
        .await
        .unwrap();

    let cutoff = Utc::now() - chrono::Duration::days(30);
    let removed = PageVersionRepo::delete_unpublished_before(&pool, layout.id, cutoff)
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let remaining: Vec<i64> = PageVersionRepo::list_by_layout(&pool, layout.id)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(remaining, vec![recent.id, old_published.id]);
}

// ---------------------------------------------------------------------------
// Whole-page transactions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_copies_blocks_and_translations(pool: PgPool) {
    let source = page(&pool, "/source").await;
    PageLayoutRepo::publish(&pool, source.id).await.unwrap();
    ContentBlockRepo::create(
        &pool,
        &new_block(source.id, "hero-1", "hero", 0),
        &[tr("en", r#"{"title":"A"}"#), tr("ms", r#"{"title":"B"}"#)],
    )
    .await
    .unwrap();
    PageVersionRepo::create(&pool, source.id, "{}", true, None)
        .await
        .unwrap();
    let source = PageLayoutRepo::find_by_id(&pool, source.id).await.unwrap().unwrap();

    let copy = PageLayoutRepo::duplicate(&pool, &source, "/copy", "Copy of Page", Some(2))
        .await
        .unwrap();
    assert_ne!(copy.id, source.id);
    assert_eq!(copy.route, "/copy");
    assert_eq!(copy.name, "Copy of Page");
    assert!(!copy.is_published);
    assert_eq!(copy.created_by, Some(2));

    let original = ContentBlockRepo::list_with_translations(&pool, source.id)
        .await
        .unwrap();
    let copied = ContentBlockRepo::list_with_translations(&pool, copy.id)
        .await
        .unwrap();
    assert_eq!(copied.len(), 1);
    assert_ne!(copied[0].id, original[0].id);
    assert_eq!(copied[0].block_key, "hero-1");
    let contents: Vec<&str> = copied[0]
        .translations
        .iter()
        .map(|t| t.content.as_str())
        .collect();
    assert_eq!(contents, [r#"{"title":"A"}"#, r#"{"title":"B"}"#]);

    assert!(PageVersionRepo::list_by_layout(&pool, copy.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_to_taken_route_rolls_back(pool: PgPool) {
    let source = page(&pool, "/one").await;
    page(&pool, "/two").await;

    assert!(PageLayoutRepo::duplicate(&pool, &source, "/two", "Dup", None)
        .await
        .is_err());
    assert_eq!(PageLayoutRepo::list(&pool).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn restore_snapshot_reproduces_captured_state(pool: PgPool) {
    let layout = page(&pool, "/restore").await;
    let raw = r#"{"title":"A","subtitle":"ünïcode \"quoted\""}"#;
    ContentBlockRepo::create(
        &pool,
        &new_block(layout.id, "hero-1", "hero", 0),
        &[tr("en", raw)],
    )
    .await
    .unwrap();
    let captured = snapshot_of(&pool, layout.id).await;

    // Drift away from the captured state.
    PageLayoutRepo::update(
        &pool,
        layout.id,
        &UpdatePageLayout {
            name: Some("Changed".into()),
            route: Some("/moved".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    ContentBlockRepo::create(&pool, &new_block(layout.id, "extra", "text", 1), &[])
        .await
        .unwrap();

    let restored = PageLayoutRepo::restore_snapshot(&pool, layout.id, &captured)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restored.name, captured.layout.name);
    // Route is not part of the restore.
    assert_eq!(restored.route, "/moved");

    let blocks = ContentBlockRepo::list_with_translations(&pool, layout.id)
        .await
        .unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].block_key, "hero-1");
    assert_eq!(blocks[0].translations[0].content, raw);

    assert!(PageLayoutRepo::restore_snapshot(&pool, 999_999, &captured)
        .await
        .unwrap()
        .is_none());
}
