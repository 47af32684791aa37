mod common;

use chrono::{Duration, Utc};
use common::{Harness, harness, register};
use mealsync::ActorContext;
use mealsync::EngineError;
use mealsync::model::{CommentPatch, MealEvent, MenuItem, NewComment, NewMealEvent, NewMenuItem, Role};

async fn seed_event(harness: &Harness, admin: &ActorContext, name: &str) -> MealEvent {
    harness
        .events
        .create_event(
            NewMealEvent {
                name: name.to_string(),
                description: None,
                event_date: Utc::now() + Duration::days(3),
                event_duration_minutes: 0,
                cutoff_time: Utc::now() + Duration::days(2),
            },
            admin,
        )
        .await
        .expect("create event")
}

async fn seed_item(harness: &Harness, admin: &ActorContext) -> MenuItem {
    harness
        .catalog
        .create_menu_item(
            NewMenuItem {
                name: "Ramen".to_string(),
                description: None,
                category: Some("mains".to_string()),
                price_cents: 1_200,
                image_url: None,
                is_available: true,
            },
            admin,
        )
        .await
        .expect("create menu item")
}

fn comment_on(event_id: u64, item_id: u64, text: &str) -> NewComment {
    NewComment {
        meal_event_id: event_id,
        menu_item_id: item_id,
        comment: text.to_string(),
        rating: 4,
        parent_id: None,
    }
}

#[tokio::test]
async fn threads_split_top_level_from_replies() {
    let harness = harness();
    let (_, admin) = register(&harness, "admin@example.com", Role::Admin).await;
    let (_, alice) = register(&harness, "alice@example.com", Role::Employee).await;
    let (_, bob) = register(&harness, "bob@example.com", Role::Employee).await;
    let event = seed_event(&harness, &admin, "Team dinner").await;
    let item = seed_item(&harness, &admin).await;

    let parent = harness
        .comments
        .create_comment(comment_on(event.id, item.id, "Great broth"), &alice)
        .await
        .expect("parent comment");
    let reply = harness
        .comments
        .create_comment(
            NewComment {
                parent_id: Some(parent.id),
                ..comment_on(event.id, item.id, "Agreed, very rich")
            },
            &bob,
        )
        .await
        .expect("reply");

    let top_level = harness
        .comments
        .list_comments(event.id)
        .await
        .expect("list comments");
    assert_eq!(top_level.len(), 1);
    assert_eq!(top_level[0].id, parent.id);

    let replies = harness
        .comments
        .list_replies(parent.id)
        .await
        .expect("list replies");
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, reply.id);
    assert_eq!(replies[0].user_id, bob.user_id);
}

#[tokio::test]
async fn replies_stay_inside_their_event() {
    let harness = harness();
    let (_, admin) = register(&harness, "admin@example.com", Role::Admin).await;
    let (_, alice) = register(&harness, "alice@example.com", Role::Employee).await;
    let event_a = seed_event(&harness, &admin, "Monday lunch").await;
    let event_b = seed_event(&harness, &admin, "Friday lunch").await;
    let item = seed_item(&harness, &admin).await;

    let parent = harness
        .comments
        .create_comment(comment_on(event_a.id, item.id, "Solid choice"), &alice)
        .await
        .expect("parent comment");

    let err = harness
        .comments
        .create_comment(
            NewComment {
                parent_id: Some(parent.id),
                ..comment_on(event_b.id, item.id, "Replying from elsewhere")
            },
            &alice,
        )
        .await
        .expect_err("cross-event reply");
    assert!(matches!(err, EngineError::Validation(ref msg) if msg.contains("parent")));

    let err = harness
        .comments
        .create_comment(
            NewComment {
                parent_id: Some(9_999),
                ..comment_on(event_a.id, item.id, "Replying to nothing")
            },
            &alice,
        )
        .await
        .expect_err("missing parent");
    assert!(matches!(err, EngineError::Validation(ref msg) if msg.contains("parent")));
}

#[tokio::test]
async fn content_is_validated() {
    let harness = harness();
    let (_, admin) = register(&harness, "admin@example.com", Role::Admin).await;
    let (_, alice) = register(&harness, "alice@example.com", Role::Employee).await;
    let event = seed_event(&harness, &admin, "Team dinner").await;
    let item = seed_item(&harness, &admin).await;

    let err = harness
        .comments
        .create_comment(comment_on(event.id, item.id, "   "), &alice)
        .await
        .expect_err("blank text");
    assert!(matches!(err, EngineError::Validation(_)));

    let mut overrated = comment_on(event.id, item.id, "Off the scale");
    overrated.rating = 6;
    let err = harness
        .comments
        .create_comment(overrated, &alice)
        .await
        .expect_err("rating above range");
    assert!(matches!(err, EngineError::Validation(ref msg) if msg.contains("rating")));

    let err = harness
        .comments
        .create_comment(comment_on(event.id, 9_999, "No such dish"), &alice)
        .await
        .expect_err("unknown menu item");
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = harness
        .comments
        .create_comment(comment_on(9_999, item.id, "No such event"), &alice)
        .await
        .expect_err("unknown event");
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn edits_are_author_only_even_for_admins() {
    let harness = harness();
    let (_, admin) = register(&harness, "admin@example.com", Role::Admin).await;
    let (_, alice) = register(&harness, "alice@example.com", Role::Employee).await;
    let (_, bob) = register(&harness, "bob@example.com", Role::Employee).await;
    let event = seed_event(&harness, &admin, "Team dinner").await;
    let item = seed_item(&harness, &admin).await;

    let comment = harness
        .comments
        .create_comment(comment_on(event.id, item.id, "Too salty"), &alice)
        .await
        .expect("comment");

    let revision = CommentPatch {
        comment: Some("Actually fine after a second taste".to_string()),
        rating: Some(5),
    };
    let err = harness
        .comments
        .update_comment(comment.id, revision.clone(), &bob)
        .await
        .expect_err("foreign edit");
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = harness
        .comments
        .update_comment(comment.id, revision.clone(), &admin)
        .await
        .expect_err("admin edit");
    assert!(matches!(err, EngineError::Forbidden(_)));

    let updated = harness
        .comments
        .update_comment(comment.id, revision, &alice)
        .await
        .expect("author edit");
    assert_eq!(updated.rating, 5);

    let err = harness
        .comments
        .delete_comment(comment.id, &admin)
        .await
        .expect_err("admin delete");
    assert!(matches!(err, EngineError::Forbidden(_)));
    harness
        .comments
        .delete_comment(comment.id, &alice)
        .await
        .expect("author delete");
}

#[tokio::test]
async fn replies_survive_parent_deletion() {
    let harness = harness();
    let (_, admin) = register(&harness, "admin@example.com", Role::Admin).await;
    let (_, alice) = register(&harness, "alice@example.com", Role::Employee).await;
    let (_, bob) = register(&harness, "bob@example.com", Role::Employee).await;
    let event = seed_event(&harness, &admin, "Team dinner").await;
    let item = seed_item(&harness, &admin).await;

    let parent = harness
        .comments
        .create_comment(comment_on(event.id, item.id, "Portion too small"), &alice)
        .await
        .expect("parent");
    let reply = harness
        .comments
        .create_comment(
            NewComment {
                parent_id: Some(parent.id),
                ..comment_on(event.id, item.id, "Ask for a double")
            },
            &bob,
        )
        .await
        .expect("reply");

    harness
        .comments
        .delete_comment(parent.id, &alice)
        .await
        .expect("delete parent");

    let top_level = harness
        .comments
        .list_comments(event.id)
        .await
        .expect("list comments");
    assert!(top_level.is_empty());

    let replies = harness
        .comments
        .list_replies(parent.id)
        .await
        .expect("list replies");
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, reply.id);
}

#[tokio::test]
async fn commenting_ignores_the_cutoff() {
    let harness = harness();
    let (_, admin) = register(&harness, "admin@example.com", Role::Admin).await;
    let (_, alice) = register(&harness, "alice@example.com", Role::Employee).await;
    let item = seed_item(&harness, &admin).await;
    let frozen = harness
        .events
        .create_event(
            NewMealEvent {
                name: "Signup closed".to_string(),
                description: None,
                event_date: Utc::now() + Duration::hours(2),
                event_duration_minutes: 0,
                cutoff_time: Utc::now() - Duration::hours(1),
            },
            &admin,
        )
        .await
        .expect("frozen event");

    harness
        .comments
        .create_comment(comment_on(frozen.id, item.id, "Looking forward to it"), &alice)
        .await
        .expect("comment after cutoff");
}

#[tokio::test]
async fn user_feed_and_recent_listing() {
    let harness = harness();
    let (_, admin) = register(&harness, "admin@example.com", Role::Admin).await;
    let (_, alice) = register(&harness, "alice@example.com", Role::Employee).await;
    let event = seed_event(&harness, &admin, "Team dinner").await;
    let item = seed_item(&harness, &admin).await;

    for n in 0..12 {
        harness
            .comments
            .create_comment(comment_on(event.id, item.id, &format!("note {n}")), &alice)
            .await
            .expect("comment");
    }

    let feed = harness
        .comments
        .user_comments(alice.user_id)
        .await
        .expect("user feed");
    assert_eq!(feed.len(), 12);
    assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    // The default cap keeps the recent listing at ten entries.
    let recent = harness
        .comments
        .recent_comments(None)
        .await
        .expect("recent default");
    assert_eq!(recent.len(), 10);
    let recent = harness
        .comments
        .recent_comments(Some(3))
        .await
        .expect("recent capped");
    assert_eq!(recent.len(), 3);
}
