use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, FriendshipStatus, ParticipantStatus, SplitCmd};
use migration::MigratorTrait;

async fn engine_with_db(users: &[&str]) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in users {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![(*user).into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 20, 0, 0).unwrap()
}

async fn befriend(engine: &Engine, a: &str, b: &str) {
    engine.request_friendship(a, b).await.unwrap();
    engine.accept_friendship(b, a).await.unwrap();
}

fn dinner_for_three() -> SplitCmd {
    SplitCmd::new("alice", 90, utc(2024, 2, 14))
        .share("alice", 30)
        .share("bob", 30)
        .share("carol", 30)
        .description("dinner")
}

#[tokio::test]
async fn friendship_is_symmetric_and_deduplicated() {
    let (engine, _db) = engine_with_db(&["alice", "bob"]).await;

    engine.request_friendship("alice", "bob").await.unwrap();
    assert_eq!(
        engine.friendship_status("alice", "bob").await.unwrap(),
        FriendshipStatus::PendingSent
    );
    assert_eq!(
        engine.friendship_status("bob", "alice").await.unwrap(),
        FriendshipStatus::PendingReceived
    );

    // The reverse request hits the same canonical row.
    let err = engine.request_friendship("bob", "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine.accept_friendship("alice", "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.accept_friendship("bob", "alice").await.unwrap();
    assert_eq!(
        engine.friendship_status("alice", "bob").await.unwrap(),
        FriendshipStatus::Friends
    );
    assert_eq!(
        engine.friendship_status("bob", "alice").await.unwrap(),
        FriendshipStatus::Friends
    );

    let alice_side = engine.list_friends("alice").await.unwrap();
    assert_eq!(alice_side.len(), 1);
    assert_eq!(alice_side[0].username, "bob");
    let bob_side = engine.list_friends("bob").await.unwrap();
    assert_eq!(bob_side[0].username, "alice");

    engine.remove_friendship("bob", "alice").await.unwrap();
    assert_eq!(
        engine.friendship_status("alice", "bob").await.unwrap(),
        FriendshipStatus::NotConnected
    );
}

#[tokio::test]
async fn self_friendship_is_rejected() {
    let (engine, _db) = engine_with_db(&["alice"]).await;
    let err = engine
        .request_friendship("alice", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn split_requires_accepted_friends() {
    let (engine, _db) = engine_with_db(&["alice", "bob", "carol"]).await;
    befriend(&engine, "alice", "bob").await;
    // Carol's request is still pending, which is not enough.
    engine.request_friendship("alice", "carol").await.unwrap();

    let err = engine
        .create_split_expense(dinner_for_three())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.accept_friendship("carol", "alice").await.unwrap();
    engine.create_split_expense(dinner_for_three()).await.unwrap();
}

#[tokio::test]
async fn split_shares_are_validated_on_creation() {
    let (engine, _db) = engine_with_db(&["alice", "bob"]).await;
    befriend(&engine, "alice", "bob").await;

    let err = engine
        .create_split_expense(SplitCmd::new("alice", 90, utc(2024, 2, 14)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_split_expense(
            SplitCmd::new("alice", 90, utc(2024, 2, 14))
                .share("alice", 40)
                .share("bob", 40),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_split_expense(
            SplitCmd::new("alice", 90, utc(2024, 2, 14))
                .share("bob", 45)
                .share("bob", 45),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn creator_share_starts_paid_and_others_pending() {
    let (engine, _db) = engine_with_db(&["alice", "bob", "carol"]).await;
    befriend(&engine, "alice", "bob").await;
    befriend(&engine, "alice", "carol").await;

    let view = engine
        .create_split_expense(dinner_for_three())
        .await
        .unwrap();
    assert_eq!(view.expense.total_amount_minor, 90);
    assert_eq!(view.participants.len(), 3);

    for participant in &view.participants {
        let expected = if participant.user_id == "alice" {
            ParticipantStatus::Paid
        } else {
            ParticipantStatus::Pending
        };
        assert_eq!(participant.status, expected);
    }
}

#[tokio::test]
async fn participant_status_follows_the_state_machine() {
    let (engine, _db) = engine_with_db(&["alice", "bob", "carol"]).await;
    befriend(&engine, "alice", "bob").await;
    befriend(&engine, "alice", "carol").await;
    let view = engine
        .create_split_expense(dinner_for_three())
        .await
        .unwrap();
    let split_id = view.expense.id;

    let share = engine
        .set_participant_status("bob", split_id, "bob", ParticipantStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(share.status, ParticipantStatus::Accepted);

    // Accepted can no longer be declined.
    let err = engine
        .set_participant_status("bob", split_id, "bob", ParticipantStatus::Declined)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));

    let share = engine
        .set_participant_status("bob", split_id, "bob", ParticipantStatus::Paid)
        .await
        .unwrap();
    assert_eq!(share.status, ParticipantStatus::Paid);

    // Paid is terminal.
    let err = engine
        .set_participant_status("bob", split_id, "bob", ParticipantStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));

    engine
        .set_participant_status("carol", split_id, "carol", ParticipantStatus::Declined)
        .await
        .unwrap();
    let err = engine
        .set_participant_status("carol", split_id, "carol", ParticipantStatus::Paid)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));
}

#[tokio::test]
async fn only_the_participant_or_the_creator_may_touch_a_share() {
    let (engine, _db) = engine_with_db(&["alice", "bob", "carol"]).await;
    befriend(&engine, "alice", "bob").await;
    befriend(&engine, "alice", "carol").await;
    let view = engine
        .create_split_expense(dinner_for_three())
        .await
        .unwrap();
    let split_id = view.expense.id;

    // A bystander participant cannot move someone else's share.
    let err = engine
        .set_participant_status("carol", split_id, "bob", ParticipantStatus::Paid)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // The creator may settle another share, but only to Paid.
    let err = engine
        .set_participant_status("alice", split_id, "bob", ParticipantStatus::Declined)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let share = engine
        .set_participant_status("alice", split_id, "bob", ParticipantStatus::Paid)
        .await
        .unwrap();
    assert_eq!(share.status, ParticipantStatus::Paid);
}

#[tokio::test]
async fn split_listing_shows_both_sides() {
    let (engine, _db) = engine_with_db(&["alice", "bob", "carol"]).await;
    befriend(&engine, "alice", "bob").await;

    let view = engine
        .create_split_expense(
            SplitCmd::new("alice", 50, utc(2024, 2, 10))
                .share("alice", 25)
                .share("bob", 25),
        )
        .await
        .unwrap();

    let alice_view = engine.list_split_expenses("alice").await.unwrap();
    assert_eq!(alice_view.len(), 1);
    assert_eq!(alice_view[0].expense.id, view.expense.id);
    assert_eq!(alice_view[0].participants.len(), 2);

    let bob_view = engine.list_split_expenses("bob").await.unwrap();
    assert_eq!(bob_view.len(), 1);

    assert!(engine.list_split_expenses("carol").await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_split_is_creator_only_and_removes_shares() {
    let (engine, _db) = engine_with_db(&["alice", "bob"]).await;
    befriend(&engine, "alice", "bob").await;
    let view = engine
        .create_split_expense(
            SplitCmd::new("alice", 50, utc(2024, 2, 10))
                .share("alice", 25)
                .share("bob", 25),
        )
        .await
        .unwrap();
    let split_id = view.expense.id;

    let err = engine.delete_split_expense("bob", split_id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.delete_split_expense("alice", split_id).await.unwrap();
    assert!(engine.list_split_expenses("bob").await.unwrap().is_empty());

    let err = engine
        .set_participant_status("bob", split_id, "bob", ParticipantStatus::Accepted)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
