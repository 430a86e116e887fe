//! Player registry tests: membership, seeding and elimination.

use tourna_engine::{Error, PlayerRegistry, SqliteDatabase, TournamentManager};

async fn registry() -> PlayerRegistry {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("in-memory database");
    TournamentManager::new(db.clone())
        .create("t1", "First")
        .await
        .unwrap();
    PlayerRegistry::new(db)
}

#[tokio::test]
async fn registration_and_lookup() {
    let registry = registry().await;

    assert!(!registry.is_registered("t1", "alice").await.unwrap());
    registry
        .register("t1", "alice", "Alice", "https://discord.gg/abc")
        .await
        .unwrap();
    assert!(registry.is_registered("t1", "alice").await.unwrap());

    let player = registry.lookup("t1", "alice").await.unwrap();
    assert_eq!(player.discord_username, "Alice");
    assert_eq!(player.invite_link, "https://discord.gg/abc");
    assert_eq!(player.seed_number, None);
    assert!(!player.is_eliminated);
}

#[tokio::test]
async fn lookup_of_unregistered_player_reports_not_found() {
    let registry = registry().await;

    let err = registry.lookup("t1", "ghost").await.unwrap_err();
    assert!(matches!(err, Error::PlayerNotFound { .. }));
}

#[tokio::test]
async fn seed_assignment_overwrites() {
    let registry = registry().await;
    registry
        .register("t1", "alice", "Alice", "https://discord.gg/abc")
        .await
        .unwrap();

    registry.assign_seed("t1", "alice", 5).await.unwrap();
    registry.assign_seed("t1", "alice", 2).await.unwrap();

    let player = registry.lookup("t1", "alice").await.unwrap();
    assert_eq!(player.seed_number, Some(2));
}

#[tokio::test]
async fn seed_for_unregistered_player_reports_not_found() {
    let registry = registry().await;

    let err = registry.assign_seed("t1", "ghost", 1).await.unwrap_err();
    assert!(matches!(err, Error::PlayerNotFound { .. }));
}

#[tokio::test]
async fn elimination_is_one_way() {
    let registry = registry().await;
    registry
        .register("t1", "alice", "Alice", "https://discord.gg/abc")
        .await
        .unwrap();

    registry.eliminate("t1", "alice").await.unwrap();
    registry.eliminate("t1", "alice").await.unwrap();

    assert!(registry.lookup("t1", "alice").await.unwrap().is_eliminated);
}

#[tokio::test]
async fn listing_is_scoped_to_the_tournament() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("in-memory database");
    let manager = TournamentManager::new(db.clone());
    manager.create("t1", "First").await.unwrap();
    manager.create("t2", "Second").await.unwrap();
    let registry = PlayerRegistry::new(db);

    registry
        .register("t1", "alice", "Alice", "https://discord.gg/abc")
        .await
        .unwrap();
    registry
        .register("t2", "bob", "Bob", "https://discord.gg/xyz")
        .await
        .unwrap();

    let players = registry.list_for_tournament("t1").await.unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].discord_user_id, "alice");
}
