//! Integration tests for a full game driven through the manager and actor handles.

use bingo_engine::{
    ClaimSource, GameConfig, GameError, GameHandle, GameManager, MemoryStore, Stage,
};
use std::sync::Arc;

async fn new_game(config: GameConfig) -> (GameManager, GameHandle) {
    let manager = GameManager::new(Arc::new(MemoryStore::new()));
    let game = manager.create_game(config).await.unwrap();
    let handle = manager.handle(game.game_id()).await.unwrap();
    (manager, handle)
}

/// Call every number on a row of the card that are not called yet
async fn call_row(handle: &GameHandle, card_id: &str, row: usize) {
    let snapshot = handle.snapshot();
    let numbers = snapshot.card(card_id).unwrap().numbers[row].clone();
    for n in numbers {
        if !handle.snapshot().is_called(n) {
            handle.call(n).await.unwrap();
        }
    }
}

#[tokio::test]
async fn test_card_limit_leaves_state_untouched() {
    let (_manager, handle) = new_game(GameConfig {
        price: 50,
        max_cards_per_player: 2,
        ..GameConfig::default()
    })
    .await;

    let cards = handle.buy("alice", 2).await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(handle.snapshot().pot(), 100);

    let err = handle.buy("alice", 1).await.unwrap_err();
    assert!(matches!(err, GameError::LimitExceeded { .. }));

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.owner_card_count("alice"), 2);
    assert_eq!(snapshot.pot(), 100);
}

#[tokio::test]
async fn test_row_claim_then_duplicate() {
    let (_manager, handle) = new_game(GameConfig::default()).await;
    let card = handle.buy("alice", 1).await.unwrap().remove(0);
    handle.start().await.unwrap();

    call_row(&handle, &card.card_id, 2).await;

    let eval = handle.snapshot().evaluate(&card.card_id).unwrap();
    assert!(eval.satisfies(Stage::Single));

    let claim = handle
        .submit_claim(&card.card_id, "alice", ClaimSource::Public)
        .await
        .unwrap();
    assert!(claim.is_pending());
    assert_eq!(claim.stage, Stage::Single);

    assert_eq!(
        handle
            .submit_claim(&card.card_id, "alice", ClaimSource::Public)
            .await,
        Err(GameError::DuplicatePending)
    );
}

#[tokio::test]
async fn test_stage_progression() {
    let (_manager, handle) = new_game(GameConfig::default()).await;

    assert_eq!(handle.advance_stage().await, Err(GameError::NotStarted));
    assert_eq!(handle.start().await, Ok(Stage::Single));
    assert_eq!(handle.start().await, Err(GameError::AlreadyStarted));
    assert_eq!(handle.advance_stage().await, Ok(Stage::Double));
    assert_eq!(handle.advance_stage().await, Ok(Stage::Full));
    assert_eq!(handle.advance_stage().await, Ok(Stage::Ended));

    let snapshot = handle.snapshot();
    assert!(!snapshot.is_active());
    assert_eq!(handle.roll().await, Err(GameError::GameClosed));
    assert_eq!(handle.buy("late", 1).await.unwrap_err(), GameError::GameClosed);
}

#[tokio::test]
async fn test_full_game_with_payouts() {
    let (manager, handle) = new_game(GameConfig {
        price: 60,
        ..GameConfig::default()
    })
    .await;

    let alice = handle.buy("alice", 1).await.unwrap().remove(0);
    handle.buy("bob", 2).await.unwrap();
    handle.start().await.unwrap();

    // Single: one line
    call_row(&handle, &alice.card_id, 0).await;
    handle
        .submit_claim(&alice.card_id, "alice", ClaimSource::Public)
        .await
        .unwrap();
    let decision = handle.approve_claim(&alice.card_id).await.unwrap();
    assert!(decision.changed);
    handle.advance_stage().await.unwrap();

    // Double: a second line on the same card
    call_row(&handle, &alice.card_id, 1).await;
    handle
        .submit_claim(&alice.card_id, "alice", ClaimSource::Admin)
        .await
        .unwrap();
    handle.approve_claim(&alice.card_id).await.unwrap();
    handle.advance_stage().await.unwrap();

    // Full: the rest of the card
    for row in 2..5 {
        call_row(&handle, &alice.card_id, row).await;
    }
    handle
        .submit_claim(&alice.card_id, "alice", ClaimSource::Public)
        .await
        .unwrap();
    handle.approve_claim(&alice.card_id).await.unwrap();
    assert!(handle.end().await.unwrap());
    assert!(!handle.end().await.unwrap());

    let snapshot = manager.snapshot(handle.game_id()).await.unwrap();
    assert_eq!(snapshot.pot(), 180);
    assert_eq!(snapshot.claims().len(), 3);
    assert!(snapshot.claims().iter().all(|c| c.is_approved()));

    let payouts = snapshot.payouts();
    assert_eq!(payouts.single + payouts.double + payouts.full, 180);

    let projection = snapshot.projection();
    assert!(!projection.active);
    assert_eq!(projection.stats.cards, 3);
    assert_eq!(projection.stats.players, 2);
}

#[tokio::test]
async fn test_denied_claim_is_kept_as_history() {
    let (_manager, handle) = new_game(GameConfig::default()).await;
    let card = handle.buy("alice", 1).await.unwrap().remove(0);
    handle.start().await.unwrap();
    call_row(&handle, &card.card_id, 3).await;

    handle
        .submit_claim(&card.card_id, "alice", ClaimSource::Public)
        .await
        .unwrap();
    assert!(handle.deny_claim(&card.card_id).await.unwrap().changed);

    let decision = handle.approve_claim(&card.card_id).await.unwrap();
    assert!(!decision.changed);
    assert!(decision.claim.is_denied());

    let info = handle.snapshot().info();
    assert_eq!(info.claims.len(), 1);
    assert!(info.claims[0].denied);
}

#[tokio::test]
async fn test_owner_token_resolves_cards() {
    let (manager, handle) = new_game(GameConfig::default()).await;
    handle.buy("alice", 3).await.unwrap();
    handle.buy("bob", 1).await.unwrap();

    let token = handle
        .snapshot()
        .owners()
        .get("alice")
        .unwrap()
        .token
        .clone();

    let (found, owner) = manager.find_owner_by_token(&token).await.unwrap();
    let view = found.snapshot().owner_view(&owner);
    assert_eq!(view.owner, "alice");
    assert_eq!(view.cards.len(), 3);
}

#[tokio::test]
async fn test_late_purchases_when_allowed() {
    let (_manager, handle) = new_game(GameConfig {
        allow_late_purchases: true,
        ..GameConfig::default()
    })
    .await;
    handle.start().await.unwrap();
    assert_eq!(handle.buy("carol", 1).await.unwrap().len(), 1);

    let (_manager, strict) = new_game(GameConfig::default()).await;
    strict.start().await.unwrap();
    assert_eq!(strict.buy("carol", 1).await.unwrap_err(), GameError::GameClosed);
}

#[tokio::test]
async fn test_list_and_delete_games() {
    let manager = GameManager::new(Arc::new(MemoryStore::new()));
    let first = manager
        .create_game(GameConfig {
            title: "First".to_string(),
            ..GameConfig::default()
        })
        .await
        .unwrap();
    manager
        .create_game(GameConfig {
            title: "Second".to_string(),
            ..GameConfig::default()
        })
        .await
        .unwrap();

    assert_eq!(manager.list_games().await.len(), 2);
    assert_eq!(manager.active_game_count().await, 2);

    manager.delete_game(first.game_id()).await.unwrap();
    let listed = manager.list_games().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Second");
    assert_eq!(
        manager.snapshot(first.game_id()).await.err(),
        Some(GameError::GameNotFound(first.game_id().to_string()))
    );
}
