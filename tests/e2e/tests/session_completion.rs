//! Session completion journeys: adaptive bonus tiers, reward gating and
//! degradation, sync best-effort semantics, and persistence failure.

use std::sync::Arc;

use lexquest_e2e_tests::harness::{free_session, noon, premium_session, sqlite_completion, stats};
use lexquest_e2e_tests::mocks::{FailingStore, FailingSyncQueue, MockLedger, RecordingSyncQueue};
use lexquest_core::{
    CompletionError, ProfileStore, RewardLedger, SessionCompletion, SessionStore,
    LOCAL_USER_ID,
};

#[tokio::test]
async fn perfect_session_earns_bonus_and_coins() {
    let (store, completion) = sqlite_completion();
    let completion = completion
        .with_rewards(store.clone())
        .with_user_session(premium_session(LOCAL_USER_ID));

    let result = completion
        .complete_at(stats(20, 20, 100), noon(2026, 3, 10))
        .await
        .unwrap();

    // 100% accuracy on 20 cards: 25% tier.
    assert_eq!(result.adaptive_xp_bonus, 25);
    assert_eq!(result.xp_earned, 125);
    assert_eq!(
        result.adaptive_message.as_deref(),
        Some("Excellent accuracy! +25% XP bonus")
    );

    // 10 coins for a 20-card session, 25 for the perfect score.
    assert_eq!(result.coins_earned, 35);
    let balance = store.balance(LOCAL_USER_ID).await.unwrap();
    assert_eq!(balance.local_balance, 35);

    // Mandatory persistence all landed.
    let profile = store.get_profile().await.unwrap();
    assert_eq!(profile.total_xp, 125);
    assert_eq!(profile.current_streak, 1);
    let daily = store
        .daily_stats(noon(2026, 3, 10).date_naive())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(daily.cards_reviewed, 20);
    assert_eq!(daily.xp_earned, 125);
    let sessions = store.recent_sessions(5).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].xp_earned, 125);
}

#[tokio::test]
async fn great_accuracy_hits_fifteen_percent_tier() {
    let (_store, completion) = sqlite_completion();

    // 6/7 = 0.857: above 0.85, below 0.90.
    let result = completion
        .complete_at(stats(7, 6, 40), noon(2026, 3, 10))
        .await
        .unwrap();

    assert_eq!(result.adaptive_xp_bonus, 6);
    assert_eq!(result.xp_earned, 46);
    assert_eq!(
        result.adaptive_message.as_deref(),
        Some("Great accuracy! +15% XP bonus")
    );
}

#[tokio::test]
async fn accuracy_below_thresholds_earns_no_bonus() {
    let (_store, completion) = sqlite_completion();

    // 10/12 = 0.833: below both tiers.
    let result = completion
        .complete_at(stats(12, 10, 60), noon(2026, 3, 10))
        .await
        .unwrap();

    assert_eq!(result.adaptive_xp_bonus, 0);
    assert_eq!(result.xp_earned, 60);
    assert_eq!(result.adaptive_message, None);
}

#[tokio::test]
async fn small_high_accuracy_session_misses_card_minimum() {
    let (_store, completion) = sqlite_completion();

    // 4/4 is perfect but under the 5-card minimum for any bonus.
    let result = completion
        .complete_at(stats(4, 4, 30), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(result.adaptive_xp_bonus, 0);
    assert_eq!(result.adaptive_message, None);
}

#[tokio::test]
async fn empty_session_completes_without_bonus() {
    let (_store, completion) = sqlite_completion();
    let result = completion
        .complete_at(stats(0, 0, 0), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(result.xp_earned, 0);
    assert_eq!(result.adaptive_xp_bonus, 0);
    assert!(result.streak_increased);
}

#[tokio::test]
async fn level_up_is_reported() {
    let (store, completion) = sqlite_completion();
    store.update_xp_and_level(180, 1).await.unwrap();

    // 180 + 52 = 232 crosses the 200 XP threshold for level 2.
    let result = completion
        .complete_at(stats(12, 10, 52), noon(2026, 3, 10))
        .await
        .unwrap();

    assert_eq!(result.new_total_xp, 232);
    assert_eq!(result.new_level, 2);
    assert!(result.leveled_up);
}

#[tokio::test]
async fn free_plan_earns_no_coins() {
    let (store, completion) = sqlite_completion();
    let completion = completion
        .with_rewards(store.clone())
        .with_user_session(free_session(LOCAL_USER_ID));

    let result = completion
        .complete_at(stats(20, 20, 100), noon(2026, 3, 10))
        .await
        .unwrap();

    assert_eq!(result.coins_earned, 0);
    assert_eq!(store.balance(LOCAL_USER_ID).await.unwrap().local_balance, 0);
    // The XP bonus is independent of the premium gate.
    assert_eq!(result.adaptive_xp_bonus, 25);
}

#[tokio::test]
async fn missing_user_session_means_not_premium() {
    let (store, completion) = sqlite_completion();
    let completion = completion.with_rewards(store.clone());

    let result = completion
        .complete_at(stats(20, 20, 100), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(result.coins_earned, 0);
}

#[tokio::test]
async fn reward_failure_does_not_fail_completion() {
    let (_store, completion) = sqlite_completion();
    let completion = completion
        .with_rewards(Arc::new(MockLedger::failing()))
        .with_user_session(premium_session(LOCAL_USER_ID));

    let result = completion
        .complete_at(stats(20, 20, 100), noon(2026, 3, 10))
        .await
        .unwrap();

    assert_eq!(result.coins_earned, 0);
    // Progress still recorded despite the dead ledger.
    assert_eq!(result.xp_earned, 125);
}

#[tokio::test]
async fn partial_reward_failure_keeps_other_rewards() {
    let ledger = Arc::new(MockLedger::failing_source("perfect_quiz"));
    let (_store, completion) = sqlite_completion();
    let completion = completion
        .with_rewards(ledger.clone())
        .with_user_session(premium_session(LOCAL_USER_ID));

    let result = completion
        .complete_at(stats(20, 20, 100), noon(2026, 3, 10))
        .await
        .unwrap();

    // The 10-coin session reward still lands; only the perfect bonus is lost.
    assert_eq!(result.coins_earned, 10);
    let calls = ledger.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].source_type, "srs_review_complete");
    assert_eq!(calls[0].description, "Completed review session (20 cards)");
}

#[tokio::test]
async fn persistence_failure_propagates() {
    let failing = Arc::new(FailingStore);
    let completion = SessionCompletion::new(failing.clone(), failing);

    let err = completion
        .complete_at(stats(10, 9, 50), noon(2026, 3, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Persistence(_)));
}

#[tokio::test]
async fn authenticated_user_session_is_queued_for_sync() {
    let queue = Arc::new(RecordingSyncQueue::new());
    let (store, completion) = sqlite_completion();
    let completion = completion
        .with_user_session(premium_session("user-9"))
        .with_sync_queue(queue.clone());

    let mut session_stats = stats(12, 11, 70);
    session_stats.touched_item_ids = vec![3, 17, 29];
    completion
        .complete_at(session_stats, noon(2026, 3, 10))
        .await
        .unwrap();

    let payloads = queue.payloads();
    assert_eq!(payloads.len(), 1);
    let payload = &payloads[0];
    assert_eq!(payload.user_id, "user-9");
    assert_eq!(payload.touched_item_ids, vec![3, 17, 29]);
    // Profile in the payload reflects this completion's writes.
    assert_eq!(payload.profile.current_streak, 1);
    assert_eq!(
        payload.profile.total_xp,
        i64::from(payload.session.xp_earned)
    );
    assert_eq!(payload.daily_stats.cards_reviewed, 12);

    // Wire shape is camelCase.
    let json = serde_json::to_value(payload).unwrap();
    assert!(json.get("touchedItemIds").is_some());
    assert!(json["profile"].get("totalXp").is_some());

    // Store agrees with what was synced.
    assert_eq!(
        store.get_profile().await.unwrap().total_xp,
        payload.profile.total_xp
    );
}

#[tokio::test]
async fn local_user_is_never_synced() {
    let queue = Arc::new(RecordingSyncQueue::new());
    let (_store, completion) = sqlite_completion();
    let completion = completion
        .with_user_session(premium_session(LOCAL_USER_ID))
        .with_sync_queue(queue.clone());

    completion
        .complete_at(stats(12, 11, 70), noon(2026, 3, 10))
        .await
        .unwrap();
    assert!(queue.payloads().is_empty());
}

#[tokio::test]
async fn sync_failure_is_swallowed() {
    let (_store, completion) = sqlite_completion();
    let completion = completion
        .with_user_session(premium_session("user-9"))
        .with_sync_queue(Arc::new(FailingSyncQueue));

    let result = completion
        .complete_at(stats(12, 10, 70), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(result.xp_earned, 70);
}
