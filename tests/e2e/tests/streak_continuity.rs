//! Streak journeys across simulated days: idempotence, extension, resets,
//! and milestone coin rewards firing only on the increasing transition.

use lexquest_e2e_tests::harness::{noon, premium_session, sqlite_completion, stats};
use lexquest_core::{ProfileStore, RewardLedger, LOCAL_USER_ID};

#[tokio::test]
async fn second_session_same_day_does_not_double_count() {
    let (store, completion) = sqlite_completion();

    let first = completion
        .complete_at(stats(10, 8, 50), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(first.current_streak, 1);
    assert!(first.streak_increased);

    let second = completion
        .complete_at(stats(10, 8, 50), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(second.current_streak, 1);
    assert!(!second.streak_increased);

    let profile = store.get_profile().await.unwrap();
    assert_eq!(profile.current_streak, 1);
    // XP still accumulates on repeat days.
    assert_eq!(profile.total_xp, 100);
}

#[tokio::test]
async fn consecutive_days_extend_the_streak() {
    let (store, completion) = sqlite_completion();

    for (day, expected) in [(10, 1), (11, 2), (12, 3)] {
        let result = completion
            .complete_at(stats(10, 8, 50), noon(2026, 3, day))
            .await
            .unwrap();
        assert_eq!(result.current_streak, expected);
        assert!(result.streak_increased);
    }

    let profile = store.get_profile().await.unwrap();
    assert_eq!(profile.current_streak, 3);
    assert_eq!(profile.longest_streak, 3);
    assert_eq!(profile.last_study_date, Some(noon(2026, 3, 12).date_naive()));
}

#[tokio::test]
async fn gap_resets_but_longest_survives() {
    let (store, completion) = sqlite_completion();

    for day in 10..=13 {
        completion
            .complete_at(stats(10, 8, 50), noon(2026, 3, day))
            .await
            .unwrap();
    }

    // Three silent days, then back.
    let result = completion
        .complete_at(stats(10, 8, 50), noon(2026, 3, 17))
        .await
        .unwrap();
    assert_eq!(result.current_streak, 1);
    assert!(result.streak_increased);

    let profile = store.get_profile().await.unwrap();
    assert_eq!(profile.current_streak, 1);
    assert_eq!(profile.longest_streak, 4);
}

#[tokio::test]
async fn seven_day_milestone_pays_once() {
    let (store, completion) = sqlite_completion();
    let completion = completion
        .with_rewards(store.clone())
        .with_user_session(premium_session(LOCAL_USER_ID));

    // Six days already banked, yesterday being the last.
    store
        .update_streak(6, 6, noon(2026, 3, 9).date_naive())
        .await
        .unwrap();

    // Small session so no session-size coins muddy the total.
    let result = completion
        .complete_at(stats(5, 3, 20), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(result.current_streak, 7);
    assert!(result.streak_increased);
    assert_eq!(result.coins_earned, 50);

    // A second session the same day sits at 7 without increasing: no coins.
    let again = completion
        .complete_at(stats(5, 3, 20), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(again.current_streak, 7);
    assert_eq!(again.coins_earned, 0);

    let balance = store.balance(LOCAL_USER_ID).await.unwrap();
    assert_eq!(balance.local_balance, 50);
}

#[tokio::test]
async fn thirty_day_milestone_pays_three_hundred() {
    let (store, completion) = sqlite_completion();
    let completion = completion
        .with_rewards(store.clone())
        .with_user_session(premium_session(LOCAL_USER_ID));

    store
        .update_streak(29, 29, noon(2026, 3, 9).date_naive())
        .await
        .unwrap();

    let result = completion
        .complete_at(stats(5, 3, 20), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(result.current_streak, 30);
    assert_eq!(result.coins_earned, 300);
}

#[tokio::test]
async fn milestone_and_perfect_rewards_compose() {
    let (store, completion) = sqlite_completion();
    let completion = completion
        .with_rewards(store.clone())
        .with_user_session(premium_session(LOCAL_USER_ID));

    store
        .update_streak(6, 6, noon(2026, 3, 9).date_naive())
        .await
        .unwrap();

    // Perfect 20-card session on the day the streak hits 7: all three
    // rewards fire, and the adaptive bonus composes on top.
    let result = completion
        .complete_at(stats(20, 20, 100), noon(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(result.coins_earned, 10 + 25 + 50);
    assert_eq!(result.adaptive_xp_bonus, 25);
}

#[tokio::test]
async fn streak_resumes_counting_after_reset() {
    let (_store, completion) = sqlite_completion();

    completion
        .complete_at(stats(10, 8, 50), noon(2026, 3, 1))
        .await
        .unwrap();
    // Long gap.
    let reset = completion
        .complete_at(stats(10, 8, 50), noon(2026, 3, 20))
        .await
        .unwrap();
    assert_eq!(reset.current_streak, 1);

    let next = completion
        .complete_at(stats(10, 8, 50), noon(2026, 3, 21))
        .await
        .unwrap();
    assert_eq!(next.current_streak, 2);
}
