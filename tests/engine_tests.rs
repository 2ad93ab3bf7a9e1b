//! End-to-end runs of the voting engine against the synthetic backend.

mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use votepilot::adapter::outbound::synthetic::{Operation, SyntheticBackend, SyntheticConfig};
use votepilot::application::orchestration::{
    Cancellation, ExposureTarget, FailureKind, Pacing, RunOutcome, VotingEngine,
};
use votepilot::application::settings::SettingsStore;
use votepilot::domain::{BoostState, Contest, ContestId, SettingKey, Token};
use votepilot::port::{ContestBackend, Event};
use votepilot::testkit::clock::FixedClock;
use votepilot::testkit::domain::{contest, items};
use votepilot::testkit::notifier::RecordingNotifier;

use support::backend::{Call, RecordingBackend};

const NOW: i64 = 1_750_000_000;

fn synthetic(contests: Vec<Contest>) -> SyntheticBackend {
    let clock = Arc::new(FixedClock::new(NOW));
    let mut backend = SyntheticBackend::new(
        SyntheticConfig {
            seed: Some(11),
            ..SyntheticConfig::default()
        },
        clock,
    );
    for c in &contests {
        backend = backend.with_vote_pool(&c.id, items(c.id.as_str(), &[30.0, 40.0, 50.0]));
    }
    backend.with_contests(contests)
}

fn engine(
    backend: Arc<dyn ContestBackend>,
    settings: SettingsStore,
    notifier: &RecordingNotifier,
) -> VotingEngine {
    VotingEngine::new(backend, Arc::new(settings))
        .with_clock(Arc::new(FixedClock::new(NOW)))
        .with_notifier(Arc::new(notifier.clone()))
        .with_pacing(Pacing::none())
}

fn token() -> Token {
    Token::new("session")
}

fn summary(outcome: &RunOutcome) -> votepilot::domain::RunSummary {
    *outcome.summary().expect("run produced a summary")
}

#[tokio::test]
async fn boosts_and_votes_a_contest_below_target() {
    let c1 = contest("c1", NOW).exposure(50.0).boost_in(600).build();
    let backend = Arc::new(synthetic(vec![c1.clone()]));
    let mut settings = SettingsStore::new();
    settings.set_global(SettingKey::BoostLeadTime, 3_600.0).unwrap();
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend.clone(), settings, &notifier)
        .run(&token(), &ExposureTarget::default())
        .await;

    assert!(outcome.success(), "{}", outcome.message());
    let summary = summary(&outcome);
    assert_eq!(summary.contests_seen, 1);
    assert_eq!(summary.contests_processed, 1);
    assert_eq!(summary.boosts_applied, 1);
    assert_eq!(summary.vote_batches, 1);
    assert!(summary.votes_cast >= 1);
    assert_eq!(summary.contests_skipped, 0);

    assert_eq!(notifier.count(|e| matches!(e, Event::BoostApplied { .. })), 1);
    assert_eq!(notifier.count(|e| matches!(e, Event::VotesSubmitted(_))), 1);
    assert!(matches!(notifier.events().first(), Some(Event::RunStarted { contests: 1, .. })));
    assert!(matches!(notifier.last(), Some(Event::RunCompleted(_))));

    let after = backend.contest(&c1.id).unwrap();
    assert_eq!(after.boost, BoostState::Used);
    assert!(after.entries[0].boosted);
    assert!(after.exposure_factor >= 100.0);
}

#[tokio::test]
async fn votes_are_tagged_with_the_exposure_target() {
    let c1 = contest("c1", NOW).exposure(10.0).build();
    let backend = Arc::new(synthetic(vec![c1]));
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend, SettingsStore::new(), &notifier)
        .run(&token(), &ExposureTarget::Fixed(60.0))
        .await;

    assert!(outcome.success());
    let votes = notifier
        .events()
        .into_iter()
        .find_map(|event| match event {
            Event::VotesSubmitted(vote) => Some(vote),
            _ => None,
        })
        .expect("votes submitted");
    assert_eq!(votes.exposure_target, 60.0);
    assert_eq!(votes.exposure_before, 10.0);
    assert!(votes.exposure_projected >= 60.0);
}

#[tokio::test]
async fn cancellation_stops_before_the_next_contest() {
    let c1 = contest("c1", NOW).exposure(10.0).build();
    let c2 = contest("c2", NOW).exposure(10.0).boost_in(60).build();
    let inner = Arc::new(synthetic(vec![c1.clone(), c2.clone()]));
    let backend = Arc::new(RecordingBackend::new(inner));
    let notifier = RecordingNotifier::new();
    let engine = engine(backend.clone(), SettingsStore::new(), &notifier);
    backend.cancel_after_submit(&c1.id, engine.cancellation().clone());

    let outcome = engine.run(&token(), &ExposureTarget::default()).await;

    assert!(outcome.is_cancelled());
    let summary = summary(&outcome);
    assert_eq!(summary.vote_batches, 1);
    assert_eq!(summary.contests_processed, 1);
    assert!(backend.calls_for(&c2.id).is_empty());
    assert!(matches!(notifier.last(), Some(Event::RunCancelled(_))));
}

#[tokio::test]
async fn cancelled_before_start_touches_nothing() {
    let backend = Arc::new(RecordingBackend::new(Arc::new(synthetic(vec![]))));
    let notifier = RecordingNotifier::new();
    let cancel = Cancellation::new();
    cancel.cancel();
    let engine = engine(backend.clone(), SettingsStore::new(), &notifier).with_cancellation(cancel);

    let outcome = engine.run(&token(), &ExposureTarget::default()).await;

    assert!(outcome.is_cancelled());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn cancellation_interrupts_pacing() {
    let c1 = contest("c1", NOW).exposure(100.0).build();
    let c2 = contest("c2", NOW).exposure(10.0).build();
    let backend = Arc::new(RecordingBackend::new(Arc::new(synthetic(vec![c1, c2.clone()]))));
    let notifier = RecordingNotifier::new();
    let engine = engine(backend.clone(), SettingsStore::new(), &notifier).with_pacing(
        Pacing::new(Duration::from_secs(30), Duration::from_secs(30)),
    );

    let cancel = engine.cancellation().clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let started = Instant::now();
    let outcome = engine.run(&token(), &ExposureTarget::default()).await;

    assert!(outcome.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(summary(&outcome).contests_processed, 1);
    assert!(backend.calls_for(&c2.id).is_empty());
}

#[tokio::test]
async fn contest_failure_does_not_stop_the_run() {
    let contests = vec![
        contest("c1", NOW).exposure(10.0).build(),
        contest("c2", NOW).exposure(10.0).build(),
        contest("c3", NOW).exposure(10.0).build(),
    ];
    let backend = Arc::new(synthetic(contests));
    backend.fail_on(&ContestId::from("c2"), Operation::FetchVotableItems);
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend, SettingsStore::new(), &notifier)
        .run(&token(), &ExposureTarget::default())
        .await;

    assert!(outcome.success(), "{}", outcome.message());
    let summary = summary(&outcome);
    assert_eq!(summary.contests_processed, 3);
    assert_eq!(summary.contests_failed, 1);
    assert_eq!(summary.vote_batches, 2);
    assert_eq!(
        notifier.count(|e| matches!(
            e,
            Event::ContestFailed { contest_id, .. } if contest_id.as_str() == "c2"
        )),
        1
    );
}

#[tokio::test]
async fn boost_failure_still_votes() {
    let c1 = contest("c1", NOW).exposure(10.0).boost_in(60).build();
    let backend = Arc::new(synthetic(vec![c1.clone()]));
    backend.fail_on(&c1.id, Operation::ApplyBoost);
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend, SettingsStore::new(), &notifier)
        .run(&token(), &ExposureTarget::default())
        .await;

    assert!(outcome.success());
    let summary = summary(&outcome);
    assert_eq!(summary.boosts_applied, 0);
    assert_eq!(summary.vote_batches, 1);
    assert_eq!(summary.contests_skipped, 1);
    assert_eq!(notifier.count(|e| matches!(e, Event::BoostFailed { .. })), 1);
}

#[tokio::test]
async fn listing_failure_fails_the_run() {
    let backend = Arc::new(synthetic(vec![contest("c1", NOW).build()]));
    backend.fail_listing(true);
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend, SettingsStore::new(), &notifier)
        .run(&token(), &ExposureTarget::default())
        .await;

    assert!(matches!(
        outcome,
        RunOutcome::Failed {
            kind: FailureKind::Listing,
            ..
        }
    ));
    assert!(outcome.summary().is_none());
    assert_eq!(notifier.count(|e| matches!(e, Event::RunStarted { .. })), 0);
    assert!(matches!(notifier.last(), Some(Event::RunFailed { .. })));
}

#[tokio::test]
async fn auth_failure_fails_the_run() {
    let backend = Arc::new(synthetic(vec![contest("c1", NOW).build()]));
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend, SettingsStore::new(), &notifier)
        .run(&Token::new(""), &ExposureTarget::default())
        .await;

    assert!(outcome.is_auth_failure(), "{outcome:?}");
    let RunOutcome::Failed { error, .. } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(error.contains("authentication"), "{error}");
}

#[tokio::test]
async fn empty_vote_pool_is_skipped() {
    let c1 = contest("c1", NOW).exposure(10.0).build();
    let backend = Arc::new(synthetic(vec![c1.clone()]).with_vote_pool(&c1.id, vec![]));
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend, SettingsStore::new(), &notifier)
        .run(&token(), &ExposureTarget::default())
        .await;

    assert!(outcome.success());
    let summary = summary(&outcome);
    assert_eq!(summary.vote_batches, 0);
    assert_eq!(summary.contests_skipped, 1);
    assert_eq!(notifier.count(|e| matches!(e, Event::VotingSkipped { .. })), 1);
}

#[tokio::test]
async fn only_boost_override_never_fetches_items() {
    let c1 = contest("c1", NOW).exposure(10.0).build();
    let c2 = contest("c2", NOW).exposure(10.0).build();
    let backend = Arc::new(RecordingBackend::new(Arc::new(synthetic(vec![
        c1.clone(),
        c2.clone(),
    ]))));
    let mut settings = SettingsStore::new();
    settings.set_override(&c1.id, SettingKey::OnlyBoost, true).unwrap();
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend.clone(), settings, &notifier)
        .run(&token(), &ExposureTarget::default())
        .await;

    assert!(outcome.success());
    assert!(backend.calls_for(&c1.id).is_empty());
    assert_eq!(
        backend.calls_for(&c2.id),
        vec![Call::Fetch(c2.id.clone()), Call::Submit(c2.id.clone())]
    );
}

#[tokio::test]
async fn contest_that_has_not_opened_is_left_alone() {
    let c1 = contest("c1", NOW)
        .title("Blue hour")
        .exposure(10.0)
        .starts_in(600)
        .build();
    let backend = Arc::new(RecordingBackend::new(Arc::new(synthetic(vec![c1.clone()]))));
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend.clone(), SettingsStore::new(), &notifier)
        .run(&token(), &ExposureTarget::default())
        .await;

    assert!(outcome.success());
    assert_eq!(summary(&outcome).contests_processed, 1);
    assert!(backend.calls_for(&c1.id).is_empty());
    let evaluated = notifier
        .events()
        .into_iter()
        .find_map(|event| match event {
            Event::ContestEvaluated(e) => Some(e),
            _ => None,
        })
        .expect("contest evaluated");
    assert_eq!(evaluated.title, "Blue hour");
    assert!(!evaluated.decision.should_vote);
}

#[tokio::test]
async fn final_window_setting_defers_voting_until_close() {
    let early = contest("early", NOW).exposure(10.0).closes_in(7_200).build();
    let closing = contest("closing", NOW).exposure(10.0).closes_in(1_800).build();
    let backend = Arc::new(RecordingBackend::new(Arc::new(synthetic(vec![
        early.clone(),
        closing.clone(),
    ]))));
    let mut settings = SettingsStore::new();
    settings
        .set_global(SettingKey::VoteOnlyInFinalWindow, true)
        .unwrap();
    settings
        .set_global(SettingKey::FinalWindowThreshold, 3_600.0)
        .unwrap();
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend.clone(), settings, &notifier)
        .run(&token(), &ExposureTarget::default())
        .await;

    assert!(outcome.success());
    assert!(backend.calls_for(&early.id).is_empty());
    assert_eq!(
        backend.calls_for(&closing.id),
        vec![Call::Fetch(closing.id.clone()), Call::Submit(closing.id.clone())]
    );
    assert_eq!(summary(&outcome).vote_batches, 1);
}

#[tokio::test]
async fn fixed_target_below_exposure_skips_voting() {
    let c1 = contest("c1", NOW).exposure(50.0).build();
    let backend = Arc::new(RecordingBackend::new(Arc::new(synthetic(vec![c1]))));
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend.clone(), SettingsStore::new(), &notifier)
        .run(&token(), &ExposureTarget::Fixed(40.0))
        .await;

    assert!(outcome.success());
    assert_eq!(backend.calls(), vec![Call::List]);
}

#[tokio::test]
async fn per_contest_target_is_computed_by_the_caller() {
    let c1 = contest("c1", NOW).exposure(50.0).build();
    let c2 = contest("c2", NOW).exposure(50.0).build();
    let backend = Arc::new(RecordingBackend::new(Arc::new(synthetic(vec![
        c1.clone(),
        c2.clone(),
    ]))));
    let notifier = RecordingNotifier::new();
    let target = ExposureTarget::per_contest(|c| if c.id.as_str() == "c1" { 90.0 } else { 20.0 });

    let outcome = engine(backend.clone(), SettingsStore::new(), &notifier)
        .run(&token(), &target)
        .await;

    assert!(outcome.success());
    assert_eq!(backend.calls_for(&c1.id).len(), 2);
    assert!(backend.calls_for(&c2.id).is_empty());
}

#[tokio::test]
async fn invalid_target_override_fails_the_run() {
    let backend = Arc::new(synthetic(vec![contest("c1", NOW).build()]));
    let notifier = RecordingNotifier::new();

    let outcome = engine(backend, SettingsStore::new(), &notifier)
        .run(&token(), &ExposureTarget::Fixed(150.0))
        .await;

    let RunOutcome::Failed { kind, error } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(kind, FailureKind::Config);
    assert!(error.contains("exposure_target"), "{error}");
}

#[tokio::test]
async fn overlapping_run_is_refused() {
    let c1 = contest("c1", NOW).exposure(100.0).build();
    let backend = Arc::new(RecordingBackend::new(Arc::new(synthetic(vec![c1]))));
    backend.hold_listing();
    let notifier = RecordingNotifier::new();
    let engine = Arc::new(engine(backend.clone(), SettingsStore::new(), &notifier));

    let first = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.run(&token(), &ExposureTarget::default()).await }
    });
    backend.listing_started().await;

    let second = engine.run(&token(), &ExposureTarget::default()).await;
    assert_eq!(
        second,
        RunOutcome::Failed {
            kind: FailureKind::Busy,
            error: "run already in progress".to_string()
        }
    );

    backend.release_listing();
    let first = first.await.unwrap();
    assert!(first.success());
    assert_eq!(backend.calls().iter().filter(|c| **c == Call::List).count(), 1);

    // The guard is released once the first run ends.
    assert!(engine.run(&token(), &ExposureTarget::default()).await.success());
}
