mod common;

use common::{RecordingPacer, ScriptedPlaces, StalledPacer, aggregator};
use ogmap_survey::{Stage, SweepError};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::test]
async fn sweep_order_is_category_major_then_result_order() -> Result<(), SweepError> {
    let places = Arc::new(
        ScriptedPlaces::new()
            .hits("gas processing plant Warri, Nigeria", &["w1", "w2"])
            .hits("gas processing plant Lagos, Nigeria", &["l1"])
            .hits("pipeline Lagos, Nigeria", &["p1"])
            .hits("flow station Bonny, Nigeria", &["b2", "b1"]),
    );
    let pacer = Arc::new(RecordingPacer::default());

    let sweep = aggregator(&places, pacer.clone(), Some("key-1")).aggregate().await?;

    let ids: Vec<_> = sweep.facilities.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["l1", "w1", "w2", "b2", "b1", "p1"]);

    let queries = places.queries();
    assert_eq!(queries.len(), 9);
    assert_eq!(queries[0], "gas processing plant Lagos, Nigeria");
    assert_eq!(queries[1], "gas processing plant Warri, Nigeria");
    assert_eq!(queries[3], "flow station Lagos, Nigeria");
    assert_eq!(queries[8], "pipeline Bonny, Nigeria");

    assert_eq!(places.lookups(), vec!["l1", "w1", "w2", "b2", "b1", "p1"]);
    assert_eq!(pacer.delays(), vec![Duration::from_secs(1); 8]);
    Ok(())
}

#[tokio::test]
async fn duplicates_keep_the_first_combination() -> Result<(), SweepError> {
    let places = Arc::new(
        ScriptedPlaces::new()
            .hits("gas processing plant Lagos, Nigeria", &["X", "A"])
            .hits("pipeline Warri, Nigeria", &["B", "X"]),
    );

    let sweep =
        aggregator(&places, Arc::new(RecordingPacer::default()), Some("key")).aggregate().await?;

    let ids: Vec<_> = sweep.facilities.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["X", "A", "B"]);
    assert_eq!(sweep.duplicates, 1);
    assert_eq!(sweep.candidates, 4);

    let x = &sweep.facilities[0];
    assert_eq!(x.category.as_str(), "gas processing plant");
    assert_eq!(x.location.as_str(), "Lagos, Nigeria");
    Ok(())
}

#[tokio::test]
async fn failing_search_only_drops_its_combination() -> Result<(), SweepError> {
    let places = Arc::new(
        ScriptedPlaces::new()
            .hits("flow station Warri, Nigeria", &["fw"])
            .failing_search("flow station Bonny, Nigeria", "UNKNOWN_ERROR")
            .hits("pipeline Lagos, Nigeria", &["pl"]),
    );

    let sweep =
        aggregator(&places, Arc::new(RecordingPacer::default()), Some("key")).aggregate().await?;

    let ids: Vec<_> = sweep.facilities.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["fw", "pl"]);
    assert_eq!(places.queries().len(), 9, "later combinations still run");

    assert_eq!(sweep.failures.len(), 1);
    let failure = &sweep.failures[0];
    assert_eq!(failure.stage, Stage::Search);
    assert_eq!(failure.subject, "flow station Bonny, Nigeria");
    assert!(failure.message.contains("UNKNOWN_ERROR"));
    assert!(!sweep.is_complete());
    Ok(())
}

#[tokio::test]
async fn failing_or_missing_details_drop_only_that_candidate() -> Result<(), SweepError> {
    let places = Arc::new(
        ScriptedPlaces::new()
            .hits("pipeline Warri, Nigeria", &["ok-1", "gone", "broken", "ok-2"])
            .missing("gone")
            .failing_detail("broken", "OVER_QUERY_LIMIT"),
    );

    let sweep =
        aggregator(&places, Arc::new(RecordingPacer::default()), Some("key")).aggregate().await?;

    let ids: Vec<_> = sweep.facilities.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["ok-1", "ok-2"]);
    assert_eq!(sweep.failures.len(), 1);
    assert_eq!(sweep.failures[0].stage, Stage::Detail);
    assert_eq!(sweep.failures[0].subject, "broken");
    Ok(())
}

#[tokio::test]
async fn missing_key_fails_before_any_call() {
    for key in [None, Some(""), Some("   ")] {
        let places = Arc::new(ScriptedPlaces::new().hits("pipeline Lagos, Nigeria", &["p"]));
        let pacer = Arc::new(RecordingPacer::default());

        let result = aggregator(&places, pacer.clone(), key).aggregate().await;

        assert!(matches!(result, Err(SweepError::Configuration { .. })), "key {key:?}");
        assert!(places.queries().is_empty());
        assert!(places.lookups().is_empty());
        assert!(pacer.delays().is_empty());
    }
}

#[tokio::test]
async fn count_matches_unique_facilities() -> Result<(), SweepError> {
    let places = Arc::new(
        ScriptedPlaces::new()
            .hits("gas processing plant Lagos, Nigeria", &["a", "b", "a"])
            .hits("flow station Lagos, Nigeria", &["b", "c"])
            .hits("pipeline Bonny, Nigeria", &["c", "d"]),
    );

    let sweep =
        aggregator(&places, Arc::new(RecordingPacer::default()), Some("key")).aggregate().await?;

    let unique: HashSet<_> = sweep.facilities.iter().map(|f| f.id.clone()).collect();
    assert_eq!(sweep.count(), sweep.facilities.len());
    assert_eq!(unique.len(), sweep.count());
    assert_eq!(sweep.count(), 4);
    assert_eq!(sweep.duplicates, 3);
    Ok(())
}

#[tokio::test]
async fn empty_results_everywhere_is_an_empty_success() -> Result<(), SweepError> {
    let places = Arc::new(ScriptedPlaces::new());

    let sweep =
        aggregator(&places, Arc::new(RecordingPacer::default()), Some("key")).aggregate().await?;

    assert_eq!(sweep.count(), 0);
    assert!(sweep.facilities.is_empty());
    assert!(sweep.is_complete());
    assert_eq!(sweep.combinations, 9);
    assert!(places.lookups().is_empty());
    Ok(())
}

#[tokio::test]
async fn key_is_passed_to_every_call() -> Result<(), SweepError> {
    let places = Arc::new(ScriptedPlaces::new());

    aggregator(&places, Arc::new(RecordingPacer::default()), Some(" trimmed-key "))
        .aggregate()
        .await?;

    let keys = places.keys.lock().expect("lock").clone();
    assert_eq!(keys.len(), 9);
    assert!(keys.iter().all(|k| k == "trimmed-key"));
    Ok(())
}

#[tokio::test]
async fn shutdown_cancels_during_the_pause() {
    let (tx, rx) = watch::channel(false);
    let places =
        Arc::new(ScriptedPlaces::new().shutdown_during("gas processing plant Lagos, Nigeria", tx));

    let result = aggregator(&places, Arc::new(StalledPacer), Some("key")).aggregate_until(rx).await;

    match result {
        Err(SweepError::Cancelled { message, .. }) => {
            assert_eq!(message, "stopped after 1 of 9 combinations");
        }
        other => panic!("expected cancellation, got {other:?}"),
    }
    assert_eq!(places.queries().len(), 1);
}

#[tokio::test]
async fn shutdown_before_start_runs_nothing() {
    let (tx, rx) = watch::channel(true);
    let places = Arc::new(ScriptedPlaces::new());

    let result = aggregator(&places, Arc::new(RecordingPacer::default()), Some("key"))
        .aggregate_until(rx)
        .await;

    assert!(matches!(result, Err(SweepError::Cancelled { .. })));
    assert!(places.queries().is_empty());
    drop(tx);
}

#[tokio::test]
async fn dropped_shutdown_sender_does_not_cancel() -> Result<(), SweepError> {
    let (tx, rx) = watch::channel(false);
    drop(tx);
    let places = Arc::new(ScriptedPlaces::new().hits("pipeline Bonny, Nigeria", &["p"]));
    let pacer = Arc::new(RecordingPacer::default());

    let sweep = aggregator(&places, pacer.clone(), Some("key")).aggregate_until(rx).await?;

    assert_eq!(sweep.count(), 1);
    assert_eq!(pacer.delays().len(), 8);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sweeps_are_serialized() -> Result<(), SweepError> {
    let places = Arc::new(ScriptedPlaces::new());
    let first = aggregator(&places, Arc::new(RecordingPacer::default()), Some("key"));
    let second = first.clone();

    let (a, b) = tokio::join!(first.aggregate(), second.aggregate());
    let (a, b) = (a?, b?);

    assert_ne!(a.run_id, b.run_id);
    assert_eq!(places.queries().len(), 18);
    assert_eq!(places.max_in_flight.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_collaborator_becomes_aggregation_error() {
    let (_tx, rx) = watch::channel(false);
    let places = Arc::new(ScriptedPlaces::new().panicking_on("flow station Lagos, Nigeria"));
    let survey = aggregator(&places, Arc::new(RecordingPacer::default()), Some("key"));

    let first = survey.aggregate_detached(rx.clone()).await;
    assert!(matches!(first, Err(SweepError::Aggregation { .. })));

    // The gate was released by the aborted task, so a second sweep gets to run.
    let second = survey.aggregate_detached(rx).await;
    assert!(matches!(second, Err(SweepError::Aggregation { .. })));
    assert_eq!(places.queries().len(), 8);
}
