mod test_utils;

use futures::future::join_all;
use learner_core::GenerationParams;
use learner_error::GenerationErrorKind;
use learner_pipeline::{GenerationScheduler, SchedulerOptions};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{Behavior, RecordingGenerator};

fn scheduler_for(generator: Arc<RecordingGenerator>, options: SchedulerOptions) -> GenerationScheduler {
    GenerationScheduler::spawn(generator, GenerationParams::default(), options)
}

#[tokio::test]
async fn test_submission_carries_fixed_generation_parameters() {
    let generator = Arc::new(RecordingGenerator::new(Behavior::Answer("ok".into())));
    let scheduler = scheduler_for(generator.clone(), SchedulerOptions::default());

    let result = scheduler
        .submit("What is a heap?", "A heap is a tree.")
        .await
        .expect("Generation succeeds");
    assert_eq!(result.text(), "ok");

    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query(), "What is a heap?");
    assert_eq!(requests[0].document(), "A heap is a tree.");
    assert_eq!(requests[0].params().stop(), &vec!["Question:", "Answer:"]);
    assert_eq!(*requests[0].params().max_tokens(), 1024);
    assert_eq!(*requests[0].params().temperature(), 0.2);
}

#[tokio::test]
async fn test_concurrent_submissions_run_one_at_a_time_in_order() {
    let generator = Arc::new(RecordingGenerator::new(Behavior::Echo(Duration::from_millis(
        40,
    ))));
    let scheduler = scheduler_for(generator.clone(), SchedulerOptions::default());

    let queries: Vec<String> = (0..5).map(|i| format!("question {i}")).collect();
    let results = join_all(queries.iter().map(|q| scheduler.submit(q, "doc"))).await;

    for (query, result) in queries.iter().zip(&results) {
        let result = result.as_ref().expect("Every submission completes");
        assert_eq!(result.text(), query);
    }
    assert_eq!(generator.max_running(), 1, "Generations must never overlap");

    let served: Vec<String> = generator
        .requests()
        .iter()
        .map(|r| r.query().clone())
        .collect();
    assert_eq!(served, queries, "Submissions are served FIFO");
}

#[tokio::test]
async fn test_failure_releases_the_slot() {
    let generator = Arc::new(
        RecordingGenerator::new(Behavior::Answer("recovered".into())).then(vec![Behavior::Fail]),
    );
    let scheduler = scheduler_for(generator.clone(), SchedulerOptions::default());

    let first = scheduler.submit("q1", "doc").await;
    let err = first.expect_err("First generation fails");
    assert!(matches!(err.kind(), GenerationErrorKind::Failed(_)));

    let second = scheduler.submit("q2", "doc").await.expect("Slot was released");
    assert_eq!(second.text(), "recovered");
}

#[tokio::test]
async fn test_panic_is_reported_and_worker_survives() {
    let generator = Arc::new(
        RecordingGenerator::new(Behavior::Answer("still alive".into())).then(vec![Behavior::Panic]),
    );
    let scheduler = scheduler_for(generator.clone(), SchedulerOptions::default());

    let err = scheduler
        .submit("q1", "doc")
        .await
        .expect_err("Panicking generation fails");
    match err.kind() {
        GenerationErrorKind::Panicked(message) => assert!(message.contains("model exploded")),
        other => panic!("Expected panic error, got {other:?}"),
    }

    let next = scheduler.submit("q2", "doc").await.expect("Worker survives");
    assert_eq!(next.text(), "still alive");
}

#[tokio::test]
async fn test_timeout_fails_the_caller_but_keeps_the_slot_occupied() {
    let generator = Arc::new(
        RecordingGenerator::new(Behavior::Answer("fast".into())).then(vec![Behavior::Slow(
            Duration::from_millis(300),
            "too late".into(),
        )]),
    );
    let options = SchedulerOptions {
        queue_capacity: 8,
        timeout: Some(Duration::from_millis(50)),
    };
    let scheduler = scheduler_for(generator.clone(), options);

    let results = join_all([scheduler.submit("slow", "doc"), scheduler.submit("fast", "doc")]).await;

    let err = results[0].as_ref().expect_err("Slow generation times out");
    assert!(matches!(err.kind(), GenerationErrorKind::TimedOut(_)));
    assert_eq!(results[1].as_ref().expect("Queued job completes").text(), "fast");
    assert_eq!(
        generator.max_running(),
        1,
        "Queued job must wait for the timed-out computation"
    );
}

#[tokio::test]
async fn test_in_flight_reflects_running_generation() {
    let generator = Arc::new(RecordingGenerator::new(Behavior::Slow(
        Duration::from_millis(200),
        "done".into(),
    )));
    let scheduler = Arc::new(scheduler_for(generator, SchedulerOptions::default()));
    assert!(!scheduler.in_flight());

    let submitter = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.submit("q", "doc").await })
    };

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(scheduler.in_flight());

    submitter
        .await
        .expect("Submitter task joins")
        .expect("Generation succeeds");
    assert!(!scheduler.in_flight());
}

#[tokio::test]
async fn test_submit_after_shutdown_is_rejected() {
    let generator = Arc::new(RecordingGenerator::new(Behavior::Answer("ok".into())));
    let scheduler = scheduler_for(generator.clone(), SchedulerOptions::default());

    scheduler.shutdown().await;

    let err = scheduler
        .submit("q", "doc")
        .await
        .expect_err("Worker is gone");
    assert!(matches!(err.kind(), GenerationErrorKind::WorkerUnavailable));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_fifo_order_holds_when_the_queue_is_full() {
    let generator = Arc::new(RecordingGenerator::new(Behavior::Echo(Duration::from_millis(5))));
    let scheduler = scheduler_for(
        generator.clone(),
        SchedulerOptions {
            queue_capacity: 1,
            timeout: None,
        },
    );

    let queries: Vec<String> = (0..8).map(|i| format!("q{i}")).collect();
    let results = join_all(queries.iter().map(|q| scheduler.submit(q, "doc"))).await;

    for (query, result) in queries.iter().zip(results) {
        assert_eq!(result.expect("Generation succeeds").text(), query);
    }
    let served: Vec<String> = generator
        .requests()
        .iter()
        .map(|r| r.query().clone())
        .collect();
    assert_eq!(served, queries);
    assert_eq!(generator.max_running(), 1);
}
