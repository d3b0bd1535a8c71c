mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::anyhow;

use feedbridge::engine::{
    Dispatcher, Lifecycle, ResultRouter, TaskError, TaskExecutor, TaskResult, UiLoop,
};

type TestResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Default)]
struct Recorder {
    events: Vec<String>,
    ui_threads: Vec<thread::ThreadId>,
}

fn setup() -> (UiLoop<Recorder>, TaskExecutor<Recorder>) {
    init_tracing();
    let ui_loop = UiLoop::new(Recorder::default());
    let executor = TaskExecutor::new(ResultRouter::new(Arc::new(ui_loop.dispatcher())));
    (ui_loop, executor)
}

fn record<T: std::fmt::Debug>(ui: &mut Recorder, result: TaskResult<T>) {
    ui.ui_threads.push(thread::current().id());
    ui.events.push(format!("{result:?}"));
}

#[tokio::test]
async fn test_result_is_applied_on_ui_thread() -> TestResult {
    let (mut ui_loop, executor) = setup();
    let lifecycle = Lifecycle::create();

    let handle = executor.submit(&lifecycle.guard(), || Ok(thread::current().id()), |ui, result| {
        let worker = result.expect("work succeeded");
        assert_ne!(worker, thread::current().id());
        record(ui, Ok::<_, TaskError>(()));
    })?;
    assert!(handle.id() > 0);

    with_timeout(ui_loop.run_until(|ui| !ui.events.is_empty())).await;

    assert_eq!(ui_loop.state().ui_threads, vec![thread::current().id()]);
    assert_eq!(ui_loop.state().events, vec!["Ok(())"]);
    Ok(())
}

#[tokio::test]
async fn test_worker_threads_are_named_after_task_id() -> TestResult {
    let (mut ui_loop, executor) = setup();
    let lifecycle = Lifecycle::create();

    let handle = executor.submit(
        &lifecycle.guard(),
        || Ok(thread::current().name().map(str::to_string)),
        |ui, result| ui.events.push(result.ok().flatten().unwrap_or_default()),
    )?;

    with_timeout(ui_loop.run_until(|ui| !ui.events.is_empty())).await;

    assert_eq!(ui_loop.state().events, vec![format!("feedbridge-worker-{}", handle.id())]);
    Ok(())
}

#[tokio::test]
async fn test_error_and_panic_become_task_errors() -> TestResult {
    let (mut ui_loop, executor) = setup();
    let lifecycle = Lifecycle::create();

    executor.submit(
        &lifecycle.guard(),
        || -> anyhow::Result<u32> { Err(anyhow!("disk on fire")) },
        record,
    )?;
    executor.submit(
        &lifecycle.guard(),
        || -> anyhow::Result<u32> { panic!("worker exploded") },
        record,
    )?;

    with_timeout(ui_loop.run_until(|ui| ui.events.len() == 2)).await;

    let events = &ui_loop.state().events;
    assert!(events.contains(&format!("{:?}", Err::<u32, _>(TaskError::Failed("disk on fire".into())))));
    assert!(events.contains(&format!("{:?}", Err::<u32, _>(TaskError::Panicked("worker exploded".into())))));
    Ok(())
}

#[tokio::test]
async fn test_results_arrive_in_completion_order() -> TestResult {
    let (mut ui_loop, executor) = setup();
    let lifecycle = Lifecycle::create();

    executor.submit(
        &lifecycle.guard(),
        || {
            thread::sleep(Duration::from_millis(200));
            Ok("slow")
        },
        |ui, result| ui.events.push(result.unwrap_or("err").to_string()),
    )?;
    executor.submit(
        &lifecycle.guard(),
        || Ok("fast"),
        |ui, result| ui.events.push(result.unwrap_or("err").to_string()),
    )?;

    with_timeout(ui_loop.run_until(|ui| ui.events.len() == 2)).await;

    assert_eq!(ui_loop.state().events, vec!["fast", "slow"]);
    Ok(())
}

#[tokio::test]
async fn test_discarded_result_is_dropped() -> TestResult {
    let (mut ui_loop, executor) = setup();
    let lifecycle = Lifecycle::create();

    let handle = executor.submit(
        &lifecycle.guard(),
        || {
            thread::sleep(Duration::from_millis(50));
            Ok(1)
        },
        record,
    )?;
    handle.discard();
    assert!(handle.is_discarded());

    // The job is posted before the worker exits.
    assert!(tokio::task::spawn_blocking(move || handle.join()).await?);
    assert_eq!(ui_loop.run_pending(), 1);

    assert!(ui_loop.state().events.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_result_for_closed_session_is_dropped() -> TestResult {
    let (mut ui_loop, executor) = setup();
    let lifecycle = Lifecycle::create();

    let handle = executor.submit(
        &lifecycle.guard(),
        || {
            thread::sleep(Duration::from_millis(50));
            Ok(1)
        },
        record,
    )?;
    drop(lifecycle);

    assert!(tokio::task::spawn_blocking(move || handle.join()).await?);
    assert_eq!(ui_loop.run_pending(), 1);

    assert!(ui_loop.state().events.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_ui_loop_keeps_running_while_worker_blocks() -> TestResult {
    let (mut ui_loop, executor) = setup();
    let lifecycle = Lifecycle::create();
    let dispatcher = ui_loop.dispatcher();

    executor.submit(
        &lifecycle.guard(),
        || {
            thread::sleep(Duration::from_millis(200));
            Ok("worker")
        },
        |ui, result| ui.events.push(result.unwrap_or("err").to_string()),
    )?;

    // A UI event posted after the submit is handled before the worker returns.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        dispatcher.post(Box::new(|ui: &mut Recorder| ui.events.push("click".to_string())));
    });

    with_timeout(ui_loop.run_until(|ui| ui.events.len() == 2)).await;

    assert_eq!(ui_loop.state().events, vec!["click", "worker"]);
    Ok(())
}
