//! Headless Bevy integration tests.
//!
//! These tests verify the pipeline, marker and polling systems work without a GPU.

mod common;

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use common::{events, hanging_fetch, headless_app, resolved_fetch};
use meteor_globe::error::FetchError;
use meteor_globe::notice::NoticeKind;
use meteor_globe::pipeline::{
    FetchReason, FetchRequested, MeteorPipeline, PendingFetch, PipelinePlugin, QueryControls,
    poll_fetches,
};
use meteor_globe::polling::{PollingPlugin, RealtimePoller};
use meteor_globe::query::{CustomRangeInput, TimeRange};
use meteor_globe::render::MeteorMarker;
use meteor_globe::render::markers::{ArcPaths, sync_markers};
use meteor_globe::settings::ViewerSettings;
use meteor_globe::ui::controls::change_range;

/// App with the fetch-completion and marker systems but no networking.
fn marker_app() -> App {
    let mut app = headless_app();
    app.init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .init_resource::<MeteorPipeline>()
        .init_resource::<ArcPaths>()
        .add_systems(Update, (poll_fetches, sync_markers).chain());
    app
}

fn marker_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&MeteorMarker>().iter(world).count()
}

fn pending_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&PendingFetch>().iter(world).count()
}

/// Run frames until no fetch is pending.
fn settle(app: &mut App) {
    for _ in 0..200 {
        app.update();
        if pending_count(app) == 0 {
            // One more frame so despawn and marker commands are applied.
            app.update();
            return;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    panic!("fetch task never completed");
}

fn start_fetch(app: &mut App, result: Result<Vec<meteor_globe::meteor::MeteorEvent>, FetchError>) {
    let token = app.world_mut().resource_mut::<MeteorPipeline>().begin();
    app.world_mut().spawn(PendingFetch::new(token, resolved_fetch(result)));
}

#[test]
fn test_completed_fetch_spawns_markers() {
    let mut app = marker_app();
    start_fetch(&mut app, Ok(events(3)));
    settle(&mut app);

    assert_eq!(marker_count(&mut app), 3);
    assert_eq!(app.world().resource::<ArcPaths>().paths.len(), 3);
    assert!(!app.world().resource::<MeteorPipeline>().is_loading());
}

#[test]
fn test_new_dataset_replaces_markers() {
    let mut app = marker_app();
    start_fetch(&mut app, Ok(events(4)));
    settle(&mut app);
    assert_eq!(marker_count(&mut app), 4);

    start_fetch(&mut app, Ok(events(2)));
    settle(&mut app);
    assert_eq!(marker_count(&mut app), 2);
}

#[test]
fn test_empty_result_removes_markers_and_notifies() {
    let mut app = marker_app();
    start_fetch(&mut app, Ok(events(2)));
    settle(&mut app);

    start_fetch(&mut app, Ok(Vec::new()));
    settle(&mut app);

    assert_eq!(marker_count(&mut app), 0);
    let pipeline = app.world().resource::<MeteorPipeline>();
    assert_eq!(pipeline.notice().map(|n| n.kind), Some(NoticeKind::NoData));
}

#[test]
fn test_failed_fetch_keeps_markers() {
    let mut app = marker_app();
    start_fetch(&mut app, Ok(events(3)));
    settle(&mut app);

    start_fetch(
        &mut app,
        Err(FetchError::Server {
            status: 400,
            message: Some("bad range".to_string()),
        }),
    );
    settle(&mut app);

    assert_eq!(marker_count(&mut app), 3);
    let pipeline = app.world().resource::<MeteorPipeline>();
    assert_eq!(pipeline.notice().map(|n| n.message.as_str()), Some("bad range"));
}

#[test]
fn test_stale_fetch_is_ignored() {
    let mut app = marker_app();
    let stale = app.world_mut().resource_mut::<MeteorPipeline>().begin();
    // A newer request supersedes the first before it returns.
    app.world_mut().resource_mut::<MeteorPipeline>().begin();
    app.world_mut().spawn(PendingFetch::new(stale, resolved_fetch(Ok(events(5)))));
    settle(&mut app);

    assert_eq!(marker_count(&mut app), 0);
    assert!(app.world().resource::<MeteorPipeline>().is_loading());
}

#[test]
fn test_invalid_custom_range_rejected_without_fetch() {
    let mut app = headless_app();
    app.insert_resource(QueryControls {
        range: TimeRange::Custom,
        custom: CustomRangeInput {
            start: String::new(),
            end: "2024-01-31".to_string(),
        },
    });
    app.add_plugins(PipelinePlugin);

    // Startup requests the initial fetch; the update after applies it.
    app.update();
    app.update();

    assert_eq!(pending_count(&mut app), 0);
    let pipeline = app.world().resource::<MeteorPipeline>();
    let notice = pipeline.notice().expect("validation notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Please select both a start and an end date");
    assert!(!pipeline.is_loading());
}

#[test]
fn test_new_request_drops_superseded_fetch() {
    let mut app = headless_app();
    // An invalid custom range keeps the new request off the network.
    app.insert_resource(QueryControls {
        range: TimeRange::Custom,
        custom: CustomRangeInput {
            start: "2024-01-01".to_string(),
            end: String::new(),
        },
    });
    app.add_plugins(PipelinePlugin);
    app.update();

    let (_sender, receiver) = hanging_fetch();
    let token = app.world_mut().resource_mut::<MeteorPipeline>().begin();
    app.world_mut().spawn(PendingFetch::new(token, receiver));
    app.update();
    assert_eq!(pending_count(&mut app), 1, "an unanswered fetch stays pending");

    app.world_mut().write_message(FetchRequested {
        reason: FetchReason::ApplyCustomRange,
    });
    app.update();

    assert_eq!(pending_count(&mut app), 0);
    assert!(!app.world().resource::<MeteorPipeline>().is_loading());
}

#[test]
fn test_abandoned_fetch_worker_reports_failure() {
    let mut app = marker_app();
    let (sender, receiver) = hanging_fetch();
    let token = app.world_mut().resource_mut::<MeteorPipeline>().begin();
    app.world_mut().spawn(PendingFetch::new(token, receiver));
    drop(sender);
    settle(&mut app);

    let pipeline = app.world().resource::<MeteorPipeline>();
    assert!(!pipeline.is_loading());
    assert_eq!(pipeline.notice().map(|n| n.kind), Some(NoticeKind::Error));
}

/// Collects the reasons of every fetch request seen.
#[derive(Resource, Default)]
struct SeenRequests(Vec<FetchReason>);

fn record_requests(mut requests: MessageReader<FetchRequested>, mut seen: ResMut<SeenRequests>) {
    seen.0.extend(requests.read().map(|r| r.reason));
}

fn polling_app() -> App {
    let mut app = headless_app();
    // Stay under the virtual clock's per-frame delta cap.
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)))
        .insert_resource(ViewerSettings {
            poll_interval_secs: 0.5,
            ..default()
        })
        .init_resource::<QueryControls>()
        .init_resource::<SeenRequests>()
        .add_message::<FetchRequested>()
        .add_plugins(PollingPlugin)
        .add_systems(PostUpdate, record_requests);
    app
}

fn realtime_ticks(app: &App) -> usize {
    app.world()
        .resource::<SeenRequests>()
        .0
        .iter()
        .filter(|r| **r == FetchReason::RealtimeTick)
        .count()
}

#[test]
fn test_realtime_tick_emits_fetch_requests() {
    let mut app = polling_app();
    for _ in 0..20 {
        app.update();
    }

    assert_eq!(app.world().resource::<RealtimePoller>().active_timers(), 1);
    assert!(realtime_ticks(&app) >= 3, "expected several ticks, saw {}", realtime_ticks(&app));
}

#[test]
fn test_leaving_realtime_stops_ticks() {
    let mut app = polling_app();
    app.update();

    let world = app.world_mut();
    world.resource_scope(|world, mut poller: Mut<RealtimePoller>| {
        let mut controls = world.resource_mut::<QueryControls>();
        change_range(&mut controls, &mut poller, TimeRange::Last30Days);
    });
    let before = realtime_ticks(&app);

    for _ in 0..10 {
        app.update();
    }

    assert_eq!(app.world().resource::<RealtimePoller>().active_timers(), 0);
    assert_eq!(realtime_ticks(&app), before);
}
