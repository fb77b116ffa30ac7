//! Fetch/render pipeline.
//!
//! Turns fetch requests into backend queries, runs them in the background,
//! and applies the results to the globe dataset. Every request carries a
//! token; only the response to the most recently issued token is applied, so
//! a slow response can never overwrite a newer one.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Mutex, PoisonError};

use bevy::prelude::*;

use crate::client::{FetchResult, spawn_fetch};
use crate::error::FetchError;
use crate::geometry::uniform_bearing;
use crate::meteor::{GlobeDataset, MeteorEvent};
use crate::notice::{Notice, NoticeKind, NoticeSlot, DEFAULT_NOTICE_TTL_SECS};
use crate::query::{CustomRangeInput, MeteorQuery, TimeRange, today_utc};
use crate::settings::ViewerSettings;

/// Notice text for an empty result.
pub const NO_DATA_MESSAGE: &str = "No meteor data for the selected range";

/// Plugin wiring the fetch pipeline into the app.
pub struct PipelinePlugin;

impl Plugin for PipelinePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerSettings>()
            .init_resource::<MeteorPipeline>()
            .init_resource::<QueryControls>()
            .add_message::<FetchRequested>()
            .add_systems(Startup, (configure_pipeline, request_initial_fetch).chain())
            .add_systems(
                Update,
                (start_fetches, poll_fetches, tick_notices).chain(),
            );
    }
}

/// Why a fetch was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchReason {
    Startup,
    RangeChanged,
    ApplyCustomRange,
    RealtimeTick,
}

/// Message asking the pipeline to (re)load the current range.
#[derive(Message, Clone, Copy, Debug)]
pub struct FetchRequested {
    pub reason: FetchReason,
}

/// State of the time-range controls.
#[derive(Resource, Clone, Debug)]
pub struct QueryControls {
    pub range: TimeRange,
    pub custom: CustomRangeInput,
}

impl Default for QueryControls {
    fn default() -> Self {
        Self {
            range: TimeRange::default(),
            custom: CustomRangeInput::default_for(today_utc()),
        }
    }
}

/// Identifies one issued request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Whether the latest request is still outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
}

/// What applying a response did.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    /// The response belonged to a superseded request and was dropped.
    Stale,
    /// The dataset now holds this many points.
    Rendered(usize),
    /// The backend had nothing for the range; the dataset was cleared.
    Empty,
    /// The request failed; the dataset was left as it was.
    Failed(FetchError),
}

/// Process-wide pipeline state.
///
/// Created once at startup and only mutated by pipeline systems and the
/// notice UI.
#[derive(Resource, Debug)]
pub struct MeteorPipeline {
    last_issued: u64,
    pending: Option<RequestToken>,
    dataset: GlobeDataset,
    notices: NoticeSlot,
    notice_ttl_secs: f32,
}

impl Default for MeteorPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL_SECS)
    }
}

impl MeteorPipeline {
    pub fn new(notice_ttl_secs: f32) -> Self {
        Self {
            last_issued: 0,
            pending: None,
            dataset: GlobeDataset::default(),
            notices: NoticeSlot::default(),
            notice_ttl_secs,
        }
    }

    fn issue(&mut self) -> RequestToken {
        self.last_issued += 1;
        RequestToken(self.last_issued)
    }

    /// Start a request: Idle/Loading -> Loading. Supersedes any in-flight one.
    pub fn begin(&mut self) -> RequestToken {
        let token = self.issue();
        self.pending = Some(token);
        token
    }

    /// A request that failed before reaching the network (bad custom range).
    ///
    /// Also supersedes any in-flight request, since it reflects the user's
    /// latest choice.
    pub fn reject(&mut self, error: FetchError) {
        self.issue();
        self.pending = None;
        warn!("Query rejected: {}", error);
        self.notices.show(Notice::new(
            NoticeKind::Error,
            error.user_message(),
            self.notice_ttl_secs,
        ));
    }

    /// Apply the outcome of the request identified by `token`.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<Vec<MeteorEvent>, FetchError>,
        bearing: impl FnMut() -> f64,
    ) -> Completion {
        if self.pending != Some(token) {
            debug!("Discarding stale response {:?}", token);
            return Completion::Stale;
        }
        self.pending = None;

        match result {
            Ok(events) if events.is_empty() => {
                self.dataset.clear();
                self.notices.show(Notice::new(
                    NoticeKind::NoData,
                    NO_DATA_MESSAGE,
                    self.notice_ttl_secs,
                ));
                info!("No meteor events for the selected range");
                Completion::Empty
            }
            Ok(events) => {
                self.dataset.replace(events, bearing);
                info!("Rendering {} meteor events", self.dataset.len());
                Completion::Rendered(self.dataset.len())
            }
            Err(error) => {
                warn!("Meteor fetch failed: {}", error);
                self.notices.show(Notice::new(
                    NoticeKind::Error,
                    error.user_message(),
                    self.notice_ttl_secs,
                ));
                Completion::Failed(error)
            }
        }
    }

    pub fn phase(&self) -> LoadPhase {
        if self.pending.is_some() {
            LoadPhase::Loading
        } else {
            LoadPhase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == LoadPhase::Loading
    }

    pub fn dataset(&self) -> &GlobeDataset {
        &self.dataset
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.dismiss();
    }

    pub fn tick_notices(&mut self, delta_secs: f32) {
        self.notices.tick(delta_secs);
    }

    pub fn set_notice_ttl(&mut self, secs: f32) {
        self.notice_ttl_secs = secs;
    }
}

/// An in-flight backend request.
///
/// Despawning it abandons the request; a late result is dropped unread.
#[derive(Component)]
pub struct PendingFetch {
    pub token: RequestToken,
    receiver: Mutex<Receiver<FetchResult>>,
}

impl PendingFetch {
    pub fn new(token: RequestToken, receiver: Receiver<FetchResult>) -> Self {
        Self {
            token,
            receiver: Mutex::new(receiver),
        }
    }

    /// The result, once the fetch has finished.
    pub fn try_take(&mut self) -> Option<FetchResult> {
        let receiver = self.receiver.get_mut().unwrap_or_else(PoisonError::into_inner);
        match receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(FetchError::Network("fetch ended without a response".to_string())))
            }
        }
    }
}

fn configure_pipeline(mut pipeline: ResMut<MeteorPipeline>, settings: Res<ViewerSettings>) {
    pipeline.set_notice_ttl(settings.notice_ttl_secs);
}

fn request_initial_fetch(mut requests: MessageWriter<FetchRequested>) {
    requests.write(FetchRequested {
        reason: FetchReason::Startup,
    });
}

/// Start one fetch per frame in which any request arrived.
///
/// Requests arriving together all want the same thing (the current controls),
/// so they collapse into a single query. Fetches still in flight are
/// superseded and dropped.
pub fn start_fetches(
    mut commands: Commands,
    mut requests: MessageReader<FetchRequested>,
    mut pipeline: ResMut<MeteorPipeline>,
    in_flight: Query<(Entity, &PendingFetch)>,
    controls: Res<QueryControls>,
    settings: Res<ViewerSettings>,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };

    for (entity, fetch) in &in_flight {
        debug!("Abandoning superseded fetch {:?}", fetch.token);
        commands.entity(entity).despawn();
    }

    let query = match MeteorQuery::from_controls(controls.range, &controls.custom, today_utc()) {
        Ok(query) => query,
        Err(error) => {
            pipeline.reject(error);
            return;
        }
    };

    let url = query.url(&settings.api_base_url);
    let token = pipeline.begin();
    info!("Fetching {} ({:?}, {:?})", url, request.reason, token);

    commands.spawn(PendingFetch::new(token, spawn_fetch(url)));
}

/// Apply finished fetches to the pipeline.
pub fn poll_fetches(
    mut commands: Commands,
    mut pending: Query<(Entity, &mut PendingFetch)>,
    mut pipeline: ResMut<MeteorPipeline>,
) {
    for (entity, mut fetch) in pending.iter_mut() {
        let Some(result) = fetch.try_take() else {
            continue;
        };
        commands.entity(entity).despawn();

        let mut rng = rand::thread_rng();
        pipeline.complete(fetch.token, result, || uniform_bearing(&mut rng));
    }
}

pub fn tick_notices(time: Res<Time>, mut pipeline: ResMut<MeteorPipeline>) {
    if pipeline.notice().is_some() {
        pipeline.tick_notices(time.delta_secs());
    }
}
