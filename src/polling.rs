//! Realtime polling for the meteor feed.
//!
//! Owns the single repeating refresh timer. The timer exists only while the
//! realtime range is selected.

use bevy::prelude::*;
use std::time::Duration;

use crate::pipeline::{FetchReason, FetchRequested, QueryControls};
use crate::query::TimeRange;
use crate::settings::ViewerSettings;

/// Plugin driving realtime refreshes.
pub struct PollingPlugin;

impl Plugin for PollingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RealtimePoller>()
            .add_systems(Startup, configure_poller)
            .add_systems(Update, drive_realtime_poll);
    }
}

/// Resource holding the realtime refresh timer.
#[derive(Resource, Debug)]
pub struct RealtimePoller {
    timer: Option<Timer>,
    period: Duration,
}

impl Default for RealtimePoller {
    fn default() -> Self {
        Self::new(Duration::from_secs_f32(crate::settings::DEFAULT_POLL_INTERVAL_SECS))
    }
}

impl RealtimePoller {
    pub fn new(period: Duration) -> Self {
        Self { timer: None, period }
    }

    /// React to a range change: drop any running timer and start a fresh
    /// one only for the realtime range.
    pub fn set_range(&mut self, range: TimeRange) {
        self.timer = None;
        if range.is_realtime() {
            self.timer = Some(Timer::new(self.period, TimerMode::Repeating));
            debug!("Realtime polling every {:.0}s", self.period.as_secs_f32());
        }
    }

    /// Change the period; a running timer restarts with it.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
        if self.timer.is_some() {
            self.timer = Some(Timer::new(period, TimerMode::Repeating));
        }
    }

    /// Advance the timer. Returns true when a refresh is due.
    pub fn tick(&mut self, delta: Duration) -> bool {
        match &mut self.timer {
            Some(timer) => timer.tick(delta).times_finished_this_tick() > 0,
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Number of live timers; never more than one.
    pub fn active_timers(&self) -> usize {
        usize::from(self.timer.is_some())
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// A usable timer period for `secs`, if there is one.
pub fn poll_period(secs: f32) -> Option<Duration> {
    Duration::try_from_secs_f32(secs).ok().filter(|period| !period.is_zero())
}

/// Apply the configured period and the initial range.
fn configure_poller(
    mut poller: ResMut<RealtimePoller>,
    settings: Res<ViewerSettings>,
    controls: Res<QueryControls>,
) {
    match poll_period(settings.poll_interval_secs) {
        Some(period) => poller.set_period(period),
        None => warn!(
            "Unusable poll interval {}s, keeping {:.0}s",
            settings.poll_interval_secs,
            poller.period().as_secs_f32()
        ),
    }
    poller.set_range(controls.range);
}

/// Request a refetch each time the realtime timer fires.
fn drive_realtime_poll(
    time: Res<Time>,
    mut poller: ResMut<RealtimePoller>,
    mut requests: MessageWriter<FetchRequested>,
) {
    if poller.tick(time.delta()) {
        info!("Realtime refresh");
        requests.write(FetchRequested {
            reason: FetchReason::RealtimeTick,
        });
    }
}
