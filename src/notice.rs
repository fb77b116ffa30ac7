//! User-facing notices: fetch errors and "no data" information.

/// Default lifetime of a notice in seconds.
pub const DEFAULT_NOTICE_TTL_SECS: f32 = 5.0;

/// Kind of notice, which decides its styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// A fetch or validation failure.
    Error,
    /// The backend returned an empty result for the range.
    NoData,
}

/// A dismissible, self-expiring message.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Seconds left before the notice disappears on its own.
    pub remaining_secs: f32,
    /// Lifetime the notice started with.
    pub ttl_secs: f32,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>, ttl_secs: f32) -> Self {
        Self {
            kind,
            message: message.into(),
            remaining_secs: ttl_secs,
            ttl_secs,
        }
    }

    /// Fraction of the lifetime still remaining, in [0, 1].
    pub fn remaining_fraction(&self) -> f32 {
        if self.ttl_secs <= 0.0 {
            return 0.0;
        }
        (self.remaining_secs / self.ttl_secs).clamp(0.0, 1.0)
    }
}

/// Holds at most one notice; a new one replaces the old.
#[derive(Clone, Debug, Default)]
pub struct NoticeSlot {
    current: Option<Notice>,
}

impl NoticeSlot {
    pub fn show(&mut self, notice: Notice) {
        self.current = Some(notice);
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Advance the expiry clock by `delta_secs`.
    pub fn tick(&mut self, delta_secs: f32) {
        if let Some(notice) = &mut self.current {
            notice.remaining_secs -= delta_secs;
            if notice.remaining_secs <= 0.0 {
                self.current = None;
            }
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
