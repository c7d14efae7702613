//! driver - Display-paced frame scheduling
//!
//! The driver never sleeps or times anything itself. It asks a
//! [`FrameScheduler`] for one callback per display refresh and keeps at most
//! one such request in flight.

use core::fmt::Debug;

/// Anything that can invoke a callback on the next display refresh.
pub trait FrameScheduler {
    type Handle: Copy + PartialEq + Debug;

    fn request_frame(&mut self) -> Self::Handle;

    fn cancel_frame(&mut self, handle: Self::Handle);
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DriverState {
    #[default]
    Stopped,
    Running,
}

pub struct AnimationDriver<S: FrameScheduler> {
    scheduler: S,
    state: DriverState,
    pending: Option<S::Handle>,
}

impl<S: FrameScheduler> AnimationDriver<S> {
    pub fn new(scheduler: S) -> Self {
        Self { scheduler, state: DriverState::Stopped, pending: None }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn pending(&self) -> Option<S::Handle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Runs while the field is enabled and the surface is on screen, stops
    /// as soon as either goes away.
    pub fn sync(&mut self, enabled: bool, visible: bool) {
        let next = if enabled && visible { DriverState::Running } else { DriverState::Stopped };
        if next == self.state {
            return;
        }
        log::debug!("animation driver {:?} -> {:?}", self.state, next);
        self.state = next;
        match next {
            DriverState::Running => self.schedule(),
            DriverState::Stopped => self.cancel_pending(),
        }
    }

    /// Handles the scheduler firing `handle`: runs `render` and requests the
    /// next frame. Stale or unexpected handles are ignored.
    pub fn on_frame<F: FnOnce()>(&mut self, handle: S::Handle, render: F) -> bool {
        if self.state != DriverState::Running || self.pending != Some(handle) {
            log::trace!("dropping stale frame {:?}", handle);
            return false;
        }
        self.pending = None;
        render();
        self.schedule();
        true
    }

    /// Withdraws the in-flight request, if any.
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Re-arms after [`cancel_pending`](Self::cancel_pending) when still running.
    pub fn resume(&mut self) {
        if self.state == DriverState::Running && self.pending.is_none() {
            self.schedule();
        }
    }

    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.state = DriverState::Stopped;
    }

    fn schedule(&mut self) {
        self.cancel_pending();
        let handle = self.scheduler.request_frame();
        log::trace!("requested frame {:?}", handle);
        self.pending = Some(handle);
    }
}
