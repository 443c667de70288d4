//! Floating toolbar visibility.
//!
//! Timers are deadlines owned by the state itself and fire from [`ToolbarMachine::tick`].
//! Replacing a state drops its deadline, which is how timers get cancelled.

use crate::config::ToolbarConfig;
use crate::objects::ObjectId;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Which object the toolbar is bound to, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarState {
    Inactive,
    /// Object was just selected or clicked.
    ActiveImmediate { target: ObjectId },
    /// Pointer is over a non-selected object.
    ActiveHover { target: ObjectId },
    /// Hover started while unarmed; shows once the entry delay passes.
    PendingActivate { target: ObjectId, deadline: Instant },
    /// Hover was lost; hides once the grace period passes.
    PendingDeactivate { target: ObjectId, deadline: Instant },
}

impl ToolbarState {
    /// Object the state refers to, whether or not the toolbar is visible.
    fn subject(&self) -> Option<ObjectId> {
        match *self {
            ToolbarState::Inactive => None,
            ToolbarState::ActiveImmediate { target }
            | ToolbarState::ActiveHover { target }
            | ToolbarState::PendingActivate { target, .. }
            | ToolbarState::PendingDeactivate { target, .. } => Some(target),
        }
    }
}

/// Whether hovers skip the entry delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    Idle,
    /// Armed by a selection. `until` is the cooldown deadline once one is running.
    Armed { until: Option<Instant> },
}

#[derive(Debug, Clone)]
pub struct ToolbarMachine {
    state: ToolbarState,
    system: SystemState,
    grace: Duration,
    cooldown: Duration,
    hover_entry: Duration,
}

impl Default for ToolbarMachine {
    fn default() -> Self {
        Self::new(&ToolbarConfig::default())
    }
}

impl ToolbarMachine {
    pub fn new(config: &ToolbarConfig) -> Self {
        Self {
            state: ToolbarState::Inactive,
            system: SystemState::Idle,
            grace: config.grace(),
            cooldown: config.cooldown(),
            hover_entry: config.hover_entry(),
        }
    }

    pub fn state(&self) -> ToolbarState {
        self.state
    }

    pub fn system(&self) -> SystemState {
        self.system
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.system, SystemState::Armed { .. })
    }

    /// Object whose toolbar is visible. Still set during the grace period.
    pub fn target(&self) -> Option<ObjectId> {
        match self.state {
            ToolbarState::PendingActivate { .. } => None,
            state => state.subject(),
        }
    }

    /// Earliest pending deadline, for hosts that schedule wake-ups.
    pub fn next_deadline(&self) -> Option<Instant> {
        let state_deadline = match self.state {
            ToolbarState::PendingActivate { deadline, .. } | ToolbarState::PendingDeactivate { deadline, .. } => {
                Some(deadline)
            }
            _ => None,
        };
        let cooldown = match self.system {
            SystemState::Armed { until } => until,
            SystemState::Idle => None,
        };
        match (state_deadline, cooldown) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn arm(&mut self) {
        self.system = SystemState::Armed { until: None };
    }

    fn deactivate(&mut self, now: Instant) {
        self.state = ToolbarState::Inactive;
        if self.is_armed() {
            self.system = SystemState::Armed {
                until: Some(now + self.cooldown),
            };
        }
    }

    /// An object was selected or clicked.
    pub fn on_select(&mut self, id: ObjectId) {
        log::debug!("Toolbar active for {id}");
        self.state = ToolbarState::ActiveImmediate { target: id };
        self.arm();
    }

    /// The selection no longer has a single object.
    pub fn on_selection_cleared(&mut self, now: Instant) {
        if matches!(self.state, ToolbarState::ActiveImmediate { .. }) {
            self.deactivate(now);
        }
    }

    /// Pointer entered `id`.
    pub fn on_hover_enter(&mut self, id: ObjectId, selected: bool, now: Instant) {
        match self.state {
            ToolbarState::ActiveImmediate { target } if target == id => {}
            // A selected object's toolbar is not stolen by hovering others.
            ToolbarState::ActiveImmediate { .. } => {}
            ToolbarState::ActiveHover { target } if target == id => {}
            ToolbarState::PendingActivate { target, .. } if target == id => {}
            ToolbarState::PendingDeactivate { target, .. } if target == id => {
                self.state = if selected {
                    ToolbarState::ActiveImmediate { target: id }
                } else {
                    ToolbarState::ActiveHover { target: id }
                };
            }
            _ if selected => self.on_select(id),
            _ if self.is_armed() => {
                self.state = ToolbarState::ActiveHover { target: id };
                self.arm();
            }
            _ => {
                self.state = ToolbarState::PendingActivate {
                    target: id,
                    deadline: now + self.hover_entry,
                };
            }
        }
    }

    /// Pointer left `id`.
    pub fn on_hover_leave(&mut self, id: ObjectId, selected: bool, now: Instant) {
        match self.state {
            ToolbarState::PendingActivate { target, .. } if target == id => {
                self.state = ToolbarState::Inactive;
            }
            ToolbarState::ActiveHover { target } | ToolbarState::ActiveImmediate { target }
                if target == id && !selected =>
            {
                self.state = ToolbarState::PendingDeactivate {
                    target: id,
                    deadline: now + self.grace,
                };
            }
            _ => {}
        }
    }

    /// Pointer entered the toolbar itself; keeps it alive.
    pub fn on_toolbar_enter(&mut self) {
        if let ToolbarState::PendingDeactivate { target, .. } = self.state {
            self.state = ToolbarState::ActiveHover { target };
        }
    }

    /// Pointer left the toolbar.
    pub fn on_toolbar_leave(&mut self, selected: bool, now: Instant) {
        if let ToolbarState::ActiveHover { target } = self.state {
            self.on_hover_leave(target, selected, now);
        }
    }

    /// The object was deleted.
    pub fn forget(&mut self, id: ObjectId, now: Instant) {
        if self.state.subject() == Some(id) {
            self.deactivate(now);
        }
    }

    /// Fire expired deadlines. `exists` re-checks the target before showing it.
    ///
    /// Returns true if the state changed.
    pub fn tick(&mut self, now: Instant, exists: impl Fn(ObjectId) -> bool) -> bool {
        let before = (self.state, self.system);

        if let Some(target) = self.state.subject() {
            if !exists(target) {
                log::debug!("Toolbar target {target} vanished");
                self.deactivate(now);
            }
        }
        match self.state {
            ToolbarState::PendingActivate { target, deadline } if now >= deadline => {
                self.state = ToolbarState::ActiveHover { target };
            }
            ToolbarState::PendingDeactivate { deadline, .. } if now >= deadline => {
                self.deactivate(now);
            }
            _ => {}
        }
        if let SystemState::Armed { until: Some(until) } = self.system {
            if now >= until && self.state == ToolbarState::Inactive {
                self.system = SystemState::Idle;
            }
        }

        before != (self.state, self.system)
    }
}
