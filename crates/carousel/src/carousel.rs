use catalog::{Direction, NeighborLookup};
use foundation::{CameraId, Millis, RotationId};
use runtime::{Completed, Event, EventBus, Metrics, SettleGate, SettleVia, TimerId, TimerQueue};
use tracing::debug;

use crate::config::CarouselConfig;
use crate::drum::{self, SLOT_COUNT, STEP_DEG};
use crate::info::{InfoPanel, info_panel};
use crate::view::{CarouselView, slot_view};

pub const EVENT_OPENED: &str = "carousel.opened";
pub const EVENT_CLOSED: &str = "carousel.closed";
pub const EVENT_STARTED: &str = "rotation.started";
pub const EVENT_SETTLED: &str = "rotation.settled";
pub const EVENT_REJECTED: &str = "rotation.rejected";

pub const METRIC_STARTED: &str = "rotation.started";
pub const METRIC_SETTLED: &str = "rotation.settled";
pub const METRIC_REJECTED: &str = "rotation.rejected";
pub const METRIC_TIMEOUTS: &str = "rotation.settled_by_timeout";
pub const METRIC_SETTLE_MS: &str = "rotation.settle_ms";

/// Why a navigation input was ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rejected {
    /// Closed, or opened without a center camera.
    NoCenter,
    /// A rotation or drag is already in progress.
    Busy,
    /// No neighbor exists in the requested direction.
    Boundary,
}

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejected::NoCenter => write!(f, "no center camera"),
            Rejected::Busy => write!(f, "rotation already in progress"),
            Rejected::Boundary => write!(f, "no camera in that direction"),
        }
    }
}

impl std::error::Error for Rejected {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    UnknownCamera(CameraId),
}

impl std::fmt::Display for CarouselError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CarouselError::UnknownCamera(id) => write!(f, "camera {id} is not loaded"),
        }
    }
}

impl std::error::Error for CarouselError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Idle,
    Dragging,
    Rotating,
}

/// Result of a rotation reaching its resting position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Settled {
    pub rotation: RotationId,
    pub dir: Direction,
    pub steps: u32,
    pub center: CameraId,
    pub completed: Completed,
}

#[derive(Debug, Clone)]
struct Rotation {
    id: RotationId,
    dir: Direction,
    steps: u32,
    target_front: usize,
    target_center: CameraId,
    gate: SettleGate,
    timer: TimerId,
}

#[derive(Debug, Clone, PartialEq)]
struct Drag {
    last_y: f64,
    /// Direction of the latest pointer movement.
    lead: Direction,
    /// Cameras reachable in each direction, capped at `max_steps_per_gesture`.
    forward: Vec<CameraId>,
    backward: Vec<CameraId>,
}

impl Drag {
    /// Center after `steps` whole steps from where the drag began.
    fn center_at(&self, origin: CameraId, steps: i64) -> CameraId {
        let path = if steps < 0 { &self.backward } else { &self.forward };
        match steps.unsigned_abs() as usize {
            0 => origin,
            n => path.get(n - 1).copied().unwrap_or(origin),
        }
    }
}

/// How far past the last reachable camera a drag may pull the drum.
const OVERDRAG_DEG: f64 = 25.0;

/// Six-slot rotating drum showing a center camera and its neighbors.
///
/// At rest the slot at `front` holds the center, the slots one and two steps
/// either side hold the first and second neighbors in that direction, and the
/// hidden opposite slot holds the third neighbor in the direction of the last
/// travel. A step fills the slot that is about to come into view before the
/// drum turns and rebuilds the ring around the new center once the turn
/// settles. A drag rebuilds it each time the nearest whole step changes, so a
/// slot is written while it faces away from the viewer.
///
/// The host drives time: it forwards `transitionend` to
/// [`AdjacencyCarousel::transition_end`] and calls [`AdjacencyCarousel::tick`]
/// at or after [`AdjacencyCarousel::next_deadline`]. Whichever arrives first
/// settles the rotation; the other is ignored.
#[derive(Debug)]
pub struct AdjacencyCarousel {
    config: CarouselConfig,
    open: bool,
    center: Option<CameraId>,
    slots: [Option<CameraId>; SLOT_COUNT],
    front: usize,
    /// Last direction of travel; picks the hidden slot's camera at rest.
    lead: Direction,
    angle_deg: f64,
    animate: bool,
    rotation: Option<Rotation>,
    drag: Option<Drag>,
    last_rotation: RotationId,
    timers: TimerQueue<RotationId>,
    events: EventBus,
    metrics: Metrics,
}

impl Default for AdjacencyCarousel {
    fn default() -> Self {
        Self::new(CarouselConfig::default())
    }
}

impl AdjacencyCarousel {
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            config: config.sanitized(),
            open: false,
            center: None,
            slots: [None; SLOT_COUNT],
            front: 0,
            lead: Direction::Forward,
            angle_deg: 0.0,
            animate: false,
            rotation: None,
            drag: None,
            last_rotation: RotationId(0),
            timers: TimerQueue::new(),
            events: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Opens (or reopens) centered on `center`. Any rotation in flight from a
    /// previous session is discarded.
    pub fn open(
        &mut self,
        lookup: &impl NeighborLookup,
        center: CameraId,
        now: Millis,
    ) -> Result<(), CarouselError> {
        if lookup.camera(center).is_none() {
            return Err(CarouselError::UnknownCamera(center));
        }
        self.reset();
        self.open = true;
        self.center = Some(center);
        self.fill_ring(lookup, 0, center, Direction::Forward);

        debug!(%center, slots = ?self.slots, "carousel opened");
        self.events
            .emit(now, EVENT_OPENED, format!("opened at camera {center}"));
        Ok(())
    }

    /// Closes the carousel and releases pending timers. Returns how many
    /// timers were cancelled.
    pub fn close(&mut self, now: Millis) -> usize {
        let released = self.timers.len();
        let was_open = self.open;
        self.reset();
        if was_open {
            debug!(released, "carousel closed");
            self.events.emit(now, EVENT_CLOSED, "closed");
        }
        released
    }

    fn reset(&mut self) {
        self.timers.cancel_all();
        self.open = false;
        self.center = None;
        self.slots = [None; SLOT_COUNT];
        self.front = 0;
        self.lead = Direction::Forward;
        self.angle_deg = 0.0;
        self.animate = false;
        self.rotation = None;
        self.drag = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn phase(&self) -> Phase {
        if !self.open {
            Phase::Closed
        } else if self.rotation.is_some() {
            Phase::Rotating
        } else if self.drag.is_some() {
            Phase::Dragging
        } else {
            Phase::Idle
        }
    }

    pub fn center(&self) -> Option<CameraId> {
        self.center
    }

    pub fn front(&self) -> usize {
        self.front
    }

    pub fn slots(&self) -> &[Option<CameraId>; SLOT_COUNT] {
        &self.slots
    }

    /// Camera in the slot `offset` steps from the front.
    pub fn slot_at_offset(&self, offset: i64) -> Option<CameraId> {
        self.slots[drum::slot_at(self.front, offset)]
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn current_rotation(&self) -> Option<RotationId> {
        self.rotation.as_ref().map(|r| r.id)
    }

    /// When the host should next call [`AdjacencyCarousel::tick`].
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// One step in `dir` (button press or keyboard).
    pub fn rotate(
        &mut self,
        lookup: &impl NeighborLookup,
        dir: Direction,
        now: Millis,
    ) -> Result<RotationId, Rejected> {
        self.begin(lookup, dir, now)
    }

    /// Mouse wheel: positive `delta_y` scrolls down, which steps forward.
    pub fn wheel(
        &mut self,
        lookup: &impl NeighborLookup,
        delta_y: f64,
        now: Millis,
    ) -> Result<Option<RotationId>, Rejected> {
        let dir = if delta_y > 0.0 {
            Direction::Forward
        } else if delta_y < 0.0 {
            Direction::Backward
        } else {
            return Ok(None);
        };
        self.begin(lookup, dir, now).map(Some)
    }

    pub fn drag_start(
        &mut self,
        lookup: &impl NeighborLookup,
        y: f64,
        now: Millis,
    ) -> Result<(), Rejected> {
        let center = self.ready(now)?;
        let max = self.config.max_steps_per_gesture as usize;
        let reach = |dir| {
            let mut path = Vec::new();
            let mut at = center;
            while path.len() < max {
                let Some(next) = lookup.neighbor(at, dir) else {
                    break;
                };
                path.push(next);
                at = next;
            }
            path
        };
        self.drag = Some(Drag {
            last_y: y,
            lead: self.lead,
            forward: reach(Direction::Forward),
            backward: reach(Direction::Backward),
        });
        self.animate = false;
        Ok(())
    }

    /// Follows the pointer. Returns the new drum angle, or `None` if no drag
    /// is active.
    ///
    /// The drum stops a little past the last reachable camera in either
    /// direction. Slots are refilled around whichever camera is nearest the
    /// viewer, with the hidden slot holding the next camera in the direction
    /// the pointer is moving.
    pub fn drag_move(&mut self, lookup: &impl NeighborLookup, y: f64) -> Option<f64> {
        let center = self.center?;
        let drag = self.drag.as_mut()?;
        if y.is_finite() {
            let dy = y - drag.last_y;
            drag.last_y = y;
            if dy > 0.0 {
                drag.lead = Direction::Forward;
            } else if dy < 0.0 {
                drag.lead = Direction::Backward;
            }
            let rest = drum::resting_angle(self.front);
            let reach = |path: &[CameraId]| path.len() as f64 * STEP_DEG + OVERDRAG_DEG;
            let offset = (rest - self.angle_deg + dy * self.config.drag_deg_per_px)
                .clamp(-reach(&drag.backward), reach(&drag.forward));
            self.angle_deg = rest - offset;
        }

        let steps = drum::drag_steps(drum::resting_angle(self.front), self.angle_deg);
        let (at, lead) = (drag.center_at(center, steps), drag.lead);
        self.fill_ring(lookup, drum::slot_at(self.front, steps), at, lead);
        Some(self.angle_deg)
    }

    /// Snaps a released drag to the nearest whole step and rotates there. A
    /// drag shorter than half a step springs back.
    pub fn drag_end(&mut self, lookup: &impl NeighborLookup, now: Millis) -> Option<RotationId> {
        let drag = self.drag.take()?;
        let center = self.center?;
        let steps = drum::drag_steps(drum::resting_angle(self.front), self.angle_deg);
        if steps == 0 {
            self.snap_back(lookup);
            return None;
        }
        let dir = if steps > 0 {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let target = drag.center_at(center, steps);
        Some(self.start(dir, steps.unsigned_abs() as u32, target, now))
    }

    /// Abandons a drag (pointer lost) and springs back.
    pub fn drag_cancel(&mut self, lookup: &impl NeighborLookup) {
        if self.drag.take().is_some() {
            self.snap_back(lookup);
        }
    }

    fn snap_back(&mut self, lookup: &impl NeighborLookup) {
        if let Some(center) = self.center {
            self.fill_ring(lookup, self.front, center, self.lead);
        }
        self.angle_deg = drum::resting_angle(self.front);
        self.animate = true;
    }

    /// The drum's transition finished.
    pub fn transition_end(&mut self, lookup: &impl NeighborLookup, now: Millis) -> Option<Settled> {
        let completed = self.rotation.as_mut()?.gate.signal(now)?;
        self.finish(lookup, completed)
    }

    /// Fires due fallback timers. A timer armed by an earlier rotation never
    /// settles the current one.
    pub fn tick(&mut self, lookup: &impl NeighborLookup, now: Millis) -> Option<Settled> {
        let mut settled = None;
        for (_, id) in self.timers.pop_due(now) {
            let Some(rotation) = self.rotation.as_mut().filter(|r| r.id == id) else {
                debug!(rotation = id.0, "ignoring stale fallback timer");
                continue;
            };
            if let Some(completed) = rotation.gate.poll_timeout(now) {
                settled = self.finish(lookup, completed);
            }
        }
        settled
    }

    fn ready(&mut self, now: Millis) -> Result<CameraId, Rejected> {
        let result = match self.center {
            _ if self.rotation.is_some() || self.drag.is_some() => Err(Rejected::Busy),
            Some(center) if self.open => Ok(center),
            _ => Err(Rejected::NoCenter),
        };
        result.map_err(|rejected| self.reject(now, rejected))
    }

    fn reject(&mut self, now: Millis, rejected: Rejected) -> Rejected {
        debug!(%rejected, "navigation input ignored");
        self.events.emit(now, EVENT_REJECTED, rejected.to_string());
        self.metrics.inc_counter(METRIC_REJECTED, 1);
        rejected
    }

    fn begin(
        &mut self,
        lookup: &impl NeighborLookup,
        dir: Direction,
        now: Millis,
    ) -> Result<RotationId, Rejected> {
        let center = self.ready(now)?;
        let Some(next) = lookup.neighbor(center, dir) else {
            return Err(self.reject(now, Rejected::Boundary));
        };
        // The hidden slot comes into view as the far side slot once the drum
        // moves, so it gets the camera two links past `next`.
        self.fill_ring(lookup, self.front, center, dir);
        Ok(self.start(dir, 1, next, now))
    }

    /// Arms a rotation of `steps` toward `target`. The slots the turn shows
    /// must already be filled.
    fn start(&mut self, dir: Direction, steps: u32, target: CameraId, now: Millis) -> RotationId {
        let id = self.last_rotation.next();
        self.last_rotation = id;
        let gate = SettleGate::arm(now, self.config.settle_timeout_ms);
        let timer = self.timers.schedule(gate.deadline(), id);
        let target_front = drum::slot_at(self.front, dir.sign() * i64::from(steps));
        self.rotation = Some(Rotation {
            id,
            dir,
            steps,
            target_front,
            target_center: target,
            gate,
            timer,
        });
        self.angle_deg =
            drum::resting_angle(self.front) - dir.sign() as f64 * STEP_DEG * f64::from(steps);
        self.animate = true;

        debug!(rotation = id.0, ?dir, steps, %target, "rotation started");
        self.events.emit(
            now,
            EVENT_STARTED,
            format!("{dir:?} x{steps} toward camera {target}"),
        );
        self.metrics.inc_counter(METRIC_STARTED, 1);
        id
    }

    fn finish(&mut self, lookup: &impl NeighborLookup, completed: Completed) -> Option<Settled> {
        let rotation = self.rotation.take()?;
        self.timers.cancel(rotation.timer);

        self.front = rotation.target_front;
        self.center = Some(rotation.target_center);
        self.lead = rotation.dir;
        self.fill_ring(lookup, self.front, rotation.target_center, rotation.dir);
        self.angle_deg = drum::resting_angle(self.front);
        self.animate = false;

        debug!(
            rotation = rotation.id.0,
            center = %rotation.target_center,
            via = ?completed.via,
            elapsed_ms = completed.elapsed_ms,
            "rotation settled"
        );
        self.events.emit(
            completed.at,
            EVENT_SETTLED,
            format!("camera {} via {:?}", rotation.target_center, completed.via),
        );
        self.metrics.inc_counter(METRIC_SETTLED, 1);
        if completed.via == SettleVia::Timeout {
            self.metrics.inc_counter(METRIC_TIMEOUTS, 1);
        }
        self.metrics
            .record_histogram(METRIC_SETTLE_MS, completed.elapsed_ms);

        Some(Settled {
            rotation: rotation.id,
            dir: rotation.dir,
            steps: rotation.steps,
            center: rotation.target_center,
            completed,
        })
    }

    /// Puts `center` at slot `front` with its neighbor chains either side and
    /// the third link in `lead` in the hidden slot. Only slots whose camera
    /// changes are written.
    fn fill_ring(
        &mut self,
        lookup: &impl NeighborLookup,
        front: usize,
        center: CameraId,
        lead: Direction,
    ) {
        let mut ring = [None; SLOT_COUNT];
        ring[front] = Some(center);
        for dir in [Direction::Forward, Direction::Backward] {
            for offset in 1..=2i64 {
                ring[drum::slot_at(front, dir.sign() * offset)] =
                    nth_neighbor(lookup, center, dir, offset as usize);
            }
        }
        ring[drum::opposite(front)] = nth_neighbor(lookup, center, lead, 3);

        let mut rewritten = 0;
        for (slot, cam) in self.slots.iter_mut().zip(ring) {
            if *slot != cam {
                *slot = cam;
                rewritten += 1;
            }
        }
        if rewritten > 0 {
            debug!(%center, front, rewritten, "slots refreshed");
        }
    }

    pub fn view(&self, lookup: &impl NeighborLookup) -> CarouselView {
        CarouselView {
            open: self.open,
            rotating: self.rotation.is_some(),
            front: self.front,
            angle_deg: self.angle_deg,
            animate: self.animate,
            radius_px: self.config.radius_px,
            center: self.center.map(CameraId::get),
            slots: self
                .slots
                .iter()
                .enumerate()
                .map(|(index, cam)| slot_view(lookup, index, *cam))
                .collect(),
        }
    }

    pub fn info(&self, lookup: &impl NeighborLookup) -> Option<InfoPanel> {
        info_panel(lookup, self.center?)
    }
}

fn nth_neighbor(
    lookup: &impl NeighborLookup,
    from: CameraId,
    dir: Direction,
    n: usize,
) -> Option<CameraId> {
    (0..n).try_fold(from, |id, _| lookup.neighbor(id, dir))
}
