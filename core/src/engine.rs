use crate::*;

/// Per-cell reveal period while the pattern animates.
pub const ANIMATE_CELL_MS: u64 = 700;

/// Finger movement (per axis) required before a move batch issues a redraw.
pub const DEFAULT_DRAG_THRESHOLD: Px = 0.0;

/// Transient state of the gesture currently on the glass: the raw rubber-band
/// endpoint, whether a pattern is being traced, and the dirty rect issued by
/// the previous move batch.
#[derive(Copy, Clone, Debug, Default)]
struct GestureContext {
    in_progress: bool,
    cursor: PointPx,
    issued_rect: RectPx,
}

/// Accumulator threaded through one touch dispatch.
#[derive(Debug, Default)]
struct TouchCtx {
    events: PatternEvents,
    timer: TimerCmd,
    haptic: bool,
}

/// The pattern-lock engine: hit testing, pattern state, animation state and
/// event emission, advanced purely by caller-supplied milliseconds.
///
/// The embedding layer owns the actual clock, timer and renderer; it feeds
/// pointer samples in and performs whatever the returned outcomes ask for.
#[derive(Clone, Debug)]
pub struct PatternLock {
    geom: GridGeometry,
    hit_factor: Px,
    drag_threshold: Px,
    state: PatternState,
    rings: RingGrid,
    trace: Option<ErrorTrace>,
    display_mode: DisplayMode,
    gesture: GestureContext,
    animate_started_ms: Option<u64>,
    pending_reset: bool,
    input_enabled: bool,
    stealth: bool,
    haptics: bool,
}

impl PatternLock {
    pub fn new(geom: GridGeometry) -> Self {
        Self {
            geom,
            hit_factor: DEFAULT_HIT_FACTOR,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            state: PatternState::new(),
            rings: RingGrid::default(),
            trace: None,
            display_mode: DisplayMode::Correct,
            gesture: GestureContext::default(),
            animate_started_ms: None,
            pending_reset: false,
            input_enabled: true,
            stealth: false,
            haptics: true,
        }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geom
    }

    pub fn set_geometry(&mut self, geom: GridGeometry) {
        self.geom = geom;
    }

    pub fn set_hit_factor(&mut self, hit_factor: Px) {
        self.hit_factor = hit_factor;
    }

    pub fn set_drag_threshold(&mut self, threshold: Px) {
        self.drag_threshold = threshold;
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn pattern(&self) -> &[Cell] {
        self.state.cells()
    }

    pub fn visited(&self) -> &VisitedGrid {
        self.state.visited()
    }

    pub fn in_progress(&self) -> bool {
        self.gesture.in_progress
    }

    pub fn pending_reset(&self) -> bool {
        self.pending_reset
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    pub fn is_stealth(&self) -> bool {
        self.stealth
    }

    pub fn set_stealth(&mut self, stealth: bool) {
        self.stealth = stealth;
    }

    pub fn is_haptics_enabled(&self) -> bool {
        self.haptics
    }

    pub fn set_haptics(&mut self, haptics: bool) {
        self.haptics = haptics;
    }

    pub(crate) fn rings(&self) -> &RingGrid {
        &self.rings
    }

    pub(crate) fn error_trace(&self) -> Option<&ErrorTrace> {
        self.trace.as_ref()
    }

    pub(crate) fn cursor(&self) -> PointPx {
        self.gesture.cursor
    }

    /// A new finger contact. Wipes the previous transient pattern, then either
    /// starts a new one (`Started`) or reports the end of the old gesture
    /// (`Cleared`).
    pub fn touch_down(&mut self, now_ms: u64, point: PointPx) -> TouchOutcome {
        if !self.input_enabled {
            return TouchOutcome::unhandled();
        }
        log::trace!("touch down at ({}, {})", point.x, point.y);

        let was_in_progress = self.gesture.in_progress;
        self.reset_transient();

        let mut ctx = TouchCtx::default();
        let hit = self.detect_and_add(now_ms, point, &mut ctx);
        if hit.is_some() {
            self.gesture.in_progress = true;
            ctx.events.push(PatternEvent::Started);
        } else if was_in_progress {
            self.gesture.in_progress = false;
            ctx.events.push(PatternEvent::Cleared);
        }

        self.gesture.cursor = point;
        self.gesture.issued_rect = RectPx::EMPTY;
        self.finish(ctx, Redraw::Full)
    }

    /// A batch of move samples, oldest first, the current position last.
    /// Every sample runs the hit tester; dirty rects are unioned across the
    /// batch and issued once.
    pub fn touch_move(&mut self, now_ms: u64, points: &[PointPx]) -> TouchOutcome {
        if !self.input_enabled {
            return TouchOutcome::unhandled();
        }
        let Some(&current) = points.last() else {
            return self.finish(TouchCtx::default(), Redraw::None);
        };

        let radius = self.geom.line_radius();
        let mut ctx = TouchCtx::default();
        let mut batch_rect = RectPx::EMPTY;
        let mut invalidate_now = false;

        for &point in points {
            let hit = self.detect_and_add(now_ms, point, &mut ctx);
            let size = self.state.len();
            if hit.is_some() && size == 1 {
                self.gesture.in_progress = true;
                ctx.events.push(PatternEvent::Started);
            }

            // Compared against the cursor of the previous batch; the cursor
            // only moves forward once the whole batch is processed.
            let dx = (point.x - self.gesture.cursor.x).abs();
            let dy = (point.y - self.gesture.cursor.y).abs();
            if dx > self.drag_threshold || dy > self.drag_threshold {
                invalidate_now = true;
            }

            if self.gesture.in_progress && size > 0 {
                if let Some(last) = self.state.last() {
                    let last_center = self.geom.center(last);
                    let mut rect = RectPx::from_points(last_center, point).inflate(radius);
                    if let Some(hit_cell) = hit {
                        let half_w = self.geom.square_width() / 2.0;
                        let half_h = self.geom.square_height() / 2.0;
                        let hit_center = self.geom.center(hit_cell);
                        rect = rect.union(RectPx::around(hit_center, half_w, half_h));
                    }
                    batch_rect = batch_rect.union(rect);
                }
            }
        }

        self.gesture.cursor = current;
        let redraw = if invalidate_now && !batch_rect.is_empty() {
            // Union with the previously issued rect so the stale rubber band
            // gets repainted too, then remember only our own rect.
            let issued = self.gesture.issued_rect.union(batch_rect);
            self.gesture.issued_rect = batch_rect;
            Redraw::Partial(issued)
        } else {
            Redraw::None
        };
        self.finish(ctx, redraw)
    }

    /// Finger lifted: a non-empty pattern is complete and reported.
    pub fn touch_up(&mut self, _now_ms: u64) -> TouchOutcome {
        if !self.input_enabled {
            return TouchOutcome::unhandled();
        }

        let mut ctx = TouchCtx::default();
        let redraw = if !self.state.is_empty() {
            self.gesture.in_progress = false;
            log::debug!("pattern detected with {} cells", self.state.len());
            ctx.events.push(PatternEvent::Detected(self.state.snapshot()));
            Redraw::Full
        } else {
            Redraw::None
        };
        self.finish(ctx, redraw)
    }

    /// The platform stole the gesture (scroll, palm, ...). Mid-gesture this
    /// clears and reports `Cleared`.
    pub fn touch_cancel(&mut self, _now_ms: u64) -> TouchOutcome {
        if !self.input_enabled {
            return TouchOutcome::unhandled();
        }

        let mut ctx = TouchCtx::default();
        let redraw = if self.gesture.in_progress {
            self.gesture.in_progress = false;
            self.reset_transient();
            ctx.events.push(PatternEvent::Cleared);
            Redraw::Full
        } else {
            Redraw::None
        };
        self.finish(ctx, redraw)
    }

    /// Replaces the shown pattern and applies `mode`, exactly like feeding the
    /// cells through a gesture would, minus the events.
    pub fn set_pattern(&mut self, mode: DisplayMode, cells: &[Cell], now_ms: u64) -> Result<ModeUpdate> {
        self.state.replace(cells.iter().copied());
        self.set_display_mode(mode, now_ms)
    }

    /// Changes how the current pattern is rendered.
    ///
    /// `Animate` needs a non-empty pattern and restarts the reveal from the
    /// first cell. `Wrong` starts the error sequence (visuals suppressed in
    /// stealth mode) and always returns a `Schedule` timer command for the
    /// auto-reset; the embedding layer must replace any timer it still holds.
    pub fn set_display_mode(&mut self, mode: DisplayMode, now_ms: u64) -> Result<ModeUpdate> {
        let mut timer = TimerCmd::Keep;
        match mode {
            DisplayMode::Correct => {
                self.trace = None;
                self.animate_started_ms = None;
            }
            DisplayMode::Animate => {
                if self.state.is_empty() {
                    return Err(PatternError::NothingToAnimate);
                }
                self.trace = None;
                self.animate_started_ms = Some(now_ms);
                let first = self.state.cells()[0];
                self.gesture.cursor = self.geom.center(first);
                self.state.reveal_prefix(0);
            }
            DisplayMode::Wrong => {
                self.animate_started_ms = None;
                timer = TimerCmd::Schedule(self.start_error(now_ms));
            }
        }
        self.display_mode = mode;
        Ok(ModeUpdate {
            redraw: Redraw::Full,
            timer,
        })
    }

    /// Host-driven reset. Never emits `Cleared`; only gestures do.
    pub fn clear_pattern(&mut self) -> Redraw {
        self.reset_transient();
        Redraw::Full
    }

    /// Called by the embedding layer when the scheduled auto-reset fires.
    pub fn reset_timer_fired(&mut self) -> Redraw {
        if !self.pending_reset {
            return Redraw::None;
        }
        self.pending_reset = false;
        log::debug!("auto reset after wrong pattern");
        self.reset_transient();
        Redraw::Full
    }

    /// Advances time-driven state: the error retraction and the animate
    /// reveal. Returns the redraw this frame needs.
    pub fn tick(&mut self, now_ms: u64) -> Redraw {
        let mut redraw = Redraw::None;

        if let Some(trace) = &mut self.trace {
            let mut settled_any = false;
            for &cell in trace.advance(now_ms) {
                self.rings.reset(cell);
                settled_any = true;
            }
            if settled_any || !trace.finished(now_ms) {
                redraw = Redraw::Full;
            }
        }

        if self.display_mode == DisplayMode::Animate && !self.state.is_empty() {
            self.tick_animate(now_ms);
            redraw = Redraw::Full;
        }

        if self.rings.any_active(now_ms) {
            redraw = Redraw::Full;
        }
        redraw
    }

    /// Whether [`tick`] still needs to be driven.
    ///
    /// [`tick`]: PatternLock::tick
    pub fn is_animating(&self, now_ms: u64) -> bool {
        self.rings.any_active(now_ms)
            || self
                .trace
                .as_ref()
                .is_some_and(|trace| !trace.finished(now_ms))
            || (self.display_mode == DisplayMode::Animate && !self.state.is_empty())
    }

    pub fn save(&self) -> SavedState {
        SavedState {
            pattern: pattern_to_string(self.state.cells()),
            display_mode: self.display_mode.ordinal(),
            input_enabled: self.input_enabled,
            stealth: self.stealth,
            haptics: self.haptics,
        }
    }

    /// Applies a snapshot: the pattern is re-applied in `Correct` mode first,
    /// then the saved mode overwrites the field as-is, without re-running the
    /// mode's side effects, so a saved `Wrong` comes back as a static red
    /// pattern with no timer.
    pub fn restore(&mut self, saved: &SavedState, now_ms: u64) -> Result<()> {
        let cells = string_to_pattern(&saved.pattern)?;
        let mode = DisplayMode::from_ordinal(saved.display_mode)?;

        self.set_pattern(DisplayMode::Correct, &cells, now_ms)?;
        self.display_mode = mode;
        self.input_enabled = saved.input_enabled;
        self.stealth = saved.stealth;
        self.haptics = saved.haptics;
        Ok(())
    }

    fn finish(&self, ctx: TouchCtx, redraw: Redraw) -> TouchOutcome {
        TouchOutcome {
            handled: true,
            events: ctx.events,
            redraw,
            timer: ctx.timer,
            haptic: ctx.haptic,
        }
    }

    /// Clears everything a new gesture starts from. Deliberately leaves the
    /// pending-reset flag up: an armed timer stays armed until a cell is
    /// actually hit or it fires.
    fn reset_transient(&mut self) {
        self.state.clear();
        self.rings.reset_all();
        self.trace = None;
        self.display_mode = DisplayMode::Correct;
        self.animate_started_ms = None;
    }

    /// Hit test one sample; on a hit, insert the gap-fill candidate (if any
    /// and unvisited) ahead of the hit cell.
    fn detect_and_add(&mut self, now_ms: u64, point: PointPx, ctx: &mut TouchCtx) -> Option<Cell> {
        let cell = hit_cell(&self.geom, self.hit_factor, self.state.visited(), point)?;
        if let Some(last) = self.state.last() {
            if let Some(gap) = gap_candidate(last, cell) {
                if !self.state.visited().is_visited(gap) {
                    self.add_cell(now_ms, gap, ctx);
                }
            }
        }
        self.add_cell(now_ms, cell, ctx);
        if self.haptics {
            ctx.haptic = true;
        }
        Some(cell)
    }

    fn add_cell(&mut self, now_ms: u64, cell: Cell, ctx: &mut TouchCtx) {
        if self.pending_reset {
            // The wrong-pattern reset is still pending; a new gesture performs
            // it right away and the embedding layer drops its timer.
            self.pending_reset = false;
            ctx.timer = TimerCmd::Cancel;
            self.rings.reset_all();
            self.trace = None;
        }
        self.state.push(cell);
        if !self.stealth {
            self.rings.press(cell, now_ms);
        }
        log::trace!("cell {} added, pattern length {}", cell, self.state.len());
        ctx.events.push(PatternEvent::CellAdded(self.state.snapshot()));
    }

    /// Puts every visited ring into its error phase and builds the retract
    /// trace; stealth skips the visuals. Arms the pending reset either way and
    /// returns the delay to schedule.
    fn start_error(&mut self, now_ms: u64) -> u64 {
        let prefix_len = self.state.visited_prefix().len();
        if !self.stealth && prefix_len > 0 {
            for &cell in self.state.visited_prefix() {
                self.rings.error(cell, now_ms);
            }
            let mut trace = ErrorTrace::build(self.state.visited_prefix(), &self.geom, now_ms);
            // The first ring settles the moment the retraction starts.
            for &cell in trace.advance(now_ms) {
                self.rings.reset(cell);
            }
            self.trace = Some(trace);
            log::debug!("wrong pattern, retracting {} cells", prefix_len);
        } else {
            self.trace = None;
        }
        self.pending_reset = true;
        ERROR_STEP_MS * prefix_len as u64
    }

    fn tick_animate(&mut self, now_ms: u64) {
        let count = self.state.len();
        let started = *self.animate_started_ms.get_or_insert(now_ms);
        let cycle = (count as u64 + 1) * ANIMATE_CELL_MS;
        let spot = now_ms.saturating_sub(started) % cycle;
        let reveal = (spot / ANIMATE_CELL_MS) as usize;

        self.state.reveal_prefix(reveal);
        if reveal > 0 && reveal < count {
            let t = (spot % ANIMATE_CELL_MS) as f32 / ANIMATE_CELL_MS as f32;
            let from = self.geom.center(self.state.cells()[reveal - 1]);
            let to = self.geom.center(self.state.cells()[reveal]);
            self.gesture.cursor = from.lerp(to, t);
        }
    }
}
