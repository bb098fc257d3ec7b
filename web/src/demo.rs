use crate::lock::{LockView, PointerMsg, VIEW_UNITS};
use crate::theme::Theme;
use crate::utils::*;
use bitflags::bitflags;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use patlock_core::{
    self as lock, Cell, DisplayMode, GridGeometry, Insets, PatternEvent, PatternLock, PointPx,
    SavedState, TimerCmd, TouchOutcome,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::PointerEvent;
use yew::prelude::*;

/// Shortest pattern the setup flow accepts.
const MIN_PATTERN_LEN: usize = 4;
/// Animation drive rate while something on the grid is moving.
const TICK_MS: u32 = 16;
const HAPTIC_CELL_MS: u32 = 25;
const HAPTIC_ERROR_MS: u32 = 120;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    struct PointerButtons: u16 {
        const PRIMARY   = 1;
        const SECONDARY = 1 << 1;
        const AUXILIARY = 1 << 2;
    }
}

/// Serialized secret pattern kept across sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Secret {
    pattern: String,
}

impl StorageKey for Secret {
    const KEY: &'static str = "patlock:secret:v1";
}

impl StorageKey for SavedState {
    const KEY: &'static str = "patlock:lock:v1";
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Stage {
    /// No secret yet; the next pattern becomes the candidate.
    Record,
    /// The candidate must be traced a second time.
    Confirm,
    /// A secret exists; patterns are checked against it.
    Locked,
    Unlocked,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Verdict {
    TooShort,
    AwaitConfirm,
    Saved,
    Mismatch,
    Unlocked,
    Rejected,
    Ignored,
}

/// Pure decision of what a finished pattern means in the current stage.
fn judge(stage: Stage, pending: Option<&str>, secret: Option<&str>, pattern: &str) -> Verdict {
    match stage {
        Stage::Record if pattern.len() < MIN_PATTERN_LEN => Verdict::TooShort,
        Stage::Record => Verdict::AwaitConfirm,
        Stage::Confirm if pending == Some(pattern) => Verdict::Saved,
        Stage::Confirm => Verdict::Mismatch,
        Stage::Locked if secret == Some(pattern) => Verdict::Unlocked,
        Stage::Locked => Verdict::Rejected,
        Stage::Unlocked => Verdict::Ignored,
    }
}

fn stage_hint(stage: Stage) -> &'static str {
    match stage {
        Stage::Record => "draw a new unlock pattern",
        Stage::Confirm => "draw the same pattern again",
        Stage::Locked => "draw your pattern to unlock",
        Stage::Unlocked => "unlocked",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Pointer(PointerMsg),
    ResetFired,
    Tick,
    ToggleStealth,
    ToggleHaptics,
    ToggleTheme,
    Lock,
    Forget,
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct DemoProps {
    /// Start with the pattern trace hidden
    #[arg(short, long)]
    stealth: bool,

    /// Scale of the touch-sensitive square inside each cell
    #[arg(short = 'f', long)]
    hit_factor: Option<f32>,
}

#[derive(Debug)]
pub(crate) struct LockDemo {
    engine: PatternLock,
    stage: Stage,
    status: &'static str,
    pending: Option<String>,
    secret: Option<Secret>,
    theme: Option<Theme>,
    active_pointer: Option<i32>,
    svg: NodeRef,
    reset_timer: Option<Timeout>,
    anim_timer: Option<Interval>,
}

impl LockDemo {
    /// Maps a pointer position from client pixels into view-box units.
    fn view_point(&self, event: &PointerEvent) -> PointPx {
        let rect = self
            .svg
            .cast::<web_sys::Element>()
            .map(|element| element.get_bounding_client_rect());

        match rect {
            Some(rect) if rect.width() > 0.0 && rect.height() > 0.0 => {
                let x = (f64::from(event.client_x()) - rect.left()) / rect.width();
                let y = (f64::from(event.client_y()) - rect.top()) / rect.height();
                PointPx::new(x as f32 * VIEW_UNITS, y as f32 * VIEW_UNITS)
            }
            // Not laid out yet; any off-grid point misses every cell.
            _ => PointPx::new(-1.0, -1.0),
        }
    }

    /// A move carries its skipped intermediate samples, oldest first.
    fn sample_points(&self, event: &PointerEvent) -> Vec<PointPx> {
        let coalesced = event.get_coalesced_events();
        if coalesced.length() == 0 {
            return vec![self.view_point(event)];
        }
        coalesced
            .iter()
            .map(|entry| self.view_point(&entry.unchecked_into()))
            .collect()
    }

    fn apply_timer(&mut self, ctx: &Context<Self>, cmd: TimerCmd) {
        match cmd {
            TimerCmd::Keep => {}
            TimerCmd::Cancel => {
                self.reset_timer = None;
            }
            TimerCmd::Schedule(delay_ms) => {
                let link = ctx.link().clone();
                self.reset_timer = Some(Timeout::new(delay_ms as u32, move || {
                    link.send_message(Msg::ResetFired)
                }));
            }
        }
    }

    fn ensure_ticking(&mut self, ctx: &Context<Self>) {
        if self.anim_timer.is_none() {
            let link = ctx.link().clone();
            self.anim_timer = Some(Interval::new(TICK_MS, move || link.send_message(Msg::Tick)));
        }
    }

    fn on_pointer(&mut self, ctx: &Context<Self>, msg: PointerMsg) -> bool {
        use PointerMsg::*;

        match msg {
            Down(event) => {
                if self.active_pointer.is_some() {
                    return false;
                }
                if !PointerButtons::from_bits_truncate(event.buttons())
                    .intersects(PointerButtons::PRIMARY)
                {
                    return false;
                }
                event.prevent_default();
                self.active_pointer = Some(event.pointer_id());
                if let Some(element) = self.svg.cast::<web_sys::Element>() {
                    if let Err(err) = element.set_pointer_capture(event.pointer_id()) {
                        log::trace!("pointer capture rejected: {:?}", err);
                    }
                }
                let point = self.view_point(&event);
                let outcome = self.engine.touch_down(now_millis(), point);
                self.after_outcome(ctx, outcome)
            }
            Move(event) => {
                if self.active_pointer != Some(event.pointer_id()) {
                    return false;
                }
                let samples = self.sample_points(&event);
                let outcome = self.engine.touch_move(now_millis(), &samples);
                self.after_outcome(ctx, outcome)
            }
            Up(event) => {
                if self
                    .active_pointer
                    .take_if(|id| *id == event.pointer_id())
                    .is_none()
                {
                    return false;
                }
                let outcome = self.engine.touch_up(now_millis());
                self.after_outcome(ctx, outcome)
            }
            Cancel(event) => {
                if self
                    .active_pointer
                    .take_if(|id| *id == event.pointer_id())
                    .is_none()
                {
                    return false;
                }
                let outcome = self.engine.touch_cancel(now_millis());
                self.after_outcome(ctx, outcome)
            }
        }
    }

    fn after_outcome(&mut self, ctx: &Context<Self>, outcome: TouchOutcome) -> bool {
        let TouchOutcome {
            handled,
            events,
            redraw,
            timer,
            haptic,
        } = outcome;

        if !handled {
            return false;
        }
        self.apply_timer(ctx, timer);
        if haptic {
            vibrate(HAPTIC_CELL_MS);
        }

        let mut updated = redraw.has_update();
        for event in events {
            updated |= self.on_pattern_event(ctx, event);
        }
        if self.engine.is_animating(now_millis()) {
            self.ensure_ticking(ctx);
        }
        updated
    }

    fn on_pattern_event(&mut self, ctx: &Context<Self>, event: PatternEvent) -> bool {
        use PatternEvent::*;

        match event {
            Started => {
                log::debug!("pattern started");
                false
            }
            CellAdded(cells) => {
                log::trace!("pattern grew to {} cells", cells.len());
                false
            }
            Detected(cells) => self.on_detected(ctx, &cells),
            Cleared => {
                log::debug!("pattern cleared");
                false
            }
        }
    }

    fn on_detected(&mut self, ctx: &Context<Self>, cells: &[Cell]) -> bool {
        let pattern = lock::pattern_to_string(cells);
        let verdict = judge(
            self.stage,
            self.pending.as_deref(),
            self.secret.as_ref().map(|secret| secret.pattern.as_str()),
            &pattern,
        );
        log::debug!("{} cells -> {:?}", cells.len(), verdict);

        match verdict {
            Verdict::TooShort => {
                self.status = "connect at least four dots";
                self.flash_wrong(ctx);
            }
            Verdict::AwaitConfirm => {
                self.pending = Some(pattern);
                self.engine.clear_pattern();
                self.stage = Stage::Confirm;
                self.status = stage_hint(self.stage);
            }
            Verdict::Saved => {
                self.secret = Some(Secret { pattern });
                self.secret.local_save();
                self.pending = None;
                self.engine.clear_pattern();
                self.stage = Stage::Locked;
                self.status = "pattern saved, draw it to unlock";
            }
            Verdict::Mismatch => {
                self.pending = None;
                self.stage = Stage::Record;
                self.status = "patterns did not match, start over";
                self.flash_wrong(ctx);
            }
            Verdict::Unlocked => {
                self.stage = Stage::Unlocked;
                self.status = stage_hint(self.stage);
                self.engine.set_input_enabled(false);
                self.replay_secret(ctx);
            }
            Verdict::Rejected => {
                self.status = "wrong pattern";
                self.flash_wrong(ctx);
            }
            Verdict::Ignored => {}
        }
        true
    }

    /// Shows the current pattern in red and lets the engine time the reset.
    fn flash_wrong(&mut self, ctx: &Context<Self>) {
        match self.engine.set_display_mode(DisplayMode::Wrong, now_millis()) {
            Ok(update) => {
                self.apply_timer(ctx, update.timer);
                self.ensure_ticking(ctx);
                if self.engine.is_haptics_enabled() {
                    vibrate(HAPTIC_ERROR_MS);
                }
            }
            Err(err) => log::error!("could not flag the pattern: {}", err),
        }
    }

    /// Replays the stored secret with the reveal animation after an unlock.
    fn replay_secret(&mut self, ctx: &Context<Self>) {
        let Some(secret) = &self.secret else { return };

        match lock::string_to_pattern(&secret.pattern) {
            Ok(cells) => {
                match self
                    .engine
                    .set_pattern(DisplayMode::Animate, &cells, now_millis())
                {
                    Ok(update) => {
                        self.apply_timer(ctx, update.timer);
                        self.ensure_ticking(ctx);
                    }
                    Err(err) => log::error!("could not replay the pattern: {}", err),
                }
            }
            Err(err) => {
                log::error!("stored pattern is corrupt: {}", err);
                self.secret = None;
                self.secret.local_save();
            }
        }
    }

    fn controls(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let forget = ctx.link().callback(|_| Forget);
        match self.stage {
            Stage::Record => html! {},
            Stage::Confirm => html! {
                <button onclick={forget}>{"start over"}</button>
            },
            Stage::Locked => html! {
                <button onclick={forget}>{"forget pattern"}</button>
            },
            Stage::Unlocked => {
                let relock = ctx.link().callback(|_| Lock);
                html! {
                    <>
                        <button onclick={relock}>{"lock"}</button>
                        <button onclick={forget}>{"forget pattern"}</button>
                    </>
                }
            }
        }
    }
}

impl Component for LockDemo {
    type Message = Msg;
    type Properties = DemoProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let mut engine = PatternLock::new(GridGeometry::new(
            VIEW_UNITS,
            VIEW_UNITS,
            Insets::default(),
        ));

        let saved: Option<SavedState> = LocalOrDefault::local_or_default();
        if let Some(saved) = &saved {
            if let Err(err) = engine.restore(saved, now_millis()) {
                log::warn!("discarding stale widget snapshot: {}", err);
            }
        }
        // The persisted toggles survive a reload; mid-interaction display
        // state does not.
        engine.set_input_enabled(true);
        engine.clear_pattern();

        if props.stealth {
            engine.set_stealth(true);
        }
        if let Some(factor) = props.hit_factor {
            engine.set_hit_factor(factor);
        }

        let secret: Option<Secret> = LocalOrDefault::local_or_default();
        let stage = if secret.is_some() {
            Stage::Locked
        } else {
            Stage::Record
        };

        Self {
            engine,
            stage,
            status: stage_hint(stage),
            pending: None,
            secret,
            theme: LocalOrDefault::local_or_default(),
            active_pointer: None,
            svg: NodeRef::default(),
            reset_timer: None,
            anim_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let transient = matches!(&msg, Pointer(PointerMsg::Move(_)) | Tick);

        let updated = match msg {
            Pointer(msg) => self.on_pointer(ctx, msg),
            ResetFired => {
                self.reset_timer = None;
                self.engine.reset_timer_fired().has_update()
            }
            Tick => {
                let now = now_millis();
                let redraw = self.engine.tick(now);
                if !self.engine.is_animating(now) {
                    self.anim_timer = None;
                }
                redraw.has_update()
            }
            ToggleStealth => {
                let stealth = !self.engine.is_stealth();
                self.engine.set_stealth(stealth);
                true
            }
            ToggleHaptics => {
                let haptics = !self.engine.is_haptics_enabled();
                self.engine.set_haptics(haptics);
                true
            }
            ToggleTheme => {
                let next = self.theme.unwrap_or_default().toggled();
                self.theme = Some(next);
                Theme::apply(self.theme);
                true
            }
            Lock => {
                self.stage = Stage::Locked;
                self.status = stage_hint(self.stage);
                self.engine.set_input_enabled(true);
                self.engine.clear_pattern();
                self.anim_timer = None;
                true
            }
            Forget => {
                self.secret = None;
                self.secret.local_save();
                self.pending = None;
                self.stage = Stage::Record;
                self.status = stage_hint(self.stage);
                self.reset_timer = None;
                self.engine.set_input_enabled(true);
                self.engine.clear_pattern();
                true
            }
        };

        if !transient && !self.engine.in_progress() {
            self.engine.save().local_save();
        }
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let palette = self.theme.unwrap_or_default().palette();
        let frame = self.engine.frame(now_millis());
        let callback = ctx.link().callback(Pointer);

        let cb_theme = ctx.link().callback(|_| ToggleTheme);
        let cb_stealth = ctx.link().callback(|_| ToggleStealth);
        let cb_haptics = ctx.link().callback(|_| ToggleHaptics);

        html! {
            <div class="patlock" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <small onclick={cb_theme}>{"◐"}</small>
                <nav>
                    <aside aria-live="polite">{ self.status }</aside>
                </nav>
                <LockView frame={frame} palette={palette} node={self.svg.clone()} {callback} />
                <footer>
                    <label>
                        <input type="checkbox" checked={self.engine.is_stealth()} onchange={cb_stealth} />
                        {"hide trace"}
                    </label>
                    <label>
                        <input type="checkbox" checked={self.engine.is_haptics_enabled()} onchange={cb_haptics} />
                        {"vibrate"}
                    </label>
                    { self.controls(ctx) }
                </footer>
            </div>
        }
    }
}
