use crate::theme::Palette;
use patlock_core::{DisplayMode, Frame, RingFrame, RingPhase, ease_out_cubic};
use web_sys::PointerEvent;
use yew::prelude::*;

/// Logical edge of the square view box; clients scale the element with CSS
/// and pointer coordinates are mapped back into these units.
pub(crate) const VIEW_UNITS: f32 = 300.0;

const DOT_RADIUS: f32 = 8.0;
const LIT_RADIUS: f32 = 12.0;
const HALO_RADIUS: f32 = 30.0;
const LINE_WIDTH: f32 = VIEW_UNITS / 30.0;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PointerMsg {
    Down(PointerEvent),
    Move(PointerEvent),
    Up(PointerEvent),
    Cancel(PointerEvent),
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct LockProps {
    pub frame: Frame,
    pub palette: Palette,
    pub node: NodeRef,
    pub callback: Callback<PointerMsg>,
}

/// Stateless renderer of one [`Frame`]. All drawing policy (stealth, error
/// retraction, reveal) is already baked into the frame by the engine.
#[function_component(LockView)]
pub(crate) fn lock_view(props: &LockProps) -> Html {
    let LockProps {
        frame,
        palette,
        node,
        callback,
    } = props.clone();

    let error = frame.mode == DisplayMode::Wrong;

    let onpointerdown = {
        let callback = callback.clone();
        Callback::from(move |e: PointerEvent| {
            log::trace!("pointer down #{}", e.pointer_id());
            callback.emit(PointerMsg::Down(e));
        })
    };

    let onpointermove = {
        let callback = callback.clone();
        Callback::from(move |e: PointerEvent| {
            callback.emit(PointerMsg::Move(e));
        })
    };

    let onpointerup = {
        let callback = callback.clone();
        Callback::from(move |e: PointerEvent| {
            log::trace!("pointer up #{}", e.pointer_id());
            callback.emit(PointerMsg::Up(e));
        })
    };

    let onpointercancel = {
        let callback = callback.clone();
        Callback::from(move |e: PointerEvent| {
            log::trace!("pointer cancel #{}", e.pointer_id());
            callback.emit(PointerMsg::Cancel(e));
        })
    };

    let line = if error { palette.error } else { palette.line };
    let points = frame
        .path
        .iter()
        .chain(frame.rubber.as_ref())
        .map(|point| format!("{:.1},{:.1}", point.x, point.y))
        .collect::<Vec<_>>()
        .join(" ");

    html! {
        <svg
            ref={node}
            class="patlock-grid"
            viewBox={format!("0 0 {VIEW_UNITS} {VIEW_UNITS}")}
            style="touch-action: none"
            {onpointerdown} {onpointermove} {onpointerup} {onpointercancel}
        >
            { for frame.rings.iter().map(|ring| ring_view(ring, &palette, error)) }
            if !points.is_empty() {
                <polyline
                    points={points}
                    fill="none"
                    stroke={line}
                    stroke-width={LINE_WIDTH.to_string()}
                    stroke-linecap="round"
                    stroke-linejoin="round"
                />
            }
        </svg>
    }
}

fn ring_view(ring: &RingFrame, palette: &Palette, error: bool) -> Html {
    let RingFrame {
        center,
        lit,
        phase,
        progress,
        ..
    } = *ring;

    let fill = match (lit, error) {
        (true, true) => palette.error,
        (true, false) => palette.dot,
        (false, _) => palette.dim,
    };
    let radius = if lit { LIT_RADIUS } else { DOT_RADIUS };

    // The halo swells out of the dot and fades; past full progress there is
    // nothing left to draw.
    let halo = (phase != RingPhase::Idle && progress < 1.0).then(|| {
        let eased = ease_out_cubic(progress);
        let stroke = if phase == RingPhase::Error {
            palette.error
        } else {
            palette.dim
        };
        let r = DOT_RADIUS + (HALO_RADIUS - DOT_RADIUS) * eased;
        html! {
            <circle
                cx={format!("{:.1}", center.x)}
                cy={format!("{:.1}", center.y)}
                r={format!("{r:.1}")}
                fill="none"
                stroke={stroke}
                stroke-width="2"
                opacity={format!("{:.2}", 1.0 - eased)}
            />
        }
    });

    html! {
        <>
            <circle
                cx={format!("{:.1}", center.x)}
                cy={format!("{:.1}", center.y)}
                r={radius.to_string()}
                fill={fill}
            />
            { halo }
        </>
    }
}
