//! One caption overlay: content, transform and gesture state.

use glam::DVec2;
use log::debug;

use crate::codec::GeometryRecord;
use crate::config::EngineConfig;
use crate::content::{CaptionContent, TextStyle};
use crate::event::CaptionEvent;
use crate::focus::Focusable;
use crate::geometry::{Quad, Rect, Size};
use crate::gesture::{GestureClassifier, Motion, PointerEvent, Release, TouchMode, TouchRegion};
use crate::transform::{
    apply_move, apply_scale_rotate, handle_scale_rotate, Limits, RotationSnap, TransformState,
};
use crate::OverlayId;

/// Hit-test `point` against an overlay in priority order: corner handle,
/// delete handle, border polygon.
fn region_at(state: &TransformState, icon_size: f64, point: DVec2) -> TouchRegion {
    let corners = state.corners();
    if Rect::square(corners.right_bottom, icon_size).contains(point) {
        TouchRegion::CornerHandle
    } else if Rect::square(corners.left_top, icon_size).contains(point) {
        TouchRegion::DeleteHandle
    } else if corners.contains(point) {
        TouchRegion::Inside
    } else {
        TouchRegion::Outside
    }
}

#[derive(Debug, Clone)]
pub struct Overlay {
    id: OverlayId,
    content: CaptionContent,
    state: TransformState,
    snap: RotationSnap,
    classifier: GestureClassifier,
    focused: bool,
    enabled: bool,
    scale_rotate_locked: bool,
}

impl Overlay {
    /// A new overlay of `base_size` centered in `container`, untransformed.
    ///
    /// Image captions start with scale and rotation locked.
    pub fn new(id: OverlayId, content: CaptionContent, base_size: Size, container: Size) -> Self {
        let base = Rect::from_center_size(container.sanitized().center(), base_size.sanitized());
        Self::with_state(id, content, TransformState::new(base))
    }

    /// An overlay restored from an exported record.
    pub fn from_record(
        id: OverlayId,
        record: &GeometryRecord,
        container: Size,
        config: &EngineConfig,
    ) -> Self {
        let state = record.import(container, config.max_border_scale);
        Self::with_state(id, record.content.clone(), state)
    }

    fn with_state(id: OverlayId, content: CaptionContent, state: TransformState) -> Self {
        Self {
            id,
            scale_rotate_locked: content.is_image(),
            content,
            snap: RotationSnap::new(state.degree()),
            state,
            classifier: GestureClassifier::new(),
            focused: false,
            enabled: true,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn content(&self) -> &CaptionContent {
        &self.content
    }

    pub fn transform(&self) -> &TransformState {
        &self.state
    }

    pub fn corners(&self) -> Quad {
        self.state.corners()
    }

    pub fn center(&self) -> DVec2 {
        self.state.center()
    }

    pub fn scale(&self) -> f64 {
        self.state.scale()
    }

    pub fn degree(&self) -> f64 {
        self.state.degree()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// A disabled overlay ignores all pointer input.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_scale_rotate_locked(&self) -> bool {
        self.scale_rotate_locked
    }

    /// When locked only dragging is possible.
    pub fn set_scale_rotate_locked(&mut self, locked: bool) {
        self.scale_rotate_locked = locked;
    }

    pub fn region(&self) -> TouchRegion {
        self.classifier.region()
    }

    pub fn mode(&self) -> TouchMode {
        self.classifier.mode()
    }

    /// Hit area of the top-left delete handle.
    pub fn delete_handle(&self, icon_size: f64) -> Rect {
        Rect::square(self.state.corners().left_top, icon_size)
    }

    /// Hit area of the bottom-right scale/rotate handle.
    pub fn corner_handle(&self, icon_size: f64) -> Rect {
        Rect::square(self.state.corners().right_bottom, icon_size)
    }

    pub fn hit_test(&self, point: DVec2, icon_size: f64) -> TouchRegion {
        region_at(&self.state, icon_size, point)
    }

    /// Text style as currently drawn, with font size and padding multiplied by
    /// the overlay's scale. `None` for image captions.
    pub fn text_style(&self) -> Option<TextStyle> {
        match &self.content {
            CaptionContent::Text(caption) => Some(caption.style.scaled(self.state.scale())),
            CaptionContent::Image(_) => None,
        }
    }

    /// Swap the content and its measured base size. Center and rotation are
    /// kept, scale returns to 1.
    pub fn set_content(&mut self, content: CaptionContent, base_size: Size) {
        self.content = content;
        self.state.rebase(base_size);
        self.snap.sync(self.state.degree());
    }

    pub fn export(&self, container: Size) -> GeometryRecord {
        GeometryRecord::export(&self.state, container, &self.content)
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.classifier.is_idle()
    }

    pub(crate) fn is_ignoring(&self) -> bool {
        self.classifier.is_ignoring()
    }

    /// First pointer of a gesture landed on this overlay at `region`.
    ///
    /// `acquiring_focus` is set when this touch is what focused the overlay.
    pub(crate) fn begin_gesture(
        &mut self,
        event: &PointerEvent,
        region: TouchRegion,
        acquiring_focus: bool,
    ) {
        self.classifier.begin(event, region, acquiring_focus);
        self.snap.sync(self.state.degree());
        debug!(
            "overlay {} down region={:?} mode={:?}",
            self.id,
            self.classifier.region(),
            self.classifier.mode()
        );
    }

    pub(crate) fn extra_pointer_down(&mut self, event: &PointerEvent) {
        let inside = self.state.contains(event.position());
        self.classifier
            .second_down(event, inside, self.scale_rotate_locked);
    }

    pub(crate) fn pointer_move(
        &mut self,
        event: &PointerEvent,
        config: &EngineConfig,
        limits: &Limits,
        events: &mut Vec<CaptionEvent>,
    ) {
        let next = match self.classifier.moved(event, config) {
            Motion::Idle => None,
            Motion::Drag { delta, beyond_slop } => {
                if beyond_slop && self.classifier.mark_started() {
                    events.push(CaptionEvent::GestureStart { overlay: self.id });
                }
                apply_move(&self.state, delta, limits.container)
            }
            Motion::Pinch {
                factor,
                rotate_degrees,
            } => {
                let rotate = if config.snap_pinch_rotation {
                    self.snap.adjust(
                        self.state.degree(),
                        rotate_degrees,
                        config.snap_threshold_degrees,
                    )
                } else {
                    rotate_degrees
                };
                self.scale_rotate(factor, rotate, limits, events)
            }
            Motion::Handle { previous, current } if !self.scale_rotate_locked => {
                let (factor, rotate) = handle_scale_rotate(self.state.center(), previous, current);
                let rotate =
                    self.snap
                        .adjust(self.state.degree(), rotate, config.snap_threshold_degrees);
                self.scale_rotate(factor, rotate, limits, events)
            }
            Motion::Handle { .. } => None,
        };

        if let Some(next) = next {
            self.state = next;
            let pinching = self.classifier.mode() == TouchMode::PointerScaleRotate;
            if pinching && !config.snap_pinch_rotation {
                self.snap.sync(self.state.degree());
            }
            events.push(CaptionEvent::Redraw { overlay: self.id });
        }
    }

    fn scale_rotate(
        &mut self,
        factor: f64,
        rotate: f64,
        limits: &Limits,
        events: &mut Vec<CaptionEvent>,
    ) -> Option<TransformState> {
        let next = apply_scale_rotate(&self.state, factor, rotate, limits)?;
        self.classifier.mark_manipulated();
        if self.classifier.mark_started() {
            events.push(CaptionEvent::GestureStart { overlay: self.id });
        }
        Some(next)
    }

    pub(crate) fn pointer_up(
        &mut self,
        event: &PointerEvent,
        config: &EngineConfig,
        events: &mut Vec<CaptionEvent>,
    ) {
        let state = self.state;
        let icon_size = config.icon_size;
        let release = self.classifier.pointer_up(event, config.click_timeout_ms, |p| {
            region_at(&state, icon_size, p)
        });
        match release {
            Release::Ignored => {}
            Release::Continue => self.snap.sync(self.state.degree()),
            Release::Finished { click, ended } => {
                match click {
                    Some(TouchRegion::Inside) => {
                        events.push(CaptionEvent::InsideClick { overlay: self.id })
                    }
                    Some(TouchRegion::DeleteHandle) => {
                        events.push(CaptionEvent::DeleteHandleClick { overlay: self.id })
                    }
                    Some(TouchRegion::CornerHandle) | Some(TouchRegion::Outside) | None => {}
                }
                if ended {
                    events.push(CaptionEvent::GestureEnd { overlay: self.id });
                }
            }
        }
    }

    /// Stop reacting to the rest of the current gesture.
    pub(crate) fn give_up(&mut self, events: &mut Vec<CaptionEvent>) {
        debug!("overlay {} gives up the gesture", self.id);
        if self.classifier.give_up() {
            events.push(CaptionEvent::GestureEnd { overlay: self.id });
        }
    }

    pub(crate) fn cancel(&mut self, events: &mut Vec<CaptionEvent>) {
        if self.classifier.cancel() {
            events.push(CaptionEvent::GestureEnd { overlay: self.id });
        }
    }
}

impl Focusable for Overlay {
    fn overlay_id(&self) -> OverlayId {
        self.id
    }

    fn set_focus_flag(&mut self, focused: bool) {
        self.focused = focused;
    }
}
