//! The container owning all overlays of one image.
//!
//! Pointer events enter here. The container picks the overlay a gesture
//! belongs to, runs focus changes through the [`FocusCoordinator`] and
//! forwards the rest of the gesture to that overlay only.

use log::debug;

use crate::codec::GeometryRecord;
use crate::config::EngineConfig;
use crate::content::{fit_base_size, measure_content, CaptionContent, ContentSizer};
use crate::error::CaptionError;
use crate::event::CaptionEvent;
use crate::focus::{FocusChange, FocusCoordinator};
use crate::geometry::Size;
use crate::gesture::{PointerEvent, PointerPhase, TouchRegion};
use crate::overlay::Overlay;
use crate::transform::Limits;
use crate::OverlayId;

fn find_mut(overlays: &mut [Overlay], id: Option<OverlayId>) -> Option<&mut Overlay> {
    let id = id?;
    overlays.iter_mut().find(|o| o.id() == id)
}

#[derive(Debug, Clone)]
pub struct Container {
    config: EngineConfig,
    size: Size,
    /// Z-order, topmost last.
    overlays: Vec<Overlay>,
    focus: FocusCoordinator,
    next_id: u32,
    target: Option<OverlayId>,
    active_pointers: Vec<u32>,
    multi_pointer: bool,
}

impl Container {
    /// Create an empty container of `size` pixels.
    pub fn new(size: Size, config: EngineConfig) -> Result<Self, CaptionError> {
        Ok(Self {
            config: config.validate()?,
            size: size.sanitized(),
            overlays: Vec::new(),
            focus: FocusCoordinator::new(),
            next_id: 1,
            target: None,
            active_pointers: Vec::new(),
            multi_pointer: false,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Overlays bottom to top.
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id() == id)
    }

    fn overlay_mut(&mut self, id: OverlayId) -> Result<&mut Overlay, CaptionError> {
        self.overlays
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or(CaptionError::UnknownOverlay(id))
    }

    fn allocate_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an overlay of an already measured base size on top of the others.
    ///
    /// A base size larger than the container allows is shrunk, keeping its
    /// aspect ratio.
    pub fn add(&mut self, content: CaptionContent, base_size: Size) -> OverlayId {
        let id = self.allocate_id();
        let base_size = fit_base_size(base_size, self.size, self.config.max_border_scale);
        self.overlays
            .push(Overlay::new(id, content, base_size, self.size));
        debug!("added overlay {}", id);
        id
    }

    /// Add an overlay sized by `sizer`, shrinking text that would not fit.
    pub fn add_measured(&mut self, content: CaptionContent, sizer: &dyn ContentSizer) -> OverlayId {
        let (content, size) = self.measure(content, sizer);
        self.add(content, size)
    }

    /// Restore an exported overlay.
    pub fn add_from_record(&mut self, record: &GeometryRecord) -> OverlayId {
        let id = self.allocate_id();
        self.overlays
            .push(Overlay::from_record(id, record, self.size, &self.config));
        debug!("restored overlay {}", id);
        id
    }

    /// Remove an overlay, dropping any focus or gesture reference to it.
    pub fn remove(&mut self, id: OverlayId) -> Result<Overlay, CaptionError> {
        let index = self
            .overlays
            .iter()
            .position(|o| o.id() == id)
            .ok_or(CaptionError::UnknownOverlay(id))?;
        self.focus.on_overlay_removed(id);
        if self.target == Some(id) {
            self.target = None;
        }
        debug!("removed overlay {}", id);
        Ok(self.overlays.remove(index))
    }

    /// Replace an overlay's content and re-measure its base rectangle.
    pub fn set_content(
        &mut self,
        id: OverlayId,
        content: CaptionContent,
        sizer: &dyn ContentSizer,
    ) -> Result<(), CaptionError> {
        let (content, size) = self.measure(content, sizer);
        self.overlay_mut(id)?.set_content(content, size);
        Ok(())
    }

    fn measure(&self, content: CaptionContent, sizer: &dyn ContentSizer) -> (CaptionContent, Size) {
        let (size, style) =
            measure_content(&content, sizer, self.size, self.config.max_border_scale);
        let content = match (content, style) {
            (CaptionContent::Text(mut caption), Some(style)) => {
                caption.style = style;
                CaptionContent::Text(caption)
            }
            (content, _) => content,
        };
        (content, size)
    }

    pub fn set_enabled(&mut self, id: OverlayId, enabled: bool) -> Result<(), CaptionError> {
        self.overlay_mut(id)?.set_enabled(enabled);
        Ok(())
    }

    pub fn set_scale_rotate_locked(
        &mut self,
        id: OverlayId,
        locked: bool,
    ) -> Result<(), CaptionError> {
        self.overlay_mut(id)?.set_scale_rotate_locked(locked);
        Ok(())
    }

    pub fn focused(&self) -> Option<OverlayId> {
        self.focus.focused()
    }

    pub fn request_focus(&mut self, id: OverlayId) -> Result<Option<FocusChange>, CaptionError> {
        self.overlay_mut(id)?;
        Ok(self.focus.request_focus(&mut self.overlays, id))
    }

    pub fn release_focus(&mut self, id: OverlayId) -> Result<Option<FocusChange>, CaptionError> {
        self.overlay_mut(id)?;
        Ok(self.focus.release_focus(&mut self.overlays, id))
    }

    /// Unfocus whatever is focused.
    pub fn clear_focus(&mut self) -> Option<FocusChange> {
        self.focus.clear_focus(&mut self.overlays)
    }

    pub fn export(&self, id: OverlayId) -> Result<GeometryRecord, CaptionError> {
        self.overlay(id)
            .map(|o| o.export(self.size))
            .ok_or(CaptionError::UnknownOverlay(id))
    }

    /// Every overlay's record, bottom to top.
    pub fn export_all(&self) -> Vec<GeometryRecord> {
        self.overlays.iter().map(|o| o.export(self.size)).collect()
    }

    /// Feed one pointer sample and collect the resulting notifications.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Vec<CaptionEvent> {
        let mut events = Vec::new();
        match event.phase {
            PointerPhase::Down if self.active_pointers.is_empty() => {
                self.start_gesture(event, &mut events);
            }
            PointerPhase::Down => {
                if self.active_pointers.contains(&event.id) {
                    return events;
                }
                self.active_pointers.push(event.id);
                self.multi_pointer = true;
                // An overlay idle at this point must not turn the new pointer into a pinch
                self.check_give_up(&mut events);
                if let Some(overlay) = self.target_overlay() {
                    overlay.extra_pointer_down(event);
                }
                self.check_give_up(&mut events);
            }
            PointerPhase::Move => {
                if !self.active_pointers.contains(&event.id) {
                    return events;
                }
                self.check_give_up(&mut events);
                let limits = Limits::new(self.size, &self.config);
                if let Some(overlay) = find_mut(&mut self.overlays, self.target) {
                    overlay.pointer_move(event, &self.config, &limits, &mut events);
                }
            }
            PointerPhase::Up => {
                if !self.active_pointers.contains(&event.id) {
                    return events;
                }
                self.active_pointers.retain(|id| *id != event.id);
                self.check_give_up(&mut events);
                if let Some(overlay) = find_mut(&mut self.overlays, self.target) {
                    overlay.pointer_up(event, &self.config, &mut events);
                }
                if self.active_pointers.is_empty() {
                    self.end_gesture();
                }
            }
            PointerPhase::Cancel => {
                if let Some(overlay) = self.target_overlay() {
                    overlay.cancel(&mut events);
                }
                self.end_gesture();
            }
        }
        events
    }

    fn start_gesture(&mut self, event: &PointerEvent, events: &mut Vec<CaptionEvent>) {
        self.active_pointers.push(event.id);
        self.multi_pointer = false;

        let point = event.position();
        let icon_size = self.config.icon_size;
        let hit = self
            .overlays
            .iter()
            .rev()
            .filter(|o| o.is_enabled())
            .map(|o| (o.id(), o.hit_test(point, icon_size)))
            .find(|(_, region)| *region != TouchRegion::Outside);

        let Some((id, region)) = hit else {
            debug!("down outside every overlay");
            self.target = None;
            if let Some(change) = self.focus.clear_focus(&mut self.overlays) {
                events.push(change.into());
            }
            return;
        };

        let acquiring_focus = self.focus.focused() != Some(id);
        if let Some(change) = self.focus.request_focus(&mut self.overlays, id) {
            events.push(change.into());
        }
        self.target = Some(id);
        if let Some(overlay) = self.target_overlay() {
            overlay.begin_gesture(event, region, acquiring_focus);
        }
    }

    fn end_gesture(&mut self) {
        self.active_pointers.clear();
        self.multi_pointer = false;
        self.target = None;
    }

    fn target_overlay(&mut self) -> Option<&mut Overlay> {
        find_mut(&mut self.overlays, self.target)
    }

    /// Once a second pointer is down, an overlay with nothing to do hands the
    /// gesture back.
    fn check_give_up(&mut self, events: &mut Vec<CaptionEvent>) {
        if !self.multi_pointer {
            return;
        }
        if let Some(overlay) = self.target_overlay() {
            if !overlay.is_ignoring() && overlay.is_idle() {
                overlay.give_up(events);
            }
        }
    }
}
