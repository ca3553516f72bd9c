//! Pointer-driven drag/resize state machine shared by every panel.
//!
//! Pointer capture is exclusive, so a single controller tracks the one active gesture for the
//! whole system; every other panel reads as [`InteractionState::Idle`].

use crate::{
    geometry::{clamp, clamp_size_from_origin},
    model::{Geometry, HitRegion, InteractionState, Point, Size, ViewportBounds, WindowId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
}

#[derive(Debug, Clone, PartialEq)]
/// The gesture currently holding pointer capture.
pub struct ActiveGesture {
    pub window_id: WindowId,
    pub kind: GestureKind,
    /// Pointer offset from the panel origin (drag) or far corner (resize), fixed for the gesture.
    pub anchor: Point,
}

impl ActiveGesture {
    pub fn state(&self) -> InteractionState {
        match self.kind {
            GestureKind::Drag => InteractionState::Dragging {
                pointer_anchor: self.anchor,
            },
            GestureKind::Resize => InteractionState::Resizing {
                pointer_anchor: self.anchor,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionController {
    active: Option<ActiveGesture>,
}

impl InteractionController {
    pub fn state_of(&self, window_id: &WindowId) -> InteractionState {
        match &self.active {
            Some(gesture) if &gesture.window_id == window_id => gesture.state(),
            _ => InteractionState::Idle,
        }
    }

    pub fn active(&self) -> Option<&ActiveGesture> {
        self.active.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Starts a gesture on `window_id`. Returns `false` and stays put for non-finite pointers.
    ///
    /// Callers must release any gesture already in progress first.
    pub fn begin(
        &mut self,
        window_id: WindowId,
        region: HitRegion,
        pointer: Point,
        geometry: Geometry,
    ) -> bool {
        if !pointer.is_finite() {
            return false;
        }
        let (kind, reference) = match region {
            HitRegion::DragRegion => (GestureKind::Drag, geometry.origin()),
            HitRegion::ResizeHandle => (GestureKind::Resize, geometry.far_corner()),
        };
        self.active = Some(ActiveGesture {
            window_id,
            kind,
            anchor: pointer.offset_from(reference),
        });
        true
    }

    /// Applies a pointer move to the active gesture's geometry in place.
    ///
    /// Returns `true` when `geometry` changed. Non-finite pointers are ignored.
    pub fn track(
        &self,
        pointer: Point,
        geometry: &mut Geometry,
        viewport: ViewportBounds,
        min_size: Size,
    ) -> bool {
        let Some(gesture) = self.active.as_ref() else {
            return false;
        };
        if !pointer.is_finite() {
            return false;
        }

        let next = match gesture.kind {
            GestureKind::Drag => clamp(
                Geometry::from_parts(pointer.offset_from(gesture.anchor), geometry.size()),
                viewport,
                min_size,
            ),
            GestureKind::Resize => {
                let corner = pointer.offset_from(gesture.anchor);
                let size = Size::new(corner.x - geometry.x, corner.y - geometry.y).max(min_size);
                clamp_size_from_origin(
                    Geometry::from_parts(geometry.origin(), size),
                    viewport,
                    min_size,
                )
            }
        };

        if next == *geometry {
            return false;
        }
        *geometry = next;
        true
    }

    /// Ends the active gesture and hands it back so the caller can commit.
    pub fn release(&mut self) -> Option<ActiveGesture> {
        self.active.take()
    }

    /// Drops the gesture on `window_id` without committing. Returns whether one was dropped.
    pub fn cancel_for(&mut self, window_id: &WindowId) -> bool {
        if self
            .active
            .as_ref()
            .is_some_and(|gesture| &gesture.window_id == window_id)
        {
            self.active = None;
            return true;
        }
        false
    }
}
