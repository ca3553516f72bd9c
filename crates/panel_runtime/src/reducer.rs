//! Panel manager actions, outward events, and the transition logic that applies them.

use std::{collections::HashMap, rc::Rc};

use leptos::logging;
use panel_contract::{IntrinsicSize, PanelContent, PanelLifecycleEvent};
use panel_host::PrefsStore;
use thiserror::Error;

use crate::{
    config::LayoutConfig,
    geometry::{clamp, clamp_size_from_origin},
    grid::arrange_grid,
    interaction::InteractionController,
    model::{
        Geometry, HitRegion, InteractionState, Point, ViewportBounds, WindowDescriptor, WindowId,
    },
    persistence::{GeometryMap, LayoutPersistence},
    responsive::scale_default,
    window_manager::FocusStack,
};

#[derive(Debug, Clone, PartialEq)]
/// Commands accepted by [`PanelManager::dispatch`].
pub enum PanelAction {
    /// Register (or replace) a panel and resolve its geometry.
    Register {
        /// Panel to register.
        descriptor: WindowDescriptor,
        /// Viewport used when defaults have to be computed.
        viewport: ViewportBounds,
    },
    /// Forget a panel. Its persisted geometry is kept.
    Unregister {
        /// Panel to remove.
        window_id: WindowId,
    },
    /// Show or hide a panel. Shown panels are clamped into the last known viewport.
    SetVisible {
        /// Target panel.
        window_id: WindowId,
        /// Desired visibility.
        visible: bool,
    },
    /// Flip a panel's visibility.
    ToggleVisible {
        /// Target panel.
        window_id: WindowId,
    },
    /// Pull visibility from every attached content payload.
    SyncVisibility,
    /// Hide a panel and tell its content owner it was closed.
    Close {
        /// Panel being closed.
        window_id: WindowId,
    },
    /// Bring a panel to the front.
    Focus {
        /// Panel to raise.
        window_id: WindowId,
    },
    /// Pointer pressed on a panel's drag region or resize handle.
    PointerDown {
        /// Panel under the pointer.
        window_id: WindowId,
        /// Region hit.
        region: HitRegion,
        /// Pointer position in viewport pixels.
        pointer: Point,
    },
    /// Pointer moved while a gesture may be active.
    PointerMove {
        /// Pointer position in viewport pixels.
        pointer: Point,
        /// Current viewport.
        viewport: ViewportBounds,
    },
    /// Pointer released.
    PointerUp,
    /// Pointer left the window system.
    PointerLeave,
    /// Fit a panel around its attached content's intrinsic size.
    ResizeToContent {
        /// Target panel.
        window_id: WindowId,
        /// Current viewport.
        viewport: ViewportBounds,
    },
    /// Fit a panel around an already measured content size.
    ResizeToIntrinsic {
        /// Target panel.
        window_id: WindowId,
        /// Natural content size, without chrome.
        size: IntrinsicSize,
        /// Current viewport.
        viewport: ViewportBounds,
    },
    /// Tile every visible, arrangeable panel.
    ArrangeGrid {
        /// Current viewport.
        viewport: ViewportBounds,
    },
    /// Store a snapshot of every panel geometry.
    SaveLayout,
    /// Restore the newest snapshot.
    LoadLayout {
        /// Current viewport.
        viewport: ViewportBounds,
    },
    /// Forget persisted geometry and recompute defaults.
    ResetLayout {
        /// Current viewport.
        viewport: ViewportBounds,
    },
    /// The display surface changed size.
    ViewportResized {
        /// New viewport.
        viewport: ViewportBounds,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Notifications raised toward the host UI.
pub enum PanelEvent {
    /// A panel's geometry was committed to persistence.
    GeometryCommitted {
        /// Panel whose geometry changed.
        window_id: WindowId,
        /// Committed geometry.
        geometry: Geometry,
    },
    /// A panel was closed by the user.
    WindowClosed {
        /// Closed panel.
        window_id: WindowId,
    },
    /// A different panel is now on top.
    FocusChanged {
        /// Newly focused panel.
        window_id: WindowId,
    },
    /// A panel was shown or hidden.
    VisibilityChanged {
        /// Target panel.
        window_id: WindowId,
        /// New visibility.
        visible: bool,
    },
    /// A layout snapshot was stored.
    LayoutSaved {
        /// Id of the stored snapshot.
        snapshot_id: u64,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors for commands that reference unknown panels. Never fatal to the host.
pub enum ManagerError {
    /// The target panel is not registered.
    #[error("panel `{0}` is not registered")]
    WindowNotFound(WindowId),
}

/// Owns registered panels, their live geometry, focus order, and the active gesture.
pub struct PanelManager {
    config: LayoutConfig,
    persistence: LayoutPersistence,
    windows: Vec<WindowDescriptor>,
    geometries: GeometryMap,
    focus: FocusStack,
    interaction: InteractionController,
    contents: HashMap<WindowId, Rc<dyn PanelContent>>,
    /// Most recent viewport seen by any action, used to clamp panels as they are shown.
    last_viewport: Option<ViewportBounds>,
}

impl PanelManager {
    pub fn new(store: Rc<dyn PrefsStore>, config: LayoutConfig) -> Self {
        let persistence = LayoutPersistence::new(store, config.key_prefix.clone());
        Self {
            config,
            persistence,
            windows: Vec::new(),
            geometries: GeometryMap::new(),
            focus: FocusStack::default(),
            interaction: InteractionController::default(),
            contents: HashMap::new(),
            last_viewport: None,
        }
    }

    /// Applies a [`PanelAction`] and returns the events it raised.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::WindowNotFound`] when the action names an unregistered panel.
    pub fn dispatch(&mut self, action: PanelAction) -> Result<Vec<PanelEvent>, ManagerError> {
        match action {
            PanelAction::Register {
                descriptor,
                viewport,
            } => Ok(self.register(descriptor, viewport)),
            PanelAction::Unregister { window_id } => self.unregister(&window_id),
            PanelAction::SetVisible { window_id, visible } => {
                self.set_visible(&window_id, visible)
            }
            PanelAction::ToggleVisible { window_id } => self.toggle_visible(&window_id),
            PanelAction::SyncVisibility => Ok(self.sync_visibility()),
            PanelAction::Close { window_id } => self.close(&window_id),
            PanelAction::Focus { window_id } => self.focus(&window_id),
            PanelAction::PointerDown {
                window_id,
                region,
                pointer,
            } => self.pointer_down(&window_id, region, pointer),
            PanelAction::PointerMove { pointer, viewport } => {
                Ok(self.pointer_move(pointer, viewport))
            }
            PanelAction::PointerUp | PanelAction::PointerLeave => Ok(self.pointer_release()),
            PanelAction::ResizeToContent {
                window_id,
                viewport,
            } => self.resize_to_content(&window_id, viewport),
            PanelAction::ResizeToIntrinsic {
                window_id,
                size,
                viewport,
            } => self.resize_to_intrinsic(&window_id, size, viewport),
            PanelAction::ArrangeGrid { viewport } => Ok(self.arrange_grid(viewport)),
            PanelAction::SaveLayout => Ok(self.save_layout()),
            PanelAction::LoadLayout { viewport } => Ok(self.load_layout(viewport)),
            PanelAction::ResetLayout { viewport } => Ok(self.reset_layout(viewport)),
            PanelAction::ViewportResized { viewport } => Ok(self.viewport_resized(viewport)),
        }
    }

    /// Registers `descriptor`, replacing any panel with the same id.
    ///
    /// Valid persisted geometry wins (per-window entry first, then the aggregate mapping);
    /// otherwise the default is scaled to `viewport`. Nothing is written back. A descriptor without
    /// a minimum size takes the configured default.
    pub fn register(
        &mut self,
        mut descriptor: WindowDescriptor,
        viewport: ViewportBounds,
    ) -> Vec<PanelEvent> {
        descriptor
            .min_size
            .get_or_insert(self.config.default_min_size);
        let window_id = descriptor.id.clone();
        self.interaction.cancel_for(&window_id);
        self.last_viewport = Some(viewport);

        let geometry = self.resolve_geometry(&descriptor, viewport);
        self.geometries.insert(window_id.clone(), geometry);
        match self.windows.iter().position(|w| w.id == window_id) {
            Some(index) => self.windows[index] = descriptor,
            None => self.windows.push(descriptor),
        }
        self.focus.track(&window_id);
        Vec::new()
    }

    pub fn unregister(&mut self, window_id: &WindowId) -> Result<Vec<PanelEvent>, ManagerError> {
        let index = self.index_of(window_id)?;
        self.windows.remove(index);
        self.geometries.remove(window_id);
        self.focus.remove(window_id);
        self.interaction.cancel_for(window_id);
        self.contents.remove(window_id);
        Ok(Vec::new())
    }

    /// Attaches the content payload hosted by `window_id`.
    pub fn attach_content(
        &mut self,
        window_id: &WindowId,
        content: Rc<dyn PanelContent>,
    ) -> Result<(), ManagerError> {
        self.index_of(window_id)?;
        self.contents.insert(window_id.clone(), content);
        Ok(())
    }

    pub fn set_visible(
        &mut self,
        window_id: &WindowId,
        visible: bool,
    ) -> Result<Vec<PanelEvent>, ManagerError> {
        let index = self.index_of(window_id)?;
        let mut events = Vec::new();
        if self.windows[index].is_visible == visible {
            return Ok(events);
        }

        let hiding_active = !visible
            && self
                .interaction
                .active()
                .is_some_and(|gesture| &gesture.window_id == window_id);
        if hiding_active {
            self.finish_gesture(&mut events);
        }

        self.windows[index].is_visible = visible;
        if let (true, Some(viewport)) = (visible, self.last_viewport) {
            let min_size = self.windows[index].min_size();
            if let Some(geometry) = self.geometries.get_mut(window_id) {
                *geometry = clamp(*geometry, viewport, min_size);
            }
        }
        self.notify(
            window_id,
            if visible {
                PanelLifecycleEvent::Shown
            } else {
                PanelLifecycleEvent::Hidden
            },
        );
        events.push(PanelEvent::VisibilityChanged {
            window_id: window_id.clone(),
            visible,
        });
        Ok(events)
    }

    pub fn toggle_visible(&mut self, window_id: &WindowId) -> Result<Vec<PanelEvent>, ManagerError> {
        let index = self.index_of(window_id)?;
        let visible = !self.windows[index].is_visible;
        self.set_visible(window_id, visible)
    }

    /// Applies each attached payload's `is_visible()` to its panel.
    pub fn sync_visibility(&mut self) -> Vec<PanelEvent> {
        let wanted: Vec<(WindowId, bool)> = self
            .windows
            .iter()
            .filter_map(|descriptor| {
                let content = self.contents.get(&descriptor.id)?;
                Some((descriptor.id.clone(), content.is_visible()))
            })
            .collect();

        let mut events = Vec::new();
        for (window_id, visible) in wanted {
            if let Ok(changed) = self.set_visible(&window_id, visible) {
                events.extend(changed);
            }
        }
        events
    }

    /// Hides the panel and notifies its content owner. The descriptor stays registered.
    pub fn close(&mut self, window_id: &WindowId) -> Result<Vec<PanelEvent>, ManagerError> {
        let index = self.index_of(window_id)?;
        if !self.windows[index].flags.closable {
            logging::warn!("ignoring close for non-closable panel `{window_id}`");
            return Ok(Vec::new());
        }

        let mut events = self.set_visible(window_id, false)?;
        if let Some(content) = self.contents.get(window_id) {
            content.on_close_requested();
            content.on_lifecycle(PanelLifecycleEvent::Closed);
        }
        events.push(PanelEvent::WindowClosed {
            window_id: window_id.clone(),
        });
        Ok(events)
    }

    pub fn focus(&mut self, window_id: &WindowId) -> Result<Vec<PanelEvent>, ManagerError> {
        self.index_of(window_id)?;
        let mut events = Vec::new();
        self.raise(window_id, &mut events);
        Ok(events)
    }

    /// Starts a drag or resize gesture. Any gesture already in flight is committed first.
    ///
    /// Hidden panels, resize handles on fixed-size panels, and non-finite pointers are ignored.
    pub fn pointer_down(
        &mut self,
        window_id: &WindowId,
        region: HitRegion,
        pointer: Point,
    ) -> Result<Vec<PanelEvent>, ManagerError> {
        let index = self.index_of(window_id)?;
        let descriptor = &self.windows[index];
        let mut events = Vec::new();
        if !descriptor.is_visible
            || (region == HitRegion::ResizeHandle && !descriptor.flags.resizable)
        {
            return Ok(events);
        }
        if !pointer.is_finite() {
            logging::warn!("ignoring pointer-down with non-finite position on `{window_id}`");
            return Ok(events);
        }

        if !self.interaction.is_idle() {
            self.finish_gesture(&mut events);
        }
        let geometry = self.geometries.get(window_id).copied().unwrap_or_default();
        if self
            .interaction
            .begin(window_id.clone(), region, pointer, geometry)
        {
            self.raise(window_id, &mut events);
        }
        Ok(events)
    }

    /// Moves the active gesture's panel. The geometry updates in place and is not persisted.
    pub fn pointer_move(&mut self, pointer: Point, viewport: ViewportBounds) -> Vec<PanelEvent> {
        self.last_viewport = Some(viewport);
        let Some(gesture) = self.interaction.active() else {
            return Vec::new();
        };
        let Some(min_size) = self
            .windows
            .iter()
            .find(|w| w.id == gesture.window_id)
            .map(WindowDescriptor::min_size)
        else {
            return Vec::new();
        };
        if let Some(geometry) = self.geometries.get_mut(&gesture.window_id) {
            self.interaction
                .track(pointer, geometry, viewport, min_size);
        }
        Vec::new()
    }

    /// Ends the active gesture and commits the panel's geometry.
    pub fn pointer_release(&mut self) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        self.finish_gesture(&mut events);
        events
    }

    /// Measures the attached content and fits the panel around it.
    pub fn resize_to_content(
        &mut self,
        window_id: &WindowId,
        viewport: ViewportBounds,
    ) -> Result<Vec<PanelEvent>, ManagerError> {
        self.index_of(window_id)?;
        let measured = self
            .contents
            .get(window_id)
            .and_then(|content| content.measure_intrinsic_size());
        match measured {
            Some(size) => self.resize_to_intrinsic(window_id, size, viewport),
            None => {
                logging::log!("panel `{window_id}` has no measurable content");
                Ok(Vec::new())
            }
        }
    }

    /// Sizes the panel to `size` plus chrome, keeping its origin and staying inside `viewport`.
    pub fn resize_to_intrinsic(
        &mut self,
        window_id: &WindowId,
        size: IntrinsicSize,
        viewport: ViewportBounds,
    ) -> Result<Vec<PanelEvent>, ManagerError> {
        let index = self.index_of(window_id)?;
        let descriptor = &self.windows[index];
        let mut events = Vec::new();
        if !descriptor.flags.resizable {
            return Ok(events);
        }
        if !size.is_valid() {
            logging::warn!("ignoring invalid intrinsic size for `{window_id}`: {size:?}");
            return Ok(events);
        }

        let min_size = descriptor.min_size();
        self.last_viewport = Some(viewport);
        let overhead = self.config.chrome.overhead();
        let current = self.geometries.get(window_id).copied().unwrap_or_default();
        let requested = Geometry::new(
            current.x,
            current.y,
            size.width + overhead.width,
            size.height + overhead.height,
        );
        self.geometries.insert(
            window_id.clone(),
            clamp_size_from_origin(requested, viewport, min_size),
        );
        self.commit_all(std::slice::from_ref(window_id), &mut events);
        Ok(events)
    }

    /// Tiles visible, arrangeable panels in registry order. Hidden panels keep their geometry.
    pub fn arrange_grid(&mut self, viewport: ViewportBounds) -> Vec<PanelEvent> {
        self.last_viewport = Some(viewport);
        let mut events = Vec::new();
        let visible: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|w| w.is_visible && w.flags.arrangeable)
            .map(|w| w.id.clone())
            .collect();
        if visible.is_empty() {
            return events;
        }

        self.finish_gesture(&mut events);
        let layout = arrange_grid(&visible, viewport, &self.config.grid);
        for descriptor in &self.windows {
            if let Some(cell) = layout.get(&descriptor.id) {
                self.geometries.insert(
                    descriptor.id.clone(),
                    clamp(*cell, viewport, descriptor.min_size()),
                );
            }
        }
        self.commit_all(&visible, &mut events);
        events
    }

    /// Snapshots every panel geometry, then prunes old snapshots.
    pub fn save_layout(&mut self) -> Vec<PanelEvent> {
        match self.persistence.save_named_snapshot(&self.geometries) {
            Ok(snapshot_id) => {
                if let Err(err) = self.persistence.prune_snapshots(self.config.snapshot_keep) {
                    logging::warn!("pruning layout snapshots failed: {err}");
                }
                logging::log!("saved layout snapshot {snapshot_id}");
                vec![PanelEvent::LayoutSaved { snapshot_id }]
            }
            Err(err) => {
                logging::warn!("saving layout snapshot failed: {err}");
                Vec::new()
            }
        }
    }

    /// Restores the newest snapshot onto registered panels and commits the result.
    pub fn load_layout(&mut self, viewport: ViewportBounds) -> Vec<PanelEvent> {
        self.last_viewport = Some(viewport);
        let mut events = Vec::new();
        let Some(snapshot) = self.persistence.load_latest_snapshot() else {
            logging::log!("no layout snapshot to load");
            return events;
        };

        self.finish_gesture(&mut events);
        let mut applied = Vec::new();
        for descriptor in &self.windows {
            let Some(stored) = snapshot.windows.get(&descriptor.id) else {
                continue;
            };
            let geometry = if descriptor.is_visible {
                clamp(*stored, viewport, descriptor.min_size())
            } else {
                *stored
            };
            self.geometries.insert(descriptor.id.clone(), geometry);
            applied.push(descriptor.id.clone());
        }
        logging::log!(
            "loaded layout snapshot {} onto {} panels",
            snapshot.snapshot_id,
            applied.len()
        );
        self.commit_all(&applied, &mut events);
        events
    }

    /// Clears persisted per-window and aggregate geometry and recomputes every default.
    ///
    /// Recomputed geometry is not persisted, so later registrations scale afresh.
    pub fn reset_layout(&mut self, viewport: ViewportBounds) -> Vec<PanelEvent> {
        self.last_viewport = Some(viewport);
        self.interaction.release();
        if let Err(err) = self.persistence.clear_window_entries() {
            logging::warn!("clearing persisted layout failed: {err}");
        }
        for descriptor in &self.windows {
            self.geometries.insert(
                descriptor.id.clone(),
                default_geometry(&self.config, descriptor, viewport),
            );
        }
        logging::log!("layout reset for {} panels", self.windows.len());
        Vec::new()
    }

    /// Keeps visible panels inside a new viewport without rescaling them.
    pub fn viewport_resized(&mut self, viewport: ViewportBounds) -> Vec<PanelEvent> {
        self.last_viewport = Some(viewport);
        for descriptor in self.windows.iter().filter(|w| w.is_visible) {
            if let Some(geometry) = self.geometries.get_mut(&descriptor.id) {
                *geometry = clamp(*geometry, viewport, descriptor.min_size());
            }
        }
        Vec::new()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn descriptors(&self) -> &[WindowDescriptor] {
        &self.windows
    }

    pub fn descriptor(&self, window_id: &WindowId) -> Option<&WindowDescriptor> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn geometry(&self, window_id: &WindowId) -> Option<Geometry> {
        self.geometries.get(window_id).copied()
    }

    pub fn geometries(&self) -> &GeometryMap {
        &self.geometries
    }

    /// Visible panel ids in registry order.
    pub fn visible_ids(&self) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|w| w.is_visible)
            .map(|w| w.id.clone())
            .collect()
    }

    pub fn interaction_state(&self, window_id: &WindowId) -> InteractionState {
        self.interaction.state_of(window_id)
    }

    pub fn focused(&self) -> Option<&WindowId> {
        self.focus.focused()
    }

    pub fn z_index(&self, window_id: &WindowId) -> Option<u32> {
        self.focus.z_index(window_id)
    }

    fn resolve_geometry(&self, descriptor: &WindowDescriptor, viewport: ViewportBounds) -> Geometry {
        let persisted = self.persistence.load(&descriptor.id).or_else(|| {
            self.persistence
                .load_aggregate()
                .and_then(|mut all| all.remove(&descriptor.id))
        });
        match persisted {
            Some(geometry) if descriptor.is_visible => {
                clamp(geometry, viewport, descriptor.min_size())
            }
            Some(geometry) => geometry,
            None => default_geometry(&self.config, descriptor, viewport),
        }
    }

    fn index_of(&self, window_id: &WindowId) -> Result<usize, ManagerError> {
        self.windows
            .iter()
            .position(|w| &w.id == window_id)
            .ok_or_else(|| ManagerError::WindowNotFound(window_id.clone()))
    }

    fn raise(&mut self, window_id: &WindowId, events: &mut Vec<PanelEvent>) {
        let previous = self.focus.focused().cloned();
        if !self.focus.raise(window_id) {
            return;
        }
        if let Some(previous) = previous {
            self.notify(&previous, PanelLifecycleEvent::Blurred);
        }
        self.notify(window_id, PanelLifecycleEvent::Focused);
        events.push(PanelEvent::FocusChanged {
            window_id: window_id.clone(),
        });
    }

    fn finish_gesture(&mut self, events: &mut Vec<PanelEvent>) {
        if let Some(gesture) = self.interaction.release() {
            self.commit_all(std::slice::from_ref(&gesture.window_id), events);
        }
    }

    /// Persists each panel's geometry and merges it into the aggregate mapping. Store failures
    /// are logged and the in-memory geometry stays authoritative.
    ///
    /// Only committed panels reach the aggregate; untouched defaults keep rescaling on later
    /// registrations.
    fn commit_all(&mut self, window_ids: &[WindowId], events: &mut Vec<PanelEvent>) {
        let mut aggregate = self.persistence.load_aggregate().unwrap_or_default();
        for window_id in window_ids {
            let Some(geometry) = self.geometries.get(window_id).copied() else {
                continue;
            };
            if let Err(err) = self.persistence.save(window_id, geometry) {
                logging::warn!("persisting geometry for `{window_id}` failed: {err}");
            }
            aggregate.insert(window_id.clone(), geometry);
            events.push(PanelEvent::GeometryCommitted {
                window_id: window_id.clone(),
                geometry,
            });
        }
        if let Err(err) = self.persistence.save_aggregate(&aggregate) {
            logging::warn!("persisting layout aggregate failed: {err}");
        }
    }

    fn notify(&self, window_id: &WindowId, event: PanelLifecycleEvent) {
        if let Some(content) = self.contents.get(window_id) {
            content.on_lifecycle(event);
        }
    }
}

fn default_geometry(
    config: &LayoutConfig,
    descriptor: &WindowDescriptor,
    viewport: ViewportBounds,
) -> Geometry {
    scale_default(
        descriptor.default_position,
        descriptor.default_size,
        viewport,
        config.reference_design,
        config.edge_margin,
        descriptor.min_size(),
    )
}
