//! Focus/z-order stack used by the panel manager.

use crate::model::WindowId;

/// Stacking order of panels, bottom first. The last entry is the focused panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusStack {
    order: Vec<WindowId>,
}

impl FocusStack {
    /// Appends `window_id` at the bottom of the stack if it is not tracked yet.
    pub fn track(&mut self, window_id: &WindowId) {
        if !self.order.contains(window_id) {
            self.order.insert(0, window_id.clone());
        }
    }

    /// Focuses and raises `window_id` to the top of the stack.
    ///
    /// Returns `true` when the focused panel changed.
    pub fn raise(&mut self, window_id: &WindowId) -> bool {
        if self.focused() == Some(window_id) {
            return false;
        }
        self.order.retain(|id| id != window_id);
        self.order.push(window_id.clone());
        true
    }

    pub fn remove(&mut self, window_id: &WindowId) {
        self.order.retain(|id| id != window_id);
    }

    pub fn focused(&self) -> Option<&WindowId> {
        self.order.last()
    }

    /// 1-based stacking index, higher is closer to the viewer.
    pub fn z_index(&self, window_id: &WindowId) -> Option<u32> {
        self.order
            .iter()
            .position(|id| id == window_id)
            .map(|idx| (idx + 1) as u32)
    }

    pub fn order(&self) -> &[WindowId] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn id(raw: &str) -> WindowId {
        WindowId::new(raw)
    }

    #[test]
    fn raise_moves_window_to_top_and_reports_change() {
        let mut stack = FocusStack::default();
        stack.track(&id("scope"));
        stack.track(&id("status"));
        assert_eq!(stack.order(), &[id("status"), id("scope")]);

        assert!(stack.raise(&id("status")));
        assert_eq!(stack.focused(), Some(&id("status")));
        assert_eq!(stack.z_index(&id("status")), Some(2));
        assert_eq!(stack.z_index(&id("scope")), Some(1));
    }

    #[test]
    fn raising_focused_window_is_noop() {
        let mut stack = FocusStack::default();
        stack.raise(&id("scope"));
        let before = stack.clone();
        assert!(!stack.raise(&id("scope")));
        assert_eq!(stack, before);
    }

    #[test]
    fn tracking_never_steals_focus() {
        let mut stack = FocusStack::default();
        stack.raise(&id("scope"));
        stack.track(&id("fft"));
        stack.track(&id("scope"));
        assert_eq!(stack.focused(), Some(&id("scope")));
        assert_eq!(stack.order().len(), 2);
    }

    #[test]
    fn remove_drops_window() {
        let mut stack = FocusStack::default();
        stack.raise(&id("scope"));
        stack.raise(&id("fft"));
        stack.remove(&id("fft"));
        assert_eq!(stack.focused(), Some(&id("scope")));
        assert_eq!(stack.z_index(&id("fft")), None);
    }
}
