//! Shared contract between the panel layout runtime and the content hosted inside each panel.
//!
//! The runtime treats content as an opaque payload. The only couplings are a visibility flag,
//! an optional intrinsic-size measurement used by resize-to-content, a close request, and
//! lifecycle notifications.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Natural, unconstrained size of a content payload in CSS pixels.
pub struct IntrinsicSize {
    /// Content width without window chrome.
    pub width: f64,
    /// Content height without window chrome.
    pub height: f64,
}

impl IntrinsicSize {
    /// Creates a size from width and height.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` when both dimensions are finite and non-negative.
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Lifecycle notifications delivered by the runtime to attached content.
pub enum PanelLifecycleEvent {
    /// Panel moved to the top of the focus order.
    Focused,
    /// Panel lost the top of the focus order.
    Blurred,
    /// Panel became visible.
    Shown,
    /// Panel was hidden; its geometry is retained.
    Hidden,
    /// Panel was closed by the user.
    Closed,
}

/// Capabilities a content payload exposes to the layout runtime.
pub trait PanelContent {
    /// Whether the owner currently wants the panel shown.
    fn is_visible(&self) -> bool;

    /// Called once when the user closes the panel. The owner decides what closing means.
    fn on_close_requested(&self);

    /// Measures the natural size of the content, if the payload supports it.
    fn measure_intrinsic_size(&self) -> Option<IntrinsicSize> {
        None
    }

    /// Receives lifecycle notifications. Defaults to ignoring them.
    fn on_lifecycle(&self, _event: PanelLifecycleEvent) {}
}
