use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn offset_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn max(self, floor: Size) -> Size {
        Size::new(self.width.max(floor.width), self.height.max(floor.height))
    }
}

/// Placement of one panel: origin plus size, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn far_corner(self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Every field is finite and non-negative. Anything else is treated as absent.
    pub fn is_valid(self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Usable display surface, sampled from the environment for each computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub width: f64,
    pub height: f64,
    /// Band at the top occupied by host chrome (header).
    pub reserved_top: f64,
    /// Band at the bottom occupied by host chrome (footer).
    pub reserved_bottom: f64,
}

impl ViewportBounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            reserved_top: 0.0,
            reserved_bottom: 0.0,
        }
    }

    pub const fn with_reserved(mut self, top: f64, bottom: f64) -> Self {
        self.reserved_top = top;
        self.reserved_bottom = bottom;
        self
    }

    /// Lowest y a panel's bottom edge may reach.
    pub fn usable_bottom(self) -> f64 {
        self.height - self.reserved_bottom
    }

    /// Shrinks the right and bottom edges by `margin`.
    pub fn inset(self, margin: Size) -> Self {
        Self {
            width: (self.width - margin.width).max(0.0),
            height: (self.height - margin.height).max(0.0),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowFlags {
    pub resizable: bool,
    /// Included in grid arrangement.
    pub arrangeable: bool,
    pub closable: bool,
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self {
            resizable: true,
            arrangeable: true,
            closable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDescriptor {
    pub id: WindowId,
    pub title: String,
    pub default_position: Point,
    pub default_size: Size,
    pub is_visible: bool,
    /// Floor for user resizing. `None` takes `LayoutConfig::default_min_size` at registration.
    #[serde(default)]
    pub min_size: Option<Size>,
    pub flags: WindowFlags,
}

impl WindowDescriptor {
    pub fn new(
        id: impl Into<WindowId>,
        title: impl Into<String>,
        default_position: Point,
        default_size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            default_position,
            default_size,
            is_visible: true,
            min_size: None,
            flags: WindowFlags::default(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }

    pub fn with_min_size(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_size = Some(Size::new(min_width, min_height));
        self
    }

    pub fn with_flags(mut self, flags: WindowFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Resolved minimum size; zero until a manager or catalog fills in the default.
    pub fn min_size(&self) -> Size {
        self.min_size.unwrap_or_default()
    }
}

/// Part of a panel the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitRegion {
    DragRegion,
    ResizeHandle,
}

/// Per-window gesture state. At most one window is outside `Idle` at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        pointer_anchor: Point,
    },
    Resizing {
        pointer_anchor: Point,
    },
}

impl InteractionState {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}
