//! Headless layout core for floating content panels: bounds clamping, responsive defaults,
//! drag/resize gestures, grid arrangement, persistence, and the manager that ties them together.

pub mod config;
pub mod geometry;
pub mod grid;
pub mod interaction;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod responsive;
pub mod window_manager;

pub use config::{ChromeMetrics, ConfigError, LayoutConfig, PanelCatalog};
pub use grid::{arrange_grid, grid_dimensions, GridSettings};
pub use interaction::{ActiveGesture, GestureKind, InteractionController};
pub use model::*;
pub use persistence::{GeometryMap, LayoutPersistence, LayoutSnapshot, PersistenceError};
pub use reducer::{ManagerError, PanelAction, PanelEvent, PanelManager};
pub use responsive::{scale_default, scale_factor};
pub use window_manager::FocusStack;
