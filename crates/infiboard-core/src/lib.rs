//! Infiboard Core Library
//!
//! Platform-agnostic spatial interaction core for the Infiboard infinite canvas:
//! object store, selection, drag/resize, grid duplication, frame layout and
//! toolbar activation, driven through a single [`Editor`].

pub mod camera;
pub mod config;
pub mod editor;
pub mod error;
pub mod generation;
pub mod gesture;
pub mod grid;
pub mod handles;
pub mod history;
pub mod input;
pub mod layout;
pub mod manipulation;
pub mod objects;
pub mod selection;
pub mod store;
pub mod toolbar;

pub use camera::Camera;
pub use config::{EditorConfig, FrameConfig, GridConfig, ToolbarConfig, ZoomConfig};
pub use editor::Editor;
pub use error::{ConfigError, StoreError, StoreResult};
pub use generation::GenerationTracker;
pub use gesture::Gesture;
pub use grid::GridPlan;
pub use handles::{Corner, Edge, Handle, HandleKind};
pub use history::History;
pub use input::{InputState, Key, Modifiers, MouseButton, PointerEvent};
pub use objects::{CanvasObject, ColorTag, Frame, FrameLayout, GenerationState, ObjectId, ObjectKind, ObjectPatch};
pub use selection::{BoxSelection, Selection};
pub use store::{ObjectStore, Snapshot};
pub use toolbar::{Instant, SystemState, ToolbarMachine, ToolbarState};
