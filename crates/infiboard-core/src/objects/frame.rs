//! Frame payload: a container that groups children and may lay them out.

use super::ObjectId;
use serde::{Deserialize, Serialize};

/// Flow algorithm used when auto-layout is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameLayout {
    /// Left to right, single line.
    #[default]
    Row,
    /// Top to bottom, single line.
    Column,
    /// Left to right, wrapping at the frame's inner width.
    WrappingGrid,
}

impl FrameLayout {
    /// Cycle to the next layout.
    pub fn next(self) -> Self {
        match self {
            FrameLayout::Row => FrameLayout::Column,
            FrameLayout::Column => FrameLayout::WrappingGrid,
            FrameLayout::WrappingGrid => FrameLayout::Row,
        }
    }
}

/// Container data.
///
/// `children` is the single source of truth for membership. Each child's
/// `parent_id` mirrors it and both are only changed by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default)]
    pub(crate) children: Vec<ObjectId>,
    #[serde(default)]
    pub(crate) auto_layout: bool,
    #[serde(default)]
    pub layout: FrameLayout,
    pub padding: f64,
    pub gap: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Frame {
    pub fn new(padding: f64, gap: f64) -> Self {
        Self {
            children: Vec::new(),
            auto_layout: false,
            layout: FrameLayout::default(),
            padding,
            gap,
            name: None,
        }
    }

    /// Children in layout order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.children.contains(&id)
    }

    pub fn auto_layout(&self) -> bool {
        self.auto_layout
    }
}
