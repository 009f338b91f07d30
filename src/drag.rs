use serde::{Deserialize, Serialize};

/// A point in page coordinates. Mouse and touch gestures both reduce to
/// this before the drag math runs, so the two input paths share one code
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GesturePoint {
    pub x: f64,
    pub y: f64,
}

impl GesturePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where the mini surface sits. It appears anchored to the bottom-right
/// corner; the first drag movement switches it to absolute coordinates and
/// it stays absolute until the mini surface is shown again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MiniPlacement {
    Corner { margin: f64 },
    Absolute { x: f64, y: f64 },
}

impl MiniPlacement {
    /// Top-left corner in page coordinates for the current placement.
    pub fn resolve(&self, viewport: Viewport, size: Size) -> GesturePoint {
        match *self {
            MiniPlacement::Corner { margin } => GesturePoint::new(
                (viewport.width - size.width - margin).max(0.0),
                (viewport.height - size.height - margin).max(0.0),
            ),
            MiniPlacement::Absolute { x, y } => GesturePoint::new(x, y),
        }
    }
}

/// One in-flight drag over the mini player header. Created on press,
/// dropped on release; movement handling exists only while the session
/// value is alive, so a stray move after release cannot reposition
/// anything.
#[derive(Debug)]
pub struct DragSession {
    grab_offset: GesturePoint,
    size: Size,
}

impl DragSession {
    /// Start a drag. `origin` is the surface's current top-left; the grab
    /// offset keeps the point under the pointer fixed while dragging.
    pub fn begin(point: GesturePoint, origin: GesturePoint, size: Size) -> Self {
        Self {
            grab_offset: GesturePoint::new(point.x - origin.x, point.y - origin.y),
            size,
        }
    }

    /// New top-left for the pointer position, clamped so the surface stays
    /// fully inside the viewport. A surface larger than the viewport pins
    /// to the origin.
    pub fn position(&self, point: GesturePoint, viewport: Viewport) -> GesturePoint {
        let max_x = (viewport.width - self.size.width).max(0.0);
        let max_y = (viewport.height - self.size.height).max(0.0);
        GesturePoint::new(
            (point.x - self.grab_offset.x).clamp(0.0, max_x),
            (point.y - self.grab_offset.y).clamp(0.0, max_y),
        )
    }

    pub fn size(&self) -> Size {
        self.size
    }
}
