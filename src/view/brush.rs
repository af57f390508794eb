/// Axis-aligned rectangle in top-down view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BrushRect {
    /// Rectangle spanned by two corners in any order.
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            left: a[0].min(b[0]),
            top: a[1].min(b[1]),
            right: a[0].max(b[0]),
            bottom: a[1].max(b[1]),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Zero width or zero height.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Inclusive on all four sides.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }

    pub fn clamp_point(&self, p: [f64; 2]) -> [f64; 2] {
        [p[0].clamp(self.left, self.right), p[1].clamp(self.top, self.bottom)]
    }

    /// Shift by `(dx, dy)`, keeping the size and staying inside `extent`.
    pub fn translated_within(&self, dx: f64, dy: f64, extent: &BrushRect) -> Self {
        let dx = dx.clamp(extent.left - self.left, extent.right - self.right);
        let dy = dy.clamp(extent.top - self.top, extent.bottom - self.bottom);
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// What a brush interaction did to the active rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushEvent {
    Brushed(BrushRect),
    Cleared,
}

impl BrushEvent {
    pub fn rect(&self) -> Option<BrushRect> {
        match self {
            BrushEvent::Brushed(rect) => Some(*rect),
            BrushEvent::Cleared => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Drawing { anchor: [f64; 2] },
    Moving { grab: [f64; 2], origin: BrushRect },
}

/// Rectangular brush over a fixed extent, driven by press / drag / release.
///
/// Pressing outside the current rectangle starts a new one; pressing inside
/// grabs it for moving. A gesture that never spans an area clears the brush.
/// Every method returns an event only when the active rectangle changed.
#[derive(Debug, Clone)]
pub struct Brush {
    extent: BrushRect,
    rect: Option<BrushRect>,
    gesture: Gesture,
}

impl Brush {
    pub fn new(extent: BrushRect) -> Self {
        Self {
            extent,
            rect: None,
            gesture: Gesture::Idle,
        }
    }

    pub fn extent(&self) -> BrushRect {
        self.extent
    }

    pub fn rect(&self) -> Option<BrushRect> {
        self.rect
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    pub fn press(&mut self, pos: [f64; 2]) -> Option<BrushEvent> {
        match self.rect {
            Some(rect) if rect.contains(pos[0], pos[1]) => {
                self.gesture = Gesture::Moving {
                    grab: pos,
                    origin: rect,
                };
                None
            }
            _ => {
                self.gesture = Gesture::Drawing {
                    anchor: self.extent.clamp_point(pos),
                };
                self.set(None)
            }
        }
    }

    pub fn drag_to(&mut self, pos: [f64; 2]) -> Option<BrushEvent> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Drawing { anchor } => {
                let rect = BrushRect::from_corners(anchor, self.extent.clamp_point(pos));
                self.set(Some(rect).filter(|r| !r.is_empty()))
            }
            Gesture::Moving { grab, origin } => {
                let moved = origin.translated_within(pos[0] - grab[0], pos[1] - grab[1], &self.extent);
                self.set(Some(moved))
            }
        }
    }

    pub fn release(&mut self, pos: [f64; 2]) -> Option<BrushEvent> {
        let event = self.drag_to(pos);
        self.gesture = Gesture::Idle;
        event
    }

    /// Drop the rectangle and any gesture in progress.
    pub fn clear(&mut self) -> Option<BrushEvent> {
        self.gesture = Gesture::Idle;
        self.set(None)
    }

    /// Replace the rectangle directly (clamped to the extent).
    #[cfg(test)]
    pub fn set_rect(&mut self, rect: Option<BrushRect>) -> Option<BrushEvent> {
        let rect = rect
            .map(|r| {
                BrushRect::from_corners(
                    self.extent.clamp_point([r.left, r.top]),
                    self.extent.clamp_point([r.right, r.bottom]),
                )
            })
            .filter(|r| !r.is_empty());
        self.set(rect)
    }

    fn set(&mut self, rect: Option<BrushRect>) -> Option<BrushEvent> {
        if self.rect == rect {
            return None;
        }
        self.rect = rect;
        Some(match rect {
            Some(r) => BrushEvent::Brushed(r),
            None => BrushEvent::Cleared,
        })
    }
}
