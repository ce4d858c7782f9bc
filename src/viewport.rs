//! Viewport splitter.
//!
//! Maps the three logical views onto pixel rectangles proportional to the
//! window size. View fractions are measured from the bottom-left corner of
//! the window; the resulting [`PixelRect`]s use the GPU's top-left origin.

use glam::Vec2;

/// One of the three simultaneous views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    /// Wide overview camera on the left half.
    Overview,
    /// Green tracked camera (bottom-right quarter).
    Green,
    /// Red tracked camera (top-right quarter).
    Red,
}

impl ViewId {
    /// All views in draw order.
    pub const ALL: [ViewId; 3] = [ViewId::Overview, ViewId::Green, ViewId::Red];

    /// The static layout/projection description of this view.
    #[must_use]
    pub fn spec(self) -> &'static ViewSpec {
        match self {
            Self::Overview => &VIEW_SPECS[0],
            Self::Green => &VIEW_SPECS[1],
            Self::Red => &VIEW_SPECS[2],
        }
    }
}

/// Fractional placement, clear colour, and field of view for a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSpec {
    /// Left edge as a fraction of window width.
    pub left: f32,
    /// Bottom edge as a fraction of window height (from the bottom).
    pub bottom: f32,
    /// Width as a fraction of window width.
    pub width: f32,
    /// Height as a fraction of window height.
    pub height: f32,
    /// Background colour as an sRGB hex triple.
    pub background: u32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
}

/// Layout of the three views.
pub const VIEW_SPECS: [ViewSpec; 3] = [
    ViewSpec {
        left: 0.0,
        bottom: 0.0,
        width: 0.5,
        height: 1.0,
        background: 0x00f0_f0f0,
        fovy: 30.0,
    },
    ViewSpec {
        left: 0.5,
        bottom: 0.0,
        width: 0.5,
        height: 0.5,
        background: 0x0000_4225,
        fovy: 45.0,
    },
    ViewSpec {
        left: 0.5,
        bottom: 0.5,
        width: 0.5,
        height: 0.5,
        background: 0x00c6_3d2f,
        fovy: 60.0,
    },
];

/// A pixel rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height. Only meaningful for non-empty rectangles.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Whether a cursor position (physical pixels) lies inside.
    #[must_use]
    pub fn contains(&self, cursor: Vec2) -> bool {
        let (x, y) = (self.x as f32, self.y as f32);
        cursor.x >= x
            && cursor.y >= y
            && cursor.x < x + self.width as f32
            && cursor.y < y + self.height as f32
    }

    /// Map a cursor position to normalized device coordinates of this
    /// rectangle (`-1..1`, +y up).
    ///
    /// Positions outside the rectangle map outside `-1..1`; drags that leave
    /// the viewport keep tracking.
    #[must_use]
    pub fn pointer_ndc(&self, cursor: Vec2) -> Vec2 {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        Vec2::new(
            (cursor.x - self.x as f32) / w * 2.0 - 1.0,
            -(cursor.y - self.y as f32) / h * 2.0 + 1.0,
        )
    }
}

/// Pixel rectangles for all three views at a given window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLayout {
    window: (u32, u32),
    rects: [PixelRect; 3],
}

impl ViewLayout {
    /// Split a `width × height` window into view rectangles.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let rects = VIEW_SPECS.map(|spec| split(spec, width, height));
        Self {
            window: (width, height),
            rects,
        }
    }

    /// Window size this layout was computed for.
    #[must_use]
    pub fn window_size(&self) -> (u32, u32) {
        self.window
    }

    /// Rectangle of a single view.
    #[must_use]
    pub fn rect(&self, view: ViewId) -> PixelRect {
        match view {
            ViewId::Overview => self.rects[0],
            ViewId::Green => self.rects[1],
            ViewId::Red => self.rects[2],
        }
    }

    /// Views that cover at least one pixel, paired with their rectangles.
    pub fn visible(&self) -> impl Iterator<Item = (ViewId, PixelRect)> + '_ {
        ViewId::ALL
            .into_iter()
            .map(|id| (id, self.rect(id)))
            .filter(|(_, rect)| !rect.is_empty())
    }

    /// The view under a cursor position, if any.
    #[must_use]
    pub fn view_at(&self, cursor: Vec2) -> Option<ViewId> {
        self.visible()
            .find(|(_, rect)| rect.contains(cursor))
            .map(|(id, _)| id)
    }
}

fn split(spec: ViewSpec, width: u32, height: u32) -> PixelRect {
    let (w, h) = (width as f32, height as f32);
    let px_width = (w * spec.width).floor() as u32;
    let px_height = (h * spec.height).floor() as u32;
    let left = (w * spec.left).floor() as u32;
    let bottom = (h * spec.bottom).floor() as u32;
    PixelRect {
        x: left,
        y: height.saturating_sub(bottom + px_height),
        width: px_width,
        height: px_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_window_splits_into_half_and_quarters() {
        let layout = ViewLayout::new(1280, 720);
        assert_eq!(
            layout.rect(ViewId::Overview),
            PixelRect { x: 0, y: 0, width: 640, height: 720 }
        );
        // Green sits at the bottom, so its top edge is halfway down.
        assert_eq!(
            layout.rect(ViewId::Green),
            PixelRect { x: 640, y: 360, width: 640, height: 360 }
        );
        assert_eq!(
            layout.rect(ViewId::Red),
            PixelRect { x: 640, y: 0, width: 640, height: 360 }
        );
    }

    #[test]
    fn odd_sizes_floor_every_edge() {
        let layout = ViewLayout::new(1001, 501);
        let overview = layout.rect(ViewId::Overview);
        let green = layout.rect(ViewId::Green);
        let red = layout.rect(ViewId::Red);
        assert_eq!(overview.width, 500);
        assert_eq!(overview.height, 501);
        assert_eq!(green.x, 500);
        assert_eq!(green.height, 250);
        // bottom = floor(250.5) = 250 → top = 501 - 250 - 250
        assert_eq!(red.y, 1);
        assert_eq!(green.y, 251);
    }

    #[test]
    fn rectangles_stay_inside_window() {
        for (w, h) in [(1, 1), (3, 7), (800, 600), (1919, 1079)] {
            let layout = ViewLayout::new(w, h);
            for (_, rect) in layout.visible() {
                assert!(rect.x + rect.width <= w);
                assert!(rect.y + rect.height <= h);
            }
        }
    }

    #[test]
    fn tiny_window_skips_empty_views() {
        let layout = ViewLayout::new(1, 1);
        // Every view floors to zero width.
        assert_eq!(layout.visible().count(), 0);

        let layout = ViewLayout::new(2, 1);
        let ids: Vec<ViewId> = layout.visible().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![ViewId::Overview]);
    }

    #[test]
    fn aspect_matches_rect_proportions() {
        let layout = ViewLayout::new(1280, 720);
        let overview = layout.rect(ViewId::Overview);
        assert!((overview.aspect() - 640.0 / 720.0).abs() < 1e-6);
        assert!((layout.rect(ViewId::Red).aspect() - 640.0 / 360.0).abs() < 1e-6);
    }

    #[test]
    fn pointer_ndc_is_relative_to_the_rect() {
        let layout = ViewLayout::new(1280, 720);
        let overview = layout.rect(ViewId::Overview);
        assert_eq!(overview.pointer_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(overview.pointer_ndc(Vec2::new(320.0, 360.0)), Vec2::ZERO);
        assert_eq!(overview.pointer_ndc(Vec2::new(640.0, 720.0)), Vec2::new(1.0, -1.0));
        // Past the right edge of the overview keeps growing.
        assert!(overview.pointer_ndc(Vec2::new(960.0, 360.0)).x > 1.0);

        let red = layout.rect(ViewId::Red);
        assert_eq!(red.pointer_ndc(Vec2::new(960.0, 180.0)), Vec2::ZERO);
    }

    #[test]
    fn view_at_finds_the_covering_view() {
        let layout = ViewLayout::new(1280, 720);
        assert_eq!(layout.view_at(Vec2::new(10.0, 700.0)), Some(ViewId::Overview));
        assert_eq!(layout.view_at(Vec2::new(900.0, 100.0)), Some(ViewId::Red));
        assert_eq!(layout.view_at(Vec2::new(900.0, 500.0)), Some(ViewId::Green));
        assert_eq!(layout.view_at(Vec2::new(1280.0, 10.0)), None);
    }
}
