//! Vertical layout cursor with the page-break rule used by the PDF renderer.
//!
//! Coordinates are top-down points: `y = 0` is the top edge of the page. The writer
//! flips them into PDF user space at serialization time.

use serde::Serialize;

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    /// Uniform margin on all four sides.
    pub margin_pt: f32,
}

impl PageGeometry {
    /// US Letter, 1" margins.
    pub const LETTER: PageGeometry = PageGeometry {
        width_pt: 612.0,
        height_pt: 792.0,
        margin_pt: 72.0,
    };

    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    pub fn left(&self) -> f32 {
        self.margin_pt
    }

    pub fn right(&self) -> f32 {
        self.width_pt - self.margin_pt
    }

    pub fn top(&self) -> f32 {
        self.margin_pt
    }

    /// Lowest y a block may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.height_pt - self.margin_pt
    }

    pub fn center_x(&self) -> f32 {
        self.width_pt / 2.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor
// ────────────────────────────────────────────────────────────────────────────

/// Explicit layout state: current page index and vertical position.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCursor {
    geometry: PageGeometry,
    page: usize,
    y: f32,
}

impl LayoutCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            page: 0,
            y: geometry.top(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn at_page_top(&self) -> bool {
        self.y <= self.geometry.top()
    }

    /// Whether a block of `height` fits between the cursor and the bottom margin.
    pub fn fits(&self, height: f32) -> bool {
        self.y + height <= self.geometry.bottom_limit()
    }

    /// Starts a new page when `height` does not fit. Returns `true` on a page break.
    ///
    /// A cursor already at the top of a page never breaks: a block taller than a whole
    /// page would otherwise produce an endless run of blank pages.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.fits(height) || self.at_page_top() {
            return false;
        }
        self.new_page();
        true
    }

    pub fn new_page(&mut self) {
        self.page += 1;
        self.y = self.geometry.top();
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }
}
