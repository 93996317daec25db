//! Pointer and keyboard input: normalized events and screen hit regions.
//!
//! The renderer registers a [`Hitbox`] for every tappable element each frame;
//! the click handler converts the pointer position to a terminal cell and
//! asks the [`ClickMap`] which action lives there.

use ratzilla::ratatui::layout::Rect;

/// Keyboard, mouse and touch input after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A tap on a registered region, carrying its action id.
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct Hitbox {
    pub rect: Rect,
    pub action: u16,
}

/// Hit regions of the last drawn frame plus the terminal size they refer to.
#[derive(Default)]
pub struct ClickMap {
    pub hitboxes: Vec<Hitbox>,
    pub cols: u16,
    pub rows: u16,
}

impl ClickMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame's regions and record the new size.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        self.hitboxes.clear();
        self.cols = cols;
        self.rows = rows;
    }

    pub fn add(&mut self, rect: Rect, action: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.hitboxes.push(Hitbox { rect, action });
        }
    }

    /// Make one full-width row of `area` tappable. Rows outside `area` are ignored.
    pub fn add_row(&mut self, area: Rect, row: u16, action: u16) {
        if (area.y..area.y + area.height).contains(&row) {
            self.add(Rect::new(area.x, row, area.width, 1), action);
        }
    }

    /// Split a horizontal strip into side-by-side segments.
    ///
    /// `segments` holds `(label_width, action)` in drawing order with `gap`
    /// columns between labels. Each segment owns its label and the gap that
    /// follows it; the last one runs to the end of the strip.
    pub fn add_segments(&mut self, strip: Rect, segments: &[(u16, u16)], gap: u16) {
        let end = strip.x + strip.width;
        let mut x = strip.x;
        for (i, &(width, action)) in segments.iter().enumerate() {
            if x >= end {
                break;
            }
            let right = if i + 1 == segments.len() {
                end
            } else {
                (x + width + gap).min(end)
            };
            self.add(Rect::new(x, strip.y, right - x, strip.height), action);
            x = right;
        }
    }

    /// Action at a cell. Regions registered later sit on top.
    pub fn hit(&self, col: u16, row: u16) -> Option<u16> {
        self.hitboxes
            .iter()
            .rev()
            .find(|h| {
                let r = h.rect;
                col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
            })
            .map(|h| h.action)
    }
}

/// Convert a pointer position (pixels relative to the grid's top-left) into
/// a cell, given the grid's pixel size and cell counts.
pub fn cell_at(x: f64, y: f64, grid_w: f64, grid_h: f64, cols: u16, rows: u16) -> Option<(u16, u16)> {
    let axis = |pos: f64, extent: f64, cells: u16| -> Option<u16> {
        if extent <= 0.0 || cells == 0 || pos < 0.0 {
            return None;
        }
        let idx = (pos / (extent / cells as f64)) as u16;
        (idx < cells).then_some(idx)
    };
    Some((axis(x, grid_w, cols)?, axis(y, grid_h, rows)?))
}

/// Phone-width terminals get the stacked layout.
pub fn is_narrow(cols: u16) -> bool {
    cols < 60
}
