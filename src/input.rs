//! Input plumbing: event types, click targets, and pixel → cell conversion.
//!
//! Rendering registers rectangles tagged with action IDs; the mouse handler
//! converts a pixel position to a terminal cell and hit-tests it.

use ratzilla::ratatui::layout::Rect;

/// Input normalized from keyboard, mouse, and touch.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A tap on a registered target, identified by its action ID.
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared between the render loop (which fills it) and the mouse handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame: remember the terminal size and drop old targets.
    pub fn begin_frame(&mut self, area: Rect) {
        self.terminal_cols = area.width;
        self.terminal_rows = area.height;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// Register the full width of `area` at `row`. Rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Register targets for a single-row tab bar.
    ///
    /// `tabs` holds `(label_width, action_id)` for each padded label, laid out
    /// left to right with `separator_width` columns between them. Each target
    /// covers its label plus half of the neighbouring separators; the first
    /// and last tabs stretch to the edges so the whole bar is clickable.
    pub fn register_tab_targets(
        &mut self,
        tabs: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        if tabs.is_empty() || total_width == 0 {
            return;
        }

        let mut spans: Vec<(u16, u16)> = Vec::with_capacity(tabs.len());
        let mut cursor = 0u16;
        for &(width, _) in tabs {
            spans.push((cursor, cursor + width));
            cursor += width + separator_width;
        }

        let last = tabs.len() - 1;
        for (i, &(_, action_id)) in tabs.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                let gap_start = spans[i - 1].1;
                gap_start + (spans[i].0 - gap_start) / 2
            };
            let right = if i == last {
                total_width
            } else {
                let gap_start = spans[i].1;
                gap_start + (spans[i + 1].0 - gap_start) / 2
            };
            let width = right.min(total_width).saturating_sub(left);
            self.add_click_target(Rect::new(x + left, y, width, height), action_id);
        }
    }

    /// Action under a cell. Targets registered later sit on top.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }

    /// Hit-test a pixel position relative to the grid's top-left corner.
    pub fn hit_test_pixel(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<u16> {
        let col = pixel_x_to_col(x, grid_width, self.terminal_cols)?;
        let row = pixel_y_to_row(y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row)
    }
}

/// Screens narrower than this collapse the sidebar into a tab bar.
pub const NARROW_WIDTH: u16 = 60;

pub fn is_narrow_layout(width: u16) -> bool {
    width < NARROW_WIDTH
}

/// Convert a pixel Y offset inside the grid to a terminal row.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_cell(click_y, grid_height, terminal_rows)
}

/// Convert a pixel X offset inside the grid to a terminal column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_cell(click_x, grid_width, terminal_cols)
}

fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if !(extent > 0.0) || cells == 0 || !(offset >= 0.0) {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
