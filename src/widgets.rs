//! Clickable UI components.
//!
//! Each component renders and registers its own click targets, so the rows a
//! player sees and the rows that respond to taps cannot drift apart.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

/// Single-row tab navigation. Click targets follow the rendered label
/// widths, so translated labels of different lengths stay tappable.
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("Home", active, TAB_HOME)
///     .tab("Upgrades", inactive, TAB_UPGRADES)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<(String, Style, u16)>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push((label.into(), style, action_id));
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let separator_width = Line::from(self.separator).width() as u16;
        let mut spans: Vec<Span> = Vec::new();
        let mut widths: Vec<(u16, u16)> = Vec::new();

        for (i, (label, style, action_id)) in self.tabs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    self.separator,
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let padded = format!(" {label} ");
            widths.push((Line::from(padded.as_str()).width() as u16, action_id));
            spans.push(Span::styled(padded, style));
        }

        let inner = self.block.as_ref().map_or(area, |b| b.inner(area));
        let mut paragraph = Paragraph::new(Line::from(spans));
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        f.render_widget(paragraph, area);

        // Horizontal positions come from the inner area; the full outer height
        // stays tappable.
        cs.register_tab_targets(
            &widths,
            separator_width,
            inner.x,
            area.y,
            inner.width,
            area.height.max(1),
        );
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines paired with click actions.
///
/// Clickable lines remember their index, so inserting a header above them
/// moves their targets along automatically.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Points: 12"));
/// cl.push_clickable(Line::from("[Space] Click me!"), CLICK);
/// cl.register_targets_with_block(area, &block, &mut cs, 0, true);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register click targets for every clickable line.
    ///
    /// * `top_offset` / `bottom_offset` - rows taken by borders or padding.
    /// * `scroll` - vertical scroll in visual rows.
    /// * `wrap_width` - content width when rendered with `Wrap`; `0` means one
    ///   row per line.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        wrap_width: u16,
    ) {
        let content_top = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        let mut starts = Vec::with_capacity(self.lines.len());
        let mut cursor = 0u16;
        for line in &self.lines {
            starts.push(cursor);
            cursor = cursor.saturating_add(line_rows(line, wrap_width));
        }

        for &(idx, action_id) in &self.actions {
            let Some(line) = self.lines.get(idx) else {
                continue;
            };
            let start = starts[idx];
            for r in 0..line_rows(line, wrap_width) {
                let Some(visible) = (start + r).checked_sub(scroll) else {
                    continue;
                };
                let row = content_top + visible;
                if row >= content_end {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }

    /// [`register_targets`](Self::register_targets) with offsets taken from
    /// `block`'s borders and padding.
    pub fn register_targets_with_block(
        &self,
        area: Rect,
        block: &Block,
        cs: &mut ClickState,
        scroll: u16,
        wrapped: bool,
    ) {
        let inner = block.inner(area);
        let top = inner.y.saturating_sub(area.y);
        let bottom = (area.y + area.height).saturating_sub(inner.y + inner.height);
        let wrap_width = if wrapped { inner.width } else { 0 };
        self.register_targets(area, cs, top, bottom, scroll, wrap_width);
    }
}

fn line_rows(line: &Line, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    let rows = Paragraph::new(line.clone())
        .wrap(Wrap { trim: false })
        .line_count(width);
    rows.clamp(1, u16::MAX as usize) as u16
}
