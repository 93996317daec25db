//! Tappable UI pieces. Each one draws itself and registers its hit regions
//! in the same call, so the two can never drift apart.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::Paragraph;
use ratzilla::ratatui::Frame;

use crate::input::ClickMap;

const TAB_GAP: &str = " ";

/// One-row tab strip.
#[derive(Default)]
pub struct TabBar {
    tabs: Vec<(String, bool, u16)>,
}

impl TabBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(mut self, label: &str, active: bool, action: u16) -> Self {
        self.tabs.push((format!(" {label} "), active, action));
        self
    }

    pub fn render(self, f: &mut Frame, area: Rect, map: &mut ClickMap) {
        let mut spans = Vec::new();
        let mut segments = Vec::new();
        for (i, (label, active, action)) in self.tabs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(TAB_GAP));
            }
            let style = if active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            segments.push((Span::raw(label.as_str()).width() as u16, action));
            spans.push(Span::styled(label, style));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
        map.add_segments(area, &segments, TAB_GAP.len() as u16);
    }
}

/// Lines for a [`Paragraph`], some of them bound to an action.
///
/// Targets follow their line, so inserting text above a button moves the
/// button's hit region with it. Lines are assumed not to wrap.
#[derive(Default)]
pub struct ActionLines<'a> {
    lines: Vec<Line<'a>>,
    actions: Vec<(usize, u16)>,
}

impl<'a> ActionLines<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<Line<'a>>) {
        self.lines.push(line.into());
    }

    pub fn push_action(&mut self, line: impl Into<Line<'a>>, action: u16) {
        self.actions.push((self.lines.len(), action));
        self.lines.push(line.into());
    }

    /// Register the action rows for a paragraph drawn in `area` whose content
    /// starts `top` rows down and stops `bottom` rows before the edge.
    pub fn register(&self, area: Rect, map: &mut ClickMap, top: u16, bottom: u16) {
        let first = area.y + top;
        let limit = area.y + area.height.saturating_sub(bottom);
        for &(idx, action) in &self.actions {
            let row = first as usize + idx;
            if row < limit as usize {
                map.add_row(area, row as u16, action);
            }
        }
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }
}

/// Text progress bar, `fraction` in 0..=1.
pub fn bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
