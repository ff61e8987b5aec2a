use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};

use crate::app::{App, StatusTone};
use crate::plan::{Action, PlanEntry};
use crate::text_layout::truncate_to_width;
use crate::theme::Theme;

const TITLE: &str = "Interactive Rebase";
const PICKER_TITLE: &str = "Choose rebase action";
const ITEM_HEIGHT: u16 = 2;
const ITEM_SPACING: u16 = 1;
const MIN_HELP_WIDTH: u16 = 52;
const MIN_HELP_HEIGHT: u16 = 6;
const MIN_PAGINATION_WIDTH: u16 = 24;
const MIN_PAGINATION_HEIGHT: u16 = 4;
const SHORT_HELP: &str = "ctrl+↑ move up • ctrl+↓ move down • enter set action • ctrl+r start rebase • ctrl+c/q quit • ? more";
const FULL_HELP: [&str; 2] = [
    "↑/k up • ↓/j down • ctrl+↑/K move up • ctrl+↓/J move down • enter set action",
    "p pick • s squash • f fixup • e edit • x/d drop • ctrl+r start rebase • ctrl+c/q quit • ? less",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub page: usize,
    pub pages: usize,
}

/// The page of entries containing `selected`, given how many rows the list
/// may use.
pub fn page_window(len: usize, selected: usize, list_height: u16) -> PageWindow {
    let per_page = ((list_height + ITEM_SPACING) / (ITEM_HEIGHT + ITEM_SPACING)).max(1) as usize;
    if len == 0 {
        return PageWindow {
            start: 0,
            end: 0,
            page: 0,
            pages: 1,
        };
    }
    let page = selected.min(len - 1) / per_page;
    let start = page * per_page;
    PageWindow {
        start,
        end: (start + per_page).min(len),
        page,
        pages: len.div_ceil(per_page),
    }
}

pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    let outer = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().fg(theme.text_fg));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let show_help = inner.height >= MIN_HELP_HEIGHT && inner.width >= MIN_HELP_WIDTH;
    let show_pagination =
        inner.height >= MIN_PAGINATION_HEIGHT && inner.width >= MIN_PAGINATION_WIDTH;
    let help_height = match (show_help, app.show_full_help()) {
        (false, _) => 0,
        (true, false) => 1,
        (true, true) => FULL_HELP.len() as u16,
    };
    let status_height = u16::from(app.status().is_some());

    let [title_area, list_area, pagination_area, help_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(u16::from(show_pagination)),
        Constraint::Length(help_height),
        Constraint::Length(status_height),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            TITLE,
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().padding(Padding::horizontal(1))),
        title_area,
    );

    let window = page_window(app.plan().len(), app.selected(), list_area.height);
    render_commit_list(frame, list_area, app, window, theme);
    if show_pagination {
        render_pagination(frame, pagination_area, window, theme);
    }
    if show_help {
        render_help(frame, help_area, app.show_full_help(), theme);
    }
    if let Some(status) = app.status() {
        let fg = match status.tone {
            StatusTone::Info => theme.muted_fg,
            StatusTone::Error => theme.error_fg,
        };
        frame.render_widget(
            Paragraph::new(truncate_to_width(&status.text, status_area.width as usize))
                .style(Style::default().bg(theme.status_bg).fg(fg)),
            status_area,
        );
    }

    if let Some(selection) = app.picker_selection() {
        render_action_picker(frame, inner, selection, theme);
    }
}

fn render_commit_list(frame: &mut Frame, area: Rect, app: &App, window: PageWindow, theme: &Theme) {
    if app.plan().is_empty() {
        frame.render_widget(
            Paragraph::new("No commits to show.")
                .style(Style::default().fg(theme.muted_fg))
                .block(Block::default().padding(Padding::horizontal(2))),
            area,
        );
        return;
    }

    let mut lines = Vec::new();
    for position in window.start..window.end {
        let Some(entry) = app.plan().get(position) else {
            break;
        };
        if position > window.start {
            lines.push(Line::default());
        }
        let [title, details] = commit_lines(entry, position == app.selected(), theme);
        lines.push(title);
        lines.push(details);
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn commit_lines(entry: &PlanEntry, selected: bool, theme: &Theme) -> [Line<'static>; 2] {
    let indicator = || {
        if selected {
            Span::styled(" │ ", Style::default().fg(theme.accent))
        } else {
            Span::raw("   ")
        }
    };
    let subject_style = if selected {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_fg)
    };

    let mut title = vec![
        indicator(),
        action_badge(entry.action, entry.action.label(), 1, theme),
        Span::raw(" "),
        Span::styled(entry.commit.subject.clone(), subject_style),
    ];
    if !entry.commit.tags.is_empty() {
        title.push(Span::raw(" "));
        for tag in &entry.commit.tags {
            title.push(Span::styled(
                format!("[{tag}]"),
                Style::default().fg(theme.tag_fg),
            ));
        }
    }

    let label = |text: &'static str, color: Color| {
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let value = |text: String| Span::styled(text, Style::default().fg(theme.muted_fg));
    let details = vec![
        indicator(),
        label("Hash:", theme.hash_label),
        value(format!(" {}  ", entry.commit.short_hash)),
        label("Author:", theme.author_label),
        value(format!(" {}  ", entry.commit.author)),
        label("Date:", theme.date_label),
        value(format!(" {}", entry.commit.date_label())),
    ];

    [Line::from(title), Line::from(details)]
}

fn action_badge(action: Action, text: &str, padding: usize, theme: &Theme) -> Span<'static> {
    let pad = " ".repeat(padding);
    Span::styled(
        format!("{pad}{text}{pad}"),
        Style::default()
            .bg(theme.action_color(action))
            .fg(theme.badge_fg),
    )
}

fn render_pagination(frame: &mut Frame, area: Rect, window: PageWindow, theme: &Theme) {
    if window.pages <= 1 {
        return;
    }
    let dots_width = window.pages * 2;
    let line = if dots_width + 2 <= area.width as usize {
        let spans = (0..window.pages)
            .map(|page| {
                if page == window.page {
                    Span::styled("• ", Style::default().fg(theme.accent))
                } else {
                    Span::styled("◦ ", Style::default().fg(theme.muted_fg))
                }
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    } else {
        Line::styled(
            format!("{}/{}", window.page + 1, window.pages),
            Style::default().fg(theme.muted_fg),
        )
    };
    frame.render_widget(
        Paragraph::new(line).block(Block::default().padding(Padding::horizontal(1))),
        area,
    );
}

fn render_help(frame: &mut Frame, area: Rect, full: bool, theme: &Theme) {
    let width = area.width.saturating_sub(2) as usize;
    let lines = if full {
        FULL_HELP
            .iter()
            .map(|text| Line::raw(truncate_to_width(text, width)))
            .collect::<Vec<_>>()
    } else {
        vec![Line::raw(truncate_to_width(SHORT_HELP, width))]
    };
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(theme.help_fg))
            .block(Block::default().padding(Padding::horizontal(1))),
        area,
    );
}

fn render_action_picker(frame: &mut Frame, bounds: Rect, selection: Action, theme: &Theme) {
    let side_pad: u16 = if bounds.width <= 20 { 0 } else { 1 };
    let content_width = (bounds.width.saturating_sub(2 + 2 * side_pad) as usize).max(8);
    let show_description = content_width >= 28;
    let show_title = bounds.height >= 9;
    let show_gap = bounds.height >= 11;
    let label_pad = if content_width < 16 { 0 } else { 1 };

    let mut lines = Vec::new();
    if show_title {
        lines.push(Line::styled(
            truncate_to_width(PICKER_TITLE, content_width),
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ));
        if show_gap {
            lines.push(Line::default());
        }
    }
    for action in Action::ALL {
        let cursor = if action == selection {
            Span::styled("> ", Style::default().fg(theme.accent))
        } else {
            Span::raw("  ")
        };
        let badge = action_badge(action, action.keyword(), label_pad, theme);
        let used = 2 + badge.width();
        let mut spans = vec![cursor, badge];
        let remaining = content_width.saturating_sub(used + 2);
        if show_description && remaining > 0 {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                truncate_to_width(action.description(), remaining),
                Style::default().fg(theme.muted_fg),
            ));
        }
        lines.push(Line::from(spans));
    }

    let widest = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let width = (widest + 2 + 2 * side_pad).min(bounds.width);
    let height = (lines.len() as u16 + 2).min(bounds.height);
    let overlay = Rect::new(
        bounds.x + bounds.width.saturating_sub(width) / 2,
        bounds.y + bounds.height.saturating_sub(height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, overlay);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent))
                .padding(Padding::horizontal(side_pad)),
        ),
        overlay,
    );
}

#[cfg(test)]
#[path = "../tests/unit/ui_tests.rs"]
mod tests;
