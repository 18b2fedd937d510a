//! Frame layout: particle canvas behind the terminal and keyboard panes

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{canvas::Canvas, Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::keyboard::{keyboard_layout, KeyCap, KeyState};
use crate::particles::FrameRecorder;
use crate::terminal::OutputLine;
use crate::ui::app::App;
use crate::ui::canvas::{self, to_color, BACKGROUND};
use crate::ui::state::{Focus, HitTarget};

/// Rows taken by the pane strip at the bottom of the screen
const PANEL_HEIGHT: u16 = 17;

const MUTED: Color = Color::Rgb(0x56, 0x5f, 0x89);
const TEXT: Color = Color::Rgb(0xc0, 0xca, 0xf5);

/// Width in cells of the widest keyboard row
pub fn keyboard_width() -> u16 {
    keyboard_layout()
        .iter()
        .map(|row| {
            let keys: u16 = row.iter().map(|key| key.width.cells()).sum();
            keys + row.len().saturating_sub(1) as u16
        })
        .max()
        .unwrap_or(0)
}

fn pane_block(title: String, focused: bool, accent: Color) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let area = f.size();
    app.ui.hitboxes.clear();

    draw_particles(f, app, area);

    let height = PANEL_HEIGHT.min(area.height);
    let panel = Rect::new(area.x, area.bottom() - height, area.width, height);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(keyboard_width() + 2),
            Constraint::Min(20),
        ])
        .split(panel);

    draw_terminal(f, app, columns[0]);
    draw_keyboard(f, app, columns[1]);
    draw_keybind_list(f, app, columns[2]);
}

fn draw_particles(f: &mut Frame<'_>, app: &App, area: Rect) {
    let viewport = app.field.viewport();
    let mut recorder = FrameRecorder::new();
    if app.field.enabled() {
        app.field.draw(&mut recorder);
    }
    let commands = recorder.commands;
    let canvas = Canvas::default()
        .background_color(to_color(BACKGROUND))
        .marker(Marker::Braille)
        .x_bounds([0.0, viewport.width as f64])
        .y_bounds([0.0, viewport.height as f64])
        .paint(|ctx| canvas::paint(ctx, &commands, viewport));
    f.render_widget(canvas, area);
}

fn draw_terminal(f: &mut Frame<'_>, app: &mut App, area: Rect) {
    let accent = to_color(app.field.theme().palette().particles[0]);
    let focused = app.ui.focus == Focus::Terminal;
    let block = pane_block(" ~/dotfiles ".to_string(), focused, accent);
    let inner = block.inner(area);
    app.ui.hitboxes.push((inner, HitTarget::TerminalBody));

    let session = &mut app.session;
    let prompt = Span::styled(
        format!("{} ", session.prompt()),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    );
    let mut lines: Vec<Line> = session
        .lines()
        .iter()
        .map(|line| match line {
            OutputLine::Command(text) => Line::from(vec![
                prompt.clone(),
                Span::styled(text.clone(), Style::default().fg(TEXT)),
            ]),
            OutputLine::Response(text) => {
                Line::from(Span::styled(text.clone(), Style::default().fg(MUTED)))
            }
        })
        .collect();

    if session.is_typing() {
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled("▋", Style::default().fg(accent)));
        }
    }
    if session.input_visible() {
        let mut spans = vec![
            prompt.clone(),
            Span::styled(session.input().to_string(), Style::default().fg(TEXT)),
        ];
        if session.input_focused() {
            spans.push(Span::styled(
                "▋",
                Style::default().fg(accent).add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        lines.push(Line::from(spans));
    }

    let visible = inner.height.max(1) as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    if session.take_scroll_request() {
        app.ui.terminal_scroll = max_scroll;
    } else {
        app.ui.terminal_scroll = app.ui.terminal_scroll.min(max_scroll);
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.ui.terminal_scroll as u16, 0));
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn key_style(state: KeyState, accent: Color, modifier: Color) -> Style {
    match state {
        KeyState::Modifier { highlighted: true } => Style::default()
            .fg(Color::Black)
            .bg(modifier)
            .add_modifier(Modifier::BOLD),
        KeyState::Modifier { highlighted: false } => Style::default().fg(modifier),
        KeyState::Highlighted => Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD),
        KeyState::Active => Style::default().fg(accent),
        KeyState::Idle => Style::default().fg(MUTED),
    }
}

fn key_label(key: &KeyCap) -> String {
    let width = key.width.cells() as usize;
    let label: String = key.label.chars().take(width.saturating_sub(2)).collect();
    format!("[{:^w$}]", label, w = width - 2)
}

fn draw_keyboard(f: &mut Frame<'_>, app: &mut App, area: Rect) {
    let palette = app.field.theme().palette();
    let accent = to_color(palette.particles[0]);
    let modifier = to_color(palette.particles[1]);
    let focused = app.ui.focus == Focus::Keyboard;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(keyboard_layout().len() as u16 + 2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let title = format!(" {} ", app.keyboard.platform());
    let block = pane_block(title, focused, accent);
    let inner = block.inner(rows[0]);
    let cursor = if focused { app.ui.key_cursor } else { None };

    let mut lines = Vec::with_capacity(keyboard_layout().len());
    for (r, row) in keyboard_layout().iter().enumerate() {
        let y = inner.y + r as u16;
        if y >= inner.bottom() {
            break;
        }
        let mut x = inner.x;
        let mut spans = Vec::with_capacity(row.len() * 2);
        for (c, key) in row.iter().enumerate() {
            let width = key.width.cells();
            if x + width > inner.right() {
                break;
            }
            let mut style = key_style(app.keyboard.key_state(key), accent, modifier);
            if cursor == Some((r, c)) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(key_label(key), style));
            spans.push(Span::raw(" "));
            app.ui
                .hitboxes
                .push((Rect::new(x, y, width, 1), HitTarget::Key(r, c)));
            x += width + 1;
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Clear, rows[0]);
    f.render_widget(Paragraph::new(lines).block(block), rows[0]);

    let info = app.keyboard.hover_info();
    let info_lines = vec![
        Line::from(Span::styled(
            info.title.clone(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(info.desc.clone(), Style::default().fg(TEXT))),
    ];
    let info_block = pane_block(" Info ".to_string(), false, accent);
    f.render_widget(Clear, rows[1]);
    f.render_widget(
        Paragraph::new(info_lines)
            .block(info_block)
            .wrap(Wrap { trim: true }),
        rows[1],
    );

    let status = if app.keyboard.is_loading() {
        format!(" Loading {} keybinds...", app.keyboard.platform())
    } else {
        let last = app
            .ui
            .status_log
            .back()
            .map(|entry| entry.message.as_str())
            .unwrap_or("");
        format!(
            " F2 platform  F3 theme ({})  Tab focus  Esc quit  {}",
            app.field.theme(),
            last
        )
    };
    f.render_widget(Clear, rows[2]);
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(MUTED)),
        rows[2],
    );
}

/// Section id used for entrance reveals
fn section_id(category: &str) -> String {
    format!("category-{}", category)
}

fn draw_keybind_list(f: &mut Frame<'_>, app: &mut App, area: Rect) {
    let accent = to_color(app.field.theme().palette().particles[0]);
    let focused = app.ui.focus == Focus::Keybinds;
    let title = format!(" Keybinds ({}) ", app.keyboard.platform());
    let block = pane_block(title, focused, accent);
    let inner = block.inner(area);
    f.render_widget(Clear, area);

    if app.keyboard.keybinds().is_empty() {
        let message = if app.keyboard.is_loading() {
            "Loading..."
        } else {
            "No keybinds"
        };
        f.render_widget(
            Paragraph::new(message)
                .block(block)
                .style(Style::default().fg(MUTED)),
            area,
        );
        return;
    }

    // (section id, first row, row count) per category
    let mut sections: Vec<(String, usize, usize)> = Vec::new();
    // (row, keybind index) per entry
    let mut entries: Vec<(usize, usize)> = Vec::new();
    let mut rows: Vec<(Option<usize>, String, String)> = Vec::new();

    let keybinds = app.keyboard.keybinds();
    for (category, group) in app.keyboard.grouped_keybinds() {
        let top = rows.len();
        rows.push((None, category.to_uppercase(), String::new()));
        for kb in group {
            let index = keybinds
                .iter()
                .position(|other| std::ptr::eq(other, kb))
                .unwrap_or(0);
            entries.push((rows.len(), index));
            rows.push((Some(index), kb.format(), kb.action.clone()));
        }
        // blank spacer between sections
        rows.push((None, String::new(), String::new()));
        sections.push((section_id(category), top, rows.len() - top));
    }

    let visible = inner.height.max(1) as usize;
    if let Some(cursor) = app.ui.list_cursor {
        if let Some(&(row, _)) = entries.iter().find(|(_, index)| *index == cursor) {
            if row < app.ui.list_scroll {
                app.ui.list_scroll = row;
            } else if row >= app.ui.list_scroll + visible {
                app.ui.list_scroll = row + 1 - visible;
            }
        }
    }
    app.ui.list_scroll = app.ui.list_scroll.min(rows.len().saturating_sub(visible));
    let scroll = app.ui.list_scroll;

    for (id, _, _) in &sections {
        if !app.reveal.is_observed(id) {
            app.reveal.observe(id.clone());
        }
    }
    app.reveal.scan(
        sections
            .iter()
            .map(|(id, top, len)| (id.as_str(), *top as f32 - scroll as f32, *len as f32)),
        inner.height as f32,
    );

    let selected = match app.ui.hovered {
        Some(HitTarget::Keybind(index)) => Some(index),
        _ => app.ui.list_cursor.filter(|_| focused),
    };

    let mut lines = Vec::with_capacity(visible);
    for (row, (index, left, right)) in rows.iter().enumerate().skip(scroll).take(visible) {
        let revealed = sections
            .iter()
            .find(|(_, top, len)| row >= *top && row < top + len)
            .map(|(id, _, _)| app.reveal.is_revealed(id))
            .unwrap_or(true);
        let (heading, text) = if revealed {
            (
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
                Style::default().fg(TEXT),
            )
        } else {
            let dim = Style::default().fg(MUTED).add_modifier(Modifier::DIM);
            (dim, dim)
        };
        let line = match index {
            None => Line::from(Span::styled(left.clone(), heading)),
            Some(index) => {
                let y = inner.y + (row - scroll) as u16;
                app.ui.hitboxes.push((
                    Rect::new(inner.x, y, inner.width, 1),
                    HitTarget::Keybind(*index),
                ));
                let (mut combo, mut action) = (heading.remove_modifier(Modifier::BOLD), text);
                if selected == Some(*index) {
                    combo = combo.add_modifier(Modifier::REVERSED);
                    action = action.add_modifier(Modifier::REVERSED);
                }
                Line::from(vec![
                    Span::styled(format!("  {:<24}", left), combo),
                    Span::styled(right.clone(), action),
                ])
            }
        };
        lines.push(line);
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::KeyWidth;

    #[test]
    fn test_keyboard_width_fits_widest_row() {
        let width = keyboard_width();
        for row in keyboard_layout() {
            let cells: u16 = row.iter().map(|key| key.width.cells() + 1).sum();
            assert!(cells - 1 <= width);
        }
    }

    #[test]
    fn test_key_label_matches_cell_width() {
        for row in keyboard_layout() {
            for key in row.iter() {
                assert_eq!(
                    key_label(key).chars().count(),
                    key.width.cells() as usize,
                    "label for {}",
                    key.code
                );
            }
        }
        assert_eq!(KeyWidth::Normal.cells(), 5);
    }

    #[test]
    fn test_section_id() {
        assert_eq!(section_id("Windows"), "category-Windows");
    }
}
