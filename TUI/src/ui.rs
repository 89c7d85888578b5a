use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::config::{APP_TITLE, KEY_HINTS};
use crate::render::{render_result, wrap_lines};
use crate::ui_state::Focus;

// Copper Sapphire Morning color palette
const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background
const BG_PANEL: Color = Color::Rgb(18, 18, 24);          // Slightly lighter for panels

// Sapphire blues
const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const CYAN_LIGHT: Color = Color::Rgb(178, 220, 226);     // #B2DCE2 - Light cyan

// Copper/warm tones
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const TAN: Color = Color::Rgb(216, 180, 169);            // #D8B4A9 - Tan/beige

// Accent colors
const BURGUNDY: Color = Color::Rgb(204, 92, 68);         // #CC5C44 - Warnings/errors
const OLIVE: Color = Color::Rgb(131, 179, 102);          // #83B366 - Success/green
const LEAF: Color = Color::Rgb(46, 125, 50);             // #2E7D32 - Search button

// Text colors
const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 190); // Light gray
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

// Border colors (subtle)
const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border
const BORDER_ACCENT: Color = Color::Rgb(70, 85, 110);    // Accent border

const PLACEHOLDER: &str = "输入菜名或描述（例如：'想吃辣的' 或 '宫保鸡丁'）";

pub fn draw(frame: &mut Frame, app: &mut App) {
    // Fill entire background
    let bg = Block::default().style(Style::default().bg(BG_DARK));
    frame.render_widget(bg, frame.area());

    let area = frame.area();
    let padded = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };

    let error_height = if app.error().is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Length(3),            // Input + button
            Constraint::Length(error_height), // Error line
            Constraint::Min(5),               // Result
            Constraint::Length(1),            // Hints / status
        ])
        .split(padded);

    draw_header(frame, app, chunks[0]);
    draw_search_row(frame, app, chunks[1]);
    if let Some(err) = app.error() {
        draw_error(frame, err, chunks[2]);
    }
    draw_result(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);

    if app.ui.show_preview {
        draw_preview_popup(frame, app, area);
    }

    if let Some(notice) = &app.ui.notice {
        draw_notice(frame, notice, area);
    }
}

fn glass_block(title: &str, border_color: Color) -> Block<'_> {
    Block::default()
        .title(Span::styled(title, Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ", APP_TITLE);
    let block = glass_block(&title, BORDER_ACCENT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(18)])
        .split(inner);

    let link = Paragraph::new(Line::from(vec![
        Span::styled(" ↗ ", Style::default().fg(COPPER)),
        Span::styled(app.metadata().canonical_url.clone(), Style::default().fg(TEXT_MUTED)),
    ]));
    frame.render_widget(link, halves[0]);

    if let Some(at) = app.current().resolved_at {
        let stamp = Paragraph::new(format!("更新于 {} ", at.format("%H:%M:%S")))
            .alignment(Alignment::Right)
            .style(Style::default().fg(TEXT_MUTED));
        frame.render_widget(stamp, halves[1]);
    }
}

fn draw_search_row(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),    // Input
            Constraint::Length(1),  // Gap
            Constraint::Length(12), // Button
        ])
        .split(area);

    draw_input(frame, app, cols[0]);
    draw_search_button(frame, app, cols[2]);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    // Border color based on focus - pulse when focused, dim when not
    let border_color = if app.ui.focus == Focus::Input {
        let glow = (app.animation_frame as f64 / 90.0).sin() * 0.3 + 0.7;
        let r = (101.0 * glow) as u8;
        let g = (150.0 * glow) as u8;
        let b = (243.0 * glow) as u8;
        Color::Rgb(r, g, b)
    } else {
        BORDER_DIM
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = if app.ui.input.is_empty() {
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(SAPPHIRE)),
            Span::styled(PLACEHOLDER, Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC)),
        ])
    } else {
        let cursor = if app.ui.focus == Focus::Input && app.animation_frame % 30 < 15 {
            "|"
        } else {
            " "
        };
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(SAPPHIRE)),
            Span::styled(format!("{}{}", app.ui.input, cursor), Style::default().fg(TEXT_PRIMARY)),
        ])
    };

    frame.render_widget(Paragraph::new(line), inner);
}

fn draw_search_button(frame: &mut Frame, app: &App, area: Rect) {
    let label = if app.is_loading() {
        format!("{} 搜索中", app.spinner())
    } else {
        "搜索".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(LEAF))
        .style(Style::default().bg(LEAF));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY).bg(LEAF).add_modifier(Modifier::BOLD));
    frame.render_widget(button, inner);
}

fn draw_error(frame: &mut Frame, err: &str, area: Rect) {
    let line = Paragraph::new(Line::from(vec![
        Span::styled(" ✗ 查询失败: ", Style::default().fg(BURGUNDY).add_modifier(Modifier::BOLD)),
        Span::styled(err.to_string(), Style::default().fg(BURGUNDY)),
    ]));
    frame.render_widget(line, area);
}

fn draw_result(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.ui.focus == Focus::Results;
    let border_color = if focused { SAPPHIRE } else { BORDER_DIM };
    let block = glass_block("", border_color).style(Style::default().bg(BG_PANEL));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = Rect {
        x: inner.x + 1,
        y: inner.y,
        width: inner.width.saturating_sub(2),
        height: inner.height,
    };

    let selection = focused.then_some(app.ui.selection);
    let width = content.width as usize;
    let rows = wrap_lines(render_result(&app.current().result, selection, width), width);

    // Clamp so the last row can reach the bottom of the panel but no further
    let max_scroll = rows.len().saturating_sub(content.height as usize);
    app.ui.max_scroll = max_scroll;
    app.ui.scroll_offset = app.ui.scroll_offset.min(max_scroll);

    let result = Paragraph::new(rows).scroll((app.ui.scroll_offset as u16, 0));
    frame.render_widget(result, content);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(status) = &app.ui.status_message {
        Line::from(Span::styled(format!(" {}", status), Style::default().fg(TAN)))
    } else {
        let mut spans = Vec::new();
        for (key, desc) in KEY_HINTS {
            spans.push(Span::styled(*key, Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)));
            spans.push(Span::styled(format!(" {}  ", desc), Style::default().fg(TEXT_MUTED)));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn draw_notice(frame: &mut Frame, notice: &str, area: Rect) {
    let popup = centered(area, 36, 5);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(OLIVE))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let text = Paragraph::new(vec![
        Line::from(Span::styled(notice.to_string(), Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled("按任意键关闭", Style::default().fg(TEXT_MUTED))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(text, inner);
}

fn draw_preview_popup(frame: &mut Frame, app: &App, area: Rect) {
    let meta = app.metadata();
    let pairs = meta.link_preview();

    let popup = centered(area, 90, pairs.len() as u16 + 4);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(" 链接预览 ", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COPPER))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{:>20} ", "title"), Style::default().fg(CYAN_LIGHT)),
        Span::styled(meta.title.clone(), Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)),
    ])];
    for (name, value) in pairs {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>20} ", name), Style::default().fg(CYAN_LIGHT)),
            Span::styled(value.to_string(), Style::default().fg(TEXT_SECONDARY)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
