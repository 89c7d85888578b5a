//! Result rendering for TUI display.
//!
//! Turns a lookup result into styled ratatui lines: either the suggestions
//! grid or the full recipe. No state is read beyond the arguments.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::GRID_COLUMNS;
use crate::types::{LookupResult, MenuSuggestions, Recipe};

const HEADING_COLOR: Color = Color::Rgb(101, 150, 243);
const TITLE_COLOR: Color = Color::Rgb(234, 208, 148);
const TEXT_COLOR: Color = Color::Rgb(240, 240, 245);
const MUTED_COLOR: Color = Color::Rgb(105, 116, 133);
const AMOUNT_COLOR: Color = Color::Rgb(216, 180, 169);
const REASON_COLOR: Color = Color::Rgb(131, 179, 102);
const BULLET_COLOR: Color = Color::Rgb(198, 120, 221);
const CELL_BG: Color = Color::Rgb(28, 30, 38);
const SELECTED_FG: Color = Color::Rgb(178, 220, 226);
const SELECTED_BG: Color = Color::Rgb(54, 66, 92);

/// Render `result` for a panel `width` cells wide. `selection` highlights one
/// entry of the suggestions grid.
pub fn render_result(result: &LookupResult, selection: Option<usize>, width: usize) -> Vec<Line<'static>> {
    match result {
        LookupResult::Suggestions(s) => render_suggestions(s, selection, width),
        LookupResult::Recipe(r) => render_recipe(r, selection, width),
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(HEADING_COLOR).add_modifier(Modifier::BOLD),
    ))
}

fn render_suggestions(s: &MenuSuggestions, selection: Option<usize>, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![heading("推荐食谱"), Line::from("")];
    lines.extend(grid_lines(&s.recommend, selection, width));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        s.reason.clone(),
        Style::default().fg(MUTED_COLOR),
    )));
    lines
}

fn render_recipe(recipe: &Recipe, selection: Option<usize>, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            recipe.name.clone(),
            Style::default().fg(TITLE_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  [Ctrl+S 分享]", Style::default().fg(MUTED_COLOR)),
    ])];

    if let Some(desc) = recipe.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(Line::from(Span::styled(
            desc.to_string(),
            Style::default().fg(MUTED_COLOR).add_modifier(Modifier::ITALIC),
        )));
    }

    // Ingredients table
    lines.push(Line::from(""));
    lines.push(heading("食材"));
    let name_width = recipe
        .ingredients
        .iter()
        .map(|i| i.name.width())
        .max()
        .unwrap_or(0);
    for ingredient in &recipe.ingredients {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(pad(&ingredient.name, name_width), Style::default().fg(TEXT_COLOR)),
            Span::raw("  "),
            Span::styled(ingredient.amount.clone(), Style::default().fg(AMOUNT_COLOR)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(heading("步骤"));
    for (i, step) in recipe.steps.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("步骤 {}: {}", i + 1, step.title),
            Style::default().fg(TEXT_COLOR).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", step.description),
            Style::default().fg(TEXT_COLOR),
        )));
        lines.push(Line::from(Span::styled(
            format!("  原因: {}", step.reason),
            Style::default().fg(REASON_COLOR),
        )));
    }

    lines.push(Line::from(""));
    lines.push(heading("小贴士"));
    for tip in &recipe.tips {
        lines.push(Line::from(vec![
            Span::styled("  • ", Style::default().fg(BULLET_COLOR)),
            Span::styled(tip.clone(), Style::default().fg(TEXT_COLOR)),
        ]));
    }

    if let Some(related) = recipe.suggestions.as_ref().filter(|s| !s.is_empty()) {
        lines.push(Line::from(""));
        lines.push(heading("相关推荐"));
        lines.extend(grid_lines(related, selection, width));
    }

    lines
}

/// Lay `items` out row by row in a fixed number of columns.
fn grid_lines(items: &[String], selection: Option<usize>, width: usize) -> Vec<Line<'static>> {
    let cell_width = (width / GRID_COLUMNS).max(4);

    items
        .chunks(GRID_COLUMNS)
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, item)| {
                    let index = row * GRID_COLUMNS + col;
                    let selected = selection == Some(index);
                    let marker = if selected { "▸ " } else { "  " };
                    let text = fit(&format!("{}{}", marker, item), cell_width - 1);
                    let style = if selected {
                        Style::default()
                            .fg(SELECTED_FG)
                            .bg(SELECTED_BG)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(TEXT_COLOR).bg(CELL_BG)
                    };
                    // One blank column between cells
                    Span::styled(format!("{} ", text), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Break `lines` into screen rows no wider than `width` cells, keeping span
/// styles. Lines are split by character, so every row count is exact.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut rows = Vec::with_capacity(lines.len());

    for line in lines {
        if line.width() <= width {
            rows.push(line);
            continue;
        }

        let line_style = line.style;
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut used = 0;
        for span in line.spans {
            let mut chunk = String::new();
            for ch in span.content.chars() {
                let w = ch.width().unwrap_or(0);
                if used + w > width && used > 0 {
                    if !chunk.is_empty() {
                        row.push(Span::styled(std::mem::take(&mut chunk), span.style));
                    }
                    rows.push(Line::from(std::mem::take(&mut row)).style(line_style));
                    used = 0;
                }
                chunk.push(ch);
                used += w;
            }
            if !chunk.is_empty() {
                row.push(Span::styled(chunk, span.style));
            }
        }
        if !row.is_empty() {
            rows.push(Line::from(row).style(line_style));
        }
    }

    rows
}

/// Pad with spaces to `width` display cells.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Truncate to at most `width` display cells (marking the cut with `…`),
/// then pad to exactly `width`.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return pad(text, width);
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    pad(&out, width)
}
