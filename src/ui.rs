use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    calculator::{Field, FieldState},
    theme::Palette,
    App,
};

const HORIZONTAL_MARGIN: u16 = 5;
const FIELD_BOX_HEIGHT: u16 = 4;

fn label(field: Field) -> &'static str {
    match field {
        Field::Distance => "Distance (km)",
        Field::Pace => "Pace (min/km)",
        Field::Time => "Time (HH:MM:SS)",
    }
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::Distance => "0.00",
        Field::Pace => "MM:SS",
        Field::Time => "HH:MM:SS",
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::for_mode(self.theme);

        // paint the whole screen so forced light/dark themes cover the terminal
        Block::default()
            .style(Style::default().bg(palette.background).fg(palette.text))
            .render(area, buf);

        let content_height = 8 + FIELD_BOX_HEIGHT;
        let top_pad = area.height.saturating_sub(content_height) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(top_pad),
                Constraint::Length(1), // title
                Constraint::Length(1),
                Constraint::Length(1), // preset row
                Constraint::Length(1),
                Constraint::Length(FIELD_BOX_HEIGHT),
                Constraint::Length(1),
                Constraint::Length(1), // mode selector
                Constraint::Length(1),
                Constraint::Length(1), // key legend
                Constraint::Min(0),
            ])
            .split(area);

        render_title(&palette, chunks[1], buf);
        render_presets(self, &palette, chunks[3], buf);
        render_fields(self, &palette, chunks[5], buf);
        render_mode_selector(self, &palette, chunks[7], buf);
        render_legend(&palette, chunks[9], buf);
    }
}

fn render_title(palette: &Palette, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(
        "stride",
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn render_presets(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let mut spans = Vec::new();
    for (idx, preset) in app.presets.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            format!("F{}", idx + 1),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", preset.label),
            Style::default().fg(palette.dim),
        ));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_fields(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (field, column) in [Field::Distance, Field::Pace, Field::Time]
        .into_iter()
        .zip(columns.iter())
    {
        render_field(app, palette, field, *column, buf);
    }
}

fn render_field(app: &App, palette: &Palette, field: Field, area: Rect, buf: &mut Buffer) {
    let state = app.calculator.field_state(field);
    let error = app.calculator.error(field);
    let focused = app.focus == field;

    let border_style = if error.is_some() {
        Style::default().fg(palette.error)
    } else if focused {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.dim)
    };

    let title = if focused {
        format!(" {} ", label(field))
    } else {
        label(field).to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(title, border_style));

    let inner = block.inner(area);
    block.render(area, buf);

    let value_style = match state {
        FieldState::Calculated => Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        FieldState::Edited => Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD),
        FieldState::Constant => Style::default().fg(palette.text),
    };

    let value = app.calculator.value(field);
    let value_line = if value.is_empty() {
        Line::from(Span::styled(
            placeholder(field),
            Style::default()
                .fg(palette.dim)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(value.to_string(), value_style))
    };

    let hint_line = match (error, state) {
        (Some(message), _) => Line::from(Span::styled(
            message,
            Style::default().fg(palette.error),
        )),
        (None, FieldState::Calculated) => Line::from(Span::styled(
            "calculated",
            Style::default()
                .fg(palette.dim)
                .add_modifier(Modifier::ITALIC),
        )),
        (None, _) => Line::default(),
    };

    Paragraph::new(vec![value_line, hint_line])
        .alignment(Alignment::Center)
        .render(inner, buf);
}

fn render_mode_selector(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let mut spans = vec![Span::styled("calculate:", Style::default().fg(palette.dim))];

    for field in [Field::Distance, Field::Pace, Field::Time] {
        spans.push(Span::raw("  "));
        let style = if app.calculator.mode() == field {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(palette.dim)
        };
        spans.push(Span::styled(format!(" {field} "), style));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_legend(palette: &Palette, area: Rect, buf: &mut Buffer) {
    let legend = [
        "tab field",
        "↑/↓ step",
        "d/p/t calculate",
        "F1-F4 presets",
        "v theme",
        "esc quit",
    ]
    .iter()
    .join("  ");

    // drop the legend entirely rather than wrap it on narrow terminals
    if legend.width() > area.width as usize {
        return;
    }

    Paragraph::new(Span::styled(legend, Style::default().fg(palette.dim)))
        .alignment(Alignment::Center)
        .render(area, buf);
}
