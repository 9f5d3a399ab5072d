use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Panel};
use crate::calendar::{DAYS_PER_WEEK, WEEKDAY_LABELS};
use crate::clipboard::Clipboard;
use crate::export::StatusKind;
use crate::theme::Design;
use crate::widget::{
    Attributes, WidgetAttrs, ATTR_DESIGN, ATTR_HIGHLIGHT, ATTR_MONTH, ATTR_SIZE, ATTR_YEAR,
};

// ─── UI enums / state ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq)]
pub enum InputMode { #[default] Normal, Insert }

/// Form fields, top to bottom.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    #[default]
    Month,
    Year,
    Size,
    HighlightDays,
    Design,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Month, Field::Year, Field::Size, Field::HighlightDays, Field::Design];

    pub fn label(self) -> &'static str {
        match self {
            Field::Month         => "Month",
            Field::Year          => "Year",
            Field::Size          => "Size",
            Field::HighlightDays => "Highlight",
            Field::Design        => "Design",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_text(self) -> bool { self != Field::Design }
}

/// Raw form contents. Text fields hold whatever was typed; they are only
/// sanitized when the calendar is generated.
#[derive(Debug, Clone)]
pub struct UiState {
    pub input_mode:     InputMode,
    pub field:          Field,
    pub month:          String,
    pub year:           String,
    pub size:           String,
    pub highlight_days: String,
    pub design:         Design,
}

impl UiState {
    pub fn from_attrs(attrs: &WidgetAttrs) -> Self {
        let mut ui = Self {
            input_mode:     InputMode::Normal,
            field:          Field::Month,
            month:          String::new(),
            year:           String::new(),
            size:           String::new(),
            highlight_days: String::new(),
            design:         attrs.design,
        };
        ui.apply(attrs);
        ui
    }

    /// Overwrite the form with sanitized values.
    pub fn apply(&mut self, attrs: &WidgetAttrs) {
        self.month          = attrs.month.to_string();
        self.year           = attrs.year.to_string();
        self.size           = attrs.size.to_string();
        self.highlight_days = attrs.highlight_list();
        self.design         = attrs.design;
    }

    pub fn attributes(&self) -> Attributes {
        [
            (ATTR_MONTH,     self.month.clone()),
            (ATTR_YEAR,      self.year.clone()),
            (ATTR_SIZE,      self.size.clone()),
            (ATTR_HIGHLIGHT, self.highlight_days.clone()),
            (ATTR_DESIGN,    self.design.name().to_owned()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
    }

    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Month         => Some(&mut self.month),
            Field::Year          => Some(&mut self.year),
            Field::Size          => Some(&mut self.size),
            Field::HighlightDays => Some(&mut self.highlight_days),
            Field::Design        => None,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Month         => &self.month,
            Field::Year          => &self.year,
            Field::Size          => &self.size,
            Field::HighlightDays => &self.highlight_days,
            Field::Design        => self.design.name(),
        }
    }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

pub fn draw<C: Clipboard>(f: &mut Frame, app: &App<C>) {
    let area = f.area();
    let pal  = app.ui.design.palette();

    f.render_widget(
        Block::default().style(Style::default().bg(pal.bg_color()).fg(pal.text_color())),
        area,
    );

    // Layout: [ content | status_bar(1) ]
    let root = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)]).split(area);

    // Content: [ form(36) | preview ]
    let cols = Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(0)]).split(root[0]);

    draw_form(f, app, cols[0]);
    draw_preview(f, app, cols[1]);
    draw_statusbar(f, app, root[1]);

    if app.active_panel == Panel::Help {
        draw_help(f, area, app);
    }
}

// ─── Form ─────────────────────────────────────────────────────────────────────

fn draw_form<C: Clipboard>(f: &mut Frame, app: &App<C>, area: Rect) {
    let pal    = app.ui.design.palette();
    let accent = Style::default().fg(pal.highlight_color()).add_modifier(Modifier::BOLD);
    let dim    = Style::default().fg(pal.border_color());
    let fg     = Style::default().fg(pal.text_color());

    let block = Block::default()
        .title(Title::from(Line::from(Span::styled(" Calendar card ", accent))))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(pal.border_color()))
        .style(Style::default().bg(pal.bg_color()));

    let mut lines = vec![Line::from("")];
    for field in Field::ALL {
        let focused = field == app.ui.field;
        let editing = focused && app.ui.input_mode == InputMode::Insert;
        let prefix  = if focused { "▶ " } else { "  " };
        let value   = if field.is_text() {
            format!("{}{}", app.ui.value(field), if editing { "█" } else { "" })
        } else {
            format!("◀ {} ▶", app.ui.value(field))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{prefix}{:<10}", field.label()), if focused { accent } else { dim }),
            Span::styled(value, if focused { fg.add_modifier(Modifier::BOLD) } else { fg }),
        ]));
        lines.push(Line::from(""));
    }

    let hint = match (app.ui.input_mode.clone(), app.ui.field) {
        (InputMode::Insert, _)             => "  Enter: generate   Esc: done",
        (InputMode::Normal, Field::Design) => "  h/l: change design   g: generate",
        (InputMode::Normal, _)             => "  i: edit   h/l: step   g: generate",
    };
    lines.push(Line::from(Span::styled(hint, dim)));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

// ─── Preview ──────────────────────────────────────────────────────────────────

fn draw_preview<C: Clipboard>(f: &mut Frame, app: &App<C>, area: Rect) {
    let design = app.rendered.as_ref().map_or(app.ui.design, |r| r.attrs.design);
    let pal    = design.palette();
    let dim    = Style::default().fg(pal.border_color());

    let block = Block::default()
        .title(Title::from(Line::from(Span::styled(
            format!(" Preview · {design} "),
            Style::default().fg(pal.highlight_color()).add_modifier(Modifier::BOLD),
        ))))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(dim)
        .style(Style::default().bg(pal.bg_color()));

    let Some(rendered) = &app.rendered else {
        f.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("  Nothing generated yet. Press g to generate.", dim)),
            ]).block(block),
            area,
        );
        return;
    };

    let cell_w  = 5usize;
    let width   = cell_w * DAYS_PER_WEEK;
    let grid    = &rendered.grid;
    let text    = Style::default().fg(pal.text_color()).bg(pal.bg_color());
    let mut lines: Vec<Line> = vec![Line::from("")];

    let header = format!("{} {}", grid.month_name(), grid.year).to_uppercase();
    lines.push(Line::from(Span::styled(
        format!("{header:^width$}"),
        Style::default().bg(pal.border_color()).fg(header_fg(pal.border_color(), pal.text_color()))
            .add_modifier(Modifier::BOLD),
    )));

    lines.push(Line::from(
        WEEKDAY_LABELS.iter()
            .map(|d| Span::styled(format!("{d:^cell_w$}"), text.add_modifier(Modifier::BOLD)))
            .collect::<Vec<_>>(),
    ));

    for week in grid.weeks() {
        let spans: Vec<Span> = week.iter().map(|cell| match cell.day {
            None => Span::styled(" ".repeat(cell_w), text),
            Some(d) if cell.highlighted => Span::styled(
                format!("{d:^cell_w$}"),
                Style::default().bg(pal.highlight_color()).fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Some(d) => Span::styled(format!("{d:^cell_w$}"), text),
        }).collect();
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {}px · {} bytes of HTML", rendered.attrs.size, rendered.rich_html().len()),
        dim,
    )));
    lines.push(Line::from(Span::styled(format!("  {}", rendered.embed_tag()), dim)));

    f.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Left).wrap(Wrap { trim: false }),
        area,
    );
}

/// Header text colour. The card itself uses the text colour on the border
/// colour, which is unreadable in the terminal for designs where the two match.
fn header_fg(bg: Color, text: Color) -> Color {
    if bg == text { Color::White } else { text }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_statusbar<C: Clipboard>(f: &mut Frame, app: &App<C>, area: Rect) {
    let pal = app.ui.design.palette();
    let (mode_str, mode_style) = match app.ui.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(pal.border_color()).fg(pal.bg_color()).add_modifier(Modifier::BOLD)),
        InputMode::Insert => (" INSERT ", Style::default().bg(pal.highlight_color()).fg(pal.bg_color()).add_modifier(Modifier::BOLD)),
    };
    let mut spans = vec![
        Span::styled(mode_str, mode_style),
        Span::styled(
            "  jk:field  i:edit  g:generate  y:copy  Y:copy tag  o:browser  ?:help  q:quit",
            Style::default().fg(pal.border_color()),
        ),
    ];
    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Success => Color::Green,
            StatusKind::Failure => Color::Red,
        };
        spans.push(Span::styled(
            format!("  {}", status.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(pal.bg_color())), area);
}

// ─── Help overlay ────────────────────────────────────────────────────────────

fn draw_help<C: Clipboard>(f: &mut Frame, area: Rect, app: &App<C>) {
    let pal  = app.ui.design.palette();
    let rect = centered(64, 70, area);
    f.render_widget(Clear, rect);

    let accent = Style::default().fg(pal.highlight_color()).add_modifier(Modifier::BOLD);
    let dim    = Style::default().fg(pal.text_color());
    let block = Block::default()
        .title(Title::from(Line::from(Span::styled(" Keyboard Shortcuts ", accent))))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(pal.border_color()))
        .style(Style::default().bg(pal.bg_color()));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Form", accent)),
        Line::from(Span::styled("  j/k  ↓↑             Next / previous field", dim)),
        Line::from(Span::styled("  i / Enter          Edit field", dim)),
        Line::from(Span::styled("  h/l  ←→             Step value / change design", dim)),
        Line::from(Span::styled("  T                  Next design", dim)),
        Line::from(""),
        Line::from(Span::styled("  Output", accent)),
        Line::from(Span::styled("  g                  Generate calendar", dim)),
        Line::from(Span::styled("  y                  Copy card as HTML (for mail)", dim)),
        Line::from(Span::styled("  Y                  Copy <my-calendar> tag", dim)),
        Line::from(Span::styled("  o                  Open card in browser", dim)),
        Line::from(""),
        Line::from(Span::styled("  General", accent)),
        Line::from(Span::styled("  ?                  Toggle help", dim)),
        Line::from(Span::styled("  Esc                Cancel / back", dim)),
        Line::from(Span::styled("  q                  Quit", dim)),
    ];

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        rect,
    );
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn centered(pct_x: u16, pct_y: u16, r: Rect) -> Rect {
    let vert = Layout::default().direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ]).split(r);
    Layout::default().direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ]).split(vert[1])[1]
}
