use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

use crate::{
    calendar::clamp_year,
    clipboard::Clipboard,
    export::{self, CopyKind, StatusMessage},
    markup::{self, RenderedCalendar},
    ui::{draw, Field, InputMode, UiState},
    widget::WidgetAttrs,
};

// ─── Panel focus model ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Form,
    Help,
}

// ─── App state ────────────────────────────────────────────────────────────────

pub struct App<C: Clipboard> {
    pub clipboard:    C,
    pub ui:           UiState,
    pub active_panel: Panel,
    /// Last generated card; `None` until the first generate.
    pub rendered:     Option<RenderedCalendar>,
    pub status:       Option<StatusMessage>,
    pub status_ttl:   Duration,
    pub running:      bool,
}

impl<C: Clipboard> App<C> {
    pub fn new(clipboard: C, initial: &WidgetAttrs, status_ttl: Duration) -> Self {
        Self {
            clipboard,
            ui:           UiState::from_attrs(initial),
            active_panel: Panel::Form,
            rendered:     None,
            status:       None,
            status_ttl,
            running:      true,
        }
    }

    // ── TUI loop ──────────────────────────────────────────────────────────────

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend  = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;

        let result = self.event_loop(&mut term).await;

        disable_raw_mode()?;
        execute!(term.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        term.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        term: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let tick = Duration::from_millis(50);
        while self.running {
            self.expire_status(Instant::now());
            term.draw(|f| draw(f, self))?;

            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key).await;
                    }
                }
            }
        }
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub async fn on_key(&mut self, key: KeyEvent) {
        if self.ui.input_mode == InputMode::Insert {
            self.key_insert(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => { self.running = false; return; }
            KeyCode::Char('?') => {
                self.active_panel = if self.active_panel == Panel::Help { Panel::Form } else { Panel::Help };
                return;
            }
            KeyCode::Esc => { self.active_panel = Panel::Form; return; }
            _ => {}
        }

        if self.active_panel == Panel::Form {
            self.key_form(key).await;
        }
    }

    async fn key_form(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down  | KeyCode::Char('j') | KeyCode::Tab => self.ui.field = self.ui.field.next(),
            KeyCode::Up    | KeyCode::Char('k') | KeyCode::BackTab => self.ui.field = self.ui.field.prev(),
            KeyCode::Right | KeyCode::Char('l') => self.step_field(1),
            KeyCode::Left  | KeyCode::Char('h') => self.step_field(-1),
            KeyCode::Char('i') | KeyCode::Enter => {
                if self.ui.field.is_text() {
                    self.ui.input_mode = InputMode::Insert;
                } else {
                    self.step_field(1);
                }
            }
            KeyCode::Char('T') => self.ui.design = self.ui.design.next(),
            KeyCode::Char('g') => self.generate(),
            KeyCode::Char('y') => self.copy(CopyKind::Rich).await,
            KeyCode::Char('Y') => self.copy(CopyKind::Container).await,
            KeyCode::Char('o') => self.open_preview(),
            _ => {}
        }
    }

    fn key_insert(&mut self, key: KeyEvent) {
        let field = self.ui.field;
        match key.code {
            KeyCode::Esc   => self.ui.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                self.ui.input_mode = InputMode::Normal;
                self.generate();
            }
            KeyCode::Backspace => {
                if let Some(text) = self.ui.text_mut(field) { text.pop(); }
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.ui.text_mut(field) { text.push(c); }
            }
            _ => {}
        }
    }

    /// `h`/`l` on a field: numeric fields move by one (size by ten), the
    /// design field cycles. The year stops at the ends of its range.
    fn step_field(&mut self, delta: i64) {
        let attrs = WidgetAttrs::from_attributes(&self.ui.attributes());
        match self.ui.field {
            Field::Month => {
                let m = (attrs.month as i64 - 1 + delta).rem_euclid(12) + 1;
                self.ui.month = m.to_string();
            }
            Field::Year => {
                let y = attrs.year.saturating_add(delta as i32);
                self.ui.year = clamp_year(y).to_string();
            }
            Field::Size => {
                let s = (attrs.size as i64 + delta * 10).max(10);
                self.ui.size = s.to_string();
            }
            Field::Design => {
                self.ui.design = if delta > 0 { self.ui.design.next() } else { self.ui.design.prev() };
            }
            Field::HighlightDays => {}
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    /// Sanitize the form, write the sanitized values back and replace the
    /// current card.
    pub fn generate(&mut self) {
        let attrs = WidgetAttrs::from_attributes(&self.ui.attributes());
        self.ui.apply(&attrs);
        self.rendered = Some(markup::render(&attrs));
        tracing::info!(month = attrs.month, year = attrs.year, design = %attrs.design, "generated calendar");
    }

    pub async fn copy(&mut self, kind: CopyKind) {
        let result = export::copy_calendar(self.rendered.as_ref(), kind, &self.clipboard).await;
        if let Err(ref e) = result {
            tracing::warn!("copy failed: {e}");
        }
        self.status = Some(StatusMessage::from_copy(&result, self.status_ttl));
    }

    fn open_preview(&mut self) {
        let Some(rendered) = &self.rendered else {
            self.status = Some(StatusMessage::failure(
                export::ExportError::NothingGenerated.to_string(),
                self.status_ttl,
            ));
            return;
        };
        self.status = Some(match export::open_in_browser(rendered) {
            Ok(path) => StatusMessage::success(format!("Opened {}", path.display()), self.status_ttl),
            Err(e)   => {
                tracing::warn!("could not open preview: {e:#}");
                StatusMessage::failure(format!("Could not open browser: {e}"), self.status_ttl)
            }
        });
    }

    pub fn expire_status(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.status = None;
        }
    }
}
