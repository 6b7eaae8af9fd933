use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use passcode_core::{
    config::AppConfig,
    error::{LoadError, SubmitError},
    matcher::CODE_LENGTH,
    random::SeededRandom,
    session::{GameSession, Outcome},
    sheet::{Sheet, SheetLoader},
    widget::{InputStyle, OptionPicker},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::glyphs;

const TICK_RATE: Duration = Duration::from_millis(250);
const TITLE: &str = "PASSCODE";
const SLOT_WIDTH: u16 = 12;
const SLOT_HEIGHT: u16 = 7;
const OPTION_WIDTH: u16 = 13;
const OPTION_HEIGHT: u16 = 7;
const GAP: u16 = 2;
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

#[derive(Debug, Clone)]
struct Theme {
    accent: Color,
    primary_fg: Color,
    muted: Color,
    error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            primary_fg: Color::White,
            muted: Color::DarkGray,
            error: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Loading,
    Entry,
    Playback,
    Failed,
}

enum AppEvent {
    Input(Event),
    Tick,
    SheetLoaded(Result<Sheet, LoadError>),
}

/// Terminal frontend for the passcode game.
pub struct PasscodeApp {
    config: AppConfig,
    loader: SheetLoader,
    session: GameSession,
    rng: SeededRandom,
    screen: Screen,
    outcome: Option<Outcome>,
    load_error: Option<String>,
    state: UiState,
    theme: Theme,
}

impl PasscodeApp {
    pub fn new(config: AppConfig, loader: SheetLoader) -> Self {
        let rng = SeededRandom::from_optional_seed(config.seed);
        Self {
            loader,
            session: GameSession::new(Sheet::empty()),
            rng,
            screen: Screen::Loading,
            outcome: None,
            load_error: None,
            state: UiState::default(),
            theme: Theme::default(),
            config,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.start_sheet_load(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn start_sheet_load(&mut self, sender: mpsc::Sender<AppEvent>) {
        let loader = self.loader.clone();
        info!(source = %loader.source(), "Fetching passcode sheet");
        self.state.set_status("Loading passcodes...".to_string());
        tokio::spawn(async move {
            let result = loader.load().await;
            if sender.send(AppEvent::SheetLoaded(result)).await.is_err() {
                warn!("UI closed before the sheet finished loading");
            }
        });
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => {
                self.state.spinner = self.state.spinner.wrapping_add(1);
                true
            }
            Some(AppEvent::SheetLoaded(result)) => {
                self.handle_sheet_loaded(result);
                true
            }
            None => false,
        }
    }

    fn handle_sheet_loaded(&mut self, result: Result<Sheet, LoadError>) {
        match result {
            Ok(sheet) => {
                let records = sheet.records.len();
                let status = if sheet.is_empty() {
                    "The passcode sheet has no usable rows".to_string()
                } else {
                    format!("Loaded {records} passcodes")
                };
                self.session = GameSession::new(sheet)
                    .with_wrong_code_label(self.config.wrong_code_label.clone());
                self.screen = Screen::Entry;
                self.state.set_status(status);
            }
            Err(err) => {
                error!(?err, "Sheet load failed");
                self.load_error = Some(err.to_string());
                self.screen = Screen::Failed;
                self.state.set_status("Error loading data".to_string());
            }
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return Ok(());
        }

        match self.screen {
            Screen::Loading | Screen::Failed => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
                    self.state.should_quit = true;
                }
            }
            Screen::Entry if self.session.picker().is_some() => self.handle_picker_key(key)?,
            Screen::Entry => self.handle_entry_key(key)?,
            Screen::Playback => self.handle_playback_key(key),
        }
        Ok(())
    }

    fn handle_entry_key(&mut self, key: KeyEvent) -> Result<()> {
        let active = self.session.active_slot();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.state.should_quit = true;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.session.set_active(active.saturating_sub(1))?;
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.session
                    .set_active((active + 1).min(CODE_LENGTH - 1))?;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let picker = self.session.open_picker(active, &mut self.rng)?;
                let style = picker.style;
                self.state
                    .set_status(format!("Box {}: pick a {}", active + 1, describe(style)));
            }
            KeyCode::Char('s') | KeyCode::Char('S') => self.submit(),
            _ => {}
        }
        Ok(())
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(picker) = self.session.picker_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.session.close_picker();
                self.state.set_status("Selection cancelled".to_string());
            }
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                picker.move_cursor(-1);
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
                picker.move_cursor(1);
            }
            KeyCode::Char(ch @ '1'..='5') => {
                let position = ch as usize - '1' as usize;
                if picker.set_cursor(position) {
                    self.commit_pick()?;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.commit_pick()?,
            _ => {}
        }
        Ok(())
    }

    fn commit_pick(&mut self) -> Result<()> {
        let slot = self.session.active_slot();
        if let Some(digit) = self.session.select_highlighted()? {
            debug!(slot, digit, "Digit selected");
        }
        if self.session.is_complete() {
            self.state
                .set_status("All boxes filled. Press s to submit".to_string());
        } else {
            self.state.set_status(format!("Box {} set", slot + 1));
        }
        Ok(())
    }

    fn submit(&mut self) {
        if !self.session.is_complete() {
            self.state
                .set_status("Fill all five boxes before submitting".to_string());
            return;
        }
        match self.session.submit(&mut self.rng) {
            Ok(outcome) => {
                info!(title = %outcome.title, matched = outcome.matched, "Showing video");
                self.outcome = Some(outcome);
                self.screen = Screen::Playback;
                self.state
                    .set_status("Open the link to play. Enter to try again".to_string());
            }
            Err(SubmitError::Link(err)) => {
                warn!(%err, "Video link rejected");
                self.state
                    .set_status("Error: Could not load video".to_string());
            }
            Err(err) => {
                error!(%err, "Submit failed");
                self.state.set_status(format!("Error: {err}"));
            }
        }
    }

    fn handle_playback_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.state.should_quit = true;
            }
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('t') => self.try_again(),
            _ => {}
        }
    }

    fn try_again(&mut self) {
        self.session.reset();
        self.outcome = None;
        self.screen = Screen::Entry;
        self.state.set_status("Enter a new code".to_string());
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Loading => self.draw_loading(frame),
            Screen::Entry => self.draw_entry(frame),
            Screen::Playback => self.draw_playback(frame),
            Screen::Failed => self.draw_failed(frame),
        }
    }

    fn banner_layout(&self, area: Rect) -> (Vec<Line<'static>>, Rect, Rect) {
        let banner_lines = glyphs::banner(TITLE);
        let banner_height = banner_lines.len() as u16 + 2;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner_height.min(area.height)),
                Constraint::Min(3),
            ])
            .split(area);
        let content = banner_lines
            .into_iter()
            .map(|line| {
                Line::from(Span::styled(
                    line,
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        (content, layout[0], layout[1])
    }

    fn draw_loading(&mut self, frame: &mut Frame) {
        let (banner, banner_area, body) = self.banner_layout(frame.size());
        frame.render_widget(
            Paragraph::new(banner).alignment(Alignment::Center),
            banner_area,
        );

        let spinner = SPINNER[self.state.spinner % SPINNER.len()];
        let area = centered_rect(40, 3, body);
        let paragraph = Paragraph::new(Line::from(format!("{spinner} Loading passcodes")))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn draw_failed(&mut self, frame: &mut Frame) {
        let (banner, banner_area, body) = self.banner_layout(frame.size());
        frame.render_widget(
            Paragraph::new(banner).alignment(Alignment::Center),
            banner_area,
        );

        let detail = self.load_error.clone().unwrap_or_default();
        let lines = vec![
            Line::from(Span::styled(
                "Error loading data",
                Style::default()
                    .fg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(detail, Style::default().fg(self.theme.muted))),
            Line::from(""),
            Line::from("Restart to try again. Press q to quit."),
        ];
        let width = 70.min(body.width);
        let area = centered_rect(width, 9, body);
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Error"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_entry(&mut self, frame: &mut Frame) {
        let (banner, banner_area, body) = self.banner_layout(frame.size());
        frame.render_widget(
            Paragraph::new(banner).alignment(Alignment::Center),
            banner_area,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SLOT_HEIGHT),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(4),
            ])
            .split(body);

        self.render_slots(frame, chunks[0]);
        self.render_hint(frame, chunks[1]);
        self.render_status(frame, chunks[3]);

        if let Some(picker) = self.session.picker() {
            self.render_picker(frame, picker);
        }
    }

    fn render_slots(&self, frame: &mut Frame, area: Rect) {
        let count = CODE_LENGTH as u16;
        let row_width = count * SLOT_WIDTH + (count - 1) * GAP;
        let row = centered_rect(row_width, SLOT_HEIGHT, area);
        let code = self.session.code();

        for (slot, cell) in row_cells(row, CODE_LENGTH, SLOT_WIDTH, GAP)
            .into_iter()
            .enumerate()
        {
            let active = slot == self.session.active_slot();
            let border = if active {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            };
            let lines: Vec<Line> = match code.get(slot) {
                Some(digit) => glyphs::digit(digit).into_iter().map(Line::from).collect(),
                None => vec![
                    Line::from(""),
                    Line::from(""),
                    Line::from(Span::styled("-", Style::default().fg(self.theme.muted))),
                ],
            };
            let marker = if active { "▶" } else { " " };
            let paragraph = Paragraph::new(lines)
                .style(Style::default().fg(self.theme.primary_fg))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border)
                        .title(format!("{marker}{}", slot + 1)),
                )
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, cell);
        }
    }

    fn render_hint(&self, frame: &mut Frame, area: Rect) {
        let line = if self.session.is_complete() {
            Line::from(vec![
                Span::styled(
                    "s",
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" submit  "),
                Span::styled("←/→", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" change a box  "),
                Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" quit"),
            ])
        } else {
            Line::from(vec![
                Span::styled("←/→", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" choose box  "),
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" pick digit  "),
                Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" quit"),
            ])
        };
        frame.render_widget(
            Paragraph::new(vec![Line::from(""), line]).alignment(Alignment::Center),
            area,
        );
    }

    fn render_picker(&self, frame: &mut Frame, picker: &OptionPicker) {
        let frame_area = frame.size();
        let count = picker.options.len() as u16;
        let width = (count * OPTION_WIDTH + (count - 1) * GAP + 4).min(frame_area.width);
        let height = (OPTION_HEIGHT + 5).min(frame_area.height);
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);

        let title = format!(
            "Box {} - {}",
            picker.slot + 1,
            picker.style.label()
        );
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .title(title);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(OPTION_HEIGHT),
                Constraint::Min(1),
            ])
            .split(inner);

        let row_width = count * OPTION_WIDTH + (count - 1) * GAP;
        let row = centered_rect(row_width, OPTION_HEIGHT, chunks[1]);
        for (index, cell) in row_cells(row, picker.options.len(), OPTION_WIDTH, GAP)
            .into_iter()
            .enumerate()
        {
            let digit = picker.options[index];
            let highlighted = index == picker.cursor();
            let art = match picker.style {
                InputStyle::Numbers => glyphs::digit(digit),
                InputStyle::Dice => glyphs::die(digit),
                InputStyle::Spots => glyphs::spots(digit),
            };
            let border = if highlighted {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            };
            let paragraph = Paragraph::new(art.into_iter().map(Line::from).collect::<Vec<_>>())
                .style(Style::default().fg(self.theme.primary_fg))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border)
                        .title(format!("{}", index + 1)),
                )
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, cell);
        }

        let helper = Line::from(vec![
            Span::styled("←/→", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" move  "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" choose  "),
            Span::styled("1-5", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" pick by position  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]);
        frame.render_widget(
            Paragraph::new(helper).alignment(Alignment::Center),
            chunks[2],
        );
    }

    fn draw_playback(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let Some(outcome) = self.outcome.as_ref() else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(area);

        let title_style = if outcome.matched {
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.theme.error)
                .add_modifier(Modifier::BOLD)
        };
        let title = Paragraph::new(Line::from(Span::styled(outcome.title.clone(), title_style)))
            .block(Block::default().borders(Borders::BOTTOM))
            .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let width = 80.min(chunks[1].width);
        let player_area = centered_rect(width, 7, chunks[1]);
        let player = Paragraph::new(vec![
            Line::from("Open this link in a browser to play the video:"),
            Line::from(""),
            Line::from(Span::styled(
                outcome.embed_url.clone(),
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::UNDERLINED),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" try again  "),
                Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" quit"),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL).title("Video"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(player, player_area);

        self.render_status(frame, chunks[2]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let sheet = self.session.sheet();
        let loaded_at = sheet.loaded_at.with_timezone(&Local).format("%H:%M:%S");
        let secondary = format!(
            "Passcodes: {}  Fallback videos: {}  Loaded at {loaded_at}",
            sheet.records.len(),
            sheet.fallbacks.len()
        );
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn describe(style: InputStyle) -> &'static str {
    match style {
        InputStyle::Numbers => "number",
        InputStyle::Dice => "die face",
        InputStyle::Spots => "spot pattern",
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    status: String,
    should_quit: bool,
    spinner: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
            should_quit: false,
            spinner: 0,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Split `row` into `count` cells of `width`, separated by `gap`, clipped to the row.
fn row_cells(row: Rect, count: usize, width: u16, gap: u16) -> Vec<Rect> {
    (0..count as u16)
        .map(|index| {
            let x = row.x.saturating_add(index * (width + gap));
            let right = row.x.saturating_add(row.width);
            let clipped = width.min(right.saturating_sub(x));
            Rect::new(x.min(right), row.y, clipped, row.height)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(10, 5, 20, 10);
        let rect = centered_rect(30, 4, area);
        assert_eq!(rect, Rect::new(10, 8, 20, 4));
    }

    #[test]
    fn row_cells_are_spaced_and_clipped() {
        let cells = row_cells(Rect::new(0, 0, 30, 7), 3, 12, 2);
        assert_eq!(cells[0], Rect::new(0, 0, 12, 7));
        assert_eq!(cells[1], Rect::new(14, 0, 12, 7));
        assert_eq!(cells[2], Rect::new(28, 0, 2, 7));
    }
}
