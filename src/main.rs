use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::seq::SliceRandom;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use poke_sight::arena::{Arena, Contender, format_percent};
use poke_sight::config::{self, Settings};
use poke_sight::persist;
use poke_sight::state::{AppState, InputField, Outcome};

const IMPORTANCE_BARS: usize = 8;

struct App {
    arena: Arena,
    state: AppState,
    persist_enabled: bool,
    should_quit: bool,
}

impl App {
    fn new(arena: Arena, settings: &Settings) -> Self {
        let mut state = AppState::new(settings.default_p1.clone(), settings.default_p2.clone());
        if settings.persist_enabled {
            persist::load_into_state(&mut state);
        }
        state.importances = arena.model().feature_importances();
        state.push_log(format!(
            "[INFO] Loaded {} Pokémon, model v{} ({} features)",
            arena.dex().len(),
            arena.model().artifact().version,
            state.importances.len()
        ));
        state.refresh_preview(&arena);
        Self {
            arena,
            state,
            persist_enabled: settings.persist_enabled,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('u') => {
                    if self.state.clear_focused() {
                        self.state.refresh_preview(&self.arena);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::F(1) => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::F(2) => self.random_matchup(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.state.toggle_focus()
            }
            KeyCode::Enter => self.battle(),
            KeyCode::Backspace => {
                if self.state.pop_char() {
                    self.state.refresh_preview(&self.arena);
                }
            }
            KeyCode::Delete => {
                if self.state.clear_focused() {
                    self.state.refresh_preview(&self.arena);
                }
            }
            KeyCode::Char(ch) => {
                if self.state.push_char(ch) {
                    self.state.refresh_preview(&self.arena);
                }
            }
            _ => {}
        }
    }

    fn battle(&mut self) {
        self.state.run_battle(&self.arena);
        if self.persist_enabled && matches!(self.state.outcome, Some(Outcome::Prediction(_))) {
            persist::save_from_state(&self.state);
        }
    }

    fn random_matchup(&mut self) {
        let names = self.arena.dex().names().collect::<Vec<_>>();
        let mut rng = rand::thread_rng();
        let picked = names
            .choose_multiple(&mut rng, 2)
            .map(|s| s.to_string())
            .collect::<Vec<_>>();
        let [p1, p2] = picked.as_slice() else {
            self.state.push_log("[WARN] Not enough Pokémon for a random matchup");
            return;
        };
        self.state.set_inputs(p1.clone(), p2.clone());
        self.state.refresh_preview(&self.arena);
        self.state.push_log(format!("[INFO] Random matchup: {p1} vs {p2}"));
    }
}

fn main() -> Result<()> {
    config::load_dotenv();
    let settings = Settings::from_env();
    let arena = Arena::from_settings(&settings)?;
    let mut app = App::new(arena, &settings);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if app.persist_enabled {
        persist::save_from_state(&app.state);
    }
    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text()).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_inputs(frame, chunks[1], &app.state);
    render_preview(frame, chunks[2], &app.state);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_outcome(frame, middle[0], &app.state);
    render_importances(frame, middle[1], &app.state);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[4]);
    let history = Paragraph::new(history_text(&app.state))
        .block(Block::default().title("History").borders(Borders::ALL));
    frame.render_widget(history, bottom[0]);
    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, bottom[1]);

    let footer = Paragraph::new(
        "Type names | Tab/↑/↓ Switch | Enter Battle | Del Clear | F2 Random | F1 Help | Esc Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[5]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text() -> String {
    let line1 = "  .-.  POKÉ SIGHT | Pokémon Battle Predictor".to_string();
    let line2 = " (-o-)  Enter two Pokémon to battle and predict the winner!".to_string();
    let line3 = "  '-'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn render_inputs(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_input(
        frame,
        cols[0],
        "First Pokémon",
        &state.p1_input,
        state.focus == InputField::First,
    );
    render_input(
        frame,
        cols[1],
        "Second Pokémon",
        &state.p2_input,
        state.focus == InputField::Second,
    );
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = if focused {
        format!("{value}_")
    } else {
        value.to_string()
    };
    let input = Paragraph::new(text).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, area);
}

fn render_preview(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(10),
            Constraint::Percentage(45),
        ])
        .split(area);

    let Some(preview) = &state.preview else {
        let hint = Paragraph::new("Enter two known Pokémon names to see their artwork")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Artwork").borders(Borders::ALL));
        frame.render_widget(hint, area);
        return;
    };

    render_contender(frame, cols[0], &preview.first);

    let vs_area = Rect {
        x: cols[1].x,
        y: cols[1].y + cols[1].height / 2,
        width: cols[1].width,
        height: 1,
    };
    let vs = Paragraph::new("VS")
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(vs, vs_area);

    render_contender(frame, cols[2], &preview.second);
}

fn render_contender(frame: &mut Frame, area: Rect, contender: &Contender) {
    let lines = vec![
        Line::from(Span::styled(
            contender.display_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{}  BST {}",
            contender.types, contender.base_stat_total
        )),
        Line::from(format!("slug: {}", contender.slug)),
        Line::from(Span::styled(
            contender.image_url.clone(),
            Style::default().fg(Color::Cyan),
        )),
    ];
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn render_outcome(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Winner").borders(Borders::ALL);
    let lines = match &state.outcome {
        None => vec![Line::from(Span::styled(
            "Press Enter to battle",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(Outcome::Error(msg)) => vec![Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Red),
        ))],
        Some(Outcome::Prediction(result)) => {
            let [first_line, second_line] = result.probability_lines();
            vec![
                Line::from(Span::styled(
                    result.winner_text(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from("Prediction Probabilities:"),
                Line::from(format!("- {first_line}")),
                Line::from(format!("- {second_line}")),
            ]
        }
    };
    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(panel, area);
}

fn render_importances(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Feature Importances")
        .borders(Borders::ALL);
    if state.importances.is_empty() {
        let empty = Paragraph::new("No model weights").block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars = state
        .importances
        .iter()
        .take(IMPORTANCE_BARS)
        .map(|(name, weight)| {
            Bar::default()
                .value((weight * 100.0).round() as u64)
                .label(Line::from(name.clone()))
                .text_value(format!("{weight:.2}"))
                .style(Style::default().fg(Color::Magenta))
        })
        .collect::<Vec<_>>();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0);
    frame.render_widget(chart, area);
}

fn history_text(state: &AppState) -> String {
    if state.history.is_empty() {
        return "No battles yet".to_string();
    }
    state
        .history
        .iter()
        .take(4)
        .map(|b| {
            format!(
                "{} vs {} -> {} ({})",
                b.p1,
                b.p2,
                b.winner,
                format_percent(b.p_first)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(4)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Poké Sight - Help",
        "",
        "Inputs:",
        "  type         Edit the focused name",
        "  Backspace    Delete one character",
        "  Del / Ctrl-U Clear the focused name",
        "  Tab / ↑ / ↓  Switch input",
        "",
        "Actions:",
        "  Enter        Battle",
        "  F2           Random matchup",
        "  F1           Toggle help",
        "  Esc / Ctrl-C Quit",
        "",
        "The first Pokémon is always assumed to move first.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
