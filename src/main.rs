pub mod calculator;
pub mod config;
pub mod convert;
pub mod preset;
pub mod runtime;
pub mod theme;
pub mod ui;

use crate::{
    calculator::{Calculator, Field},
    config::{Config, ConfigStore, FileConfigStore},
    preset::{Preset, DEFAULT_PRESETS},
    runtime::{AppEvent, CrosstermEventSource, EventSource},
    theme::ThemeMode,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};

/// interactive running pace calculator tui
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "An interactive running pace calculator. Fix any two of distance, pace, and total time and the third is derived live as you edit."
)]
pub struct Cli {
    /// starting distance in kilometers
    #[clap(short = 'd', long, default_value = "10.00")]
    distance: String,

    /// starting pace in MM:SS per kilometer
    #[clap(short = 'p', long, default_value = "05:30")]
    pace: String,

    /// starting total time in HH:MM:SS
    #[clap(short = 't', long, default_value = "00:55:00")]
    time: String,

    /// which field is derived from the other two
    #[clap(short = 'c', long, value_enum, default_value_t = Field::Time)]
    calculate: Field,

    /// visual theme for this session (otherwise the saved preference applies)
    #[clap(long, value_enum)]
    theme: Option<ThemeMode>,

    /// distance stepper increment in kilometers
    #[clap(long)]
    distance_step: Option<f64>,

    /// pace stepper increment in seconds per kilometer
    #[clap(long)]
    pace_step: Option<i64>,

    /// time stepper increment in seconds
    #[clap(long)]
    time_step: Option<i64>,
}

impl Cli {
    /// Fold the CLI overrides into the persisted preferences.
    fn apply_to(&self, config: &mut Config) {
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(step) = self.distance_step {
            config.distance_step_km = step;
        }
        if let Some(step) = self.pace_step {
            config.pace_step_seconds = step;
        }
        if let Some(step) = self.time_step {
            config.time_step_seconds = step;
        }
    }
}

const ALL_FIELDS: [Field; 3] = [Field::Distance, Field::Pace, Field::Time];

// maxLength per field: enough for "HH:MM:SS" and "MM:SS"; distance is free-form
fn max_field_len(field: Field) -> usize {
    match field {
        Field::Distance => 10,
        Field::Pace => 5,
        Field::Time => 8,
    }
}

#[derive(Debug)]
pub struct App {
    pub calculator: Calculator,
    pub presets: &'static [Preset],
    pub theme: ThemeMode,
    pub focus: Field,
}

impl App {
    pub fn new(cli: &Cli, config: &Config) -> Self {
        let calculator = Calculator::with_values(
            &cli.distance,
            &cli.pace,
            &cli.time,
            cli.calculate,
            config.step_sizes(),
        );
        let focus = first_editable(cli.calculate);

        Self {
            calculator,
            presets: &DEFAULT_PRESETS,
            theme: config.theme,
            focus,
        }
    }

    /// Move focus to the next editable field, skipping the derived one.
    pub fn focus_next(&mut self) {
        self.focus = neighbor(self.focus, self.calculator.mode(), 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = neighbor(self.focus, self.calculator.mode(), ALL_FIELDS.len() - 1);
    }

    /// Switch the derived field. Focus can never rest on the derived field,
    /// so it hops off when the new mode lands on it.
    pub fn set_mode(&mut self, mode: Field) {
        self.calculator.set_mode(mode);
        if self.focus == mode {
            self.focus = first_editable(mode);
        }
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
    }
}

fn first_editable(mode: Field) -> Field {
    ALL_FIELDS
        .into_iter()
        .find(|f| *f != mode)
        .unwrap_or(Field::Distance)
}

fn neighbor(focus: Field, mode: Field, step: usize) -> Field {
    let start = ALL_FIELDS.iter().position(|f| *f == focus).unwrap_or(0);
    let mut idx = start;
    loop {
        idx = (idx + step) % ALL_FIELDS.len();
        if ALL_FIELDS[idx] != mode {
            return ALL_FIELDS[idx];
        }
        if idx == start {
            return focus;
        }
    }
}

/// Route one key press into the app. Returns true when the app should exit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Up => app.calculator.increment(app.focus),
        KeyCode::Down => app.calculator.decrement(app.focus),
        KeyCode::Backspace => {
            let mut text = app.calculator.value(app.focus).to_string();
            if text.pop().is_some() {
                app.calculator.on_change(app.focus, &text);
            }
        }
        KeyCode::F(n @ 1..=4) => {
            if let Some(preset) = app.presets.get(n as usize - 1) {
                let preset = *preset;
                app.calculator.apply_preset(&preset);
            }
        }
        KeyCode::Char('d') => app.set_mode(Field::Distance),
        KeyCode::Char('p') => app.set_mode(Field::Pace),
        KeyCode::Char('t') => app.set_mode(Field::Time),
        KeyCode::Char('v') => app.cycle_theme(),
        KeyCode::Char(c) if c.is_ascii_digit() || c == ':' || c == '.' => {
            let mut text = app.calculator.value(app.focus).to_string();
            if text.len() < max_field_len(app.focus) {
                text.push(c);
                app.calculator.on_change(app.focus, &text);
            }
        }
        _ => {}
    }

    false
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn run_app<B: Backend, E: EventSource, S: ConfigStore>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &E,
    store: &S,
    config: &mut Config,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        match events.recv() {
            Ok(AppEvent::Key(key)) => {
                let theme_before = app.theme;
                if handle_key(app, key) {
                    break;
                }
                if app.theme != theme_before {
                    config.theme = app.theme;
                    let _ = store.save(config);
                }
            }
            Ok(AppEvent::Resize) => {}
            Err(_) => break,
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply_to(&mut config);

    let mut app = App::new(&cli, &config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let result = run_app(&mut terminal, &mut app, &events, &store, &mut config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cli() -> Cli {
        Cli {
            distance: "10.00".to_string(),
            pace: "05:30".to_string(),
            time: "00:55:00".to_string(),
            calculate: Field::Time,
            theme: None,
            distance_step: None,
            pace_step: None,
            time_step: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_app_starts_focused_on_first_editable_field() {
        let app = App::new(&test_cli(), &Config::default());
        assert_eq!(app.focus, Field::Distance);

        let mut cli = test_cli();
        cli.calculate = Field::Distance;
        let app = App::new(&cli, &Config::default());
        assert_eq!(app.focus, Field::Pace);
    }

    #[test]
    fn test_typing_digits_edits_the_focused_field() {
        let mut app = App::new(&test_cli(), &Config::default());
        handle_key(&mut app, key(KeyCode::Backspace));
        handle_key(&mut app, key(KeyCode::Char('5')));
        assert_eq!(app.calculator.value(Field::Distance), "10.05");
    }

    #[test]
    fn test_typing_respects_field_max_length() {
        let mut app = App::new(&test_cli(), &Config::default());
        handle_key(&mut app, key(KeyCode::Tab)); // focus pace, already 5 chars
        handle_key(&mut app, key(KeyCode::Char('1')));
        assert_eq!(app.calculator.value(Field::Pace), "05:30");
    }

    #[test]
    fn test_tab_skips_the_calculated_field() {
        let mut app = App::new(&test_cli(), &Config::default());
        assert_eq!(app.focus, Field::Distance);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Field::Pace);
        handle_key(&mut app, key(KeyCode::Tab));
        // time is derived, so focus wraps back to distance
        assert_eq!(app.focus, Field::Distance);
        handle_key(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.focus, Field::Pace);
    }

    #[test]
    fn test_mode_keys_switch_mode_and_move_focus() {
        let mut app = App::new(&test_cli(), &Config::default());
        handle_key(&mut app, key(KeyCode::Char('d')));
        assert_eq!(app.calculator.mode(), Field::Distance);
        assert_ne!(app.focus, Field::Distance);
    }

    #[test]
    fn test_preset_keys_apply_presets() {
        let mut app = App::new(&test_cli(), &Config::default());
        handle_key(&mut app, key(KeyCode::F(4)));
        assert_eq!(app.calculator.value(Field::Distance), "42.20");
        // 42.2 km at 05:30/km
        assert_eq!(app.calculator.value(Field::Time), "03:52:06");
    }

    #[test]
    fn test_steppers_use_the_focused_field() {
        let mut app = App::new(&test_cli(), &Config::default());
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.calculator.value(Field::Distance), "10.50");
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.calculator.value(Field::Distance), "10.00");
    }

    #[test]
    fn test_escape_and_ctrl_c_quit() {
        let mut app = App::new(&test_cli(), &Config::default());
        assert!(handle_key(&mut app, key(KeyCode::Esc)));
        assert!(handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        assert!(!handle_key(&mut app, key(KeyCode::Char('5'))));
    }

    #[test]
    fn test_theme_key_cycles() {
        let mut app = App::new(&test_cli(), &Config::default());
        let before = app.theme;
        handle_key(&mut app, key(KeyCode::Char('v')));
        assert_ne!(app.theme, before);
    }

    #[test]
    fn test_cli_overrides_fold_into_config() {
        let mut cli = test_cli();
        cli.theme = Some(ThemeMode::Dark);
        cli.pace_step = Some(30);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.pace_step_seconds, 30);
        // untouched values keep their defaults
        assert_eq!(config.time_step_seconds, 60);
    }
}
