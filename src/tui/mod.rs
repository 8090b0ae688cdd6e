//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing a currency pair, history
//! length, window width, and epoch count, then renders the observed series
//! and its forecast continuation as a chart.
//!
//! Runs are synchronous inside the event loop, so a pipeline invocation can
//! never overlap a previous one; the status line doubles as the
//! "in progress" indicator between redraws.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
    backend::CrosstermBackend,
};

use crate::app::pipeline::{self, RunOutput};
use crate::domain::{ForecastConfig, RatePoint};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::FxPlottersChart;

/// Currency pairs the TUI cycles through.
const PAIRS: &[(&str, &str)] = &[
    ("EUR", "USD"),
    ("EUR", "GBP"),
    ("GBP", "USD"),
    ("USD", "JPY"),
    ("USD", "CHF"),
    ("AUD", "USD"),
];

/// Start the TUI.
pub fn run(config: ForecastConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.refetch_and_run();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: ForecastConfig,
    pair_idx: usize,
    selected_field: usize,
    status: String,
    /// Fetched series, cached so retrains don't refetch.
    series: Option<Vec<RatePoint>>,
    run: Option<RunOutput>,
}

impl App {
    fn new(config: ForecastConfig) -> Self {
        let pair_idx = PAIRS
            .iter()
            .position(|&(b, q)| b == config.base && q == config.quote)
            .unwrap_or(0);
        Self {
            config,
            pair_idx,
            selected_field: 0,
            status: "Starting...".to_string(),
            series: None,
            run: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 3 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('r') => {
                self.refetch_and_run();
            }
            KeyCode::Char('s') => {
                self.config.seed = self.config.seed.wrapping_add(1);
                self.retrain();
                self.status = format!("Retrained with seed {}.", self.config.seed);
            }
            KeyCode::Char('o') => {
                self.config.offline = !self.config.offline;
                self.refetch_and_run();
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i64) {
        match self.selected_field {
            0 => {
                let n = PAIRS.len() as i64;
                self.pair_idx = ((self.pair_idx as i64 + delta).rem_euclid(n)) as usize;
                let (base, quote) = PAIRS[self.pair_idx];
                self.config.base = base.to_string();
                self.config.quote = quote.to_string();
                self.refetch_and_run();
            }
            1 => {
                let next = self.config.days as i64 + delta * 30;
                self.config.days = next.clamp(30, 720) as u32;
                self.refetch_and_run();
            }
            2 => {
                let next = self.config.window as i64 + delta;
                self.config.window = next.clamp(2, 60) as usize;
                self.retrain();
            }
            3 => {
                let next = self.config.epochs as i64 + delta * 10;
                self.config.epochs = next.clamp(10, 500) as usize;
                self.retrain();
            }
            _ => {}
        }
    }

    fn refetch_and_run(&mut self) {
        self.status = format!("Fetching {} rates...", self.config.pair_label());
        match pipeline::run_forecast(&self.config, &mut |_| {}) {
            Ok(run) => {
                self.series = Some(run.series.clone());
                self.status = run_status(&run);
                self.run = Some(run);
            }
            Err(err) => {
                self.run = None;
                self.status = format!("Error: {err}");
            }
        }
    }

    /// Retrain on the cached series without refetching.
    fn retrain(&mut self) {
        let Some(series) = self.series.clone() else {
            self.refetch_and_run();
            return;
        };
        match pipeline::run_forecast_with_series(&self.config, series, &mut |_| {}) {
            Ok(run) => {
                self.status = run_status(&run);
                self.run = Some(run);
            }
            Err(err) => {
                self.run = None;
                self.status = format!("Error: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("fxf", Style::default().fg(Color::Cyan)),
            Span::raw(" — FX rate forecast (client-side RNN)"),
        ]));

        let source = if self.config.offline { "offline" } else { "live" };
        lines.push(Line::from(Span::styled(
            format!(
                "pair: {} | days: {} | window: {} | epochs: {} | source: {source}",
                self.config.pair_label(),
                self.config.days,
                self.config.window,
                self.config.epochs,
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(run) = &self.run {
            let loss = run
                .history
                .final_loss()
                .map(|v| format!("{v:.6}"))
                .unwrap_or_else(|| "-".to_string());
            let val = run
                .history
                .final_val_loss()
                .map(|v| format!("{v:.6}"))
                .unwrap_or_else(|| "n/a".to_string());
            lines.push(Line::from(Span::styled(
                format!(
                    "n={} | last {} = {:.4} | loss={loss} | val={val}",
                    run.stats.n_points,
                    run.stats.last_date,
                    run.series.last().map(|p| p.rate).unwrap_or(f64::NAN),
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("History + Forecast").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (history, forecast, x_bounds, y_bounds) = chart_series(run);

        let widget = FxPlottersChart {
            history: &history,
            forecast: &forecast,
            x_bounds,
            y_bounds,
            x_label: "day",
            y_label: format!("{} per {}", self.config.quote, self.config.base),
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y,
        };

        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![
            ListItem::new(format!("Pair: {}", self.config.pair_label())),
            ListItem::new(format!("Days: {}", self.config.days)),
            ListItem::new(format!("Window: {}", self.config.window)),
            ListItem::new(format!("Epochs: {}", self.config.epochs)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  r refetch  s reseed  o offline  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(
                &self.status,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn run_status(run: &RunOutput) -> String {
    match run.forecast.last() {
        Some(point) => format!("Done. {} -> {:.4} on {}.", run.stats.last_date, point.rate, point.date),
        None => "Done.".to_string(),
    }
}

/// Build chart series for Plotters (x = day offset from first observation).
fn chart_series(run: &RunOutput) -> (Vec<(f64, f64)>, Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let first_date = run.stats.first_date;
    let day = |date: chrono::NaiveDate| (date - first_date).num_days() as f64;

    let history: Vec<(f64, f64)> = run.series.iter().map(|p| (day(p.date), p.rate)).collect();

    // Start the forecast line at the last observation so the chart reads as
    // one continuous series.
    let mut forecast = Vec::with_capacity(run.forecast.len() + 1);
    if let Some(last) = run.series.last() {
        forecast.push((day(last.date), last.rate));
    }
    forecast.extend(run.forecast.iter().map(|p| (day(p.date), p.rate)));

    let x_max = forecast
        .last()
        .or(history.last())
        .map(|&(x, _)| x)
        .unwrap_or(1.0);
    let x_bounds = [0.0, x_max.max(1.0)];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in history.iter().chain(forecast.iter()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    (history, forecast, x_bounds, y_bounds)
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.4}")
}
