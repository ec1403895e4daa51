//! Ratatui-based terminal UI.
//!
//! The TUI shows the A/E/T inputs (slider position plus editable text), the
//! live curve over the observed data on a log SF axis, and any stored
//! comparison curves. Every state change goes through [`Session`].

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use tracing::info;

use crate::app::session::Session;
use crate::domain::{Curve, Domain, ParamKind, Scene, is_plottable};
use crate::error::AppError;
use crate::input::TextCommit;
use crate::io::FormatRegistry;

mod plotters_chart;

use plotters_chart::SfPlottersChart;

/// Slider positions moved by PageUp/PageDown.
const COARSE_STEP: i64 = 10;

/// Start the TUI.
pub fn run(session: Session, export_path: PathBuf) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session, export_path);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

/// What keystrokes currently edit.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    Normal,
    EditParam(String),
    ImportPath(String),
}

struct App {
    session: Session,
    registry: FormatRegistry,
    export_path: PathBuf,
    selected: usize,
    mode: InputMode,
    status: String,
}

impl App {
    fn new(session: Session, export_path: PathBuf) -> Self {
        Self {
            session,
            registry: FormatRegistry::default(),
            export_path,
            selected: 0,
            mode: InputMode::Normal,
            status: "p print graph, a add graph".to_string(),
        }
    }

    fn selected_kind(&self) -> ParamKind {
        ParamKind::ALL[self.selected]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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
        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::Normal => return self.handle_normal_key(code),
            InputMode::EditParam(buffer) => self.handle_param_edit(code, buffer),
            InputMode::ImportPath(buffer) => self.handle_import_edit(code, buffer),
        }
        false
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        let kind = self.selected_kind();
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected + 1 < ParamKind::ALL.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left => self.step(kind, -1),
            KeyCode::Right => self.step(kind, 1),
            KeyCode::PageDown => self.step(kind, -COARSE_STEP),
            KeyCode::PageUp => self.step(kind, COARSE_STEP),
            KeyCode::Enter => {
                self.mode = InputMode::EditParam(self.session.field(kind).text().to_string());
                self.status = format!("Editing {}. Enter to apply, Esc to cancel.", kind.display_name());
            }
            KeyCode::Char('p') => {
                self.session.draw_replace();
                self.status = format!("Graph: {}", self.session.params().label());
            }
            KeyCode::Char('a') => {
                let shown = self.session.draw_add().overlays.len();
                self.status = format!(
                    "Added {} ({} stored curve(s) shown)",
                    self.session.params().label(),
                    shown
                );
            }
            KeyCode::Char('i') => {
                self.mode = InputMode::ImportPath(String::new());
                self.status = "Import path (.txt/.csv). Enter to load, Esc to cancel.".to_string();
            }
            KeyCode::Char('x') => self.export(),
            _ => {}
        }
        false
    }

    fn handle_param_edit(&mut self, code: KeyCode, mut buffer: String) {
        let kind = self.selected_kind();
        match code {
            KeyCode::Esc => {
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.status = match self.session.commit_param_text(kind, &buffer) {
                    TextCommit::Accepted => {
                        format!("{} = {}", kind.display_name(), self.session.field(kind).text())
                    }
                    TextCommit::Reset => {
                        format!("Invalid {} '{buffer}', reset to 0.", kind.display_name())
                    }
                };
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = InputMode::EditParam(buffer);
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = InputMode::EditParam(buffer);
            }
            _ => self.mode = InputMode::EditParam(buffer),
        }
    }

    fn handle_import_edit(&mut self, code: KeyCode, mut buffer: String) {
        match code {
            KeyCode::Esc => {
                self.status = "Import canceled.".to_string();
            }
            KeyCode::Enter => {
                let path = PathBuf::from(buffer.trim());
                self.status = match self.session.import(&path, &self.registry) {
                    Ok(report) => format!(
                        "Imported {} point(s), skipped {} | dose ≤ {:.3}",
                        report.points, report.skipped, report.domain.right
                    ),
                    Err(err) => err.to_string(),
                };
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = InputMode::ImportPath(buffer);
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = InputMode::ImportPath(buffer);
            }
            _ => self.mode = InputMode::ImportPath(buffer),
        }
    }

    fn step(&mut self, kind: ParamKind, delta: i64) {
        self.session.step_param(kind, delta);
        self.status = format!("{} = {}", kind.display_name(), self.session.field(kind).text());
    }

    fn export(&mut self) {
        self.status = match self.session.export(&self.export_path) {
            Ok(curve) => {
                info!(path = %self.export_path.display(), "export complete");
                format!("Export complete: {} ({} rows)", self.export_path.display(), curve.len())
            }
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let domain = self.session.domain();
        let lines = vec![
            Line::from(vec![
                Span::styled("sf", Style::default().fg(Color::Cyan)),
                Span::raw(" — survival fraction curves"),
            ]),
            Line::from(Span::styled(
                format!(
                    "A E T: {} | stored: {} | data: n={} | dose: [{:.3}, {:.3}] Gy",
                    self.session.params().label(),
                    self.session.history().len(),
                    self.session.points().len(),
                    domain.left,
                    domain.right,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(6)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_params(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Survival fraction").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = ChartSeries::build(
            self.session.scene(),
            self.session.points().iter(),
            self.session.domain(),
        );

        let (chart_rect, insets) = chart_layout(inner);
        let widget = SfPlottersChart {
            live: &series.live,
            stored: &series.stored,
            points: &series.points,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "dose (Gy)",
            y_label: "SF",
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y_log,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, series.x_bounds, series.y_bounds);
        }
    }

    fn draw_params(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = ParamKind::ALL
            .iter()
            .map(|&kind| {
                let field = self.session.field(kind);
                let range = field.range();
                let text = match &self.mode {
                    InputMode::EditParam(buffer) if kind == self.selected_kind() => format!("{buffer}▏"),
                    _ => field.text().to_string(),
                };
                ListItem::new(format!(
                    "{}: {:<12} {} {}/{}",
                    kind.display_name(),
                    text,
                    slider_bar(field.position(), range.min, range.max, 20),
                    field.position(),
                    range.max,
                ))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Parameters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);

        if let InputMode::ImportPath(buffer) = &self.mode {
            let hint = Paragraph::new(format!("Import: {buffer}▏"))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ PgUp/PgDn slide  Enter edit  p print  a add  i import  x export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart-ready series in log10(SF) space.
#[derive(Debug, Clone, PartialEq)]
struct ChartSeries {
    live: Vec<Vec<(f64, f64)>>,
    stored: Vec<Vec<Vec<(f64, f64)>>>,
    points: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl ChartSeries {
    fn build(scene: &Scene, data: impl Iterator<Item = (f64, f64)>, domain: Domain) -> Self {
        let live = log_series(&scene.live);
        let stored: Vec<_> = scene.overlays.iter().map(log_series).collect();
        let points: Vec<_> = data
            .filter(|&(x, y)| x.is_finite() && is_plottable(y))
            .map(|(x, y)| (x, y.log10()))
            .collect();

        let mut x_bounds = [domain.left, domain.right];
        if !(x_bounds[0].is_finite() && x_bounds[1].is_finite()) || x_bounds[1] <= x_bounds[0] {
            x_bounds = [0.0, 1.0];
        }

        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let line_points = live.iter().flatten().chain(stored.iter().flatten().flatten());
        for &(_, y) in line_points.chain(points.iter()) {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if !y_min.is_finite() || !y_max.is_finite() {
            y_min = -1.0;
            y_max = 0.0;
        }
        if y_max <= y_min {
            y_min = y_max - 1.0;
        }

        let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
        let y_bounds = [y_min - pad, y_max + pad];

        Self {
            live,
            stored,
            points,
            x_bounds,
            y_bounds,
        }
    }
}

fn log_series(curve: &Curve) -> Vec<Vec<(f64, f64)>> {
    curve
        .segments()
        .into_iter()
        .map(|seg| seg.into_iter().map(|(x, y)| (x, y.log10())).collect())
        .collect()
}

fn slider_bar(position: i64, min: i64, max: i64, width: usize) -> String {
    let span = (max - min).max(1) as f64;
    let u = ((position - min) as f64 / span).clamp(0.0, 1.0);
    let filled = (u * width as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), "·".repeat(width - filled))
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.1}")
}

/// Tick label for a log10 value.
fn fmt_axis_y_log(v: f64) -> String {
    format!("{:.0e}", 10f64.powf(v))
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_x(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_y_log(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("dose (Gy)")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("SF")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
