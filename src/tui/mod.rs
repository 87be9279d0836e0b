//! Ratatui-based terminal UI.
//!
//! The TUI draws the fare chart with its reference points, lets the user page
//! through those points and click on the chart, and shows the resulting
//! tooltip next to the point or the click.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{info, warn};

use crate::app::pipeline::LoadedChart;
use crate::chart::axis::{X_AXIS_TITLE, Y_AXIS_TITLE, fmt_month, fmt_price_tick, month_ticks, price_ticks};
use crate::domain::{ChartConfig, DataSource, PixelPoint};
use crate::error::AppError;
use crate::session::{Effect, Event, Session, Tooltip};

mod plotters_chart;

use plotters_chart::{ChartLine, FareChart};

/// Start the TUI.
///
/// A failed data load does not abort: the UI opens and shows the failure.
pub fn run(config: ChartConfig) -> Result<(), AppError> {
    let loaded = crate::app::pipeline::load_chart(&config);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config.source, loaded);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen, mouse) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}

enum LoadState {
    Ready(Box<LoadedChart>),
    Failed(String),
}

struct App {
    source: DataSource,
    state: LoadState,
    status: String,
    /// Where the chart widget was last drawn; used to map mouse cells to pixels.
    chart_rect: Option<Rect>,
}

impl App {
    fn new(source: DataSource, loaded: Result<LoadedChart, AppError>) -> Self {
        let (state, status) = match loaded {
            Ok(mut chart) => {
                let effects = chart.session.start();
                let status = describe_effects(&chart.session, &effects);
                (LoadState::Ready(Box::new(chart)), status)
            }
            Err(err) => {
                warn!(%err, "fare data failed to load");
                (LoadState::Failed(err.to_string()), "Load failed.".to_string())
            }
        };
        Self {
            source,
            state,
            status,
            chart_rect: None,
        }
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
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                TermEvent::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                TermEvent::Mouse(mouse) => {
                    if self.handle_mouse(mouse) {
                        needs_redraw = true;
                    }
                }
                TermEvent::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        info!("leaving fare chart");
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('n') | KeyCode::Right | KeyCode::Tab => self.dispatch(Event::Advance),
            KeyCode::Char('b') | KeyCode::Left | KeyCode::BackTab => self.dispatch(Event::Retreat),
            KeyCode::Char('d') => self.write_debug_bundle(),
            _ => {}
        }
        false
    }

    /// Returns `true` when the click changed anything.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        let (Some(rect), LoadState::Ready(chart)) = (self.chart_rect, &self.state) else {
            return false;
        };
        let layout = chart.session.layout();
        let Some(p) = cell_to_pixel(rect, mouse.column, mouse.row, layout.inner_width(), layout.inner_height())
        else {
            return false;
        };
        self.dispatch(Event::Click { x: p.x, y: p.y });
        true
    }

    fn dispatch(&mut self, event: Event) {
        let LoadState::Ready(chart) = &mut self.state else {
            return;
        };
        let effects = chart.session.dispatch(event);
        self.status = describe_effects(&chart.session, &effects);
    }

    fn write_debug_bundle(&mut self) {
        let LoadState::Ready(chart) = &self.state else {
            self.status = "No data loaded.".to_string();
            return;
        };
        match crate::debug::write_debug_bundle(&chart.session, &self.source) {
            Ok(path) => {
                self.status = format!("Wrote debug bundle: {}", path.display());
            }
            Err(err) => {
                self.status = format!("Debug write failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("fares", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {}", self.source)),
        ]));

        let detail = match &self.state {
            LoadState::Ready(chart) => {
                let stats = chart.session.dataset().stats();
                let mut spans = vec![Span::styled(
                    format!(
                        "n={} | {} → {} | point {}/{} | ",
                        stats.n_records,
                        stats.date_min,
                        stats.date_max,
                        chart.session.cursor() + 1,
                        chart.session.points().len(),
                    ),
                    Style::default().fg(Color::Gray),
                )];
                for s in chart.session.dataset().series() {
                    let c = s.airline().color();
                    spans.push(Span::styled(
                        format!("━ {} ", s.airline()),
                        Style::default().fg(Color::Rgb(c.0, c.1, c.2)),
                    ));
                }
                if !chart.row_errors.is_empty() {
                    spans.push(Span::styled(
                        format!("| skipped rows: {}", chart.row_errors.len()),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                Line::from(spans)
            }
            LoadState::Failed(_) => Line::from(Span::styled("load failed", Style::default().fg(Color::Red))),
        };
        lines.push(detail);

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Airline fares").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let chart = match &self.state {
            LoadState::Ready(chart) => chart,
            LoadState::Failed(message) => {
                self.chart_rect = None;
                let msg = Paragraph::new(format!("Failed to load data: {message}"))
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .wrap(Wrap { trim: true });
                frame.render_widget(msg, inner);
                return;
            }
        };
        let session = &chart.session;
        let layout = session.layout();

        let (chart_rect, insets) = chart_layout(inner);
        let lines = chart_lines(session);
        let widget = FareChart {
            lines: &lines,
            points: session.points(),
            cursor: session.cursor(),
            click_marker: session.click_marker(),
            data_marker: session.data_marker(),
            width: layout.inner_width(),
            height: layout.inner_height(),
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, session);
        }
        if let Some(tooltip) = session.tooltip() {
            draw_tooltip(frame, inner, chart_rect, session, tooltip);
        }
        self.chart_rect = Some(chart_rect);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "n/→ next  b/← back  click chart  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// One-line status describing what an event did.
fn describe_effects(session: &Session, effects: &[Effect]) -> String {
    let mut parts = Vec::new();
    for effect in effects {
        match effect {
            Effect::HighlightPoint(i) => parts.push(format!("point {}/{}", i + 1, session.points().len())),
            Effect::MoveClickMarker(p) => parts.push(format!("click ({:.0}, {:.0})", p.x, p.y)),
            Effect::MoveDataMarker(_) => parts.push("nearest point marked".to_string()),
            Effect::HideDataMarker => parts.push("no data near click".to_string()),
            Effect::ShowTooltip(_) => {}
        }
    }
    parts.join(" | ")
}

fn chart_lines(session: &Session) -> Vec<ChartLine> {
    let scales = session.scales();
    session
        .dataset()
        .series()
        .iter()
        .map(|s| ChartLine {
            color: s.airline().color(),
            points: s.records().iter().map(|r| scales.project(r)).collect(),
        })
        .collect()
}

/// Map a terminal cell inside `rect` to the pixel at its center.
fn cell_to_pixel(rect: Rect, column: u16, row: u16, width: f64, height: f64) -> Option<PixelPoint> {
    if rect.width == 0 || rect.height == 0 {
        return None;
    }
    if column < rect.x || column >= rect.x + rect.width || row < rect.y || row >= rect.y + rect.height {
        return None;
    }
    let u = (f64::from(column - rect.x) + 0.5) / f64::from(rect.width);
    let v = (f64::from(row - rect.y) + 0.5) / f64::from(rect.height);
    Some(PixelPoint::new(u * width, v * height))
}

/// Inverse of [`cell_to_pixel`], clamped into `rect`.
fn pixel_to_cell(rect: Rect, p: PixelPoint, width: f64, height: f64) -> (u16, u16) {
    let u = (p.x / width).clamp(0.0, 1.0);
    let v = (p.y / height).clamp(0.0, 1.0);
    let col = rect.x + (u * f64::from(rect.width.saturating_sub(1))).round() as u16;
    let row = rect.y + (v * f64::from(rect.height.saturating_sub(1))).round() as u16;
    (col, row)
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

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
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

fn draw_axis_ticks(frame: &mut ratatui::Frame<'_>, inner: Rect, chart: Rect, insets: AxisInsets, session: &Session) {
    let style = Style::default().fg(Color::Gray);
    let layout = session.layout();
    let scales = session.scales();
    let stats = session.dataset().stats();
    let (w, h) = (layout.inner_width(), layout.inner_height());

    // Month labels are 8 columns wide; keep at least two columns between them.
    let months = month_ticks(stats.date_min, stats.date_max);
    let x_stride = stride(months.len(), usize::from(chart.width / 10).max(1));
    let y = chart.y + chart.height;
    if y < inner.y + inner.height {
        for d in months.iter().step_by(x_stride) {
            let (x, _) = pixel_to_cell(chart, PixelPoint::new(scales.time.date_to_px(*d), 0.0), w, h);
            let label = fmt_month(*d);
            let label_len = label.len() as u16;
            let start = x.saturating_sub(label_len / 2).max(inner.x);
            if start + label_len > inner.x + inner.width {
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
    }

    let prices = price_ticks(scales.price.max(), 10);
    let y_stride = stride(prices.len(), usize::from(chart.height / 2).max(1));
    for v in prices.iter().step_by(y_stride) {
        let (_, y) = pixel_to_cell(chart, PixelPoint::new(0.0, scales.price.to_px(*v)), w, h);
        let label = fmt_price_tick(*v);
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

    let x_label = Paragraph::new(X_AXIS_TITLE)
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

    let y_label = Paragraph::new(Y_AXIS_TITLE).style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: (insets.left + insets.right).min(inner.width),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

/// Step so that at most `max` of `n` ticks are drawn.
fn stride(n: usize, max: usize) -> usize {
    n.div_ceil(max.max(1)).max(1)
}

/// Draw the tooltip box next to its anchor, kept inside the chart panel.
fn draw_tooltip(frame: &mut ratatui::Frame<'_>, inner: Rect, chart: Rect, session: &Session, tooltip: &Tooltip) {
    let layout = session.layout();
    let m = layout.margin;
    let anchor = PixelPoint::new(
        tooltip.anchor.x - f64::from(m.left),
        tooltip.anchor.y - f64::from(m.top),
    );
    let (col, row) = pixel_to_cell(chart, anchor, layout.inner_width(), layout.inner_height());

    let longest = tooltip.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let width = (longest + 2).min(inner.width);
    let height = (tooltip.lines.len() as u16 + 2).min(inner.height);

    let x = col.min(inner.x + inner.width - width);
    let y = row.max(inner.y).min(inner.y + inner.height - height);
    let rect = Rect { x, y, width, height };

    let text = Text::from(tooltip.lines.iter().map(|l| Line::from(l.as_str())).collect::<Vec<_>>());
    let p = Paragraph::new(text)
        .style(Style::default().fg(Color::White).bg(Color::Rgb(70, 130, 180)))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(Clear, rect);
    frame.render_widget(p, rect);
}
