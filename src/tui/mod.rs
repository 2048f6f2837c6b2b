//! Ratatui-based terminal UI.
//!
//! A sidebar holds the vehicle controls; the main pane echoes the inputs and
//! shows the result of the last "Calculate MPG" action. Moving a control
//! clears the result, so what is displayed always matches the inputs.

use std::io;
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
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};
use tracing::info;

use crate::app::pipeline::{PredictionRun, run_prediction};
use crate::domain::{Cylinders, Origin, VehicleSpec};
use crate::error::AppError;
use crate::form::{Adjust, Field, VehicleForm};
use crate::models::Regressor;
use crate::report;

/// Start the TUI. The model must already be loaded.
pub fn run(model: &dyn Regressor) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    info!("interactive session started");
    let mut app = App::new(model);
    let result = app.event_loop(&mut terminal);
    info!(predictions = app.predictions, "interactive session ended");
    result
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

/// Outcome of the last calculate action.
#[derive(Debug, Clone, PartialEq)]
enum ResultPanel {
    Empty,
    Ready(PredictionRun),
    Failed(String),
}

struct App<'m> {
    model: &'m dyn Regressor,
    form: VehicleForm,
    selected_field: usize,
    result: ResultPanel,
    status: String,
    predictions: usize,
}

impl<'m> App<'m> {
    fn new(model: &'m dyn Regressor) -> Self {
        Self {
            model,
            form: VehicleForm::default(),
            selected_field: 0,
            result: ResultPanel::Empty,
            status: "Adjust the controls, then press Enter to calculate.".to_string(),
            predictions: 0,
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.adjust_field(Adjust::Step(-1)),
            KeyCode::Right | KeyCode::Char('l') => self.adjust_field(Adjust::Step(1)),
            KeyCode::PageDown => self.adjust_field(Adjust::Coarse(-1)),
            KeyCode::PageUp => self.adjust_field(Adjust::Coarse(1)),
            KeyCode::Home => self.adjust_field(Adjust::ToMin),
            KeyCode::End => self.adjust_field(Adjust::ToMax),
            KeyCode::Enter | KeyCode::Char('c') => self.calculate(),
            _ => {}
        }
        false
    }

    fn selected(&self) -> Field {
        Field::ALL[self.selected_field]
    }

    fn adjust_field(&mut self, adjust: Adjust) {
        let field = self.selected();
        if self.form.adjust(field, adjust) {
            self.result = ResultPanel::Empty;
            self.status = format!(
                "{}: {}",
                self.form.label(field),
                self.form.display_value(field)
            );
        }
    }

    /// The "Calculate MPG" action: the only place the model is invoked.
    fn calculate(&mut self) {
        let spec = self.form.spec();
        match run_prediction(self.model, &spec) {
            Ok(run) => {
                self.predictions += 1;
                self.status = format!("Predicted {}", report::format_mpg(&run.prediction));
                self.result = ResultPanel::Ready(run);
            }
            Err(err) => {
                self.status = "Prediction failed.".to_string();
                self.result = ResultPanel::Failed(err.to_string());
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
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
        let lines = vec![
            Line::from(Span::styled(
                "Auto MPG Predictor",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Predict Miles Per Gallon (MPG) using vehicle specifications.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(area);

        self.draw_controls(frame, columns[0]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Length(3), Constraint::Min(0)])
            .split(columns[1]);

        self.draw_specs(frame, main[0]);
        self.draw_calculate(frame, main[1]);
        self.draw_result(frame, main[2]);
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let bar_width = area.width.saturating_sub(8).max(4) as usize;
        let spec = self.form.spec();

        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|&field| {
                let header = Line::from(vec![
                    Span::raw(format!("{:<26}", self.form.label(field))),
                    Span::styled(
                        format!("{:>8}", self.form.display_value(field)),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]);
                let control = if VehicleForm::is_selector(field) {
                    selector_line(field, &spec)
                } else {
                    slider_bar(self.form.fraction(field), bar_width)
                };
                ListItem::new(vec![
                    header,
                    Line::from(Span::styled(control, Style::default().fg(Color::Cyan))),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Vehicle Configuration")
                    .borders(Borders::ALL),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_specs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let spec = self.form.spec();
        let groups = [
            ("Core Specs", report::core_spec_rows(&spec)),
            ("Additional Specs", report::additional_spec_rows(&spec)),
        ];
        for ((title, rows), rect) in groups.into_iter().zip(columns.iter()) {
            let lines: Vec<Line> = rows
                .into_iter()
                .map(|(name, value)| {
                    Line::from(vec![
                        Span::styled(format!("{name:<14}"), Style::default().fg(Color::Gray)),
                        Span::raw(format!("{value:>8}")),
                    ])
                })
                .collect();
            let p = Paragraph::new(Text::from(lines))
                .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_calculate(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::LightRed)
            .add_modifier(Modifier::BOLD);
        let button = Paragraph::new(Line::from(Span::styled(" Calculate MPG [Enter] ", style)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(button, area);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Prediction Result").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let run = match &self.result {
            ResultPanel::Empty => {
                let msg = Paragraph::new("Press Enter to calculate MPG.")
                    .style(Style::default().fg(Color::Yellow));
                frame.render_widget(msg, inner);
                return;
            }
            ResultPanel::Failed(message) => {
                let msg = Paragraph::new(format!("Prediction failed: {message}"))
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
                frame.render_widget(msg, inner);
                return;
            }
            ResultPanel::Ready(run) => run,
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let metric = Paragraph::new(Text::from(vec![
            Line::from(Span::styled("Predicted Efficiency", Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                report::format_mpg(&run.prediction),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
        ]));
        frame.render_widget(metric, rows[0]);

        let ratio = report::progress_ratio(&run.prediction);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
            .ratio(ratio)
            .label(format!("{:.0}%", ratio * 100.0));
        frame.render_widget(gauge, rows[1]);

        let caption = Paragraph::new(report::reference_scale_caption())
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(caption, rows[2]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  PgUp/PgDn ×10  Home/End min/max  Enter calculate  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Horizontal slider track with a knob at `fraction`.
fn slider_bar(fraction: f64, width: usize) -> String {
    let width = width.max(2);
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let knob = (fraction * (width - 1) as f64).round() as usize;
    format!("{}●{}", "━".repeat(knob), "─".repeat(width - 1 - knob))
}

/// All options of a selector, the current one bracketed.
fn selector_line(field: Field, spec: &VehicleSpec) -> String {
    let options: Vec<(String, bool)> = match field {
        Field::Cylinders => Cylinders::ALL
            .iter()
            .map(|c| (c.count().to_string(), *c == spec.cylinders))
            .collect(),
        Field::Origin => Origin::ALL
            .iter()
            .map(|o| (o.display_name().to_string(), *o == spec.origin))
            .collect(),
        _ => Vec::new(),
    };
    options
        .into_iter()
        .map(|(label, on)| if on { format!("[{label}]") } else { format!(" {label} ") })
        .collect::<Vec<_>>()
        .join(" ")
}
