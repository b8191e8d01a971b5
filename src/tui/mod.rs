//! Ratatui-based terminal UI.
//!
//! The TUI provides a query panel (country, indicator, year range, optional AI
//! question) and renders the fetched series next to the AI analysis. Fetches
//! and analyses run on a background worker so the event loop keeps drawing.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::analysis::AnalysisClient;
use crate::app::ResolvedQuery;
use crate::app::pipeline::{self, AnalysisPlan, FetchOutput};
use crate::app::worker::{Pending, Poll, Worker};
use crate::config::Settings;
use crate::data::WorldBankClient;
use crate::domain::{Catalog, DEFAULT_COUNTRY, DEFAULT_INDICATOR, SeriesQuery};
use crate::error::{AnalysisError, AppError, FetchError, exit_codes};

const FIELD_COUNT: usize = 5;
const FIELD_QUESTION: usize = 4;

/// Start the TUI.
pub fn run(catalog: Catalog, settings: Settings, initial: ResolvedQuery, question: String) -> Result<(), AppError> {
    let mut app = App::new(catalog, &settings, initial, question)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(exit_codes::RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(exit_codes::RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(exit_codes::RUNTIME, format!("Failed to enter alternate screen: {e}")));
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

enum Job {
    Fetch {
        pending: Pending<Result<FetchOutput, FetchError>>,
        question: String,
    },
    Analyze(Pending<Result<String, AnalysisError>>),
}

struct App {
    catalog: Catalog,
    country_idx: usize,
    indicator_idx: usize,
    start_year: i32,
    end_year: i32,
    question: String,
    editing_question: bool,
    selected_field: usize,
    status: String,
    data_text: String,
    analysis_text: String,
    client: WorldBankClient,
    analysis: Arc<AnalysisClient>,
    worker: Worker,
    job: Option<Job>,
}

impl App {
    fn new(catalog: Catalog, settings: &Settings, initial: ResolvedQuery, question: String) -> Result<Self, AppError> {
        let country_idx = catalog
            .country_index(&initial.query.country)
            .or_else(|| catalog.country_index(DEFAULT_COUNTRY))
            .unwrap_or(0);
        let indicator_idx = catalog
            .indicator_index(&initial.query.indicator)
            .or_else(|| catalog.indicator_index(DEFAULT_INDICATOR))
            .unwrap_or(0);
        if catalog.countries().is_empty() || catalog.indicators().is_empty() {
            return Err(AppError::usage("The catalog has no countries or indicators."));
        }

        let analysis = AnalysisClient::connect(settings);
        let status = if analysis.is_available() {
            "Ready".to_string()
        } else {
            "Ready (AI analysis not configured)".to_string()
        };

        Ok(Self {
            catalog,
            country_idx,
            indicator_idx,
            start_year: initial.query.start_year,
            end_year: initial.query.end_year,
            question,
            editing_question: false,
            selected_field: 0,
            status,
            data_text: String::new(),
            analysis_text: String::new(),
            client: WorldBankClient::with_base_url(&settings.worldbank_base_url),
            analysis: Arc::new(analysis),
            worker: Worker::new(1)?,
            job: None,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_job() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(exit_codes::RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(exit_codes::RUNTIME, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(exit_codes::RUNTIME, format!("Event read error: {e}")))? {
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
        if self.editing_question {
            self.handle_question_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field == FIELD_QUESTION {
                    self.editing_question = true;
                    self.status = "Editing question. Enter or Esc to finish.".to_string();
                } else {
                    self.start_fetch();
                }
            }
            KeyCode::Char('f') => self.start_fetch(),
            KeyCode::Char('c') => self.clear_results(),
            _ => {}
        }
        false
    }

    fn handle_question_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => {
                self.editing_question = false;
                self.status = "Ready".to_string();
            }
            KeyCode::Backspace => {
                self.question.pop();
            }
            KeyCode::Char(c) => self.question.push(c),
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => self.country_idx = cycle(self.country_idx, self.catalog.countries().len(), delta),
            1 => self.indicator_idx = cycle(self.indicator_idx, self.catalog.indicators().len(), delta),
            2 => self.start_year = clamp_year(self.start_year + delta),
            3 => self.end_year = clamp_year(self.end_year + delta),
            _ => {}
        }
    }

    fn current_query(&self) -> (SeriesQuery, String) {
        let country = &self.catalog.countries()[self.country_idx];
        let indicator = &self.catalog.indicators()[self.indicator_idx];
        (
            SeriesQuery::new(&country.code, &indicator.code, self.start_year, self.end_year),
            indicator.name.clone(),
        )
    }

    fn start_fetch(&mut self) {
        if self.job.is_some() {
            self.status = "Busy; wait for the current request to finish.".to_string();
            return;
        }
        if let Err(err) = pipeline::validate_years(self.start_year, self.end_year) {
            self.status = format!("Invalid input: {err}");
            return;
        }

        let (query, label) = self.current_query();
        let client = self.client.clone();
        let pending = self.worker.submit(move || pipeline::run_fetch(&client, query, label));
        self.job = Some(Job::Fetch {
            pending,
            question: self.question.clone(),
        });
        self.status = "Fetching data...".to_string();
    }

    /// Collect a finished background job. Returns `true` if the screen changed.
    fn poll_job(&mut self) -> bool {
        let Some(job) = self.job.take() else {
            return false;
        };

        match job {
            Job::Fetch { pending, question } => match pending.poll() {
                Poll::Waiting => {
                    self.job = Some(Job::Fetch { pending, question });
                    false
                }
                Poll::Ready(Ok(output)) => {
                    self.on_fetched(output, &question);
                    true
                }
                Poll::Ready(Err(err)) => {
                    self.data_text = format!("Error fetching data: {err}");
                    self.status = "Error fetching data".to_string();
                    true
                }
                Poll::Lost => {
                    self.status = "Error fetching data: background task failed".to_string();
                    true
                }
            },
            Job::Analyze(pending) => match pending.poll() {
                Poll::Waiting => {
                    self.job = Some(Job::Analyze(pending));
                    false
                }
                Poll::Ready(Ok(text)) => {
                    self.analysis_text = text;
                    self.status = "Analysis complete".to_string();
                    true
                }
                Poll::Ready(Err(err)) => {
                    self.analysis_text = format!("Error during AI analysis: {err}");
                    self.status = "AI analysis failed".to_string();
                    true
                }
                Poll::Lost => {
                    self.analysis_text = "Error during AI analysis: background task failed".to_string();
                    self.status = "AI analysis failed".to_string();
                    true
                }
            },
        }
    }

    fn on_fetched(&mut self, output: FetchOutput, question: &str) {
        self.data_text = crate::report::render_series(output.series.as_ref(), &output.indicator_label);
        self.status = "Data fetched successfully".to_string();

        match pipeline::plan_analysis(&self.analysis, &output, question) {
            AnalysisPlan::Skip => {}
            AnalysisPlan::NotConfigured => {
                self.analysis_text = pipeline::ANALYSIS_NOT_CONFIGURED.to_string();
            }
            AnalysisPlan::NoData => {
                self.analysis_text = pipeline::NO_DATA_TO_ANALYZE.to_string();
            }
            AnalysisPlan::Ask(question) => {
                self.analysis_text = "Analyzing data with AI...".to_string();
                self.status = "Analyzing with AI...".to_string();
                let analysis = Arc::clone(&self.analysis);
                let pending = self
                    .worker
                    .submit(move || pipeline::run_analysis(&analysis, &output, &question));
                self.job = Some(Job::Analyze(pending));
            }
        }
    }

    fn clear_results(&mut self) {
        self.data_text.clear();
        self.analysis_text.clear();
        self.question.clear();
        self.status = "Ready".to_string();
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(FIELD_COUNT as u16 + 2),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
        self.draw_results(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let ai = if self.analysis.is_available() {
            format!("AI: {} (max_tokens={}, temperature={:.2})",
                self.analysis.model_id(),
                self.analysis.params().max_tokens,
                self.analysis.params().temperature,
            )
        } else {
            "AI: not configured".to_string()
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("wbi", Style::default().fg(Color::Cyan)),
                Span::raw(" - World Bank Data Analyzer"),
            ]),
            Line::from(Span::styled(ai, Style::default().fg(Color::Gray))),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let country = &self.catalog.countries()[self.country_idx];
        let indicator = &self.catalog.indicators()[self.indicator_idx];
        let question = if self.question.is_empty() && !self.editing_question {
            "(optional)".to_string()
        } else if self.editing_question {
            format!("{}_", self.question)
        } else {
            self.question.clone()
        };

        let items = vec![
            ListItem::new(format!("Country: {} ({})", country.name, country.code)),
            ListItem::new(format!("Indicator: {} ({})", indicator.name, indicator.code)),
            ListItem::new(format!("Start Year: {}", self.start_year)),
            ListItem::new(format!("End Year: {}", self.end_year)),
            ListItem::new(format!("AI Question: {question}")),
        ];

        let list = List::new(items)
            .block(Block::default().title("Query Parameters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let data = Paragraph::new(self.data_text.as_str())
            .block(Block::default().title("Data").borders(Borders::ALL));
        frame.render_widget(data, chunks[0]);

        let analysis = Paragraph::new(self.analysis_text.as_str())
            .wrap(Wrap { trim: false })
            .block(Block::default().title("AI Analysis").borders(Borders::ALL));
        frame.render_widget(analysis, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter/f fetch  Enter on question: edit  c clear  q quit";
        let status_style = if self.job.is_some() {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, status_style),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn cycle(idx: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    if delta >= 0 {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    }
}

fn clamp_year(year: i32) -> i32 {
    year.clamp(pipeline::MIN_YEAR, pipeline::max_year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(cycle(0, 3, 1), 1);
        assert_eq!(cycle(2, 3, 1), 0);
        assert_eq!(cycle(0, 3, -1), 2);
        assert_eq!(cycle(0, 0, 1), 0);
    }

    #[test]
    fn years_stay_in_range() {
        assert_eq!(clamp_year(1959), pipeline::MIN_YEAR);
        assert_eq!(clamp_year(pipeline::max_year() + 1), pipeline::max_year());
        assert_eq!(clamp_year(2000), 2000);
    }
}
