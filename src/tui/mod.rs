//! Ratatui-based figure viewer for `param-space --show`.
//!
//! Shows the parameter-space figure full-screen with a one-line status bar.
//! Layers can be toggled; `q` or `Esc` closes the viewer.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::error::AppError;
use crate::figure::ParamSpaceFigure;

mod plotters_chart;

use plotters_chart::{Layers, ParamSpaceChart};

/// Open the viewer and block until the user quits.
pub fn run(figure: &ParamSpaceFigure) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut viewer = Viewer::new(figure);
    viewer.event_loop(&mut terminal)
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

struct Viewer<'a> {
    figure: &'a ParamSpaceFigure,
    layers: Layers,
}

impl<'a> Viewer<'a> {
    fn new(figure: &'a ParamSpaceFigure) -> Self {
        Self {
            figure,
            layers: Layers::default(),
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

    /// Returns `true` when the viewer should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('d') => self.layers.drag = !self.layers.drag,
            KeyCode::Char('t') => self.layers.shear = !self.layers.shear,
            KeyCode::Char('s') => self.layers.contact = !self.layers.contact,
            KeyCode::Char('l') => self.layers.labels = !self.layers.labels,
            _ => {}
        }
        false
    }

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(1)])
            .split(f.area());

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Steady-state parameter space: drag μ, τ and S ");
        let inner = block.inner(chunks[0]);
        f.render_widget(block, chunks[0]);
        f.render_widget(
            ParamSpaceChart {
                figure: self.figure,
                layers: self.layers,
            },
            inner,
        );

        f.render_widget(Paragraph::new(self.status_line()), chunks[1]);
    }

    fn status_line(&self) -> Line<'static> {
        let flag = |on: bool| if on { "on" } else { "off" };
        let key = Style::default().fg(Color::Yellow);
        Line::from(vec![
            Span::styled("q", key),
            Span::raw(" quit  "),
            Span::styled("d", key),
            Span::raw(format!(" drag [{}]  ", flag(self.layers.drag))),
            Span::styled("t", key),
            Span::raw(format!(" τ [{}]  ", flag(self.layers.shear))),
            Span::styled("s", key),
            Span::raw(format!(" S [{}]  ", flag(self.layers.contact))),
            Span::styled("l", key),
            Span::raw(format!(" labels [{}]", flag(self.layers.labels))),
        ])
    }
}
