//! TUI Renderer for the `view` command
//!
//! This module implements the TUI event loop and screen rendering.
//!
//! ## Design:
//! - The panel owns list state (items, selection, scroll position)
//! - The renderer owns the terminal and translates keys into panel calls
//! - Symbol outcomes and log reloads are drained between frames, so every
//!   state change happens on this thread

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use tracescope_runtime::{EventLogFollower, LogUpdate, Panel, PanelHost};
use tracescope_types::{Address, TargetId};
use tracing::{debug, info, warn};

use crate::presentation::views::{EventListView, StatusBarModel, StatusBarView};

const TICK: Duration = Duration::from_millis(50);

/// Panel host for the standalone viewer
///
/// There is no disassembly pane here, so requests are logged and echoed in
/// the status bar.
#[derive(Debug, Default)]
pub struct TuiHost {
    pub status: Option<String>,
}

impl PanelHost for TuiHost {
    fn on_activate(&mut self, target: TargetId, index: usize) {
        debug!(%target, index, "event activated");
    }

    fn on_deactivate(&mut self, target: TargetId, index: usize) {
        debug!(%target, index, "event deactivated");
    }

    fn on_disassemble(&mut self, address: Address) {
        info!(%address, "disassembly requested");
        self.status = Some(format!("disassemble {} requested", address));
    }
}

pub struct TuiRenderer {
    panel: Panel<TuiHost>,
    follower: Option<EventLogFollower>,
    should_quit: bool,
    /// Height of the list area in the last frame, used for paging
    page_height: u32,
}

impl TuiRenderer {
    pub fn new(panel: Panel<TuiHost>, follower: Option<EventLogFollower>) -> Self {
        Self {
            panel,
            follower,
            should_quit: false,
            page_height: 1,
        }
    }

    /// Main event loop for TUI rendering
    ///
    /// This function:
    /// 1. Sets up terminal in raw mode
    /// 2. Handles keyboard input
    /// 3. Applies finished symbol lookups and log reloads
    /// 4. Cleans up terminal on exit
    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        ctrlc::set_handler(move || {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            std::process::exit(0);
        })?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if event::poll(TICK)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key_event(key);
            }

            self.panel.pump_resolutions();
            self.poll_follower();
        }

        Ok(())
    }

    fn poll_follower(&mut self) {
        let Some(update) = self.follower.as_ref().and_then(|f| f.try_latest()) else {
            return;
        };

        match update {
            LogUpdate::Loaded { events, skipped } => {
                let changed = self.panel.set_events(events);
                if skipped > 0 {
                    self.panel.host_mut().status = Some(format!("{} malformed line(s) skipped", skipped));
                }
                debug!(grew = changed.grew, followed = changed.followed, "event log replaced");
            }
            LogUpdate::Error(message) => {
                warn!(%message, "event log reload failed");
                self.panel.host_mut().status = Some(message);
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let page = i64::from(self.page_height.max(1));
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.panel.select_next();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.panel.select_previous();
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.panel.viewport().selection().selected() {
                Some(index) => self.panel.toggle(index),
                None => {
                    self.panel.select_next();
                }
            },
            KeyCode::Esc => {
                self.panel.clear_selection();
            }
            KeyCode::PageDown => {
                self.panel.viewport_mut().scroll_by(page);
            }
            KeyCode::PageUp => {
                self.panel.viewport_mut().scroll_by(-page);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.panel.viewport_mut().scroll_to_top();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.panel.viewport_mut().scroll_to_bottom();
            }
            KeyCode::Char('d') => self.disassemble(),
            _ => {}
        }
    }

    /// First known backtrace frame, else the caller.
    fn disassemble(&mut self) {
        let viewport = self.panel.viewport();
        let frames = viewport
            .selection()
            .selected()
            .and_then(|index| viewport.items().events().get(index))
            .and_then(|event| event.backtrace.as_ref())
            .map_or(0, |frames| frames.len());

        if (0..frames)
            .find_map(|frame| self.panel.disassemble_frame(frame))
            .is_none()
        {
            self.panel.disassemble_caller();
        }
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(f.area());
        let list_area = chunks[0];

        self.page_height = u32::from(list_area.height);
        let viewport = self.panel.viewport_mut();
        viewport.set_viewport_height(u32::from(list_area.height));
        let window = viewport.window();

        let viewport = self.panel.viewport();
        f.render_widget(
            EventListView::new(
                &window,
                viewport.items(),
                viewport.sizing(),
                viewport.selection(),
            ),
            list_area,
        );

        let status = StatusBarModel {
            event_count: viewport.items().event_count(),
            selected: viewport.selection().selected(),
            pending_symbols: self.panel.pending_resolutions(),
            following: viewport.autoscroll().enabled(),
            message: self.panel.host().status.clone(),
        };
        f.render_widget(StatusBarView::new(&status), chunks[1]);
    }
}
