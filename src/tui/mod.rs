//! Terminal UI for the stats dashboard and the soccer field.
//!
//! Each view runs one loop that multiplexes keyboard and mouse input,
//! channel events and a redraw ticker. Chart updates only mark the
//! dashboard dirty; the terminal is repainted on the next tick.

mod field_view;
mod keybindings;
mod stats_view;

pub use field_view::Viewport;
pub use stats_view::CHART_PANES;

use crate::charts::RedrawTracker;
use crate::control::SystemInfo;
use crate::core::{LiveboardError, Result};
use crate::session::{FieldSession, StatsSession};
use crate::stream::{ConnectionStatus, StreamEvent, StreamHandle};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use keybindings::{handle_key, Action};
use ratatui::{
    backend::CrosstermBackend,
    style::{Color, Style},
    text::Span,
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

/// Status indicator used in both view headers.
pub(crate) fn status_span(status: &ConnectionStatus) -> Span<'static> {
    let (symbol, color) = match status {
        ConnectionStatus::Connected => ("●", Color::Green),
        ConnectionStatus::Connecting | ConnectionStatus::Reconnecting { .. } => ("○", Color::Yellow),
        ConnectionStatus::Disconnected(_) => ("○", Color::Red),
        ConnectionStatus::Offline => ("●", Color::Red),
    };
    Span::styled(format!("{} {}", symbol, status.label()), Style::default().fg(color))
}

/// Raw mode plus alternate screen, restored on drop or on a failed enter.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    mouse: bool,
}

impl TerminalSession {
    fn enter(mouse: bool) -> Result<Self> {
        enable_raw_mode().map_err(terminal_error("enable raw mode"))?;
        let mut stdout = io::stdout();
        let mut state = TerminalState::RAW;

        let entered = enter_screen(&mut stdout, mouse, &mut state).and_then(|()| {
            Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error("create terminal"))
        });
        match entered {
            Ok(terminal) => Ok(Self { terminal, mouse }),
            Err(e) => {
                restore(&mut io::stdout(), state);
                Err(e)
            },
        }
    }

    fn draw<F: FnOnce(&mut Frame)>(&mut self, render: F) -> Result<()> {
        self.terminal
            .draw(render)
            .map_err(|e| LiveboardError::render(format!("Failed to draw: {}", e)))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.terminal
            .clear()
            .map_err(|e| LiveboardError::render(format!("Failed to clear: {}", e)))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let state = TerminalState {
            raw: true,
            alternate_screen: true,
            mouse_capture: self.mouse,
        };
        restore(self.terminal.backend_mut(), state);
        let _ = self.terminal.show_cursor();
    }
}

/// Terminal modes switched on so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TerminalState {
    raw: bool,
    alternate_screen: bool,
    mouse_capture: bool,
}

impl TerminalState {
    const RAW: Self = Self {
        raw: true,
        alternate_screen: false,
        mouse_capture: false,
    };
}

fn terminal_error(action: &'static str) -> impl Fn(io::Error) -> LiveboardError {
    move |e| LiveboardError::terminal(format!("Failed to {}: {}", action, e))
}

/// Switch to the alternate screen and capture the mouse, tracking each step
/// in `state` so a failure can be undone.
fn enter_screen<W: io::Write>(out: &mut W, mouse: bool, state: &mut TerminalState) -> Result<()> {
    out.execute(EnterAlternateScreen)
        .map_err(terminal_error("enter alternate screen"))?;
    state.alternate_screen = true;
    if mouse {
        out.execute(EnableMouseCapture).map_err(terminal_error("capture mouse"))?;
        state.mouse_capture = true;
    }
    Ok(())
}

/// Undo whatever `state` says was switched on. Errors are ignored.
fn restore<W: io::Write>(out: &mut W, state: TerminalState) {
    if state.mouse_capture {
        let _ = out.execute(DisableMouseCapture);
    }
    if state.alternate_screen {
        let _ = out.execute(LeaveAlternateScreen);
    }
    if state.raw {
        let _ = disable_raw_mode();
    }
}

/// What one input event asks of the loop
enum Input {
    Quit,
    Repaint,
    Idle,
}

fn key_input(terminal: &mut TerminalSession, event: &Event) -> Result<Input> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match handle_key(*key) {
            Action::Quit => Ok(Input::Quit),
            Action::Redraw => {
                terminal.clear()?;
                Ok(Input::Repaint)
            },
            Action::None => Ok(Input::Idle),
        },
        Event::Resize(..) => Ok(Input::Repaint),
        _ => Ok(Input::Idle),
    }
}

fn ticker(period: Duration) -> tokio::time::Interval {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Run the stats dashboard until the user quits. `server_info` is shown in
/// the header if it arrives.
pub async fn run_stats(
    session: &mut StatsSession<RedrawTracker>,
    stream: &mut StreamHandle,
    tick_rate: Duration,
    mut server_info: oneshot::Receiver<SystemInfo>,
) -> Result<()> {
    let mut terminal = TerminalSession::enter(false)?;
    let mut input = EventStream::new();
    let mut ticks = ticker(tick_rate);
    let mut stream_open = true;
    let mut info_pending = true;

    terminal.draw(|f| stats_view::draw(f, session))?;

    loop {
        let mut repaint = false;

        tokio::select! {
            event = input.next() => match event {
                Some(Ok(event)) => match key_input(&mut terminal, &event)? {
                    Input::Quit => break,
                    Input::Repaint => repaint = true,
                    Input::Idle => {},
                },
                Some(Err(e)) => {
                    return Err(LiveboardError::terminal(format!("Failed to read input: {}", e)));
                },
                None => break,
            },
            event = stream.next_event(), if stream_open => match event {
                Some(event) => {
                    session.handle(&event);
                    // Status changes show up immediately, samples on the next tick
                    repaint = !matches!(event, StreamEvent::Message(_));
                },
                None => stream_open = false,
            },
            info = &mut server_info, if info_pending => {
                info_pending = false;
                if let Ok(info) = info {
                    session.set_server_info(info);
                    repaint = true;
                }
            },
            _ = ticks.tick() => {
                repaint = session.charts_mut().surface_mut().take_dirty();
            },
        }

        if repaint {
            session.charts_mut().surface_mut().take_dirty();
            terminal.draw(|f| stats_view::draw(f, session))?;
        }
    }

    Ok(())
}

/// Run the field view until the user quits.
pub async fn run_field(
    session: &mut FieldSession,
    stream: &mut StreamHandle,
    tick_rate: Duration,
    send_interval: Duration,
) -> Result<()> {
    let mut terminal = TerminalSession::enter(true)?;
    let mut input = EventStream::new();
    let mut ticks = ticker(tick_rate);
    let mut sends = ticker(send_interval);
    let mut stream_open = true;
    let mut dirty = false;

    let mut viewport = Viewport::new(ratatui::layout::Rect::default(), session.bounds());
    terminal.draw(|f| viewport = field_view::draw(f, session))?;

    loop {
        let mut repaint = false;

        tokio::select! {
            event = input.next() => match event {
                Some(Ok(Event::Mouse(mouse))) => {
                    let tracks = matches!(
                        mouse.kind,
                        MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_)
                    );
                    if tracks {
                        if let Some(pos) = viewport.to_field(mouse.column, mouse.row) {
                            dirty |= session.pointer(pos);
                        }
                    }
                },
                Some(Ok(event)) => match key_input(&mut terminal, &event)? {
                    Input::Quit => break,
                    Input::Repaint => repaint = true,
                    Input::Idle => {},
                },
                Some(Err(e)) => {
                    return Err(LiveboardError::terminal(format!("Failed to read input: {}", e)));
                },
                None => break,
            },
            event = stream.next_event(), if stream_open => match event {
                Some(event) => {
                    session.handle(&event);
                    if matches!(event, StreamEvent::Message(_)) {
                        dirty = true;
                    } else {
                        repaint = true;
                    }
                },
                None => stream_open = false,
            },
            _ = sends.tick() => {
                if session.status().is_connected() {
                    if let Some(frame) = session.tick()? {
                        if let Err(e) = stream.send(frame) {
                            tracing::debug!("Position not sent: {}", e);
                        }
                    }
                }
            },
            _ = ticks.tick() => repaint = dirty,
        }

        if repaint {
            dirty = false;
            terminal.draw(|f| viewport = field_view::draw(f, session))?;
        }
    }

    Ok(())
}
