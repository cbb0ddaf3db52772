//! Soccer field view.
//!
//! The field's long y axis runs left to right and its x axis top to bottom,
//! so a terminal cell at (column, row) inside the field pane maps to
//! (y, x) on the field.

use super::status_span;
use crate::core::Position;
use crate::field::FieldBounds;
use crate::session::FieldSession;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points, Rectangle},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Screen area of the field and the field extent it shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    area: Rect,
    bounds: FieldBounds,
}

impl Viewport {
    pub fn new(area: Rect, bounds: FieldBounds) -> Self {
        Self { area, bounds }
    }

    /// Field position under a terminal cell, `None` outside the field pane.
    pub fn to_field(&self, column: u16, row: u16) -> Option<Position> {
        let area = self.area;
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }

        // Cell centers; the last cell maps onto the far edge
        let along = |offset: u16, cells: u16, extent: f64| {
            if cells == 1 {
                extent / 2.0
            } else {
                f64::from(offset) / f64::from(cells - 1) * extent
            }
        };

        Some(Position::new(
            along(column - area.x, area.width, self.bounds.height),
            along(row - area.y, area.height, self.bounds.width),
        ))
    }
}

/// Draw the field view; returns the viewport used for pointer mapping.
pub fn draw(frame: &mut Frame, session: &FieldSession) -> Viewport {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Field
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], session);
    let viewport = draw_field(frame, chunks[1], session);
    draw_footer(frame, chunks[2], session);
    viewport
}

fn draw_header(frame: &mut Frame, area: Rect, session: &FieldSession) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " LIVEBOARD ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("soccer field", Style::default().fg(Color::DarkGray)),
        Span::raw(" | players: "),
        Span::styled(
            session.scene().players().len().to_string(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | rejected: "),
        Span::styled(session.rejected().to_string(), Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        status_span(session.status()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, area);
}

fn draw_field(frame: &mut Frame, area: Rect, session: &FieldSession) -> Viewport {
    let bounds = session.bounds();
    let block = Block::default()
        .title(" Field ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let viewport = Viewport::new(block.inner(area), bounds);

    // Canvas y grows upwards, field x grows downwards
    let to_canvas = |pos: Position| (pos.y, bounds.width - pos.x);

    let players: Vec<(f64, f64)> = session
        .scene()
        .players()
        .values()
        .map(|pos| to_canvas(*pos))
        .collect();
    let ball = to_canvas(session.scene().ball());
    let target = session.sync().target().map(to_canvas);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, bounds.height])
        .y_bounds([0.0, bounds.width])
        .paint(move |ctx| {
            ctx.draw(&Rectangle {
                x: 0.0,
                y: 0.0,
                width: bounds.height,
                height: bounds.width,
                color: Color::Green,
            });
            ctx.draw(&CanvasLine {
                x1: bounds.height / 2.0,
                y1: 0.0,
                x2: bounds.height / 2.0,
                y2: bounds.width,
                color: Color::Green,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &players,
                color: Color::Cyan,
            });
            if let Some(target) = target {
                ctx.draw(&Points {
                    coords: &[target],
                    color: Color::Magenta,
                });
            }
            ctx.draw(&Circle {
                x: ball.0,
                y: ball.1,
                radius: 8.0,
                color: Color::Yellow,
            });
        });

    frame.render_widget(canvas, area);
    viewport
}

fn draw_footer(frame: &mut Frame, area: Rect, session: &FieldSession) {
    let target = session
        .sync()
        .target()
        .map_or_else(|| "-".to_string(), |p| format!("[{:.0}, {:.0}]", p.y, p.x));
    let footer = Paragraph::new(format!(" [q]uit [r]edraw | move the mouse over the field | target {} ", target))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn viewport() -> Viewport {
        Viewport::new(Rect::new(10, 5, 81, 41), FieldBounds::new(800.0, 400.0))
    }

    #[test]
    fn test_corners_map_to_field_edges() {
        let vp = viewport();
        assert_eq!(vp.to_field(10, 5), Some(Position::new(0.0, 0.0)));
        assert_eq!(vp.to_field(90, 45), Some(Position::new(800.0, 400.0)));
        assert_eq!(vp.to_field(50, 25), Some(Position::new(400.0, 200.0)));
    }

    #[test]
    fn test_outside_cells_are_ignored() {
        let vp = viewport();
        assert_eq!(vp.to_field(9, 20), None);
        assert_eq!(vp.to_field(91, 20), None);
        assert_eq!(vp.to_field(50, 4), None);
        assert_eq!(vp.to_field(50, 46), None);
    }

    #[test]
    fn test_empty_viewport() {
        let vp = Viewport::new(Rect::new(0, 0, 0, 0), FieldBounds::new(800.0, 400.0));
        assert_eq!(vp.to_field(0, 0), None);
    }

    #[test]
    fn test_draw_reports_inner_field_area() {
        let mut session = FieldSession::new(FieldBounds::new(800.0, 400.0));
        session
            .ingest(r#"{"ball":[400,200],"players":{"1":[100,100],"2":[700,300]}}"#)
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut viewport = None;
        terminal
            .draw(|f| viewport = Some(draw(f, &session)))
            .unwrap();

        let viewport = viewport.unwrap();
        // Header is 3 rows, field block border adds one cell on each side
        assert_eq!(viewport.to_field(1, 4), Some(Position::new(0.0, 0.0)));
        assert_eq!(viewport.to_field(0, 4), None);
    }
}
