//! Stats dashboard: header, stat readouts and one line chart per layout entry.

use super::status_span;
use crate::charts::{Chart, RedrawTracker};
use crate::session::StatsSession;
use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart as ChartWidget, Dataset, GraphType, Paragraph},
    Frame,
};

/// Number of chart panes the dashboard can lay out
pub const CHART_PANES: usize = 6;

const SERIES_COLORS: [Color; 4] = [Color::Cyan, Color::Blue, Color::Green, Color::Magenta];

/// Draw the whole stats dashboard.
pub fn draw(frame: &mut Frame, session: &StatsSession<RedrawTracker>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Stat readouts
            Constraint::Min(6),    // Charts
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], session);
    draw_readouts(frame, chunks[1], session);
    draw_charts(frame, chunks[2], session);
    draw_footer(frame, chunks[3]);
}

fn draw_header(frame: &mut Frame, area: Rect, session: &StatsSession<RedrawTracker>) {
    let mut spans = vec![
        Span::styled(
            " LIVEBOARD ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("stats", Style::default().fg(Color::DarkGray)),
        Span::raw(" | window: "),
        Span::styled(
            session.charts().window().to_string(),
            Style::default().fg(Color::White),
        ),
        Span::raw(" | "),
        status_span(session.status()),
    ];
    if let Some(info) = session.server_info() {
        let summary = info.summary();
        if !summary.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(summary, Style::default().fg(Color::DarkGray)));
        }
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, area);
}

fn draw_readouts(frame: &mut Frame, area: Rect, session: &StatsSession<RedrawTracker>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    let last = session.last_sample();
    let keys = last.map_or_else(|| "-".to_string(), |s| s.key_count.to_string());
    let updated = last.map_or_else(|| "-".to_string(), |s| local_time(s.timestamp));

    let readouts = [
        ("Redis keys", keys, Color::Yellow),
        ("Last update", updated, Color::White),
        ("Received", session.received().to_string(), Color::Green),
        (
            "Rejected",
            session.rejected().to_string(),
            if session.rejected() > 0 { Color::Red } else { Color::DarkGray },
        ),
    ];

    for ((label, value, color), area) in readouts.into_iter().zip(chunks.iter()) {
        let widget = Paragraph::new(Line::from(vec![
            Span::raw(format!(" {}: ", label)),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(widget, *area);
    }
}

fn draw_charts(frame: &mut Frame, area: Rect, session: &StatsSession<RedrawTracker>) {
    let charts: Vec<&Chart> = session.charts().charts().iter().collect();
    if charts.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = charts
        .iter()
        .map(|_| Constraint::Ratio(1, charts.len() as u32))
        .collect();
    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (chart, pane) in charts.into_iter().zip(panes.iter()) {
        draw_chart(frame, *pane, chart);
    }
}

fn draw_chart(frame: &mut Frame, area: Rect, chart: &Chart) {
    let data: Vec<Vec<(f64, f64)>> = chart
        .series()
        .iter()
        .map(|series| {
            series
                .points()
                .map(|(ts, value)| (epoch_secs(*ts), *value))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = chart
        .series()
        .iter()
        .zip(data.iter())
        .enumerate()
        .map(|(i, (series, points))| {
            Dataset::default()
                .name(series.label().to_string())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(points)
        })
        .collect();

    let (x_bounds, x_labels) = match chart.time_span() {
        Some((first, last)) => {
            let start = epoch_secs(first);
            let end = epoch_secs(last).max(start + 1.0);
            ([start, end], vec![clock(first), clock(last)])
        },
        None => ([0.0, 1.0], vec![String::new(), String::new()]),
    };

    let y_max = match chart.y_max() {
        max if max > 0.0 && chart.spec().y_max.is_some() => max,
        max if max > 0.0 => max * 1.1,
        _ => 1.0,
    };
    let unit = &chart.spec().unit;
    let y_labels = vec![
        format!("0{}", unit),
        format!("{:.0}{}", y_max / 2.0, unit),
        format!("{:.0}{}", y_max, unit),
    ];

    let latest: Vec<String> = chart
        .series()
        .iter()
        .filter_map(|s| s.latest().map(|v| format!("{} {:.1}{}", s.label(), v, unit)))
        .collect();
    let title = if latest.is_empty() {
        format!(" {} ", chart.spec().title)
    } else {
        format!(" {} | {} ", chart.spec().title, latest.join(" | "))
    };

    let widget = ChartWidget::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(widget, area);
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(" [q]uit [r]edraw ").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

#[allow(clippy::cast_precision_loss)]
fn epoch_secs(ts: DateTime<Utc>) -> f64 {
    ts.timestamp_millis() as f64 / 1000.0
}

fn clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
