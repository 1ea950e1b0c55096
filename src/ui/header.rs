use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Sparkline};

use crate::snapshot::Snapshot;
use crate::ui::theme::Theme;

pub struct HeaderInfo<'a> {
    pub snapshot: Option<&'a Snapshot>,
    pub elapsed: Duration,
    pub ticks: usize,
    pub tracked: usize,
    pub cpu_history: &'a [u64],
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo<'_>, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_branding(frame, chunks[0], info, theme);
    render_mem_gauge(frame, chunks[1], info.snapshot, theme);
    render_cpu_sparkline(frame, chunks[2], info, theme);
}

fn bordered(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
}

fn render_branding(frame: &mut Frame, area: Rect, info: &HeaderInfo<'_>, theme: &Theme) {
    let block = bordered(theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled(
            " mdbtop ",
            Style::default()
                .fg(theme.brand_fg)
                .bg(theme.brand_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Time: {}", format_elapsed(info.elapsed)),
            Style::default().fg(theme.muted),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Ticks: {}", info.ticks),
            Style::default().fg(theme.muted),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Tracked: {}", info.tracked),
            Style::default().fg(theme.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_mem_gauge(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, theme: &Theme) {
    let percent = snapshot.and_then(|s| s.system.memory.percent);
    let ratio = percent.map(|p| (p / 100.0).clamp(0.0, 1.0)).unwrap_or(0.0);
    let label = match percent {
        Some(p) => format!("{p:.0}%"),
        None => "-".to_string(),
    };

    let block = bordered(theme).title(Span::styled(
        " MEM ",
        Style::default()
            .fg(theme.muted)
            .add_modifier(Modifier::BOLD),
    ));
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme.mem_fill)
                .bg(theme.mem_empty),
        )
        .ratio(ratio)
        .label(label);

    frame.render_widget(gauge, area);
}

fn render_cpu_sparkline(frame: &mut Frame, area: Rect, info: &HeaderInfo<'_>, theme: &Theme) {
    let title = match info.snapshot.and_then(|s| s.system.cpu.percent) {
        Some(p) => format!(" CPU {p:.0}% "),
        None => " CPU ".to_string(),
    };
    let block = bordered(theme).title(Span::styled(
        title,
        Style::default()
            .fg(theme.muted)
            .add_modifier(Modifier::BOLD),
    ));

    let sparkline = Sparkline::default()
        .block(block)
        .data(info.cpu_history)
        .max(10000)
        .style(Style::default().fg(theme.cpu_line));

    frame.render_widget(sparkline, area);
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
