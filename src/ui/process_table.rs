use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::format::{format_optional_bytes, format_percent, truncate_unicode};
use crate::snapshot::ProcessSample;
use crate::ui::theme::Theme;

pub const HEADER: [&str; 8] = ["PID", "PROC", "VIRT", "RSS", "CPU%", "DB", "WAL", "BAT"];

const NAME_WIDTH: usize = 16;
const DB_WIDTH: usize = 16;

/// Cell texts for one process, in [`HEADER`] order.
pub fn row_cells(process: &ProcessSample) -> [String; 8] {
    [
        process.pid.to_string(),
        truncate_unicode(&process.pname, NAME_WIDTH),
        format_optional_bytes(process.vms),
        format_optional_bytes(process.rss),
        format_percent(process.cpu_percent),
        truncate_unicode(process.database.as_deref().unwrap_or("-"), DB_WIDTH),
        format_optional_bytes(process.wal.as_ref().and_then(|w| w.bytes)),
        format_optional_bytes(process.bat.as_ref().and_then(|b| b.bytes)),
    ]
}

pub fn render<F>(
    frame: &mut Frame,
    area: Rect,
    processes: &[ProcessSample],
    selected: usize,
    is_tracked: F,
    theme: &Theme,
) where
    F: Fn(&ProcessSample) -> bool,
{
    let header = Row::new(HEADER.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(theme.heading)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = processes.iter().map(|process| {
        let fg = if is_tracked(process) {
            theme.tracked
        } else {
            theme.muted
        };
        Row::new(row_cells(process).map(Cell::from)).style(Style::default().fg(fg))
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Length(NAME_WIDTH as u16 + 1),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(6),
        Constraint::Length(DB_WIDTH as u16 + 1),
        Constraint::Length(11),
        Constraint::Length(11),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            format!(" Processes ({}) ", processes.len()),
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::BOLD),
        ));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(theme.selected_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default();
    if !processes.is_empty() {
        state.select(Some(selected.min(processes.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
