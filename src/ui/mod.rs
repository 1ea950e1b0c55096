pub mod header;
pub mod help;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let cpu_history = app.cpu_history();
    let info = header::HeaderInfo {
        snapshot: app.latest.as_ref(),
        elapsed: app.elapsed(),
        ticks: app.ticks(),
        tracked: app.tracked_count(),
        cpu_history: &cpu_history,
    };
    header::render(frame, chunks[0], &info, &app.theme);

    process_table::render(
        frame,
        chunks[1],
        app.processes(),
        app.selected_index,
        |p| app.is_tracked(p),
        &app.theme,
    );

    statusbar::render(
        frame,
        chunks[2],
        &app.log_description(),
        app.status_message.as_ref(),
        &app.theme,
    );

    // Help overlay last so it draws on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}
