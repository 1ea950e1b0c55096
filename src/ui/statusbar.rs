use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::format::truncate_unicode;
use crate::ui::theme::Theme;

const KEYS: [(&str, &str); 4] = [
    ("q", "Quit"),
    ("\u{2191}\u{2193}", "Select"),
    ("r", "Reread"),
    ("?", "Help"),
];

/// Key hints (or the pending status message) on the left, the followed log
/// on the right.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    log_description: &str,
    status_message: Option<&(String, Instant)>,
    theme: &Theme,
) {
    let path_width = (log_description.width() as u16 + 2).min(area.width / 2);
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(path_width)]).areas(area);
    let bar = Style::default().bg(theme.bar_bg);

    let hints = match status_message {
        Some((msg, _)) => Line::from(Span::styled(
            format!(" {msg}"),
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(
            KEYS.iter()
                .flat_map(|(key, desc)| key_pill(key, desc, theme))
                .collect::<Vec<_>>(),
        ),
    };
    frame.render_widget(Paragraph::new(hints).style(bar), left);

    let path = truncate_unicode(log_description, path_width.saturating_sub(1) as usize);
    frame.render_widget(
        Paragraph::new(Span::styled(path, Style::default().fg(theme.log_path)))
            .alignment(Alignment::Right)
            .style(bar),
        right,
    );
}

fn key_pill<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> [Span<'a>; 3] {
    [
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.key_fg)
                .bg(theme.key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.key_desc).bg(theme.panel_bg),
        ),
    ]
}
