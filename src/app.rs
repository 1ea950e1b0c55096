use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, Direction};
use crate::plot::{ProcessFilter, Scanner};
use crate::snapshot::{LogTail, ProcessSample, Snapshot};
use crate::ui::theme::Theme;

/// How many host CPU samples the header sparkline shows.
const CPU_HISTORY_LEN: usize = 60;
const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

/// State of the `watch` view: a tail on the log and the scan built from it.
pub struct App {
    pub running: bool,
    pub input_mode: InputMode,
    pub latest: Option<Snapshot>,
    pub selected_index: usize,
    pub status_message: Option<(String, Instant)>,
    pub theme: Theme,
    tail: LogTail,
    scanner: Scanner,
    filter: ProcessFilter,
    started: Instant,
}

impl App {
    pub fn new(tail: LogTail, filter: ProcessFilter, theme: Theme) -> Self {
        let mut app = Self {
            running: true,
            input_mode: InputMode::Normal,
            latest: None,
            selected_index: 0,
            status_message: None,
            theme,
            tail,
            scanner: Scanner::new(filter.clone()),
            filter,
            started: Instant::now(),
        };
        app.refresh_data();
        app
    }

    pub fn refresh_data(&mut self) {
        if let Some((_, since)) = &self.status_message
            && since.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }

        let batch = match self.tail.poll() {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(error = %e, "polling snapshot log failed");
                self.set_status(e.to_string());
                return;
            }
        };

        if batch.restarted {
            self.scanner = Scanner::new(self.filter.clone());
            self.latest = None;
            self.set_status(format!("{} was truncated, rereading", self.log_description()));
        }

        for err in &batch.errors {
            tracing::warn!(error = %err, "skipping snapshot line");
        }
        if let Some(err) = batch.errors.last() {
            self.set_status(err.to_string());
        }

        for snapshot in batch.snapshots {
            match self.scanner.observe(&snapshot) {
                Ok(()) => self.latest = Some(snapshot),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping snapshot");
                    self.set_status(e.to_string());
                }
            }
        }
        self.clamp_selection();
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        match self.input_mode {
            InputMode::Help => match key.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => Action::ToggleHelp,
                _ => Action::None,
            },
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('?') => Action::ToggleHelp,
                KeyCode::Char('r') => Action::Refresh,
                KeyCode::Up | KeyCode::Char('k') => Action::Navigate(Direction::Up),
                KeyCode::Down | KeyCode::Char('j') => Action::Navigate(Direction::Down),
                KeyCode::Home | KeyCode::Char('g') => Action::Navigate(Direction::First),
                KeyCode::End | KeyCode::Char('G') => Action::Navigate(Direction::Last),
                _ => Action::None,
            },
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => {
                self.input_mode = match self.input_mode {
                    InputMode::Normal => InputMode::Help,
                    InputMode::Help => InputMode::Normal,
                };
            }
            Action::Refresh => self.refresh_data(),
            Action::Navigate(Direction::Up) => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            Action::Navigate(Direction::Down) => {
                self.selected_index += 1;
                self.clamp_selection();
            }
            Action::Navigate(Direction::First) => self.selected_index = 0,
            Action::Navigate(Direction::Last) => {
                self.selected_index = self.processes().len().saturating_sub(1);
            }
            Action::None => {}
        }
    }

    pub fn processes(&self) -> &[ProcessSample] {
        self.latest
            .as_ref()
            .map(|s| s.processes.as_slice())
            .unwrap_or_default()
    }

    pub fn is_tracked(&self, process: &ProcessSample) -> bool {
        self.filter.matches(&process.pname)
    }

    pub fn ticks(&self) -> usize {
        self.scanner.ticks()
    }

    pub fn tracked_count(&self) -> usize {
        self.scanner.output().tracks.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn log_description(&self) -> String {
        self.tail.path().display().to_string()
    }

    /// Host CPU percent of the most recent ticks, scaled by 100 for the
    /// integer sparkline.
    pub fn cpu_history(&self) -> Vec<u64> {
        let host_cpu = &self.scanner.output().host_cpu;
        let start = host_cpu.len().saturating_sub(CPU_HISTORY_LEN);
        host_cpu[start..]
            .iter()
            .map(|p| (p.y.unwrap_or(0.0) * 100.0).round() as u64)
            .collect()
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            ("q".to_string(), "Quit"),
            ("\u{2191}/k".to_string(), "Select previous"),
            ("\u{2193}/j".to_string(), "Select next"),
            ("Home/g".to_string(), "First process"),
            ("End/G".to_string(), "Last process"),
            ("r".to_string(), "Reread log"),
            ("?".to_string(), "Toggle help"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    fn clamp_selection(&mut self) {
        let len = self.processes().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn line(ts: u64, cpu: f64, procs: &str) -> String {
        format!(
            r#"{{"ts": {ts}, "system": {{"cpu": {{"percent": {cpu}}}, "memory": {{"percent": 50.0}}}}, "processes": [{procs}]}}"#
        )
    }

    fn app_for(file: &NamedTempFile) -> App {
        App::new(
            LogTail::new(file.path()),
            ProcessFilter::default(),
            Theme::from_name("dark"),
        )
    }

    const TWO_PROCS: &str = r#"{"pid": 1, "pname": "mserver5", "database": "demo"},
                               {"pid": 2, "pname": "monetdbd"}"#;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn loads_existing_lines_on_start() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line(0, 10.0, TWO_PROCS)).unwrap();
        writeln!(file, "{}", line(1000, 20.0, TWO_PROCS)).unwrap();
        file.flush().unwrap();

        let app = app_for(&file);
        assert_eq!(app.ticks(), 2);
        assert_eq!(app.processes().len(), 2);
        assert_eq!(app.tracked_count(), 1);
        assert_eq!(app.cpu_history(), vec![1000, 2000]);
        assert!(app.is_tracked(&app.processes()[0]));
        assert!(!app.is_tracked(&app.processes()[1]));
    }

    #[test]
    fn refresh_picks_up_appended_lines() {
        let mut file = NamedTempFile::new().unwrap();
        let mut app = app_for(&file);
        assert!(app.latest.is_none());

        writeln!(file, "{}", line(0, 5.0, "")).unwrap();
        file.flush().unwrap();
        app.dispatch(Action::Refresh);
        assert_eq!(app.ticks(), 1);
        assert!(app.processes().is_empty());
    }

    #[test]
    fn bad_lines_set_status_and_are_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "garbage").unwrap();
        writeln!(file, r#"{{"ts": 5, "processes": []}}"#).unwrap();
        writeln!(file, "{}", line(10, 1.0, "")).unwrap();
        file.flush().unwrap();

        let app = app_for(&file);
        assert!(app.latest.is_some());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("malformed snapshot at tick 0"));
        assert_eq!(app.cpu_history(), vec![100]);
    }

    #[test]
    fn truncated_log_starts_a_fresh_scan() {
        let mut file = NamedTempFile::new().unwrap();
        for ts in [1000, 2000, 3000] {
            writeln!(file, "{}", line(ts, ts as f64 / 100.0, TWO_PROCS)).unwrap();
        }
        file.flush().unwrap();
        let mut app = app_for(&file);
        assert_eq!(app.ticks(), 3);
        assert_eq!(app.tracked_count(), 1);

        std::fs::write(file.path(), format!("{}\n", line(9000, 90.0, ""))).unwrap();
        app.refresh_data();

        assert_eq!(app.ticks(), 1);
        assert_eq!(app.tracked_count(), 0);
        assert_eq!(app.cpu_history(), vec![9000]);
        assert!(app.processes().is_empty());
        let latest_ts = app.latest.as_ref().and_then(|s| s.ts);
        assert_eq!(latest_ts.map(|t| t.as_millis()), Some(9000.0));
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("truncated"));
    }

    #[test]
    fn navigation_is_clamped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line(0, 1.0, TWO_PROCS)).unwrap();
        file.flush().unwrap();
        let mut app = app_for(&file);

        app.dispatch(Action::Navigate(Direction::Up));
        assert_eq!(app.selected_index, 0);
        app.dispatch(Action::Navigate(Direction::Down));
        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.selected_index, 1);
        app.dispatch(Action::Navigate(Direction::First));
        assert_eq!(app.selected_index, 0);
        app.dispatch(Action::Navigate(Direction::Last));
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn key_mapping() {
        let file = NamedTempFile::new().unwrap();
        let mut app = app_for(&file);

        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(
            app.map_key(key(KeyCode::Char('j'))),
            Action::Navigate(Direction::Down)
        );
        assert_eq!(
            app.map_key(key(KeyCode::End)),
            Action::Navigate(Direction::Last)
        );
        assert_eq!(
            app.map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );

        app.dispatch(Action::ToggleHelp);
        assert!(app.show_help());
        assert_eq!(app.map_key(key(KeyCode::Char('j'))), Action::None);
        assert_eq!(app.map_key(key(KeyCode::Esc)), Action::ToggleHelp);

        app.dispatch(Action::Quit);
        assert!(!app.running);
    }
}
