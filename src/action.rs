/// Where a navigation key moves the process-table selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    First,
    Last,
}

/// What a key press asks the watch view to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    ToggleHelp,
    /// Poll the log now instead of waiting for the next tick.
    Refresh,
    None,
}
