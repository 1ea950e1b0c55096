use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Clone, Debug)]
pub enum Event {
    /// Key presses only; releases and repeats are dropped.
    Key(KeyEvent),
    /// Time to poll the log again.
    Poll,
    Resize,
    /// The terminal input stream failed; the watch loop should stop.
    InputClosed(String),
}

/// Merges terminal input with a fixed poll cadence into one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    /// The first [`Event::Poll`] arrives one `poll_every` from now; the caller
    /// has already read the log once before the loop starts.
    pub fn new(poll_every: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut polls = tokio::time::interval_at(Instant::now() + poll_every, poll_every);
            // A stalled poll must not be followed by a burst of catch-up polls.
            polls.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    next = input.next() => match next {
                        Some(Ok(raw)) => match translate(raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(e)) => Event::InputClosed(e.to_string()),
                        None => Event::InputClosed("terminal input ended".to_string()),
                    },
                    _ = polls.tick() => Event::Poll,
                };
                let closing = matches!(event, Event::InputClosed(_));
                if tx.send(event).is_err() || closing {
                    break;
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

fn translate(raw: TermEvent) -> Option<Event> {
    match raw {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}
