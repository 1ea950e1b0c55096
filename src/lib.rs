//! Charts for MonetDB process monitoring logs.
//!
//! The collector appends one JSON [`Snapshot`](snapshot::Snapshot) per tick
//! to a log. This crate reads such logs ([`snapshot`]), folds them into
//! host and per-process time series and lays those out as a dual-axis chart
//! description ([`plot`]), which [`report`] embeds in a standalone HTML page.
//! The `watch` view ([`app`], [`ui`]) follows a log while it is written.
//!
//! ```
//! use mdbtop::plot::{PlotOptions, build_plot};
//! use mdbtop::snapshot::{ProcessSample, Snapshot, Timestamp};
//!
//! let snapshots = vec![
//!     Snapshot::new(Timestamp::from_millis(0.0), 10.0, 20.0)
//!         .with_process(ProcessSample::new(42, "mserver5")),
//! ];
//! let spec = build_plot(&snapshots, &PlotOptions::default()).unwrap();
//! assert_eq!(spec.series[0].label, "sys_cpu%");
//! assert!(spec.series("m5_rss").is_some());
//! ```

pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod plot;
pub mod report;
pub mod snapshot;
pub mod ui;
