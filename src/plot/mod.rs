//! Snapshot sequence to chart description.
//!
//! [`scanner`] folds the snapshots into host series and per-process tracks,
//! [`assembler`] flattens those into the ordered series of a [`PlotSpec`].
//! Nothing in here does I/O or knows about the terminal UI.

pub mod assembler;
pub mod filter;
pub mod scanner;
pub mod spec;

pub use assembler::{SeriesNaming, assemble, file_series};
pub use filter::ProcessFilter;
pub use scanner::{FileBreakdown, HostField, ProcessTrack, ScanError, ScanOutput, Scanner, scan};
pub use spec::{AxisId, NamedSeries, PlotSpec, Point};

use crate::snapshot::Snapshot;

/// What to track and how to label it.
#[derive(Clone, Debug, Default)]
pub struct PlotOptions {
    pub filter: ProcessFilter,
    pub naming: SeriesNaming,
}

/// Scan then assemble. Fails only on snapshots with missing host data.
pub fn build_plot(snapshots: &[Snapshot], options: &PlotOptions) -> Result<PlotSpec, ScanError> {
    let ScanOutput {
        host_cpu,
        host_mem,
        tracks,
    } = scan(snapshots, &options.filter)?;
    Ok(assemble(host_cpu, host_mem, &tracks, &options.naming))
}
