//! Turns scanned tracks into the ordered series list of a [`PlotSpec`].

use indexmap::IndexMap;

use super::scanner::{FileBreakdown, ProcessTrack};
use super::spec::{AxisId, NamedSeries, PlotSpec, Point};

pub const DEFAULT_SERIES_PREFIX: &str = "m5";

/// Labels for the per-process series.
#[derive(Clone, Debug)]
pub struct SeriesNaming {
    /// Prefix of the cpu/mem/vms/rss series, e.g. `m5` gives `m5_rss`.
    pub prefix: String,
}

impl Default for SeriesNaming {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_SERIES_PREFIX.to_string(),
        }
    }
}

pub fn assemble(
    host_cpu: Vec<Point>,
    host_mem: Vec<Point>,
    tracks: &IndexMap<u32, ProcessTrack>,
    naming: &SeriesNaming,
) -> PlotSpec {
    let mut series = vec![
        NamedSeries::line("sys_cpu%", host_cpu, AxisId::Right),
        NamedSeries::line("sys_mem%", host_mem, AxisId::Right),
    ];

    for track in tracks.values() {
        push_track_series(&mut series, track, naming);
        series.extend(
            file_series(&track.wal_files)
                .into_iter()
                .map(|(name, points)| NamedSeries::stacked_bar(name, points, AxisId::Left)),
        );
    }

    tracing::debug!(
        series = series.len(),
        tracks = tracks.len(),
        "assembled plot"
    );
    PlotSpec::new(series)
}

fn push_track_series(series: &mut Vec<NamedSeries>, track: &ProcessTrack, naming: &SeriesNaming) {
    let prefix = &naming.prefix;
    let db = track.database_label();
    series.extend([
        NamedSeries::line(
            format!("{prefix}_cpu%"),
            track.cpu_percent.clone(),
            AxisId::Right,
        ),
        NamedSeries::line(
            format!("{prefix}_mem%"),
            track.memory_percent.clone(),
            AxisId::Right,
        ),
        NamedSeries::line(format!("{prefix}_vms"), track.vms.clone(), AxisId::Left),
        NamedSeries::line(format!("{prefix}_rss"), track.rss.clone(), AxisId::Left),
        NamedSeries::line(format!("wal_{db}"), track.wal_bytes.clone(), AxisId::Left),
        NamedSeries::line(format!("bat_{db}"), track.bat_bytes.clone(), AxisId::Left),
    ]);
}

/// One point list per file name, in order of first appearance. A file that
/// disappears simply stops getting points.
pub fn file_series(breakdown: &[FileBreakdown]) -> IndexMap<String, Vec<Point>> {
    let mut by_name: IndexMap<String, Vec<Point>> = IndexMap::new();
    for entry in breakdown {
        for file in &entry.files {
            by_name
                .entry(file.fname.clone())
                .or_default()
                .push(Point::new(entry.ts, Some(file.fsize as f64)));
        }
    }
    by_name
}
