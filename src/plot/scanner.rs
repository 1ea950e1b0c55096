//! Single pass over the snapshot sequence: host series plus one track per
//! included process.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use super::filter::ProcessFilter;
use super::spec::Point;
use crate::snapshot::{ProcessSample, Snapshot, Timestamp, WalFile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostField {
    Timestamp,
    CpuPercent,
    MemoryPercent,
}

impl fmt::Display for HostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostField::Timestamp => "ts",
            HostField::CpuPercent => "system.cpu.percent",
            HostField::MemoryPercent => "system.memory.percent",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ScanError {
    #[error("malformed snapshot at tick {tick}: missing {field}")]
    MalformedSnapshot { tick: usize, field: HostField },
}

/// WAL files seen at one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct FileBreakdown {
    pub ts: Timestamp,
    pub files: Vec<WalFile>,
}

/// Everything recorded for one pid. Every point list has one entry per tick
/// in which the pid was included.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessTrack {
    pub pid: u32,
    /// Taken from the first sample only.
    pub database: Option<String>,
    pub cpu_percent: Vec<Point>,
    pub memory_percent: Vec<Point>,
    pub vms: Vec<Point>,
    pub rss: Vec<Point>,
    pub wal_bytes: Vec<Point>,
    pub bat_bytes: Vec<Point>,
    pub wal_files: Vec<FileBreakdown>,
}

impl ProcessTrack {
    fn new(pid: u32, database: Option<String>) -> Self {
        Self {
            pid,
            database,
            cpu_percent: Vec::new(),
            memory_percent: Vec::new(),
            vms: Vec::new(),
            rss: Vec::new(),
            wal_bytes: Vec::new(),
            bat_bytes: Vec::new(),
            wal_files: Vec::new(),
        }
    }

    fn record(&mut self, ts: Timestamp, sample: &ProcessSample) {
        let wal = sample.wal.as_ref();
        let bat = sample.bat.as_ref();

        self.cpu_percent.push(Point::new(ts, sample.cpu_percent));
        self.memory_percent
            .push(Point::new(ts, sample.memory_percent));
        self.vms.push(Point::new(ts, sample.vms.map(|v| v as f64)));
        self.rss.push(Point::new(ts, sample.rss.map(|v| v as f64)));
        self.wal_bytes.push(Point::new(
            ts,
            wal.and_then(|w| w.bytes).map(|v| v as f64),
        ));
        self.bat_bytes.push(Point::new(
            ts,
            bat.and_then(|b| b.bytes).map(|v| v as f64),
        ));

        if let Some(files) = wal.and_then(|w| w.files.as_ref()) {
            self.wal_files.push(FileBreakdown {
                ts,
                files: files.clone(),
            });
        }
    }

    /// Number of ticks this pid was included in.
    pub fn ticks(&self) -> usize {
        self.cpu_percent.len()
    }

    /// Label used for the per-database series; the pid stands in when the
    /// process never reported a database.
    pub fn database_label(&self) -> String {
        match &self.database {
            Some(db) => db.clone(),
            None => self.pid.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanOutput {
    pub host_cpu: Vec<Point>,
    pub host_mem: Vec<Point>,
    /// In order of first sighting.
    pub tracks: IndexMap<u32, ProcessTrack>,
}

/// Incremental form of [`scan`]. Feed snapshots in order with
/// [`Scanner::observe`], then take the result with [`Scanner::finish`].
#[derive(Debug)]
pub struct Scanner {
    filter: ProcessFilter,
    ticks: usize,
    output: ScanOutput,
}

impl Scanner {
    pub fn new(filter: ProcessFilter) -> Self {
        Self {
            filter,
            ticks: 0,
            output: ScanOutput::default(),
        }
    }

    /// Records one tick. A snapshot with missing host data is rejected
    /// without touching any series; the tick still counts towards the index.
    pub fn observe(&mut self, snapshot: &Snapshot) -> Result<(), ScanError> {
        let tick = self.ticks;
        self.ticks += 1;

        let missing = |field| ScanError::MalformedSnapshot { tick, field };
        let ts = snapshot.ts.ok_or_else(|| missing(HostField::Timestamp))?;
        let cpu = snapshot
            .system
            .cpu
            .percent
            .ok_or_else(|| missing(HostField::CpuPercent))?;
        let mem = snapshot
            .system
            .memory
            .percent
            .ok_or_else(|| missing(HostField::MemoryPercent))?;

        self.output.host_cpu.push(Point::new(ts, Some(cpu)));
        self.output.host_mem.push(Point::new(ts, Some(mem)));

        for sample in &snapshot.processes {
            if !self.filter.matches(&sample.pname) {
                continue;
            }
            self.output
                .tracks
                .entry(sample.pid)
                .or_insert_with(|| ProcessTrack::new(sample.pid, sample.database.clone()))
                .record(ts, sample);
        }
        Ok(())
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn output(&self) -> &ScanOutput {
        &self.output
    }

    pub fn finish(self) -> ScanOutput {
        self.output
    }
}

pub fn scan(snapshots: &[Snapshot], filter: &ProcessFilter) -> Result<ScanOutput, ScanError> {
    let mut scanner = Scanner::new(filter.clone());
    for snapshot in snapshots {
        scanner.observe(snapshot)?;
    }
    let output = scanner.finish();
    tracing::debug!(
        ticks = snapshots.len(),
        tracks = output.tracks.len(),
        "scanned snapshots"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{BatInfo, WalInfo};

    fn ts(ms: f64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn mserver(pid: u32, db: &str) -> ProcessSample {
        ProcessSample {
            vms: Some(4096),
            rss: Some(1024),
            cpu_percent: Some(3.0),
            memory_percent: Some(0.5),
            database: Some(db.to_string()),
            ..ProcessSample::new(pid, "mserver5")
        }
    }

    #[test]
    fn host_series_follow_input() {
        let snapshots = vec![
            Snapshot::new(ts(0.0), 10.0, 20.0),
            Snapshot::new(ts(1.0), 11.0, 21.0),
        ];
        let out = scan(&snapshots, &ProcessFilter::default()).unwrap();
        assert_eq!(
            out.host_cpu,
            vec![Point::new(ts(0.0), Some(10.0)), Point::new(ts(1.0), Some(11.0))]
        );
        assert_eq!(out.host_mem[1], Point::new(ts(1.0), Some(21.0)));
        assert!(out.tracks.is_empty());
    }

    #[test]
    fn excluded_processes_get_no_track() {
        let snapshots = vec![
            Snapshot::new(ts(0.0), 1.0, 1.0)
                .with_process(ProcessSample::new(1, "monetdbd"))
                .with_process(mserver(2, "db")),
        ];
        let out = scan(&snapshots, &ProcessFilter::default()).unwrap();
        assert_eq!(out.tracks.keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn tracks_keep_first_sighting_order() {
        let snapshots = vec![
            Snapshot::new(ts(0.0), 1.0, 1.0).with_process(mserver(30, "c")),
            Snapshot::new(ts(1.0), 1.0, 1.0)
                .with_process(mserver(10, "a"))
                .with_process(mserver(30, "c")),
            Snapshot::new(ts(2.0), 1.0, 1.0).with_process(mserver(20, "b")),
        ];
        let out = scan(&snapshots, &ProcessFilter::default()).unwrap();
        assert_eq!(
            out.tracks.keys().copied().collect::<Vec<_>>(),
            vec![30, 10, 20]
        );
        assert_eq!(out.tracks[&30].ticks(), 2);
        assert_eq!(out.tracks[&10].ticks(), 1);
    }

    #[test]
    fn database_label_fixed_at_creation() {
        let snapshots = vec![
            Snapshot::new(ts(0.0), 1.0, 1.0).with_process(mserver(5, "first")),
            Snapshot::new(ts(1.0), 1.0, 1.0).with_process(mserver(5, "second")),
        ];
        let out = scan(&snapshots, &ProcessFilter::default()).unwrap();
        assert_eq!(out.tracks[&5].database.as_deref(), Some("first"));
    }

    #[test]
    fn missing_log_info_keeps_tick_with_gap() {
        let with_logs = ProcessSample {
            wal: Some(WalInfo {
                bytes: Some(100),
                ..WalInfo::default()
            }),
            bat: Some(BatInfo {
                bytes: Some(7),
                fcount: Some(1),
            }),
            ..mserver(9, "db")
        };
        let snapshots = vec![
            Snapshot::new(ts(0.0), 1.0, 1.0).with_process(with_logs),
            Snapshot::new(ts(1.0), 1.0, 1.0).with_process(mserver(9, "db")),
        ];
        let out = scan(&snapshots, &ProcessFilter::default()).unwrap();
        let track = &out.tracks[&9];
        assert_eq!(
            track.wal_bytes,
            vec![Point::new(ts(0.0), Some(100.0)), Point::new(ts(1.0), None)]
        );
        assert_eq!(
            track.bat_bytes,
            vec![Point::new(ts(0.0), Some(7.0)), Point::new(ts(1.0), None)]
        );
        assert!(track.wal_files.is_empty());
    }

    #[test]
    fn empty_file_list_still_records_breakdown() {
        let sample = ProcessSample {
            wal: Some(WalInfo {
                bytes: Some(0),
                files: Some(Vec::new()),
                fcount: Some(0),
            }),
            ..mserver(3, "db")
        };
        let snapshots = vec![Snapshot::new(ts(4.0), 1.0, 1.0).with_process(sample)];
        let out = scan(&snapshots, &ProcessFilter::default()).unwrap();
        assert_eq!(
            out.tracks[&3].wal_files,
            vec![FileBreakdown {
                ts: ts(4.0),
                files: Vec::new()
            }]
        );
    }

    #[test]
    fn missing_host_value_names_tick_and_field() {
        let mut broken = Snapshot::new(ts(1.0), 1.0, 1.0);
        broken.system.memory.percent = None;
        let snapshots = vec![Snapshot::new(ts(0.0), 1.0, 1.0), broken];

        let err = scan(&snapshots, &ProcessFilter::default()).unwrap_err();
        assert_eq!(
            err,
            ScanError::MalformedSnapshot {
                tick: 1,
                field: HostField::MemoryPercent
            }
        );
        assert_eq!(
            err.to_string(),
            "malformed snapshot at tick 1: missing system.memory.percent"
        );
    }

    #[test]
    fn rejected_tick_leaves_series_untouched() {
        let mut scanner = Scanner::new(ProcessFilter::default());
        let broken = Snapshot {
            ts: None,
            ..Snapshot::new(ts(0.0), 1.0, 1.0).with_process(mserver(1, "db"))
        };
        assert!(scanner.observe(&broken).is_err());
        assert!(scanner.output().host_cpu.is_empty());
        assert!(scanner.output().tracks.is_empty());

        scanner.observe(&Snapshot::new(ts(1.0), 1.0, 1.0)).unwrap();
        assert_eq!(scanner.ticks(), 2);
        assert_eq!(scanner.finish().host_cpu.len(), 1);
    }

    #[test]
    fn database_label_falls_back_to_pid() {
        let snapshots =
            vec![Snapshot::new(ts(0.0), 1.0, 1.0).with_process(ProcessSample::new(77, "mserver5"))];
        let out = scan(&snapshots, &ProcessFilter::default()).unwrap();
        assert_eq!(out.tracks[&77].database_label(), "77");
    }
}
