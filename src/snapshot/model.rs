use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
///
/// The collector writes naive local ISO-8601 strings, other producers write
/// numbers or RFC 3339 strings; all of them end up as a number here because
/// that is what the chart time axis consumes.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    pub fn from_millis(millis: f64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> f64 {
        self.0
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::from_micros(dt.timestamp_micros()));
        }
        let naive = raw.parse::<NaiveDateTime>().ok()?;
        let micros = match Local.from_local_datetime(&naive).earliest() {
            Some(local) => local.timestamp_micros(),
            // Skipped by a DST transition; fall back to reading it as UTC.
            None => naive.and_utc().timestamp_micros(),
        };
        Some(Self::from_micros(micros))
    }

    fn from_micros(micros: i64) -> Self {
        Self(micros as f64 / 1000.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Millis(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Millis(millis) => Ok(Timestamp(millis)),
            Raw::Text(text) => Timestamp::parse(&text)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp `{text}`"))),
        }
    }
}

/// One sampling tick as written to the log by the collector.
///
/// Host fields stay optional here so a truncated record still parses; the
/// scanner is the one that decides a missing host value is fatal.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Snapshot {
    #[serde(default)]
    pub ts: Option<Timestamp>,
    #[serde(default)]
    pub system: SystemStats,
    #[serde(default)]
    pub processes: Vec<ProcessSample>,
}

impl Snapshot {
    pub fn new(ts: Timestamp, cpu_percent: f64, memory_percent: f64) -> Self {
        Self {
            ts: Some(ts),
            system: SystemStats {
                cpu: CpuStats {
                    percent: Some(cpu_percent),
                },
                memory: MemoryStats {
                    percent: Some(memory_percent),
                    ..MemoryStats::default()
                },
            },
            processes: Vec::new(),
        }
    }

    pub fn with_process(mut self, process: ProcessSample) -> Self {
        self.processes.push(process);
        self
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemStats {
    pub cpu: CpuStats,
    pub memory: MemoryStats,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CpuStats {
    pub percent: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryStats {
    pub percent: Option<f64>,
    pub available: Option<u64>,
    pub used: Option<u64>,
    pub free: Option<u64>,
}

/// A process observed at one tick.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub pname: String,
    pub vms: Option<u64>,
    pub rss: Option<u64>,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub database: Option<String>,
    pub wal: Option<WalInfo>,
    pub bat: Option<BatInfo>,
}

impl ProcessSample {
    pub fn new(pid: u32, pname: impl Into<String>) -> Self {
        Self {
            pid,
            pname: pname.into(),
            vms: None,
            rss: None,
            cpu_percent: None,
            memory_percent: None,
            database: None,
            wal: None,
            bat: None,
        }
    }
}

/// Write-ahead log directory usage of a database process.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WalInfo {
    pub bytes: Option<u64>,
    pub files: Option<Vec<WalFile>>,
    pub fcount: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WalFile {
    pub fname: String,
    pub fsize: u64,
}

/// BAT storage usage. Only totals are logged, there can be thousands of files.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BatInfo {
    pub bytes: Option<u64>,
    pub fcount: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_collector_record() {
        let line = r#"{"ts": "2024-03-01T10:00:00.500000+00:00",
            "system": {"cpu": {"percent": 12.5},
                       "memory": {"available": 1000, "percent": 41.0, "used": 900, "free": 100}},
            "processes": [{"pid": 7, "pname": "mserver5", "rss": 2048, "vms": 4096,
                           "num_mmaps": 3, "memory_percent": 1.5, "cpu_percent": 0.0,
                           "num_fds": 10, "num_threads": 4, "num_net_connections": 1,
                           "num_open_files": 2, "database": "demo",
                           "wal": {"bytes": 30, "files": [{"fname": "log", "fsize": 30}], "fcount": 1},
                           "bat": {"bytes": 500, "fcount": 12}}]}"#;
        let snapshot: Snapshot = serde_json::from_str(line).unwrap();

        assert_eq!(snapshot.ts, Some(Timestamp::from_millis(1_709_287_200_500.0)));
        assert_eq!(snapshot.system.cpu.percent, Some(12.5));
        assert_eq!(snapshot.system.memory.used, Some(900));

        let process = &snapshot.processes[0];
        assert_eq!(process.pid, 7);
        assert_eq!(process.database.as_deref(), Some("demo"));
        let wal = process.wal.as_ref().unwrap();
        assert_eq!(wal.bytes, Some(30));
        assert_eq!(
            wal.files.as_deref(),
            Some(&[WalFile {
                fname: "log".into(),
                fsize: 30
            }][..])
        );
        assert_eq!(process.bat.as_ref().unwrap().bytes, Some(500));
    }

    #[test]
    fn numeric_timestamp_is_taken_as_millis() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"ts": 1500}"#).unwrap();
        assert_eq!(snapshot.ts, Some(Timestamp::from_millis(1500.0)));
    }

    #[test]
    fn naive_timestamp_is_local_time() {
        let ts = Timestamp::parse("2024-03-01T10:00:00.250").unwrap();
        let naive: NaiveDateTime = "2024-03-01T10:00:00.250".parse().unwrap();
        let expected = Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap()
            .timestamp_millis() as f64;
        assert_eq!(ts.as_millis(), expected);
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let err = serde_json::from_str::<Snapshot>(r#"{"ts": "yesterday"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn missing_host_fields_still_parse() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"processes": []}"#).unwrap();
        assert!(snapshot.ts.is_none());
        assert!(snapshot.system.cpu.percent.is_none());
        assert!(snapshot.system.memory.percent.is_none());
    }
}
