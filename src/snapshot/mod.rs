pub mod log;
pub mod model;

pub use log::{LogError, LogTail, TailBatch, parse_log, read_log};
pub use model::{
    BatInfo, CpuStats, MemoryStats, ProcessSample, Snapshot, SystemStats, Timestamp, WalFile,
    WalInfo,
};
