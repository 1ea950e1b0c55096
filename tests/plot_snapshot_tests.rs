use insta::assert_snapshot;

use mdbtop::plot::{PlotOptions, build_plot};
use mdbtop::snapshot::{ProcessSample, Snapshot, Timestamp, WalFile, WalInfo};

#[test]
fn chart_config_single_tick() {
    let mserver = ProcessSample {
        rss: Some(2048),
        cpu_percent: Some(1.5),
        database: Some("demo".to_string()),
        wal: Some(WalInfo {
            bytes: Some(10),
            files: Some(vec![WalFile {
                fname: "log".to_string(),
                fsize: 10,
            }]),
            fcount: Some(1),
        }),
        ..ProcessSample::new(7, "mserver5")
    };
    let snapshots = vec![
        Snapshot::new(Timestamp::from_millis(1000.0), 10.0, 20.5)
            .with_process(mserver)
            .with_process(ProcessSample::new(8, "monetdbd")),
    ];

    let spec = build_plot(&snapshots, &PlotOptions::default()).unwrap();
    let output = spec.to_json_pretty().unwrap();
    assert_snapshot!("chart_config_single_tick", output);
}
