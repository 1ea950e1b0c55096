//! Declarative plot description handed to the chart renderer.
//!
//! [`PlotSpec`] serializes straight into a Chart.js configuration object.

use serde::Serialize;

use crate::snapshot::Timestamp;

/// Stack group shared by every stacked-bar series.
pub const BAR_STACK: &str = "bar";

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: Timestamp,
    /// `None` serializes as `null` so the renderer draws a gap.
    pub y: Option<f64>,
}

impl Point {
    pub fn new(x: Timestamp, y: Option<f64>) -> Self {
        Self { x, y }
    }
}

/// Which y axis a series is drawn against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AxisId {
    /// Byte sizes.
    #[serde(rename = "yl")]
    Left,
    /// Percentages.
    #[serde(rename = "yr")]
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackedBar {
    #[serde(rename = "type")]
    kind: &'static str,
    pub stack: String,
}

impl StackedBar {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            kind: "bar",
            stack: stack.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedSeries {
    pub label: String,
    pub data: Vec<Point>,
    #[serde(rename = "yAxisID")]
    pub axis: AxisId,
    #[serde(flatten)]
    pub bar: Option<StackedBar>,
}

impl NamedSeries {
    pub fn line(label: impl Into<String>, data: Vec<Point>, axis: AxisId) -> Self {
        Self {
            label: label.into(),
            data,
            axis,
            bar: None,
        }
    }

    pub fn stacked_bar(label: impl Into<String>, data: Vec<Point>, axis: AxisId) -> Self {
        Self {
            label: label.into(),
            data,
            axis,
            bar: Some(StackedBar::new(BAR_STACK)),
        }
    }

    pub fn is_stacked_bar(&self) -> bool {
        self.bar.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Time,
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalePosition {
    Bottom,
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScaleTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scale {
    #[serde(rename = "type")]
    pub kind: ScaleKind,
    pub display: bool,
    pub position: ScalePosition,
    pub title: ScaleTitle,
    pub stacked: bool,
}

impl Scale {
    fn new(kind: ScaleKind, position: ScalePosition, title: &str, stacked: bool) -> Self {
        Self {
            kind,
            display: true,
            position,
            title: ScaleTitle {
                display: true,
                text: title.to_string(),
            },
            stacked,
        }
    }
}

/// Time on x, sizes on the left, percentages on the right.
///
/// Only x is stacked: bars sharing a tick occupy one slot while line series
/// on the y axes are never summed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scales {
    pub x: Scale,
    pub yl: Scale,
    pub yr: Scale,
}

impl Default for Scales {
    fn default() -> Self {
        Self {
            x: Scale::new(ScaleKind::Time, ScalePosition::Bottom, "Time", true),
            yl: Scale::new(ScaleKind::Linear, ScalePosition::Left, "Size", false),
            yr: Scale::new(ScaleKind::Linear, ScalePosition::Right, "%", false),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlotSpec {
    pub series: Vec<NamedSeries>,
    pub scales: Scales,
}

impl PlotSpec {
    pub fn new(series: Vec<NamedSeries>) -> Self {
        Self {
            series,
            scales: Scales::default(),
        }
    }

    pub fn series(&self, label: &str) -> Option<&NamedSeries> {
        self.series.iter().find(|s| s.label == label)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Serialize)]
struct ChartConfig<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: ChartData<'a>,
    options: ChartOptions<'a>,
}

#[derive(Serialize)]
struct ChartData<'a> {
    datasets: &'a [NamedSeries],
}

#[derive(Serialize)]
struct ChartOptions<'a> {
    responsive: bool,
    stacked: bool,
    animation: bool,
    scales: &'a Scales,
}

impl Serialize for PlotSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ChartConfig {
            kind: "line",
            data: ChartData {
                datasets: &self.series,
            },
            options: ChartOptions {
                responsive: true,
                stacked: false,
                animation: false,
                scales: &self.scales,
            },
        }
        .serialize(serializer)
    }
}
