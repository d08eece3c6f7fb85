// Chart data domain models
use serde::Serialize;

/// One point of a line series; `y` is `None` where the cell is not numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: usize,
    pub y: Option<f64>,
}

impl ChartPoint {
    pub fn new(x: usize, y: Option<f64>) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub points: Vec<ChartPoint>,
}

impl SeriesData {
    pub fn new(id: String, name: String, points: Vec<ChartPoint>) -> Self {
        Self { id, name, points }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_label_rotation: i32,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn total(&self) -> usize {
        self.bars.iter().map(|b| b.count).sum()
    }
}
