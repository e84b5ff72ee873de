//! Radar chart construction for a scored wine.

mod svg;

use std::f64::consts::PI;

use serde::Serialize;

use crate::model::{Dimension, ScoreVector, WineType, MAX_SCORE};

pub use svg::SvgError;

/// Radial positions of the grid rings.
pub const GRIDLINES: [f64; 5] = [2.0, 4.0, 6.0, 8.0, 10.0];

/// Line and fill styling for one wine type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palette {
    pub line: &'static str,
    pub fill: &'static str,
    pub alpha: f64,
}

const RED: Palette = Palette {
    line: "#8B0000",
    fill: "#8B0000",
    alpha: 0.35,
};
const WHITE: Palette = Palette {
    line: "#7A8C00",
    fill: "#7A8C00",
    alpha: 0.2,
};
const ROSE: Palette = Palette {
    line: "#DC6478",
    fill: "#DC6478",
    alpha: 0.2,
};
const ORANGE: Palette = Palette {
    line: "#C87814",
    fill: "#C87814",
    alpha: 0.2,
};

impl Palette {
    /// Colours for `wine_type`; unknown types use the red palette.
    pub fn for_type(wine_type: &WineType) -> Self {
        match wine_type {
            WineType::Red | WineType::Other(_) => RED,
            WineType::White => WHITE,
            WineType::Rose => ROSE,
            WineType::Orange => ORANGE,
        }
    }
}

/// One axis of the chart. Angles are radians clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spoke {
    pub dimension: Dimension,
    pub angle: f64,
}

/// A vertex of the plotted polygon in polar coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarPoint {
    pub angle: f64,
    pub radius: f64,
}

/// A fully laid-out radar figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub title: String,
    pub wine_type: WineType,
    pub palette: Palette,
    pub spokes: Vec<Spoke>,
    /// Closed polygon: the first vertex is repeated at the end.
    pub polygon: Vec<PolarPoint>,
    pub radial_max: f64,
    pub gridlines: Vec<f64>,
}

/// Lay out `scores` as a closed radar polygon titled with the wine name.
pub fn render(wine: &str, wine_type: &WineType, scores: &ScoreVector) -> RadarChart {
    let count = Dimension::ALL.len();
    let spokes: Vec<Spoke> = Dimension::ALL
        .iter()
        .enumerate()
        .map(|(i, &dimension)| Spoke {
            dimension,
            angle: 2.0 * PI * i as f64 / count as f64,
        })
        .collect();

    let mut polygon: Vec<PolarPoint> = spokes
        .iter()
        .map(|spoke| PolarPoint {
            angle: spoke.angle,
            radius: f64::from(scores.get(spoke.dimension)),
        })
        .collect();
    if let Some(&first) = polygon.first() {
        polygon.push(first);
    }

    RadarChart {
        title: wine.to_string(),
        wine_type: wine_type.clone(),
        palette: Palette::for_type(wine_type),
        spokes,
        polygon,
        radial_max: f64::from(MAX_SCORE),
        gridlines: GRIDLINES.to_vec(),
    }
}

impl RadarChart {
    /// Render as a standalone SVG document.
    pub fn to_svg(&self) -> Result<String, SvgError> {
        svg::render_svg(self)
    }
}
