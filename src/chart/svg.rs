//! SVG output for [`RadarChart`] via an askama template.

use askama::Template;

use super::RadarChart;

pub type SvgError = askama::Error;

const WIDTH: f64 = 520.0;
const HEIGHT: f64 = 540.0;
const CENTER_X: f64 = WIDTH / 2.0;
const CENTER_Y: f64 = 290.0;
const PLOT_RADIUS: f64 = 180.0;
const LABEL_GAP: f64 = 24.0;

struct Ring {
    r: String,
}

struct Axis {
    x: String,
    y: String,
    label_x: String,
    label_y: String,
    anchor: &'static str,
    label: &'static str,
}

#[derive(Template)]
#[template(path = "radar.svg", escape = "html")]
struct RadarSvg<'a> {
    width: f64,
    height: f64,
    cx: f64,
    cy: f64,
    title: &'a str,
    line: &'a str,
    fill: &'a str,
    alpha: String,
    rings: Vec<Ring>,
    axes: Vec<Axis>,
    points: String,
}

fn to_xy(angle: f64, radius: f64) -> (f64, f64) {
    (
        CENTER_X + radius * angle.sin(),
        CENTER_Y - radius * angle.cos(),
    )
}

fn fmt(v: f64) -> String {
    format!("{v:.2}")
}

pub(super) fn render_svg(chart: &RadarChart) -> Result<String, SvgError> {
    let scale = PLOT_RADIUS / chart.radial_max;
    let rings = chart
        .gridlines
        .iter()
        .map(|g| Ring { r: fmt(g * scale) })
        .collect();
    let axes = chart
        .spokes
        .iter()
        .map(|spoke| {
            let (x, y) = to_xy(spoke.angle, PLOT_RADIUS);
            let (label_x, label_y) = to_xy(spoke.angle, PLOT_RADIUS + LABEL_GAP);
            let offset = label_x - CENTER_X;
            let anchor = if offset.abs() < 1.0 {
                "middle"
            } else if offset > 0.0 {
                "start"
            } else {
                "end"
            };
            Axis {
                x: fmt(x),
                y: fmt(y),
                label_x: fmt(label_x),
                label_y: fmt(label_y),
                anchor,
                label: spoke.dimension.name(),
            }
        })
        .collect();
    let points = chart
        .polygon
        .iter()
        .map(|p| {
            let (x, y) = to_xy(p.angle, p.radius * scale);
            format!("{},{}", fmt(x), fmt(y))
        })
        .collect::<Vec<_>>()
        .join(" ");

    RadarSvg {
        width: WIDTH,
        height: HEIGHT,
        cx: CENTER_X,
        cy: CENTER_Y,
        title: &chart.title,
        line: chart.palette.line,
        fill: chart.palette.fill,
        alpha: format!("{}", chart.palette.alpha),
        rings,
        axes,
        points,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use crate::{
        chart::render,
        model::{ScoreVector, WineType},
    };

    #[test]
    fn svg_escapes_title_and_uses_palette() {
        let scores = ScoreVector::from_values([5; 11]).unwrap();
        let chart = render("Cossard <Bedeau> & co", &WineType::Orange, &scores);
        let svg = chart.to_svg().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Cossard &lt;Bedeau&gt; &amp; co"));
        assert!(svg.contains("#C87814"));
        assert!(svg.contains("fill-opacity=\"0.2\""));
        assert_eq!(svg.matches("<circle").count(), 5);
        assert!(svg.contains(">Sweetness</text>"));
    }
}
