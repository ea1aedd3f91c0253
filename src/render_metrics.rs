// Precision/recall scatter charts, one per variant type, with the iso-F1
// reference surface underneath and click-to-inspect binding on top.

use crate::contour::IsoEmphasis;
use crate::experiment::{Caller, ExperimentId, Technology, VariantType};
use crate::performance::MetricPoint;
use crate::session::Session;
use crate::F1_SURFACE;
use eframe::egui::{self, Color32, Pos2};
use egui_plot::{Corner, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoint, PlotPoints, Points};
use std::collections::BTreeMap;

/// How close (in screen pixels) a click must land to a point to count.
const CLICK_TOLERANCE_PX: f32 = 10.0;

pub fn technology_color(technology: Technology) -> Color32 {
    match technology {
        Technology::Illumina => Color32::from_rgb(0x35, 0x8d, 0xe5),
        Technology::Pacbio => Color32::from_rgb(0xe5, 0x8e, 0x26),
        Technology::Ont => Color32::from_rgb(0x4c, 0xaf, 0x50),
        Technology::Mgi => Color32::from_rgb(0xb5, 0x4c, 0xc9),
    }
}

pub fn caller_marker(caller: Caller) -> MarkerShape {
    match caller {
        Caller::Deepvariant => MarkerShape::Circle,
        Caller::Gatk => MarkerShape::Diamond,
        Caller::Clair3 => MarkerShape::Square,
    }
}

/// The closest candidate within the tolerance radius, if any.
fn nearest_within(
    candidates: &[(ExperimentId, Pos2)],
    cursor: Pos2,
    tolerance: f32,
) -> Option<ExperimentId> {
    candidates
        .iter()
        .map(|(id, pos)| (*id, pos.distance(cursor)))
        .filter(|(_, distance)| *distance <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// One scatter chart. A click near a rendered point overwrites the shared
/// inspected id; last click wins across both charts.
pub fn render_variant_chart(
    ui: &mut egui::Ui,
    variant_type: VariantType,
    points: &[MetricPoint],
    session: &mut Session,
) {
    ui.vertical(|ui| {
        ui.strong(format!("{variant_type}"));
        let chart_points: Vec<&MetricPoint> = points
            .iter()
            .filter(|p| p.variant_type == variant_type)
            .collect();
        if chart_points.is_empty() {
            ui.weak("No data for the current selection.");
            return;
        }

        // Stable series order so the legend does not jump between frames.
        let mut series: BTreeMap<(Technology, Caller), Vec<[f64; 2]>> = BTreeMap::new();
        for point in &chart_points {
            series
                .entry((point.technology, point.caller))
                .or_default()
                .push([point.recall, point.precision]);
        }

        let plot = Plot::new(format!("{}_chart", variant_type.as_str().to_lowercase()))
            .height(320.0)
            .include_x(0.0)
            .include_x(1.0)
            .include_y(0.0)
            .include_y(1.0)
            .x_axis_label("Recall")
            .y_axis_label("Precision")
            .legend(Legend::default().position(Corner::LeftTop))
            .label_formatter(|name, value: &PlotPoint| {
                if name.is_empty() {
                    format!("recall = {:.4}\nprecision = {:.4}", value.x, value.y)
                } else {
                    format!("{name}\nrecall = {:.4}\nprecision = {:.4}", value.x, value.y)
                }
            });

        let mut clicked_id = None;
        plot.show(ui, |plot_ui| {
            for isoline in &F1_SURFACE.isolines {
                let trace: PlotPoints = isoline.points.clone().into_iter().collect();
                let line = match isoline.emphasis {
                    IsoEmphasis::Coarse => Line::new("", trace)
                        .color(Color32::from_gray(110))
                        .width(1.0),
                    IsoEmphasis::Fine => Line::new("", trace)
                        .color(Color32::from_gray(70))
                        .width(0.5)
                        .style(LineStyle::Dotted { spacing: 4.0 }),
                };
                plot_ui.line(line);
            }

            for ((technology, caller), positions) in &series {
                let marks: PlotPoints = positions.clone().into_iter().collect();
                plot_ui.points(
                    Points::new(format!("{technology} / {caller}"), marks)
                        .color(technology_color(*technology))
                        .shape(caller_marker(*caller))
                        .radius(4.0),
                );
            }

            // Ring around the currently inspected experiment, if charted.
            if let Some(inspected) = session.inspected_id() {
                let ring: Vec<[f64; 2]> = chart_points
                    .iter()
                    .filter(|p| p.experiment_id == inspected)
                    .map(|p| [p.recall, p.precision])
                    .collect();
                if !ring.is_empty() {
                    let marks: PlotPoints = ring.into_iter().collect();
                    plot_ui.points(
                        Points::new("", marks)
                            .color(Color32::WHITE)
                            .shape(MarkerShape::Circle)
                            .filled(false)
                            .radius(7.0),
                    );
                }
            }

            if plot_ui.response().clicked() {
                if let Some(pointer) = plot_ui.pointer_coordinate() {
                    let transform = plot_ui.transform();
                    let cursor = transform.position_from_point(&pointer);
                    let candidates: Vec<(ExperimentId, Pos2)> = chart_points
                        .iter()
                        .map(|p| {
                            (
                                p.experiment_id,
                                transform.position_from_point(&PlotPoint::new(p.recall, p.precision)),
                            )
                        })
                        .collect();
                    clicked_id = nearest_within(&candidates, cursor, CLICK_TOLERANCE_PX);
                }
            }
        });

        if let Some(id) = clicked_id {
            session.record_chart_click(id);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_within_picks_closest_point() {
        let candidates = vec![
            (1, Pos2::new(100.0, 100.0)),
            (2, Pos2::new(104.0, 100.0)),
            (3, Pos2::new(300.0, 300.0)),
        ];
        let hit = nearest_within(&candidates, Pos2::new(103.0, 100.0), 10.0);
        assert_eq!(hit, Some(2));
    }

    #[test]
    fn test_clicks_outside_tolerance_miss() {
        let candidates = vec![(1, Pos2::new(100.0, 100.0))];
        assert_eq!(nearest_within(&candidates, Pos2::new(150.0, 100.0), 10.0), None);
        assert_eq!(nearest_within(&[], Pos2::new(0.0, 0.0), 10.0), None);
    }

    #[test]
    fn test_styling_is_distinct_per_dimension_value() {
        let colors: std::collections::HashSet<_> = Technology::ALL
            .iter()
            .map(|t| technology_color(*t).to_array())
            .collect();
        assert_eq!(colors.len(), Technology::ALL.len());
        let markers: std::collections::HashSet<_> = Caller::ALL
            .iter()
            .map(|c| format!("{:?}", caller_marker(*c)))
            .collect();
        assert_eq!(markers.len(), Caller::ALL.len());
    }
}
