//! Chart Plotter Module
//! Bar charts and result tables drawn with egui_plot and egui grids.

use crate::data::schema::{
    DAD, FTQ, NUM_INJURED, NUM_KILLED, OTHER_FACTORS, PERIOD, PWR, REGION, SPV, TOTAL_CRASHES,
    TOTAL_VEHICLES,
};
use crate::data::CrashRecord;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Plot};

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

/// How bars are coloured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BarColors {
    /// One colour for every bar.
    Solid(Color32),
    /// Shade from `low` to `high` by bar value.
    Scale { low: Color32, high: Color32 },
    /// Cycle through `PALETTE`.
    Palette,
}

/// Light-to-dark red, for death counts.
pub const REDS: BarColors = BarColors::Scale {
    low: Color32::from_rgb(252, 187, 161),
    high: Color32::from_rgb(165, 15, 21),
};

/// Dark purple to yellow, for region-period deaths.
pub const PLASMA: BarColors = BarColors::Scale {
    low: Color32::from_rgb(13, 8, 135),
    high: Color32::from_rgb(240, 249, 33),
};

/// Column header names of the crash table, in display order.
pub const RECORD_HEADERS: [&str; 11] = [
    REGION,
    PERIOD,
    TOTAL_CRASHES,
    NUM_INJURED,
    NUM_KILLED,
    TOTAL_VEHICLES,
    SPV,
    DAD,
    PWR,
    FTQ,
    OTHER_FACTORS,
];

pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for bar `index` holding `value`, where `max` is the largest value
    /// in the chart.
    pub fn bar_color(colors: BarColors, index: usize, value: f64, max: f64) -> Color32 {
        match colors {
            BarColors::Solid(color) => color,
            BarColors::Palette => PALETTE[index % PALETTE.len()],
            BarColors::Scale { low, high } => {
                let t = if max > 0.0 {
                    (value / max).clamp(0.0, 1.0) as f32
                } else {
                    0.0
                };
                let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
                Color32::from_rgb(
                    mix(low.r(), high.r()),
                    mix(low.g(), high.g()),
                    mix(low.b(), high.b()),
                )
            }
        }
    }

    /// Draw a labelled bar chart. Bars are placed in the given order.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        bars: &[(String, f64)],
        x_title: &str,
        y_title: &str,
        colors: BarColors,
    ) {
        let max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let x_labels: Vec<String> = bars.iter().map(|(label, _)| label.clone()).collect();

        let chart_bars: Vec<Bar> = bars
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                Bar::new(i as f64, *value)
                    .name(label)
                    .width(0.6)
                    .fill(Self::bar_color(colors, i, *value, max))
            })
            .collect();

        Plot::new(format!("bar_{id}"))
            .height(280.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(x_title)
            .y_axis_label(y_title)
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if v < 0.0 || (v - v.round()).abs() > 1e-6 {
                    return String::new();
                }
                x_labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(chart_bars).name(y_title));
            });
    }

    /// Draw a striped table of pre-formatted cells.
    pub fn draw_table(ui: &mut egui::Ui, id: &str, headers: &[&str], rows: &[Vec<String>]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("table_{id}")))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in headers {
                            ui.label(RichText::new(*header).strong().size(12.0));
                        }
                        ui.end_row();

                        for row in rows {
                            for cell in row {
                                ui.label(RichText::new(cell).size(12.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Draw crash records as a scrollable table.
    pub fn draw_records_table(ui: &mut egui::Ui, id: &str, records: &[CrashRecord]) {
        let rows: Vec<Vec<String>> = records.iter().map(Self::record_cells).collect();
        egui::ScrollArea::both()
            .id_salt(format!("records_{id}"))
            .max_height(260.0)
            .show(ui, |ui| {
                Self::draw_table(ui, id, &RECORD_HEADERS, &rows);
            });
    }

    pub fn record_cells(record: &CrashRecord) -> Vec<String> {
        vec![
            record.region.clone(),
            record.period.clone(),
            record.total_crashes.to_string(),
            record.injured.to_string(),
            record.killed.to_string(),
            record.vehicles.to_string(),
            record.speed_violation.to_string(),
            record.under_influence.to_string(),
            record.poor_weather.to_string(),
            record.faulty_vehicle.to_string(),
            record.other_factors.to_string(),
        ]
    }
}

/// Two-decimal rate, or `n/a` when undefined.
pub fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{r:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Two-decimal percentage, or `n/a` when undefined.
pub fn format_percent(pct: Option<f64>) -> String {
    pct.map(|p| format!("{p:.2}%"))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_values_render_as_na() {
        assert_eq!(format_rate(None), "n/a");
        assert_eq!(format_percent(None), "n/a");
        assert_eq!(format_rate(Some(0.6384)), "0.64");
        assert_eq!(format_percent(Some(34.6789)), "34.68%");
    }

    #[test]
    fn scale_runs_from_low_to_high() {
        let low = Color32::from_rgb(0, 0, 0);
        let high = Color32::from_rgb(200, 100, 50);
        let scale = BarColors::Scale { low, high };

        assert_eq!(ChartPlotter::bar_color(scale, 0, 0.0, 10.0), low);
        assert_eq!(ChartPlotter::bar_color(scale, 0, 10.0, 10.0), high);
        assert_eq!(
            ChartPlotter::bar_color(scale, 0, 5.0, 10.0),
            Color32::from_rgb(100, 50, 25)
        );
        assert_eq!(ChartPlotter::bar_color(scale, 0, 3.0, 0.0), low);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(
            ChartPlotter::bar_color(BarColors::Palette, PALETTE.len() + 2, 1.0, 1.0),
            PALETTE[2]
        );
    }

    #[test]
    fn record_cells_follow_headers() {
        let record = CrashRecord {
            region: "Lagos".into(),
            period: "Q1 2020".into(),
            total_crashes: 40,
            faulty_vehicle: 4,
            ..CrashRecord::default()
        };
        let cells = ChartPlotter::record_cells(&record);
        assert_eq!(cells.len(), RECORD_HEADERS.len());
        assert_eq!(cells[0], "Lagos");
        assert_eq!(cells[2], "40");
        assert_eq!(cells[9], "4");
    }
}
