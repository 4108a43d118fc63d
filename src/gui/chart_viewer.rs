//! Chart Viewer Widget
//! Central scrollable area: KPIs, the raw and filtered tables, and one
//! section per analytical question.

use crate::charts::{format_percent, format_rate, BarColors, ChartPlotter, BAR_COLOR, PLASMA, REDS};
use crate::data::CrashRecord;
use crate::stats::{AggregateReport, GroupTotal, KpiSet};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;

/// Everything derived from the full dataset. Computed once per load.
#[derive(Debug, Clone)]
pub struct Insights {
    pub kpis: KpiSet,
    pub report: AggregateReport,
}

/// Scrollable dashboard body.
#[derive(Default)]
pub struct ChartViewer {
    pub dataset_rows: Vec<CrashRecord>,
    pub filtered_rows: Vec<CrashRecord>,
    pub insights: Option<Insights>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.dataset_rows.clear();
        self.filtered_rows.clear();
        self.insights = None;
    }

    pub fn set_dataset(&mut self, rows: Vec<CrashRecord>, insights: Insights) {
        self.dataset_rows = rows;
        self.insights = Some(insights);
    }

    pub fn set_filtered(&mut self, rows: Vec<CrashRecord>) {
        self.filtered_rows = rows;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(insights) = &self.insights else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("Road Traffic Crash Analysis").size(26.0));
                ui.add_space(10.0);

                egui::CollapsingHeader::new(format!(
                    "Full dataset ({} rows)",
                    self.dataset_rows.len()
                ))
                .default_open(true)
                .show(ui, |ui| {
                    ChartPlotter::draw_records_table(ui, "dataset", &self.dataset_rows);
                });
                ui.add_space(SECTION_SPACING);

                Self::draw_kpis(ui, &insights.kpis);
                ui.add_space(SECTION_SPACING);

                ui.label(
                    RichText::new(format!(
                        "Filtered records: {}",
                        self.filtered_rows.len()
                    ))
                    .size(16.0)
                    .strong(),
                );
                if self.filtered_rows.is_empty() {
                    ui.label(
                        RichText::new("No records match the current filters.")
                            .color(Color32::GRAY),
                    );
                } else {
                    ChartPlotter::draw_records_table(ui, "filtered", &self.filtered_rows);
                }
                ui.add_space(SECTION_SPACING);

                Self::draw_report(ui, &insights.report);
            });
    }

    fn draw_kpis(ui: &mut egui::Ui, kpis: &KpiSet) {
        let metrics = [
            ("Total Crashes", kpis.total_crashes.to_string()),
            ("Injury Rate", format_rate(kpis.injury_rate)),
            ("Fatality Rate", format_rate(kpis.fatality_rate)),
            ("Speed Violation Rate", format_percent(kpis.speed_violation_rate)),
            (
                "Driving Under Influence Rate",
                format_percent(kpis.under_influence_rate),
            ),
            ("Total Deaths", kpis.total_deaths.to_string()),
        ];

        egui::Grid::new("kpis")
            .num_columns(3)
            .spacing([40.0, 12.0])
            .show(ui, |ui| {
                for (i, (label, value)) in metrics.iter().enumerate() {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(*label).size(12.0).color(Color32::GRAY));
                        ui.label(RichText::new(value).size(24.0).strong());
                    });
                    if i % 3 == 2 {
                        ui.end_row();
                    }
                }
            });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.separator();
        ui.add_space(6.0);
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(6.0);
    }

    fn draw_report(ui: &mut egui::Ui, report: &AggregateReport) {
        // 1. deadliest single quarters
        Self::section(
            ui,
            "1. State with the highest number of fatalities in a single quarter",
        );
        let rows: Vec<Vec<String>> = report
            .fatal_region_periods
            .iter()
            .map(|r| vec![r.region.clone(), r.period.clone(), r.value.to_string()])
            .collect();
        ChartPlotter::draw_table(ui, "fatal_pairs", &["State", "Quarter", "Num_Killed"], &rows);
        let bars: Vec<(String, f64)> = report
            .fatal_region_periods
            .iter()
            .map(|r| (format!("{} {}", r.region, r.period), r.value as f64))
            .collect();
        ChartPlotter::draw_bar_chart(ui, "fatal_pairs", &bars, "State", "Num_Killed", PLASMA);
        ui.add_space(SECTION_SPACING);

        // 2. deadliest states
        Self::section(ui, "2. State with the Highest Death");
        Self::draw_group_totals(
            ui,
            "deaths",
            &report.deadliest_regions,
            ["State", "Num_Killed"],
            REDS,
        );

        // 3. most crashes
        Self::section(
            ui,
            "3. Which state recorded the highest number of crashes during the entire period?",
        );
        Self::draw_group_totals(
            ui,
            "crashes",
            &report.crash_regions,
            ["State", "Total Crashes"],
            BarColors::Solid(BAR_COLOR),
        );

        // 4. causes
        Self::section(ui, "4. What is the main reason for crashes?");
        if let Some(main) = report.causes.main_reason() {
            ui.label(
                RichText::new(format!("Main reason: {} ({} crashes)", main.cause, main.count))
                    .size(14.0),
            );
        }
        let rows: Vec<Vec<String>> = report
            .causes
            .top_reasons()
            .iter()
            .map(|c| vec![c.cause.column().to_string(), c.cause.to_string(), c.count.to_string()])
            .collect();
        ChartPlotter::draw_table(ui, "causes", &["Reason", "Description", "Count"], &rows);
        let bars: Vec<(String, f64)> = report
            .causes
            .ranked
            .iter()
            .map(|c| (c.cause.column().to_string(), c.count as f64))
            .collect();
        ChartPlotter::draw_bar_chart(
            ui,
            "causes",
            &bars,
            "Reason for Crash",
            "Number of Crashes",
            BarColors::Palette,
        );
        ui.add_space(SECTION_SPACING);

        // 5. quarters
        Self::section(ui, "5. Which quarter has the highest number of crashes?");
        Self::draw_group_totals(
            ui,
            "periods",
            &report.crashes_by_period,
            ["Quarter", "Total Crashes"],
            BarColors::Solid(BAR_COLOR),
        );

        // 6. vehicle safety
        Self::section(ui, "6. How safe are vehicles on the road?");
        let share = &report.vehicle_fault;
        let rows: Vec<Vec<String>> = share
            .rows()
            .iter()
            .map(|r| {
                vec![
                    r.category.to_string(),
                    r.count.to_string(),
                    format_percent(r.percentage),
                ]
            })
            .collect();
        ChartPlotter::draw_table(ui, "vehicle_fault", &["Category", "Count", "Percentage"], &rows);
        let bars: Vec<(String, f64)> = share
            .rows()
            .iter()
            .map(|r| (r.category.to_string(), r.count as f64))
            .collect();
        ChartPlotter::draw_bar_chart(
            ui,
            "vehicle_fault",
            &bars,
            "Cause",
            "Number of Crashes",
            BarColors::Palette,
        );
        ui.add_space(SECTION_SPACING);
    }

    fn draw_group_totals(
        ui: &mut egui::Ui,
        id: &str,
        totals: &[GroupTotal],
        headers: [&str; 2],
        colors: BarColors,
    ) {
        let rows: Vec<Vec<String>> = totals
            .iter()
            .map(|t| vec![t.label.clone(), t.value.to_string()])
            .collect();
        ChartPlotter::draw_table(ui, id, &headers, &rows);

        let bars: Vec<(String, f64)> = totals
            .iter()
            .map(|t| (t.label.clone(), t.value as f64))
            .collect();
        ChartPlotter::draw_bar_chart(ui, id, &bars, headers[0], headers[1], colors);
        ui.add_space(SECTION_SPACING);
    }
}
