//! Control Panel Widget
//! Left side panel with the data source and all filter controls.

use crate::data::schema::{NUM_INJURED, NUM_KILLED, TOTAL_CRASHES, TOTAL_VEHICLES};
use crate::data::{CauseCategory, CountBounds, Dataset, FilterCriteria};
use egui::{Color32, ComboBox, RichText};
use polars::prelude::PolarsResult;
use std::path::PathBuf;

/// Slider maxima, taken from the loaded dataset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SliderLimits {
    pub injured: i64,
    pub killed: i64,
    pub crashes: i64,
    pub vehicles: i64,
}

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub data_path: Option<PathBuf>,
    pub regions: Vec<String>,
    pub periods: Vec<String>,
    pub limits: SliderLimits,
    /// `None` until a dataset is loaded.
    pub criteria: Option<FilterCriteria>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            data_path: None,
            regions: Vec::new(),
            periods: Vec::new(),
            limits: SliderLimits::default(),
            criteria: None,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the selectors from a freshly loaded dataset and reset the
    /// criteria to their defaults.
    pub fn update_dataset(&mut self, dataset: &Dataset) -> PolarsResult<()> {
        self.regions = dataset.regions()?;
        self.periods = dataset.periods()?;
        self.limits = SliderLimits {
            injured: dataset.column_max(NUM_INJURED)?,
            killed: dataset.column_max(NUM_KILLED)?,
            crashes: dataset.column_max(TOTAL_CRASHES)?,
            vehicles: dataset.column_max(TOTAL_VEHICLES)?,
        };
        self.criteria = Some(FilterCriteria::for_dataset(dataset)?);
        Ok(())
    }

    /// Drop selectors and criteria after a failed load.
    pub fn clear_dataset(&mut self) {
        self.regions.clear();
        self.periods.clear();
        self.limits = SliderLimits::default();
        self.criteria = None;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚦 Crashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Road Traffic Crash Analysis")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .data_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    ui.label(RichText::new(path_text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if self.data_path.is_some() && ui.button("⟳ Reload").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(8.0);
        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters =====
        let Some(criteria) = self.criteria.as_mut() else {
            ui.label(RichText::new("Load a dataset to filter it.").color(Color32::GRAY));
            return action;
        };
        let before = criteria.clone();

        ui.label(RichText::new("🔎 Filters").size(14.0).strong());
        ui.add_space(8.0);

        Self::selector(ui, "Select State", "region", &self.regions, &mut criteria.region);
        ui.add_space(5.0);
        Self::selector(ui, "Selected Quarter", "period", &self.periods, &mut criteria.period);
        ui.add_space(10.0);

        let limits = self.limits;
        Self::bounds_sliders(ui, "Number Injured", &mut criteria.injured, limits.injured);
        Self::bounds_sliders(ui, "Number Killed", &mut criteria.killed, limits.killed);
        Self::bounds_sliders(ui, "Total Crashes", &mut criteria.crashes, limits.crashes);
        Self::bounds_sliders(ui, "Vehicles Involved", &mut criteria.vehicles, limits.vehicles);

        ui.add_space(10.0);
        ui.label(RichText::new("Select Accident Cause").strong());
        for cause in CauseCategory::ALL {
            let mut selected = criteria.is_cause_selected(cause);
            if ui.checkbox(&mut selected, cause.label()).changed() {
                criteria.set_cause(cause, selected);
            }
        }

        ui.add_space(8.0);
        if ui.small_button("Reset Filters").clicked() {
            action = ControlPanelAction::ResetFilters;
        } else if *criteria != before {
            action = ControlPanelAction::CriteriaChanged;
        }

        action
    }

    fn selector(ui: &mut egui::Ui, label: &str, id: &str, options: &[String], value: &mut String) {
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new(label));
            ComboBox::from_id_salt(id)
                .width(150.0)
                .selected_text(value.as_str())
                .show_ui(ui, |ui| {
                    for option in options {
                        ui.selectable_value(value, option.clone(), option.as_str());
                    }
                });
        });
    }

    fn bounds_sliders(ui: &mut egui::Ui, label: &str, bounds: &mut CountBounds, limit: i64) {
        ui.label(label);
        ui.add(egui::Slider::new(&mut bounds.min, 0..=limit).text("Minimum"));
        ui.add(egui::Slider::new(&mut bounds.max, 0..=limit).text("Maximum"));
        ui.add_space(4.0);
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    CriteriaChanged,
    ResetFilters,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_dataset;

    #[test]
    fn update_dataset_fills_selectors_and_limits() {
        let mut panel = ControlPanel::new();
        panel.update_dataset(&sample_dataset()).unwrap();

        assert_eq!(panel.regions, vec!["Lagos", "Kano", "Oyo"]);
        assert_eq!(panel.periods, vec!["Q1 2020", "Q2 2020"]);
        assert_eq!(
            panel.limits,
            SliderLimits {
                injured: 30,
                killed: 12,
                crashes: 40,
                vehicles: 55,
            }
        );
        let criteria = panel.criteria.as_ref().unwrap();
        assert_eq!(criteria.killed, CountBounds::up_to(12));
    }

    #[test]
    fn clear_dataset_drops_criteria() {
        let mut panel = ControlPanel::new();
        panel.update_dataset(&sample_dataset()).unwrap();
        panel.clear_dataset();

        assert!(panel.regions.is_empty());
        assert!(panel.periods.is_empty());
        assert_eq!(panel.limits, SliderLimits::default());
        assert!(panel.criteria.is_none());
        assert_eq!(panel.status, "Ready");
    }
}
