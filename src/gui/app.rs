//! Crashboard Main Application
//! Main window with control panel and chart viewer.

use crate::config::Config;
use crate::data::{filter, CrashTable, DataLoader, Dataset, FilterCriteria};
use crate::gui::chart_viewer::Insights;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::{Aggregator, StatsCalculator};
use anyhow::Context as _;
use egui::SidePanel;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main application window.
pub struct DashboardApp {
    loader: DataLoader,
    dataset: Option<Dataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &Config) -> Self {
        Self::with_data(&config.data.path)
    }

    /// Build the app and try to open `path`. A failed load leaves the app
    /// running with the error in the status line.
    pub fn with_data(path: &Path) -> Self {
        let mut app = Self {
            loader: DataLoader::new(),
            dataset: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.open(path.to_path_buf());
        app
    }

    /// Load `path` and rebuild every view from it.
    fn open(&mut self, path: PathBuf) {
        self.control_panel.data_path = Some(path.clone());

        let result = self
            .loader
            .load(&path)
            .map_err(anyhow::Error::from)
            .and_then(|dataset| self.show_dataset(dataset));

        match result {
            Ok(()) => {
                let rows = self.dataset.as_ref().map_or(0, |d| d.height());
                self.control_panel
                    .set_status(&format!("Loaded {rows} rows"));
            }
            Err(e) => {
                warn!("could not open {}: {e:#}", path.display());
                self.dataset = None;
                self.control_panel.clear_dataset();
                self.chart_viewer.clear();
                self.control_panel.set_status(&format!("Error: {e:#}"));
            }
        }
    }

    fn show_dataset(&mut self, dataset: Dataset) -> anyhow::Result<()> {
        let insights = Insights {
            kpis: StatsCalculator::compute_kpis(&dataset).context("computing KPIs")?,
            report: Aggregator::report(&dataset).context("computing aggregates")?,
        };
        self.control_panel
            .update_dataset(&dataset)
            .context("reading selector values")?;
        self.chart_viewer.set_dataset(dataset.records()?, insights);
        self.dataset = Some(dataset);
        self.refresh_filter();
        Ok(())
    }

    /// Recompute the filtered view from the current criteria.
    fn refresh_filter(&mut self) {
        let (Some(dataset), Some(criteria)) = (&self.dataset, &self.control_panel.criteria) else {
            return;
        };

        match filter(dataset, criteria).and_then(|view| Ok(view.records()?)) {
            Ok(rows) => {
                debug!(rows = rows.len(), "filtered view refreshed");
                self.chart_viewer.set_filtered(rows);
            }
            Err(e) => {
                self.chart_viewer.set_filtered(Vec::new());
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    fn reset_filters(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match FilterCriteria::for_dataset(dataset) {
            Ok(criteria) => self.control_panel.criteria = Some(criteria),
            Err(e) => self.control_panel.set_status(&format!("Error: {e}")),
        }
        self.refresh_filter();
    }

    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.open(path);
        }
    }

    fn handle_reload(&mut self) {
        if let Some(path) = self.control_panel.data_path.clone() {
            self.open(path);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::CriteriaChanged => self.refresh_filter(),
                        ControlPanelAction::ResetFilters => self.reset_filters(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
