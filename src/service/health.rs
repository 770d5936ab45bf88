use crate::state::StateView;
use crate::storage::DatasetFileInfo;
use serde::Serialize;
use std::time::Duration;

/// Format of the dataset creation timestamp
const CREATION_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Liveness report served by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub api_status: &'static str,
    pub uptime_seconds: f64,
    pub scraping_status: String,
    pub books_scraped: Option<usize>,
    pub csv_file_size_mb: Option<f64>,
    pub csv_creation_date: Option<String>,
}

impl HealthReport {
    pub fn collect(uptime: Duration, view: &StateView, file: Option<DatasetFileInfo>) -> Self {
        let books_scraped = (view.discovered > 0).then_some(view.discovered);
        let csv_file_size_mb = file
            .as_ref()
            .map(|f| round_to(f.size_bytes as f64 / (1024.0 * 1024.0), 3));
        let csv_creation_date = file
            .and_then(|f| f.created_at)
            .map(|t| t.format(CREATION_DATE_FORMAT).to_string());

        Self {
            api_status: "online",
            uptime_seconds: round_to(uptime.as_secs_f64(), 2),
            scraping_status: view.message(),
            books_scraped,
            csv_file_size_mb,
            csv_creation_date,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
