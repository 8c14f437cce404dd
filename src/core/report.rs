use crate::domain::model::{QuoteResult, SimulationOutcome, SimulationRow};
use crate::domain::ports::Storage;
use crate::utils::error::{PricingError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

pub const SUPPORTED_FORMATS: [&str; 3] = ["csv", "tsv", "json"];
pub const PRICED_HEADER: [&str; 4] = ["NP", "FOB", "PVP Maritimo", "PVP Aereo"];
pub const UNRESOLVED_HEADER: [&str; 2] = ["NP", "FOB"];
pub const JSON_REPORT_FILE: &str = "quote_report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(PricingError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    SUPPORTED_FORMATS.join(", ")
                ),
            }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }

    fn delimiter(&self) -> Option<u8> {
        match self {
            OutputFormat::Csv => Some(b','),
            OutputFormat::Tsv => Some(b'\t'),
            OutputFormat::Json => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuoteReport<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: &'a QuoteResult,
}

impl<'a> QuoteReport<'a> {
    pub fn new(result: &'a QuoteResult) -> Self {
        Self {
            generated_at: Utc::now(),
            result,
        }
    }
}

/// 固定輸出表頭，即使沒有資料列
pub fn render_delimited<T: Serialize>(
    rows: &[T],
    header: &[&str],
    delimiter: u8,
) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PricingError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 依格式寫出報表，回傳寫入的檔名
pub async fn write_reports<S: Storage>(
    storage: &S,
    result: &QuoteResult,
    formats: &[OutputFormat],
) -> Result<Vec<String>> {
    let mut written = Vec::new();

    for format in formats {
        let files = match format.delimiter() {
            Some(delimiter) => vec![
                (
                    format!("quotes.{}", format.extension()),
                    render_delimited(&result.priced, &PRICED_HEADER, delimiter)?,
                ),
                (
                    format!("unresolved.{}", format.extension()),
                    render_delimited(&result.unresolved, &UNRESOLVED_HEADER, delimiter)?,
                ),
            ],
            None => vec![(
                JSON_REPORT_FILE.to_string(),
                serde_json::to_string_pretty(&QuoteReport::new(result))?,
            )],
        };

        for (name, content) in files {
            tracing::debug!("Writing {} ({} bytes)", name, content.len());
            storage.write_file(&name, content.as_bytes()).await?;
            written.push(name);
        }
    }

    Ok(written)
}

pub fn priced_text_table(result: &QuoteResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>12} {:>14} {:>12}",
        PRICED_HEADER[0], PRICED_HEADER[1], PRICED_HEADER[2], PRICED_HEADER[3]
    );
    for quote in &result.priced {
        let _ = writeln!(
            out,
            "{:<20} {:>12.2} {:>14} {:>12}",
            quote.identifier, quote.base_cost, quote.sea_price, quote.air_price
        );
    }
    out
}

pub fn simulation_text_table(rows: &[SimulationRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>14} {:>12}",
        "Costo", PRICED_HEADER[2], PRICED_HEADER[3]
    );
    for row in rows {
        match &row.outcome {
            SimulationOutcome::Priced {
                sea_price,
                air_price,
                ..
            } => {
                let _ = writeln!(out, "{:<16} {:>14} {:>12}", row.input, sea_price, air_price);
            }
            SimulationOutcome::NotComputable => {
                let _ = writeln!(out, "{:<16} {:>14} {:>12}", row.input, "no calculable", "-");
            }
        }
    }
    out
}
