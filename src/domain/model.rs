use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const DEFAULT_REMITTANCE_PERCENT: f64 = 65.0;
pub const DEFAULT_MARGIN_PERCENT: f64 = 40.0;

/// 報價使用的供應商目錄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// 主要目錄 (A)
    Nmex,
    /// 次要目錄 (B)，成本先乘以 1.3
    Nte,
}

impl Origin {
    pub fn label(&self) -> &'static str {
        match self {
            Origin::Nmex => "NMEX",
            Origin::Nte => "NTE",
        }
    }

    pub fn default_cost_column(&self) -> &'static str {
        match self {
            Origin::Nmex => "FOB_NMEX",
            Origin::Nte => "FOB_NTE",
        }
    }

    pub fn location_env_var(&self) -> &'static str {
        match self {
            Origin::Nmex => "URL_NMEX",
            Origin::Nte => "URL_NTE",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Sea,
    Air,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub identifier: String,
    pub base_cost: Option<f64>,
}

/// 單一來源的目錄快照，識別碼重複時保留第一筆
#[derive(Debug, Clone)]
pub struct Catalog {
    origin: Origin,
    records: Vec<PartRecord>,
}

impl Catalog {
    pub fn new(origin: Origin, rows: impl IntoIterator<Item = PartRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut duplicates = 0usize;

        for row in rows {
            if seen.insert(row.identifier.clone()) {
                records.push(row);
            } else {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            tracing::debug!(
                "Dropped {} duplicate rows from {} catalog (first row wins)",
                duplicates,
                origin
            );
        }

        Self { origin, records }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn records(&self) -> &[PartRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.records.iter().any(|r| r.identifier == identifier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingParams {
    pub remittance_rate: f64,
    pub margin_rate: f64,
}

impl PricingParams {
    /// 以百分比建立 (65 -> 0.65)
    pub fn from_percent(remittance_percent: f64, margin_percent: f64) -> Self {
        Self {
            remittance_rate: remittance_percent / 100.0,
            margin_rate: margin_percent / 100.0,
        }
    }
}

impl Default for PricingParams {
    fn default() -> Self {
        Self::from_percent(DEFAULT_REMITTANCE_PERCENT, DEFAULT_MARGIN_PERCENT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingRequest {
    pub identifiers: Vec<String>,
    pub origin: Origin,
    pub params: PricingParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(rename = "NP")]
    pub identifier: String,
    #[serde(rename = "FOB")]
    pub base_cost: f64,
    #[serde(rename = "PVP Maritimo")]
    pub sea_price: i64,
    #[serde(rename = "PVP Aereo")]
    pub air_price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedEntry {
    #[serde(rename = "NP")]
    pub identifier: String,
    #[serde(rename = "FOB")]
    pub base_cost: f64,
}

impl UnresolvedEntry {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            base_cost: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteResult {
    pub origin: Origin,
    pub params: PricingParams,
    pub priced: Vec<PriceQuote>,
    pub unresolved: Vec<UnresolvedEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteOutcome {
    pub result: QuoteResult,
    pub output_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub remittance_rate: f64,
    pub margin_rate: f64,
    pub import_index_sea: f64,
    pub import_index_air: f64,
    pub cost_scale: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            remittance_rate: 0.65,
            margin_rate: 0.40,
            import_index_sea: 0.20,
            import_index_air: 0.90,
            cost_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SimulationOutcome {
    Priced {
        cost: f64,
        sea_price: i64,
        air_price: i64,
    },
    NotComputable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRow {
    pub input: String,
    pub outcome: SimulationOutcome,
}
