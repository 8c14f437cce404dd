use crate::config::toml_config::TomlConfig;
use crate::core::lookup::parse_identifiers;
use crate::core::report::SUPPORTED_FORMATS;
use crate::domain::model::{Origin, PricingParams, PricingRequest};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_formats, validate_location, validate_path, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "pvp-parts")]
#[command(about = "Calculadora PVP Parts: sea and air sale prices for part numbers")]
pub struct CliConfig {
    /// Part numbers, separated by whitespace
    pub parts: Vec<String>,

    /// Read part numbers from a file (whitespace separated)
    #[arg(long)]
    pub parts_file: Option<String>,

    #[arg(long, value_enum, default_value = "nmex")]
    pub origin: Origin,

    /// Remittance tax rate in percent (0-200)
    #[arg(long)]
    pub remittance: Option<f64>,

    /// Gross margin after remittance in percent (0-100, exclusive)
    #[arg(long)]
    pub margin: Option<f64>,

    #[arg(long, env = "URL_NMEX")]
    pub nmex_url: Option<String>,

    #[arg(long, env = "URL_NTE")]
    pub nte_url: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Report formats: csv, tsv, json
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    /// Catalog request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 合併命令列與檔案中的識別碼
    pub fn identifiers(&self) -> Result<Vec<String>> {
        let mut text = self.parts.join(" ");
        if let Some(path) = &self.parts_file {
            let content = std::fs::read_to_string(path)?;
            text.push(' ');
            text.push_str(&content);
        }
        Ok(parse_identifiers(&text))
    }

    pub fn pricing_params(&self, config: &TomlConfig) -> PricingParams {
        let defaults = config.default_params();
        PricingParams {
            remittance_rate: self
                .remittance
                .map(|p| p / 100.0)
                .unwrap_or(defaults.remittance_rate),
            margin_rate: self
                .margin
                .map(|p| p / 100.0)
                .unwrap_or(defaults.margin_rate),
        }
    }

    /// 載入 TOML 設定 (若有) 並套用命令列覆蓋
    pub fn resolve_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(url) = &self.nmex_url {
            config.set_catalog_location(Origin::Nmex, url.clone());
        }
        if let Some(url) = &self.nte_url {
            config.set_catalog_location(Origin::Nte, url.clone());
        }
        if let Some(path) = &self.output_path {
            config.output.output_path = path.clone();
        }
        if !self.formats.is_empty() {
            config.output.formats = self.formats.clone();
        }
        if let Some(timeout) = self.timeout {
            config.source.get_or_insert_with(Default::default).timeout_seconds = Some(timeout);
        }

        Ok(config)
    }

    pub fn pricing_request(&self, config: &TomlConfig) -> Result<PricingRequest> {
        let identifiers = self.identifiers()?;
        if identifiers.is_empty() {
            return Err(PricingError::EmptyRequest);
        }

        Ok(PricingRequest {
            identifiers,
            origin: self.origin,
            params: self.pricing_params(config),
        })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.nmex_url {
            validate_location("--nmex-url", url)?;
        }
        if let Some(url) = &self.nte_url {
            validate_location("--nte-url", url)?;
        }
        if let Some(path) = &self.output_path {
            validate_path("--output-path", path)?;
        }
        validate_formats("--formats", &self.formats, &SUPPORTED_FORMATS)
    }
}
