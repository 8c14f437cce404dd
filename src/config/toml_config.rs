use crate::core::report::SUPPORTED_FORMATS;
use crate::core::ConfigProvider;
use crate::domain::model::{
    Origin, PricingParams, DEFAULT_MARGIN_PERCENT, DEFAULT_REMITTANCE_PERCENT,
};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{
    validate_formats, validate_location, validate_path, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_IDENTIFIER_COLUMN: &str = "NP";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub catalogs: CatalogsConfig,
    pub pricing: Option<PricingSettings>,
    #[serde(default)]
    pub output: OutputConfig,
    pub source: Option<SourceConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogsConfig {
    pub nmex: Option<CatalogConfig>,
    pub nte: Option<CatalogConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub location: String,
    pub identifier_column: Option<String>,
    pub cost_column: Option<String>,
}

impl CatalogConfig {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            identifier_column: None,
            cost_column: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingSettings {
    pub remittance_percent: Option<f64>,
    pub margin_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            formats: default_formats(),
        }
    }
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PricingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PricingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${URL_NMEX})，未設定者保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PricingError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn catalog(&self, origin: Origin) -> Option<&CatalogConfig> {
        match origin {
            Origin::Nmex => self.catalogs.nmex.as_ref(),
            Origin::Nte => self.catalogs.nte.as_ref(),
        }
    }

    pub fn set_catalog_location(&mut self, origin: Origin, location: String) {
        let slot = match origin {
            Origin::Nmex => &mut self.catalogs.nmex,
            Origin::Nte => &mut self.catalogs.nte,
        };
        slot.get_or_insert_with(|| CatalogConfig::new(String::new()))
            .location = location;
    }

    /// 命令列未指定時使用的報價參數
    pub fn default_params(&self) -> PricingParams {
        let settings = self.pricing.clone().unwrap_or_default();
        PricingParams::from_percent(
            settings
                .remittance_percent
                .unwrap_or(DEFAULT_REMITTANCE_PERCENT),
            settings.margin_percent.unwrap_or(DEFAULT_MARGIN_PERCENT),
        )
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        for origin in [Origin::Nmex, Origin::Nte] {
            if let Some(catalog) = self.catalog(origin) {
                let field = format!("catalogs.{}.location", origin.label().to_lowercase());
                if catalog.location.contains("${") {
                    return Err(PricingError::MissingConfigError {
                        field: format!("{} (set {})", field, origin.location_env_var()),
                    });
                }
                validate_location(&field, &catalog.location)?;
            }
        }

        validate_path("output.output_path", &self.output.output_path)?;
        validate_formats("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;

        if self.pricing.is_some() {
            self.default_params().validate()?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn catalog_source(&self, origin: Origin) -> Result<CatalogSource> {
        let field = format!("catalogs.{}.location", origin.label().to_lowercase());
        let slot = match origin {
            Origin::Nmex => &self.catalogs.nmex,
            Origin::Nte => &self.catalogs.nte,
        };
        let catalog = validate_required_field(&field, slot)?;

        Ok(CatalogSource {
            location: catalog.location.clone(),
            identifier_column: catalog
                .identifier_column
                .clone()
                .unwrap_or_else(|| DEFAULT_IDENTIFIER_COLUMN.to_string()),
            cost_column: catalog
                .cost_column
                .clone()
                .unwrap_or_else(|| origin.default_cost_column().to_string()),
        })
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn request_timeout_secs(&self) -> Option<u64> {
        self.source.as_ref().and_then(|s| s.timeout_seconds)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[catalogs.nmex]
location = "https://example.com/nmex.csv"

[catalogs.nte]
location = "./data/nte.csv"
identifier_column = "PART"
cost_column = "COSTO"

[pricing]
remittance_percent = 80.0
margin_percent = 35.0

[output]
output_path = "./quotes"
formats = ["csv", "json"]

[source]
timeout_seconds = 15
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());

        let nmex = config.catalog_source(Origin::Nmex).unwrap();
        assert_eq!(nmex.identifier_column, "NP");
        assert_eq!(nmex.cost_column, "FOB_NMEX");

        let nte = config.catalog_source(Origin::Nte).unwrap();
        assert_eq!(nte.location, "./data/nte.csv");
        assert_eq!(nte.cost_column, "COSTO");

        assert_eq!(config.output_path(), "./quotes");
        assert_eq!(config.output_formats(), &["csv".to_string(), "json".to_string()]);
        assert_eq!(config.request_timeout_secs(), Some(15));

        let params = config.default_params();
        assert!((params.remittance_rate - 0.80).abs() < 1e-12);
        assert!((params.margin_rate - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
        assert_eq!(config.output_formats(), &["csv".to_string()]);
        assert_eq!(config.default_params(), PricingParams::default());
        assert!(matches!(
            config.catalog_source(Origin::Nte),
            Err(PricingError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PVP_TEST_NTE_URL", "https://catalogs.example.com/nte.csv");

        let toml_content = r#"
[catalogs.nte]
location = "${PVP_TEST_NTE_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.catalog_source(Origin::Nte).unwrap().location,
            "https://catalogs.example.com/nte.csv"
        );

        std::env::remove_var("PVP_TEST_NTE_URL");
    }

    #[test]
    fn test_unresolved_placeholder_fails_validation() {
        let toml_content = r#"
[catalogs.nmex]
location = "${PVP_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PricingError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let bad_format = r#"
[output]
formats = ["xlsx"]
"#;
        assert!(TomlConfig::from_toml_str(bad_format)
            .unwrap()
            .validate()
            .is_err());

        let bad_margin = r#"
[pricing]
margin_percent = 100.0
"#;
        assert!(TomlConfig::from_toml_str(bad_margin)
            .unwrap()
            .validate()
            .is_err());

        let bad_url = r#"
[catalogs.nmex]
location = "https://"
"#;
        assert!(TomlConfig::from_toml_str(bad_url)
            .unwrap()
            .validate()
            .is_err());
    }

    #[test]
    fn test_set_catalog_location() {
        let mut config = TomlConfig::default();
        config.set_catalog_location(Origin::Nmex, "./nmex.csv".to_string());
        assert_eq!(config.catalog_source(Origin::Nmex).unwrap().location, "./nmex.csv");

        config.set_catalog_location(Origin::Nmex, "./other.csv".to_string());
        assert_eq!(config.catalog_source(Origin::Nmex).unwrap().location, "./other.csv");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[catalogs.nmex]
location = "https://example.com/nmex.csv"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert!(config.catalog(Origin::Nmex).is_some());
        assert!(config.catalog(Origin::Nte).is_none());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[catalogs.nmex\nlocation ="),
            Err(PricingError::ConfigValidationError { .. })
        ));
    }
}
