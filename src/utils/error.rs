use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Catalog request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Catalog for origin {origin} is unavailable (HTTP {status})")]
    CatalogUnavailable { origin: String, status: u16 },

    #[error("Catalog is missing column '{column}'")]
    MissingColumn { column: String },

    #[error("No part numbers were provided")]
    EmptyRequest,

    #[error("Margin rate {margin} leaves no room for a price (must be below 1)")]
    DegenerateMargin { margin: f64 },

    #[error("Computed price {value} is outside the representable range")]
    PriceOutOfRange { value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Network,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PricingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PricingError::EmptyRequest | PricingError::DegenerateMargin { .. } => {
                ErrorCategory::Input
            }
            PricingError::ConfigValidationError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PricingError::ApiError(_) | PricingError::CatalogUnavailable { .. } => {
                ErrorCategory::Network
            }
            PricingError::CsvError(_)
            | PricingError::MissingColumn { .. }
            | PricingError::PriceOutOfRange { .. } => ErrorCategory::Data,
            PricingError::IoError(_) | PricingError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PricingError::EmptyRequest => "請輸入以空白分隔的 PART NUMBER",
            PricingError::DegenerateMargin { .. } => "毛利率必須小於 100%",
            PricingError::ConfigValidationError { .. } => "請檢查 TOML 設定檔格式",
            PricingError::InvalidConfigValueError { .. } => "請修正參數值後重試",
            PricingError::MissingConfigError { .. } => {
                "請設定目錄來源 (--nmex-url / --nte-url 或 URL_NMEX / URL_NTE)"
            }
            PricingError::CatalogUnavailable { .. } | PricingError::ApiError(_) => {
                "請確認網路連線與目錄 URL，稍後重試"
            }
            PricingError::MissingColumn { .. } | PricingError::CsvError(_) => {
                "請確認目錄 CSV 欄位名稱 (identifier_column / cost_column)"
            }
            PricingError::PriceOutOfRange { .. } => "請確認成本數值是否正確",
            PricingError::IoError(_) => "請確認檔案路徑與寫入權限",
            PricingError::SerializationError(_) => "請回報此問題",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PricingError::EmptyRequest => "No has ingresado ningún PART NUMBER.".to_string(),
            PricingError::DegenerateMargin { margin } => {
                format!("Margin of {:.2}% cannot be applied", margin * 100.0)
            }
            PricingError::CatalogUnavailable { origin, .. } => {
                format!("Could not load the {} catalog", origin)
            }
            other => other.to_string(),
        }
    }

    /// 依嚴重程度對應的程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert_eq!(PricingError::EmptyRequest.category(), ErrorCategory::Input);
        assert_eq!(PricingError::EmptyRequest.exit_code(), 1);

        let unavailable = PricingError::CatalogUnavailable {
            origin: "NTE".to_string(),
            status: 503,
        };
        assert_eq!(unavailable.severity(), ErrorSeverity::Medium);
        assert_eq!(unavailable.exit_code(), 2);

        let io = PricingError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.exit_code(), 3);
    }

    #[test]
    fn test_degenerate_margin_message() {
        let err = PricingError::DegenerateMargin { margin: 1.0 };
        assert!(err.user_friendly_message().contains("100.00%"));
    }

    #[test]
    fn test_price_out_of_range_is_data_error() {
        let err = PricingError::PriceOutOfRange { value: 1e19 };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.exit_code(), 1);
    }
}
