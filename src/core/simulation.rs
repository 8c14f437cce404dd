use crate::core::pricing::{markup, round_special, MAX_REMITTANCE_RATE};
use crate::domain::model::{SimulationOutcome, SimulationParams, SimulationRow};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_half_open_range, validate_range, Validate};

pub const MAX_SIMULATION_COSTS: usize = 5;
pub const NOT_FOUND_SENTINEL: &str = "not found";
const MAX_IMPORT_INDEX: f64 = 5.0;

/// 解析自由輸入的成本；空白、哨兵值或無法解析時回傳 None
pub fn parse_cost(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_FOUND_SENTINEL) {
        return None;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value < 0.0 {
                tracing::warn!("Negative cost {} accepted as-is", value);
            }
            Some(value)
        }
        _ => None,
    }
}

impl Validate for SimulationParams {
    fn validate(&self) -> Result<()> {
        validate_range(
            "remittance_rate",
            self.remittance_rate,
            0.0,
            MAX_REMITTANCE_RATE,
        )?;
        validate_half_open_range("margin_rate", self.margin_rate, 0.0, 1.0)?;
        validate_range(
            "import_index_sea",
            self.import_index_sea,
            0.0,
            MAX_IMPORT_INDEX,
        )?;
        validate_range(
            "import_index_air",
            self.import_index_air,
            0.0,
            MAX_IMPORT_INDEX,
        )?;
        if !(self.cost_scale > 0.0 && self.cost_scale.is_finite()) {
            return Err(PricingError::InvalidConfigValueError {
                field: "cost_scale".to_string(),
                value: self.cost_scale.to_string(),
                reason: "Scale must be a positive number".to_string(),
            });
        }
        Ok(())
    }
}

fn simulate_cost(cost: f64, params: &SimulationParams) -> Result<SimulationOutcome> {
    let scaled = cost * params.cost_scale;
    let sea = markup(
        scaled,
        params.remittance_rate,
        params.import_index_sea,
        params.margin_rate,
    )?;
    let air = markup(
        scaled,
        params.remittance_rate,
        params.import_index_air,
        params.margin_rate,
    )?;
    Ok(SimulationOutcome::Priced {
        cost,
        sea_price: round_special(sea)?,
        air_price: round_special(air)?,
    })
}

/// 以使用者指定的參數直接試算成本
pub fn simulate<S: AsRef<str>>(
    costs: &[S],
    params: &SimulationParams,
) -> Result<Vec<SimulationRow>> {
    if costs.len() > MAX_SIMULATION_COSTS {
        return Err(PricingError::InvalidConfigValueError {
            field: "costs".to_string(),
            value: costs.len().to_string(),
            reason: format!("At most {} costs can be simulated", MAX_SIMULATION_COSTS),
        });
    }
    // 即使沒有可試算的成本也要拒絕
    if !(params.margin_rate < 1.0) {
        return Err(PricingError::DegenerateMargin {
            margin: params.margin_rate,
        });
    }

    costs
        .iter()
        .map(|text| -> Result<SimulationRow> {
            let input = text.as_ref().to_string();
            let outcome = match parse_cost(&input) {
                Some(cost) => match simulate_cost(cost, params) {
                    Ok(outcome) => outcome,
                    Err(PricingError::PriceOutOfRange { value }) => {
                        tracing::warn!("Price {} for cost '{}' is out of range", value, input);
                        SimulationOutcome::NotComputable
                    }
                    Err(e) => return Err(e),
                },
                None => {
                    tracing::debug!("Cost '{}' is not computable", input);
                    SimulationOutcome::NotComputable
                }
            };
            Ok(SimulationRow { input, outcome })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cost() {
        assert_eq!(parse_cost("not found"), None);
        assert_eq!(parse_cost("  NOT FOUND "), None);
        assert_eq!(parse_cost(""), None);
        assert_eq!(parse_cost("   "), None);
        assert_eq!(parse_cost("12.5"), Some(12.5));
        assert_eq!(parse_cost(" 7 "), Some(7.0));
        assert_eq!(parse_cost("abc"), None);
        assert_eq!(parse_cost("NaN"), None);
        assert_eq!(parse_cost("inf"), None);
        assert_eq!(parse_cost("-3"), Some(-3.0));
    }

    #[test]
    fn test_simulate_mixed_inputs() {
        let rows = simulate(&["100", "not found", "abc"], &SimulationParams::default()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].outcome,
            SimulationOutcome::Priced {
                cost: 100.0,
                sea_price: 2579,
                air_price: round_special(markup(100.0, 0.65, 0.90, 0.40).unwrap()).unwrap(),
            }
        );
        assert_eq!(rows[1].outcome, SimulationOutcome::NotComputable);
        assert_eq!(rows[2].input, "abc");
        assert_eq!(rows[2].outcome, SimulationOutcome::NotComputable);
    }

    #[test]
    fn test_simulate_applies_scale() {
        let params = SimulationParams {
            import_index_sea: 0.35,
            import_index_air: 0.95,
            cost_scale: 1.3,
            ..SimulationParams::default()
        };
        let rows = simulate(&["100"], &params).unwrap();
        let expected = round_special(markup(130.0, 0.65, 0.35, 0.40).unwrap()).unwrap();
        match &rows[0].outcome {
            SimulationOutcome::Priced { sea_price, cost, .. } => {
                assert_eq!(*sea_price, expected);
                assert_eq!(*cost, 100.0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_simulate_limits() {
        let six = ["1", "2", "3", "4", "5", "6"];
        assert!(simulate(&six, &SimulationParams::default()).is_err());

        let degenerate = SimulationParams {
            margin_rate: 1.0,
            ..SimulationParams::default()
        };
        assert!(matches!(
            simulate(&["10"], &degenerate),
            Err(PricingError::DegenerateMargin { .. })
        ));
        // 沒有任何可試算的成本時同樣中止
        assert!(matches!(
            simulate(&["abc"], &degenerate),
            Err(PricingError::DegenerateMargin { .. })
        ));
        let no_costs: [&str; 0] = [];
        assert!(simulate(&no_costs, &degenerate).is_err());
    }

    #[test]
    fn test_simulate_out_of_range_cost_keeps_other_rows() {
        let rows = simulate(&["1e308", "1e18", "100"], &SimulationParams::default()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].outcome, SimulationOutcome::NotComputable);
        assert_eq!(rows[1].outcome, SimulationOutcome::NotComputable);
        assert!(matches!(
            rows[2].outcome,
            SimulationOutcome::Priced { sea_price: 2579, .. }
        ));
    }

    #[test]
    fn test_simulation_params_validation() {
        assert!(SimulationParams::default().validate().is_ok());

        let bad_scale = SimulationParams {
            cost_scale: 0.0,
            ..SimulationParams::default()
        };
        assert!(bad_scale.validate().is_err());

        let bad_margin = SimulationParams {
            margin_rate: 1.0,
            ..SimulationParams::default()
        };
        assert!(bad_margin.validate().is_err());
    }
}
