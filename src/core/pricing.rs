use crate::domain::model::{Channel, Origin, PricingParams};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_half_open_range, validate_range, Validate};

/// 匯款稅中實際轉嫁的比例
pub const REMITTANCE_PASS_THROUGH: f64 = 0.85;
/// 成本換算匯率
pub const EXCHANGE_RATE: f64 = 6.96;
/// 扣除稅負後的淨收入比例
pub const NET_REVENUE_FACTOR: f64 = 0.84;

pub const MAX_REMITTANCE_RATE: f64 = 2.0;

/// 依來源而異的成本倍率與進口指數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginProfile {
    pub cost_scale: f64,
    pub import_index_sea: f64,
    pub import_index_air: f64,
}

impl OriginProfile {
    pub fn for_origin(origin: Origin) -> Self {
        match origin {
            Origin::Nmex => Self {
                cost_scale: 1.0,
                import_index_sea: 0.20,
                import_index_air: 0.90,
            },
            Origin::Nte => Self {
                cost_scale: 1.3,
                import_index_sea: 0.35,
                import_index_air: 0.95,
            },
        }
    }

    pub fn import_index(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Sea => self.import_index_sea,
            Channel::Air => self.import_index_air,
        }
    }

    pub fn effective_cost(&self, base_cost: f64) -> f64 {
        base_cost * self.cost_scale
    }
}

/// PVP = (1 + 0.85·R) · (F · 6.96 · (1 + I)) / (0.84 · (1 − M))
pub fn markup(cost: f64, remittance_rate: f64, import_index: f64, margin_rate: f64) -> Result<f64> {
    if !(margin_rate < 1.0) {
        return Err(PricingError::DegenerateMargin {
            margin: margin_rate,
        });
    }

    let landed = cost * EXCHANGE_RATE * (1.0 + import_index);
    let price = (1.0 + REMITTANCE_PASS_THROUGH * remittance_rate) * landed
        / (NET_REVENUE_FACTOR * (1.0 - margin_rate));

    if !price.is_finite() {
        return Err(PricingError::PriceOutOfRange { value: price });
    }

    Ok(price)
}

/// 心理價位：小於 1 固定為 9，否則捨去到十位數再加 9。
/// 超出 i64 範圍的價格回傳 `PriceOutOfRange`
pub fn round_special(value: f64) -> Result<i64> {
    if value < 1.0 {
        return Ok(9);
    }
    let floored = (value - value % 10.0).floor();
    // i64::MAX as f64 == 2^63，嚴格小於才能安全轉型
    if !(floored < i64::MAX as f64) {
        return Err(PricingError::PriceOutOfRange { value });
    }
    (floored as i64)
        .checked_add(9)
        .ok_or(PricingError::PriceOutOfRange { value })
}

/// 計算海運與空運兩種報價 (已四捨成心理價位)
pub fn channel_prices(
    base_cost: f64,
    profile: &OriginProfile,
    remittance_rate: f64,
    margin_rate: f64,
) -> Result<(i64, i64)> {
    let cost = profile.effective_cost(base_cost);
    let sea = markup(
        cost,
        remittance_rate,
        profile.import_index(Channel::Sea),
        margin_rate,
    )?;
    let air = markup(
        cost,
        remittance_rate,
        profile.import_index(Channel::Air),
        margin_rate,
    )?;
    Ok((round_special(sea)?, round_special(air)?))
}

impl Validate for PricingParams {
    fn validate(&self) -> Result<()> {
        validate_range(
            "remittance_rate",
            self.remittance_rate,
            0.0,
            MAX_REMITTANCE_RATE,
        )?;
        validate_half_open_range("margin_rate", self.margin_rate, 0.0, 1.0)
    }
}
