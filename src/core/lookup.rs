use crate::core::pricing::{channel_prices, OriginProfile};
use crate::domain::model::{
    Catalog, PartRecord, PriceQuote, PricingParams, QuoteResult, UnresolvedEntry,
};
use crate::utils::error::{PricingError, Result};
use std::collections::HashSet;

/// 以空白切分識別碼，保留順序與重複項
pub fn parse_identifiers(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// 篩出目錄中有被請求的列 (依目錄順序)，缺少的成本視為 0
pub fn lookup(catalog: &Catalog, identifiers: &[String]) -> Vec<PartRecord> {
    let wanted: HashSet<&str> = identifiers.iter().map(String::as_str).collect();

    catalog
        .records()
        .iter()
        .filter(|record| wanted.contains(record.identifier.as_str()))
        .map(|record| PartRecord {
            identifier: record.identifier.clone(),
            base_cost: Some(record.base_cost.unwrap_or(0.0)),
        })
        .collect()
}

/// 將查到的列分為可報價與待確認兩組，並補上目錄中不存在的識別碼
pub fn calculate(
    matched: Vec<PartRecord>,
    identifiers: &[String],
    catalog: &Catalog,
    params: &PricingParams,
) -> Result<QuoteResult> {
    if identifiers.is_empty() {
        return Err(PricingError::EmptyRequest);
    }
    // 即使沒有可報價的列也要拒絕
    if !(params.margin_rate < 1.0) {
        return Err(PricingError::DegenerateMargin {
            margin: params.margin_rate,
        });
    }

    let origin = catalog.origin();
    let profile = OriginProfile::for_origin(origin);
    let known: HashSet<&str> = catalog
        .records()
        .iter()
        .map(|r| r.identifier.as_str())
        .collect();

    let mut priced = Vec::new();
    let mut unresolved = Vec::new();
    let mut unresolved_seen = HashSet::new();

    for record in matched {
        let cost = record.base_cost.unwrap_or(0.0);
        // 負值或 NaN 也歸入待確認，避免遺漏
        let prices = if cost > 0.0 {
            match channel_prices(cost, &profile, params.remittance_rate, params.margin_rate) {
                Ok(prices) => Some(prices),
                Err(PricingError::PriceOutOfRange { value }) => {
                    tracing::warn!(
                        "Price {} for '{}' is out of range, marking as unresolved",
                        value,
                        record.identifier
                    );
                    None
                }
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        match prices {
            Some((sea_price, air_price)) => priced.push(PriceQuote {
                identifier: record.identifier,
                base_cost: cost,
                sea_price,
                air_price,
            }),
            None => {
                if unresolved_seen.insert(record.identifier.clone()) {
                    unresolved.push(UnresolvedEntry::new(record.identifier));
                }
            }
        }
    }

    for identifier in identifiers {
        if !known.contains(identifier.as_str()) && unresolved_seen.insert(identifier.clone()) {
            unresolved.push(UnresolvedEntry::new(identifier.clone()));
        }
    }

    tracing::debug!(
        "Priced {} parts, {} unresolved ({} catalog)",
        priced.len(),
        unresolved.len(),
        origin
    );

    Ok(QuoteResult {
        origin,
        params: *params,
        priced,
        unresolved,
    })
}

/// lookup + calculate
pub fn quote(
    catalog: &Catalog,
    identifiers: &[String],
    params: &PricingParams,
) -> Result<QuoteResult> {
    let matched = lookup(catalog, identifiers);
    calculate(matched, identifiers, catalog, params)
}
