//! Derived price composition.
//!
//! A machine's `price` column is free text; when it parses as a number the
//! catalog derives configurable pricing from it. Composition order is
//! fixed and explicit: price-affecting parameter modifiers apply to the
//! base first (percent modifiers are always computed on the *base* price,
//! which makes parameter application order-independent), then variant
//! option modifiers are added on top.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::PriceModifierType;

/// One price-affecting parameter bound to a machine.
#[derive(Debug, Clone, Copy)]
pub struct ParameterPriceEffect {
    pub modifier: Decimal,
    pub modifier_type: PriceModifierType,
}

/// Derived price span for a machine: `from` selects the cheapest option in
/// every variant group, `to` the most expensive.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PriceRange {
    pub base: Decimal,
    pub from: Decimal,
    pub to: Decimal,
}

/// Parse the free-text base price. Accepts thousands spaces and a comma
/// decimal separator ("65 000", "65000,50"); anything else yields None and
/// the machine simply has no derived pricing.
pub fn parse_base_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<Decimal>().ok()
}

/// Apply the machine's parameter price effects to the base price.
pub fn apply_parameter_effects(base: Decimal, effects: &[ParameterPriceEffect]) -> Decimal {
    let mut price = base;
    for effect in effects {
        match effect.modifier_type {
            PriceModifierType::Fixed => price += effect.modifier,
            PriceModifierType::Percent => {
                price += base * effect.modifier / Decimal::from(100);
            }
        }
    }
    price
}

/// Full composition for one concrete configuration: parameter effects on
/// the base, then the selected option modifier from each group.
pub fn compose_price(
    base: Decimal,
    effects: &[ParameterPriceEffect],
    selected_options: &[Decimal],
) -> Decimal {
    let adjusted = apply_parameter_effects(base, effects);
    selected_options.iter().fold(adjusted, |acc, m| acc + *m)
}

/// Price span across all variant configurations. `group_modifiers` holds
/// the option modifiers per variant group; empty groups contribute nothing.
pub fn price_range(
    base: Decimal,
    effects: &[ParameterPriceEffect],
    group_modifiers: &[Vec<Decimal>],
) -> PriceRange {
    let adjusted = apply_parameter_effects(base, effects);

    let mut from = adjusted;
    let mut to = adjusted;
    for group in group_modifiers {
        if let Some(min) = group.iter().min() {
            from += *min;
        }
        if let Some(max) = group.iter().max() {
            to += *max;
        }
    }

    PriceRange { base, from, to }
}
