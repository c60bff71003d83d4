//! Listing price calculator.
//!
//! The listing form exposes two linked controls: a price input and an
//! "earnings" slider. Typing a price derives the platform fee and the artist's
//! earnings; moving the slider derives the listing price that pays out at least
//! that much. Fees come from a tiered schedule keyed on the price actually
//! charged, so a discount also moves the fee.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::validation::{validate_discount, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid fee schedule: {0}")]
    InvalidSchedule(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Fee rate applied to prices up to and including `up_to`.
/// `None` marks the open-ended top tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeTier {
    pub up_to: Option<Decimal>,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeSchedule {
    tiers: Vec<FeeTier>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            tiers: vec![
                FeeTier {
                    up_to: Some(Decimal::new(5000, 2)),
                    rate: Decimal::new(20, 2),
                },
                FeeTier {
                    up_to: Some(Decimal::new(20000, 2)),
                    rate: Decimal::new(15, 2),
                },
                FeeTier {
                    up_to: Some(Decimal::new(100000, 2)),
                    rate: Decimal::new(12, 2),
                },
                FeeTier {
                    up_to: None,
                    rate: Decimal::new(10, 2),
                },
            ],
        }
    }
}

impl FeeSchedule {
    /// Build a schedule. Tiers must have ascending bounds, rates in `[0, 1)`,
    /// and end with an open-ended tier.
    pub fn new(tiers: Vec<FeeTier>) -> Result<Self, PricingError> {
        if tiers.is_empty() {
            return Err(PricingError::InvalidSchedule("no tiers".to_string()));
        }

        let mut previous: Option<Decimal> = None;
        for (index, tier) in tiers.iter().enumerate() {
            if tier.rate < Decimal::ZERO || tier.rate >= Decimal::ONE {
                return Err(PricingError::InvalidSchedule(format!(
                    "tier {} rate {} outside [0, 1)",
                    index, tier.rate
                )));
            }
            let is_last = index == tiers.len() - 1;
            match (tier.up_to, is_last) {
                (None, false) => {
                    return Err(PricingError::InvalidSchedule(format!(
                        "tier {} is open-ended but not last",
                        index
                    )))
                }
                (Some(_), true) => {
                    return Err(PricingError::InvalidSchedule(
                        "last tier must be open-ended".to_string(),
                    ))
                }
                (Some(bound), false) => {
                    if previous.is_some_and(|p| bound <= p) || bound <= Decimal::ZERO {
                        return Err(PricingError::InvalidSchedule(format!(
                            "tier {} bound {} is not ascending",
                            index, bound
                        )));
                    }
                    previous = Some(bound);
                }
                (None, true) => {}
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }

    /// Rate of the first tier whose bound covers `price`
    pub fn rate_for(&self, price: Decimal) -> Decimal {
        self.tiers
            .iter()
            .find(|tier| tier.up_to.is_none_or(|bound| price <= bound))
            .map(|tier| tier.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Breakdown shown under the listing form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub listing_price: Decimal,
    pub discount_price: Option<Decimal>,
    /// Price the buyer pays: the discount when one applies, else the listing price
    pub effective_price: Decimal,
    pub fee_rate: Decimal,
    pub platform_fee: Decimal,
    pub artist_earnings: Decimal,
}

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn ensure_positive(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice(amount));
    }
    Ok(amount)
}

/// Price input direction: derive fee and earnings from the listing price.
pub fn quote_from_listing(
    schedule: &FeeSchedule,
    listing_price: Decimal,
) -> Result<PriceQuote, PricingError> {
    let listing_price = round_money(ensure_positive(listing_price)?);
    Ok(build_quote(schedule, listing_price, None))
}

/// Earnings slider direction: the smallest listing price that pays the artist
/// at least `earnings`.
///
/// Fee tiers make the payout jump at tier bounds, so some payouts cannot be hit
/// exactly; those resolve to the first price of the next tier.
pub fn quote_from_earnings(
    schedule: &FeeSchedule,
    earnings: Decimal,
) -> Result<PriceQuote, PricingError> {
    let earnings = ensure_positive(earnings)?;
    let cent = Decimal::new(1, 2);

    let mut lower: Option<Decimal> = None;
    for tier in schedule.tiers() {
        let mut candidate = (earnings / (Decimal::ONE - tier.rate))
            .round_dp_with_strategy(2, RoundingStrategy::AwayFromZero);
        if let Some(lower) = lower {
            if candidate <= lower {
                candidate = lower + cent;
            }
        }
        if tier.up_to.is_none_or(|bound| candidate <= bound) {
            return Ok(build_quote(schedule, candidate, None));
        }
        lower = tier.up_to;
    }

    Err(PricingError::InvalidSchedule(
        "no tier covers the requested earnings".to_string(),
    ))
}

/// Recompute a quote with an optional discount price.
///
/// A discount that is not strictly below the listing price is dropped rather
/// than rejected, so lowering the listing price under an existing discount
/// clears the discount.
pub fn apply_discount(
    schedule: &FeeSchedule,
    listing_price: Decimal,
    discount_price: Option<Decimal>,
) -> Result<PriceQuote, PricingError> {
    let listing_price = round_money(ensure_positive(listing_price)?);

    let discount = match discount_price.map(round_money) {
        Some(discount) => match validate_discount(listing_price, discount) {
            Ok(discount) => Some(discount),
            Err(e) => {
                tracing::debug!(
                    listing_price = %listing_price,
                    discount_price = %discount,
                    reason = %e,
                    "Dropping inconsistent discount price"
                );
                None
            }
        },
        None => None,
    };

    Ok(build_quote(schedule, listing_price, discount))
}

fn build_quote(
    schedule: &FeeSchedule,
    listing_price: Decimal,
    discount_price: Option<Decimal>,
) -> PriceQuote {
    let effective_price = discount_price.unwrap_or(listing_price);
    let fee_rate = schedule.rate_for(effective_price);
    let platform_fee = round_money(effective_price * fee_rate);

    PriceQuote {
        listing_price,
        discount_price,
        effective_price,
        fee_rate,
        platform_fee,
        artist_earnings: effective_price - platform_fee,
    }
}
