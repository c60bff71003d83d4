use rust_decimal::Decimal;

use super::ValidationError;

/// Inclusive range a listing price must fall in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            min: Decimal::ONE,
            max: Decimal::new(1_000_000, 0),
        }
    }
}

pub fn validate_price(price: Decimal, bounds: PriceBounds) -> Result<Decimal, ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice(price));
    }

    if price < bounds.min || price > bounds.max {
        return Err(ValidationError::PriceOutOfRange {
            price,
            min: bounds.min,
            max: bounds.max,
        });
    }

    Ok(price)
}

/// A discount must be a positive amount strictly below the listing price.
pub fn validate_discount(price: Decimal, discount: Decimal) -> Result<Decimal, ValidationError> {
    if discount <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice(discount));
    }

    if discount >= price {
        return Err(ValidationError::DiscountNotBelowPrice { discount, price });
    }

    Ok(discount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_price_bounds() {
        let bounds = PriceBounds::default();
        assert_eq!(
            validate_price(Decimal::new(2500, 2), bounds),
            Ok(Decimal::new(2500, 2))
        );
        assert!(matches!(
            validate_price(Decimal::ZERO, bounds),
            Err(ValidationError::NonPositivePrice(_))
        ));
        assert!(matches!(
            validate_price(Decimal::new(50, 2), bounds),
            Err(ValidationError::PriceOutOfRange { .. })
        ));
        assert!(validate_price(Decimal::new(1_000_001, 0), bounds).is_err());
    }

    #[test]
    fn test_validate_discount() {
        let price = Decimal::new(100, 0);
        assert_eq!(
            validate_discount(price, Decimal::new(80, 0)),
            Ok(Decimal::new(80, 0))
        );
        assert!(matches!(
            validate_discount(price, price),
            Err(ValidationError::DiscountNotBelowPrice { .. })
        ));
        assert!(validate_discount(price, Decimal::new(-5, 0)).is_err());
    }
}
