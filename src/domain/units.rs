use crate::error::AppError;

/// Weight-based cart quantities are tracked in grams at this granularity.
pub const GRAM_STEP: i32 = 250;

/// How a product is priced and sold: by discrete piece or by weight.
/// Weight products are priced per kilogram; cart quantities for them are
/// grams, stock is whole kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitType {
    Piece,
    Kg,
}

impl UnitType {
    /// Normalizes stored values: empty means piece, legacy `weight` means kg.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "kg" | "weight" => UnitType::Kg,
            _ => UnitType::Piece,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Piece => "piece",
            UnitType::Kg => "kg",
        }
    }
}

/// Checks a cart quantity against the unit rules: pieces are whole units of
/// at least 1; weight quantities are grams, at least 250 and a multiple of 250.
pub fn validate_quantity(unit_type: UnitType, quantity: i32) -> Result<(), AppError> {
    match unit_type {
        UnitType::Piece => {
            if quantity < 1 {
                return Err(AppError::field("quantity", "must be at least 1"));
            }
        }
        UnitType::Kg => {
            if quantity < GRAM_STEP {
                return Err(AppError::field(
                    "quantity",
                    format!("must be at least {GRAM_STEP} grams"),
                ));
            }
            if quantity % GRAM_STEP != 0 {
                return Err(AppError::field(
                    "quantity",
                    format!("must be a multiple of {GRAM_STEP} grams"),
                ));
            }
        }
    }
    Ok(())
}

/// Largest cart quantity the current stock supports, in cart units
/// (grams for kg products, pieces otherwise).
pub fn max_quantity(unit_type: UnitType, stock_quantity: i32) -> i64 {
    match unit_type {
        UnitType::Piece => stock_quantity as i64,
        UnitType::Kg => stock_quantity as i64 * 1000,
    }
}

/// Stock units consumed by a cart quantity. Stock for weight products is
/// whole kilograms, so gram quantities are rounded up to the next kilogram.
pub fn stock_units(unit_type: UnitType, quantity: i32) -> i32 {
    match unit_type {
        UnitType::Piece => quantity,
        UnitType::Kg => (quantity + 999) / 1000,
    }
}

/// Line subtotal in centavos. Weight lines are price-per-kg times grams over
/// 1000, rounded half-up to the centavo.
pub fn line_subtotal(price: i64, unit_type: UnitType, quantity: i32) -> i64 {
    match unit_type {
        UnitType::Piece => price * quantity as i64,
        UnitType::Kg => (price * quantity as i64 + 500) / 1000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_legacy_values() {
        assert_eq!(UnitType::parse(""), UnitType::Piece);
        assert_eq!(UnitType::parse("piece"), UnitType::Piece);
        assert_eq!(UnitType::parse("kg"), UnitType::Kg);
        assert_eq!(UnitType::parse("weight"), UnitType::Kg);
    }

    #[test]
    fn piece_quantity_bounds() {
        assert!(validate_quantity(UnitType::Piece, 1).is_ok());
        assert!(validate_quantity(UnitType::Piece, 0).is_err());
        assert!(validate_quantity(UnitType::Piece, -3).is_err());
    }

    #[test]
    fn kg_quantity_must_be_positive_multiple_of_250() {
        assert!(validate_quantity(UnitType::Kg, 250).is_ok());
        assert!(validate_quantity(UnitType::Kg, 1750).is_ok());
        assert!(validate_quantity(UnitType::Kg, 0).is_err());
        assert!(validate_quantity(UnitType::Kg, 100).is_err());
        assert!(validate_quantity(UnitType::Kg, 300).is_err());
    }

    #[test]
    fn stock_bounds_convert_per_unit_type() {
        assert_eq!(max_quantity(UnitType::Piece, 5), 5);
        assert_eq!(max_quantity(UnitType::Kg, 5), 5000);
    }

    #[test]
    fn gram_quantities_consume_whole_kilograms_of_stock() {
        assert_eq!(stock_units(UnitType::Kg, 250), 1);
        assert_eq!(stock_units(UnitType::Kg, 1000), 1);
        assert_eq!(stock_units(UnitType::Kg, 1250), 2);
        assert_eq!(stock_units(UnitType::Piece, 3), 3);
    }

    #[test]
    fn subtotal_rounds_half_up_to_centavo() {
        // 2 x P20.00 + 250g @ P24.99/kg = P40.00 + P6.2475 -> P46.25
        let piece = line_subtotal(2000, UnitType::Piece, 2);
        let weight = line_subtotal(2499, UnitType::Kg, 250);
        assert_eq!(piece, 4000);
        assert_eq!(weight, 625);
        assert_eq!(piece + weight, 4625);
    }

    #[test]
    fn subtotal_exact_kilogram() {
        assert_eq!(line_subtotal(2499, UnitType::Kg, 1000), 2499);
        assert_eq!(line_subtotal(2499, UnitType::Kg, 2000), 4998);
    }
}
