mod unit;

pub use unit::*;

use serde::{Deserialize, Serialize};

use crate::IngredientId;

/// One ingredient line of a recipe.
///
/// A recipe may list the same ingredient more than once; consumers sum them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecipeRequirement {
    pub ingredient_id: IngredientId,
    pub quantity: f64,
    pub unit: QuantityUnit,
}

/// Quantities read from a store must be finite and non-negative.
pub fn validate_quantity(quantity: f64) -> anyhow::Result<f64> {
    if !quantity.is_finite() {
        anyhow::bail!("quantity {quantity} is not a finite number");
    }

    if quantity < 0.0 {
        anyhow::bail!("negative quantity {quantity} is not allowed");
    }

    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_quantity_rejects_malformed_values() {
        assert_eq!(validate_quantity(0.0).unwrap(), 0.0);
        assert_eq!(validate_quantity(2.5).unwrap(), 2.5);
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }
}
