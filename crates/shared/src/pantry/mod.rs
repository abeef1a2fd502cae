use serde::{Deserialize, Serialize};

use crate::{IngredientId, recipe::QuantityUnit};

/// Quantity of an ingredient already on hand.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PantryStock {
    pub ingredient_id: IngredientId,
    pub quantity: f64,
    /// Unit the quantity was recorded in, when known.
    pub unit: Option<QuantityUnit>,
}
