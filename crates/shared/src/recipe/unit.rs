use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(Display, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    Mass,
    Volume,
    Count,
}

#[derive(
    Serialize,
    Deserialize,
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QuantityUnit {
    G,
    Kg,
    Oz,
    Lb,
    Ml,
    L,
    Tsp,
    Tbsp,
    Cup,
    #[strum(to_string = "piece", serialize = "pieces")]
    Piece,
}

impl QuantityUnit {
    pub fn dimension(&self) -> Dimension {
        match self {
            QuantityUnit::G | QuantityUnit::Kg | QuantityUnit::Oz | QuantityUnit::Lb => {
                Dimension::Mass
            }
            QuantityUnit::Ml
            | QuantityUnit::L
            | QuantityUnit::Tsp
            | QuantityUnit::Tbsp
            | QuantityUnit::Cup => Dimension::Volume,
            QuantityUnit::Piece => Dimension::Count,
        }
    }

    /// Size of one unit in its dimension's base unit (g, ml or piece).
    fn base_factor(&self) -> f64 {
        match self {
            QuantityUnit::G => 1.0,
            QuantityUnit::Kg => 1000.0,
            QuantityUnit::Oz => 28.35,
            QuantityUnit::Lb => 453.59,
            QuantityUnit::Ml => 1.0,
            QuantityUnit::L => 1000.0,
            QuantityUnit::Tsp => 5.0,
            QuantityUnit::Tbsp => 15.0,
            QuantityUnit::Cup => 240.0,
            QuantityUnit::Piece => 1.0,
        }
    }

    /// Converts a quantity expressed in this unit to the base unit.
    pub fn normalize(&self, quantity: f64) -> f64 {
        quantity * self.base_factor()
    }

    /// Converts a base-unit quantity back to this unit.
    pub fn denormalize(&self, base_quantity: f64) -> f64 {
        base_quantity / self.base_factor()
    }

    /// `None` when the two units measure different things.
    pub fn convert(&self, quantity: f64, to: QuantityUnit) -> Option<f64> {
        if self.dimension() != to.dimension() {
            return None;
        }

        Some(to.denormalize(self.normalize(quantity)))
    }

    pub fn format(&self, quantity: f64) -> String {
        match self {
            QuantityUnit::G if quantity >= 1000.0 => format!("{} kg", trim(quantity / 1000.0)),
            QuantityUnit::Ml if quantity >= 1000.0 => format!("{} L", trim(quantity / 1000.0)),
            QuantityUnit::Piece => trim(quantity),
            unit => format!("{} {}", trim(quantity), unit),
        }
    }
}

fn trim(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
