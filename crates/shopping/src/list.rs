use mealcart_shared::{IngredientId, recipe::QuantityUnit};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GroceryLine {
    pub ingredient_id: IngredientId,
    pub name: String,
    pub quantity_to_buy: f64,
    pub unit: QuantityUnit,
}

impl GroceryLine {
    pub fn formatted_quantity(&self) -> String {
        self.unit.format(self.quantity_to_buy)
    }
}

/// A computed grocery list, split by bought state.
///
/// Both partitions are sorted by name. A list is never edited in place: moving
/// a line between partitions yields a new list.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GroceryList {
    pub to_buy: Vec<GroceryLine>,
    pub bought: Vec<GroceryLine>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl GroceryList {
    pub fn is_empty(&self) -> bool {
        self.to_buy.is_empty() && self.bought.is_empty()
    }

    /// All lines, to-buy partition first.
    pub fn lines(&self) -> impl Iterator<Item = &GroceryLine> {
        self.to_buy.iter().chain(self.bought.iter())
    }

    pub fn is_bought(&self, ingredient_id: &IngredientId) -> bool {
        self.bought.iter().any(|l| &l.ingredient_id == ingredient_id)
    }

    pub fn with_bought(&self, ingredient_id: &IngredientId) -> GroceryList {
        let (moved, to_buy) = split_off(&self.to_buy, ingredient_id);

        GroceryList {
            to_buy,
            bought: merge(&self.bought, moved),
            last_updated: self.last_updated,
        }
    }

    pub fn with_unbought(&self, ingredient_id: &IngredientId) -> GroceryList {
        let (moved, bought) = split_off(&self.bought, ingredient_id);

        GroceryList {
            to_buy: merge(&self.to_buy, moved),
            bought,
            last_updated: self.last_updated,
        }
    }
}

/// Ascending by name ignoring case, so `apple` sorts before `Banana`. Names
/// differing only in case fall back to exact order; equal names keep their
/// relative order.
pub(crate) fn sort_lines(lines: &mut [GroceryLine]) {
    lines.sort_by_cached_key(|l| (l.name.to_lowercase(), l.name.clone()));
}

fn split_off(
    lines: &[GroceryLine],
    ingredient_id: &IngredientId,
) -> (Vec<GroceryLine>, Vec<GroceryLine>) {
    lines
        .iter()
        .cloned()
        .partition(|l| &l.ingredient_id == ingredient_id)
}

fn merge(lines: &[GroceryLine], moved: Vec<GroceryLine>) -> Vec<GroceryLine> {
    if moved.is_empty() {
        return lines.to_vec();
    }

    let mut merged = lines.to_vec();
    merged.extend(moved);
    sort_lines(&mut merged);
    merged
}
