use std::collections::HashMap;

use mealcart_shared::IngredientId;

use crate::IngredientCatalog;

/// Ingredient names captured once and handed to whoever composes the aggregator.
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    names: HashMap<IngredientId, String>,
}

impl CatalogSnapshot {
    pub fn new(entries: impl IntoIterator<Item = (IngredientId, String)>) -> Self {
        Self {
            names: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, ingredient_id: &IngredientId) -> Option<&str> {
        self.names.get(ingredient_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<I: Into<IngredientId>, N: Into<String>> FromIterator<(I, N)> for CatalogSnapshot {
    fn from_iter<T: IntoIterator<Item = (I, N)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(id, name)| (id.into(), name.into())),
        )
    }
}

#[async_trait::async_trait]
impl IngredientCatalog for CatalogSnapshot {
    async fn resolve_name(&self, ingredient_id: &IngredientId) -> anyhow::Result<Option<String>> {
        Ok(self.get(ingredient_id).map(str::to_owned))
    }
}
