use std::{collections::HashSet, sync::Arc};

use mealcart_shared::{
    IngredientId, RecipeId,
    mealplan::{DayOfWeek, MealSlot, PlannedMealEntry},
    pantry::PantryStock,
    recipe::RecipeRequirement,
};

/// Planned meals for one (day, slot) pair.
#[async_trait::async_trait]
pub trait MealPlanStore: Send + Sync {
    async fn list_planned_meals(
        &self,
        day: DayOfWeek,
        meal_slot: MealSlot,
    ) -> anyhow::Result<Vec<PlannedMealEntry>>;
}

#[async_trait::async_trait]
pub trait RecipeIngredientStore: Send + Sync {
    async fn list_requirements(
        &self,
        recipe_id: &RecipeId,
    ) -> anyhow::Result<Vec<RecipeRequirement>>;
}

#[async_trait::async_trait]
pub trait PantryStore: Send + Sync {
    async fn list_stock(&self) -> anyhow::Result<Vec<PantryStock>>;
}

/// Ingredients the user already picked up for the current list.
///
/// Both marks are idempotent.
#[async_trait::async_trait]
pub trait BoughtStore: Send + Sync {
    async fn list_bought_ids(&self) -> anyhow::Result<HashSet<IngredientId>>;

    async fn mark_bought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()>;

    async fn mark_unbought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait IngredientCatalog: Send + Sync {
    /// `None` when the ingredient is unknown.
    async fn resolve_name(&self, ingredient_id: &IngredientId) -> anyhow::Result<Option<String>>;
}

#[async_trait::async_trait]
impl<T: MealPlanStore + ?Sized> MealPlanStore for Arc<T> {
    async fn list_planned_meals(
        &self,
        day: DayOfWeek,
        meal_slot: MealSlot,
    ) -> anyhow::Result<Vec<PlannedMealEntry>> {
        (**self).list_planned_meals(day, meal_slot).await
    }
}

#[async_trait::async_trait]
impl<T: RecipeIngredientStore + ?Sized> RecipeIngredientStore for Arc<T> {
    async fn list_requirements(
        &self,
        recipe_id: &RecipeId,
    ) -> anyhow::Result<Vec<RecipeRequirement>> {
        (**self).list_requirements(recipe_id).await
    }
}

#[async_trait::async_trait]
impl<T: PantryStore + ?Sized> PantryStore for Arc<T> {
    async fn list_stock(&self) -> anyhow::Result<Vec<PantryStock>> {
        (**self).list_stock().await
    }
}

#[async_trait::async_trait]
impl<T: BoughtStore + ?Sized> BoughtStore for Arc<T> {
    async fn list_bought_ids(&self) -> anyhow::Result<HashSet<IngredientId>> {
        (**self).list_bought_ids().await
    }

    async fn mark_bought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()> {
        (**self).mark_bought(ingredient_id).await
    }

    async fn mark_unbought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()> {
        (**self).mark_unbought(ingredient_id).await
    }
}

#[async_trait::async_trait]
impl<T: IngredientCatalog + ?Sized> IngredientCatalog for Arc<T> {
    async fn resolve_name(&self, ingredient_id: &IngredientId) -> anyhow::Result<Option<String>> {
        (**self).resolve_name(ingredient_id).await
    }
}
