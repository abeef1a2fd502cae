use mealcart_shared::{
    IngredientId, RecipeId,
    mealplan::PlannedMealEntry,
    pantry::PantryStock,
    recipe::RecipeRequirement,
};
use mealcart_shopping::{SqliteStore, StoreWriter};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IngredientFixture {
    pub id: IngredientId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RecipeFixture {
    pub id: RecipeId,
    #[serde(default)]
    pub ingredients: Vec<RecipeRequirement>,
}

/// Catalog, recipes, plan and pantry loaded in one go, mostly for demos and
/// manual testing.
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub ingredients: Vec<IngredientFixture>,
    #[serde(default)]
    pub recipes: Vec<RecipeFixture>,
    #[serde(default)]
    pub meal_plan: Vec<PlannedMealEntry>,
    #[serde(default)]
    pub pantry: Vec<PantryStock>,
}

impl Fixture {
    pub fn from_json(data: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Writes everything in one transaction: either the whole fixture lands
    /// or nothing does. Recipes are replaced, so importing again is a no-op.
    pub async fn apply(&self, store: &SqliteStore) -> anyhow::Result<()> {
        let mut tx = store.0.begin().await?;
        let mut writer = StoreWriter(&mut tx);

        for ingredient in &self.ingredients {
            writer
                .upsert_ingredient(&ingredient.id, ingredient.name.as_str())
                .await?;
        }

        for recipe in &self.recipes {
            writer
                .replace_requirements(&recipe.id, &recipe.ingredients)
                .await?;
        }

        for entry in &self.meal_plan {
            writer.plan_meal(entry).await?;
        }

        for stock in &self.pantry {
            writer.set_stock(stock).await?;
        }

        tx.commit().await?;

        tracing::info!(
            ingredients = self.ingredients.len(),
            recipes = self.recipes.len(),
            planned = self.meal_plan.len(),
            stocked = self.pantry.len(),
            "fixture imported"
        );

        Ok(())
    }
}
