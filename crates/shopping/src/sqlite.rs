use std::collections::HashSet;

use anyhow::Context;
use mealcart_db::table::{
    GroceryBought, Ingredient, MealPlanSlot, PantryStock as PantryStockTable, RecipeIngredient,
};
use mealcart_shared::{
    IngredientId, RecipeId,
    mealplan::{DayOfWeek, MealSlot, PlannedMealEntry},
    pantry::PantryStock,
    recipe::{QuantityUnit, RecipeRequirement, validate_quantity},
};
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqlitePool, prelude::FromRow, types::Text};

use crate::{
    BoughtStore, CatalogSnapshot, IngredientCatalog, MealPlanStore, PantryStore,
    RecipeIngredientStore,
};

#[derive(FromRow)]
struct PlannedMealRow {
    day: Text<DayOfWeek>,
    meal_slot: Text<MealSlot>,
    recipe_id: String,
}

#[derive(FromRow)]
struct RequirementRow {
    ingredient_id: String,
    quantity: f64,
    unit: Text<QuantityUnit>,
}

#[derive(FromRow)]
struct StockRow {
    ingredient_id: String,
    quantity: f64,
    unit: Option<Text<QuantityUnit>>,
}

/// Every collaborator backed by the local SQLite database.
///
/// Rows are checked as they are read: an unknown day, slot or unit, or an
/// invalid quantity, fails the read instead of reaching the aggregator.
#[derive(Clone)]
pub struct SqliteStore(pub SqlitePool);

impl SqliteStore {
    pub async fn catalog_snapshot(&self) -> anyhow::Result<CatalogSnapshot> {
        let statement = Query::select()
            .columns([Ingredient::Id, Ingredient::Name])
            .from(Ingredient::Table)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String, String), _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn upsert_ingredient(
        &self,
        ingredient_id: &IngredientId,
        name: impl Into<String>,
    ) -> anyhow::Result<()> {
        let mut conn = self.0.acquire().await?;
        StoreWriter(&mut conn)
            .upsert_ingredient(ingredient_id, name)
            .await
    }

    pub async fn add_requirement(
        &self,
        recipe_id: &RecipeId,
        requirement: &RecipeRequirement,
    ) -> anyhow::Result<()> {
        let mut conn = self.0.acquire().await?;
        StoreWriter(&mut conn)
            .add_requirement(recipe_id, requirement)
            .await
    }

    pub async fn replace_requirements(
        &self,
        recipe_id: &RecipeId,
        requirements: &[RecipeRequirement],
    ) -> anyhow::Result<()> {
        let mut tx = self.0.begin().await?;
        StoreWriter(&mut tx)
            .replace_requirements(recipe_id, requirements)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    pub async fn plan_meal(&self, entry: &PlannedMealEntry) -> anyhow::Result<()> {
        let mut conn = self.0.acquire().await?;
        StoreWriter(&mut conn).plan_meal(entry).await
    }

    pub async fn set_stock(&self, stock: &PantryStock) -> anyhow::Result<()> {
        let mut conn = self.0.acquire().await?;
        StoreWriter(&mut conn).set_stock(stock).await
    }
}

/// Writes to the store tables over one connection, so a caller can group
/// several of them in a transaction.
pub struct StoreWriter<'c>(pub &'c mut SqliteConnection);

impl StoreWriter<'_> {
    pub async fn upsert_ingredient(
        &mut self,
        ingredient_id: &IngredientId,
        name: impl Into<String>,
    ) -> anyhow::Result<()> {
        let name: String = name.into();
        let statement = Query::insert()
            .into_table(Ingredient::Table)
            .columns([Ingredient::Id, Ingredient::Name])
            .values_panic([ingredient_id.as_str().into(), name.into()])
            .on_conflict(
                OnConflict::column(Ingredient::Id)
                    .update_column(Ingredient::Name)
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *self.0).await?;

        Ok(())
    }

    /// Appends one line to a recipe; a recipe may list an ingredient twice.
    pub async fn add_requirement(
        &mut self,
        recipe_id: &RecipeId,
        requirement: &RecipeRequirement,
    ) -> anyhow::Result<()> {
        validate_quantity(requirement.quantity)?;

        let statement = Query::insert()
            .into_table(RecipeIngredient::Table)
            .columns([
                RecipeIngredient::RecipeId,
                RecipeIngredient::IngredientId,
                RecipeIngredient::Quantity,
                RecipeIngredient::Unit,
            ])
            .values_panic([
                recipe_id.as_str().into(),
                requirement.ingredient_id.as_str().into(),
                requirement.quantity.into(),
                requirement.unit.as_ref().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *self.0).await?;

        Ok(())
    }

    /// Drops every line of the recipe, then writes `requirements` in order.
    pub async fn replace_requirements(
        &mut self,
        recipe_id: &RecipeId,
        requirements: &[RecipeRequirement],
    ) -> anyhow::Result<()> {
        for requirement in requirements {
            validate_quantity(requirement.quantity).with_context(|| {
                format!("recipe {recipe_id} ingredient {}", requirement.ingredient_id)
            })?;
        }

        let statement = Query::delete()
            .from_table(RecipeIngredient::Table)
            .and_where(Expr::col(RecipeIngredient::RecipeId).eq(recipe_id.as_str()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *self.0).await?;

        for requirement in requirements {
            self.add_requirement(recipe_id, requirement).await?;
        }

        Ok(())
    }

    /// Assigns a recipe to a slot, replacing whatever was planned there.
    pub async fn plan_meal(&mut self, entry: &PlannedMealEntry) -> anyhow::Result<()> {
        let statement = Query::insert()
            .into_table(MealPlanSlot::Table)
            .columns([
                MealPlanSlot::Day,
                MealPlanSlot::MealSlot,
                MealPlanSlot::RecipeId,
            ])
            .values_panic([
                entry.day.as_ref().into(),
                entry.meal_slot.as_ref().into(),
                entry.recipe_id.as_str().into(),
            ])
            .on_conflict(
                OnConflict::columns([MealPlanSlot::Day, MealPlanSlot::MealSlot])
                    .update_column(MealPlanSlot::RecipeId)
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *self.0).await?;

        Ok(())
    }

    pub async fn set_stock(&mut self, stock: &PantryStock) -> anyhow::Result<()> {
        validate_quantity(stock.quantity)?;

        let unit = stock.unit.map(|u| u.as_ref().to_owned());
        let statement = Query::insert()
            .into_table(PantryStockTable::Table)
            .columns([
                PantryStockTable::IngredientId,
                PantryStockTable::Quantity,
                PantryStockTable::Unit,
            ])
            .values_panic([
                stock.ingredient_id.as_str().into(),
                stock.quantity.into(),
                unit.into(),
            ])
            .on_conflict(
                OnConflict::column(PantryStockTable::IngredientId)
                    .update_columns([PantryStockTable::Quantity, PantryStockTable::Unit])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *self.0).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl MealPlanStore for SqliteStore {
    async fn list_planned_meals(
        &self,
        day: DayOfWeek,
        meal_slot: MealSlot,
    ) -> anyhow::Result<Vec<PlannedMealEntry>> {
        let statement = Query::select()
            .columns([
                MealPlanSlot::Day,
                MealPlanSlot::MealSlot,
                MealPlanSlot::RecipeId,
            ])
            .from(MealPlanSlot::Table)
            .and_where(Expr::col(MealPlanSlot::Day).eq(day.as_ref()))
            .and_where(Expr::col(MealPlanSlot::MealSlot).eq(meal_slot.as_ref()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, PlannedMealRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await
            .with_context(|| format!("reading meal plan for {day} {meal_slot}"))?;

        Ok(rows
            .into_iter()
            .map(|row| PlannedMealEntry {
                day: row.day.0,
                meal_slot: row.meal_slot.0,
                recipe_id: row.recipe_id.into(),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl RecipeIngredientStore for SqliteStore {
    async fn list_requirements(
        &self,
        recipe_id: &RecipeId,
    ) -> anyhow::Result<Vec<RecipeRequirement>> {
        let statement = Query::select()
            .columns([
                RecipeIngredient::IngredientId,
                RecipeIngredient::Quantity,
                RecipeIngredient::Unit,
            ])
            .from(RecipeIngredient::Table)
            .and_where(Expr::col(RecipeIngredient::RecipeId).eq(recipe_id.as_str()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RequirementRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await
            .with_context(|| format!("reading requirements of recipe {recipe_id}"))?;

        rows.into_iter()
            .map(|row| {
                let quantity = validate_quantity(row.quantity).with_context(|| {
                    format!("recipe {recipe_id} ingredient {}", row.ingredient_id)
                })?;

                Ok(RecipeRequirement {
                    ingredient_id: row.ingredient_id.into(),
                    quantity,
                    unit: row.unit.0,
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl PantryStore for SqliteStore {
    async fn list_stock(&self) -> anyhow::Result<Vec<PantryStock>> {
        let statement = Query::select()
            .columns([
                PantryStockTable::IngredientId,
                PantryStockTable::Quantity,
                PantryStockTable::Unit,
            ])
            .from(PantryStockTable::Table)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, StockRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await
            .context("reading pantry stock")?;

        rows.into_iter()
            .map(|row| {
                let quantity = validate_quantity(row.quantity)
                    .with_context(|| format!("pantry stock of {}", row.ingredient_id))?;

                Ok(PantryStock {
                    ingredient_id: row.ingredient_id.into(),
                    quantity,
                    unit: row.unit.map(|u| u.0),
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl BoughtStore for SqliteStore {
    async fn list_bought_ids(&self) -> anyhow::Result<HashSet<IngredientId>> {
        let statement = Query::select()
            .column(GroceryBought::IngredientId)
            .from(GroceryBought::Table)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(|(id,)| id.into()).collect())
    }

    async fn mark_bought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()> {
        let statement = Query::insert()
            .into_table(GroceryBought::Table)
            .columns([GroceryBought::IngredientId])
            .values_panic([ingredient_id.as_str().into()])
            .on_conflict(
                OnConflict::column(GroceryBought::IngredientId)
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }

    async fn mark_unbought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()> {
        let statement = Query::delete()
            .from_table(GroceryBought::Table)
            .and_where(Expr::col(GroceryBought::IngredientId).eq(ingredient_id.as_str()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl IngredientCatalog for SqliteStore {
    async fn resolve_name(&self, ingredient_id: &IngredientId) -> anyhow::Result<Option<String>> {
        let statement = Query::select()
            .column(Ingredient::Name)
            .from(Ingredient::Table)
            .and_where(Expr::col(Ingredient::Id).eq(ingredient_id.as_str()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(row.map(|(name,)| name))
    }
}
