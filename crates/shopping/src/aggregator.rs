use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    sync::Arc,
};

use futures::future::try_join_all;
use mealcart_shared::{
    Error, IngredientId, RecipeId, Result, StoreKind,
    mealplan::{self, DayOfWeek, MealSlot, PlannedMealEntry},
    pantry::PantryStock,
    recipe::QuantityUnit,
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    BoughtStore, GroceryLine, GroceryList, IngredientCatalog, MealPlanStore, PantryStore,
    RecipeIngredientStore, list::sort_lines,
};

/// Remainders at or below this are treated as fully stocked.
const EPSILON: f64 = 1e-9;

/// How pantry quantities are subtracted from a need bucket.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StockPolicy {
    /// The pantry number is subtracted as-is, whatever unit it was recorded in.
    #[default]
    Raw,
    /// The pantry quantity is converted into the bucket's unit first. Stock
    /// recorded in an incompatible unit covers nothing; stock without a unit
    /// falls back to `Raw`.
    Normalized,
}

#[derive(Clone, Debug)]
pub struct AggregatorOptions {
    /// (day, slot) pairs scanned for planned meals.
    pub schedule: Vec<(DayOfWeek, MealSlot)>,
    pub stock_policy: StockPolicy,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            schedule: mealplan::full_week(),
            stock_policy: StockPolicy::default(),
        }
    }
}

type NeedBuckets = BTreeMap<(IngredientId, QuantityUnit), f64>;

/// Derives the grocery list from the week's meal plan, recipe requirements and
/// pantry stock.
///
/// Bought tracking is optional: without a [`BoughtStore`] every line lands in
/// `to_buy` and marks are rejected.
#[derive(Clone)]
pub struct GroceryAggregator {
    meal_plans: Arc<dyn MealPlanStore>,
    recipes: Arc<dyn RecipeIngredientStore>,
    pantry: Arc<dyn PantryStore>,
    catalog: Arc<dyn IngredientCatalog>,
    bought: Option<Arc<dyn BoughtStore>>,
    options: AggregatorOptions,
}

impl GroceryAggregator {
    pub fn new(
        meal_plans: impl MealPlanStore + 'static,
        recipes: impl RecipeIngredientStore + 'static,
        pantry: impl PantryStore + 'static,
        catalog: impl IngredientCatalog + 'static,
    ) -> Self {
        Self {
            meal_plans: Arc::new(meal_plans),
            recipes: Arc::new(recipes),
            pantry: Arc::new(pantry),
            catalog: Arc::new(catalog),
            bought: None,
            options: AggregatorOptions::default(),
        }
    }

    pub fn with_bought_tracking(mut self, store: impl BoughtStore + 'static) -> Self {
        self.bought = Some(Arc::new(store));
        self
    }

    pub fn with_options(mut self, options: AggregatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AggregatorOptions {
        &self.options
    }

    pub fn tracks_bought(&self) -> bool {
        self.bought.is_some()
    }

    #[tracing::instrument(skip(self), fields(slots = self.options.schedule.len()))]
    pub async fn compute_grocery_list(&self) -> Result<GroceryList> {
        let entries = self.gather().await?;
        tracing::debug!(entries = entries.len(), "gathered planned meals");

        let needs = self.accumulate(&entries).await?;
        tracing::debug!(buckets = needs.len(), "accumulated need buckets");

        let stock = self
            .pantry
            .list_stock()
            .await
            .map_err(Error::read(StoreKind::Pantry))?;
        let remaining = subtract_stock(needs, &stock, self.options.stock_policy);

        let mut lines = self.resolve(remaining).await?;
        sort_lines(&mut lines);

        let bought_ids = match &self.bought {
            Some(store) => store
                .list_bought_ids()
                .await
                .map_err(Error::read(StoreKind::Bought))?,
            None => HashSet::new(),
        };

        let (bought, to_buy): (Vec<_>, Vec<_>) = lines
            .into_iter()
            .partition(|line| bought_ids.contains(&line.ingredient_id));

        tracing::info!(
            to_buy = to_buy.len(),
            bought = bought.len(),
            "grocery list computed"
        );

        Ok(GroceryList {
            to_buy,
            bought,
            last_updated: OffsetDateTime::now_utc(),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn mark_bought(&self, ingredient_id: &IngredientId) -> Result<()> {
        self.bought_store()?
            .mark_bought(ingredient_id)
            .await
            .map_err(Error::mark_write(ingredient_id.clone()))?;

        tracing::info!("ingredient marked bought");

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn mark_unbought(&self, ingredient_id: &IngredientId) -> Result<()> {
        self.bought_store()?
            .mark_unbought(ingredient_id)
            .await
            .map_err(Error::mark_write(ingredient_id.clone()))?;

        tracing::info!("ingredient marked unbought");

        Ok(())
    }

    fn bought_store(&self) -> Result<&Arc<dyn BoughtStore>> {
        self.bought.as_ref().ok_or(Error::BoughtTrackingDisabled)
    }

    async fn gather(&self) -> Result<Vec<PlannedMealEntry>> {
        let slots = try_join_all(
            self.options
                .schedule
                .iter()
                .map(|(day, slot)| self.meal_plans.list_planned_meals(*day, *slot)),
        )
        .await
        .map_err(Error::read(StoreKind::MealPlan))?;

        Ok(slots.into_iter().flatten().collect())
    }

    async fn accumulate(&self, entries: &[PlannedMealEntry]) -> Result<NeedBuckets> {
        // A recipe planned twice is consumed twice, but read once.
        let mut planned = BTreeMap::<&RecipeId, u32>::new();
        for entry in entries {
            *planned.entry(&entry.recipe_id).or_insert(0) += 1;
        }

        let recipes = try_join_all(planned.into_iter().map(|(id, times)| async move {
            let requirements = self.recipes.list_requirements(id).await?;
            anyhow::Ok((times, requirements))
        }))
        .await
        .map_err(Error::read(StoreKind::RecipeIngredient))?;

        let mut needs = NeedBuckets::new();
        for (times, requirements) in recipes {
            for requirement in requirements {
                *needs
                    .entry((requirement.ingredient_id, requirement.unit))
                    .or_insert(0.0) += requirement.quantity * f64::from(times);
            }
        }

        Ok(needs)
    }

    async fn resolve(&self, remaining: NeedBuckets) -> Result<Vec<GroceryLine>> {
        let ingredient_ids = remaining
            .keys()
            .map(|(id, _)| id)
            .collect::<BTreeSet<_>>();

        let names = try_join_all(ingredient_ids.iter().map(|id| async move {
            let name = self.catalog.resolve_name(id).await?;
            anyhow::Ok(((*id).clone(), name))
        }))
        .await
        .map_err(Error::read(StoreKind::Catalog))?
        .into_iter()
        .filter_map(|(id, name)| name.map(|name| (id, name)))
        .collect::<HashMap<IngredientId, String>>();

        Ok(remaining
            .into_iter()
            .filter_map(|((ingredient_id, unit), quantity_to_buy)| {
                let Some(name) = names.get(&ingredient_id) else {
                    tracing::debug!(%ingredient_id, "skipping unresolved ingredient");
                    return None;
                };

                Some(GroceryLine {
                    name: name.to_owned(),
                    ingredient_id,
                    quantity_to_buy,
                    unit,
                })
            })
            .collect())
    }
}

/// Keeps only the buckets pantry stock does not cover, holding the remainder.
fn subtract_stock(needs: NeedBuckets, stock: &[PantryStock], policy: StockPolicy) -> NeedBuckets {
    let stock = stock
        .iter()
        .map(|s| (&s.ingredient_id, s))
        .collect::<HashMap<_, _>>();

    needs
        .into_iter()
        .filter_map(|((ingredient_id, unit), needed)| {
            let on_hand = stock
                .get(&ingredient_id)
                .map(|s| stock_in(s, unit, policy))
                .unwrap_or(0.0);

            let remaining = needed - on_hand;
            (remaining > EPSILON).then_some(((ingredient_id, unit), remaining))
        })
        .collect()
}

fn stock_in(stock: &PantryStock, unit: QuantityUnit, policy: StockPolicy) -> f64 {
    match (policy, stock.unit) {
        (StockPolicy::Normalized, Some(stock_unit)) => {
            stock_unit.convert(stock.quantity, unit).unwrap_or(0.0)
        }
        _ => stock.quantity,
    }
}
