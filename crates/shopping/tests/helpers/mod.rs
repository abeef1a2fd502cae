#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use mealcart_shared::{
    IngredientId, RecipeId,
    mealplan::{DayOfWeek, MealSlot, PlannedMealEntry},
    pantry::PantryStock,
    recipe::{QuantityUnit, RecipeRequirement},
};
use mealcart_shopping::{
    BoughtStore, GroceryAggregator, IngredientCatalog, MealPlanStore, PantryStore,
    RecipeIngredientStore, SqliteStore,
};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use tokio::sync::Notify;

#[derive(Default)]
struct Data {
    plan: HashMap<(DayOfWeek, MealSlot), RecipeId>,
    recipes: HashMap<RecipeId, Vec<RecipeRequirement>>,
    stock: Vec<PantryStock>,
    names: HashMap<IngredientId, String>,
    bought: HashSet<IngredientId>,
    failing_recipe: Option<RecipeId>,
    failing_marks: bool,
}

/// Every collaborator kept in memory, with switches to make reads or writes fail.
#[derive(Default)]
pub struct MemoryStores {
    data: Mutex<Data>,
    pub recipe_reads: AtomicUsize,
}

impl MemoryStores {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ingredient(&self, id: &str, name: &str) {
        self.data
            .lock()
            .unwrap()
            .names
            .insert(id.into(), name.to_owned());
    }

    pub fn recipe(&self, id: &str, requirements: &[(&str, f64, QuantityUnit)]) {
        let requirements = requirements
            .iter()
            .map(|(ingredient, quantity, unit)| RecipeRequirement {
                ingredient_id: (*ingredient).into(),
                quantity: *quantity,
                unit: *unit,
            })
            .collect();

        self.data
            .lock()
            .unwrap()
            .recipes
            .insert(id.into(), requirements);
    }

    pub fn plan(&self, day: DayOfWeek, slot: MealSlot, recipe: &str) {
        self.data
            .lock()
            .unwrap()
            .plan
            .insert((day, slot), recipe.into());
    }

    pub fn stock(&self, id: &str, quantity: f64, unit: Option<QuantityUnit>) {
        let mut data = self.data.lock().unwrap();
        data.stock.retain(|s| s.ingredient_id.as_str() != id);
        data.stock.push(PantryStock {
            ingredient_id: id.into(),
            quantity,
            unit,
        });
    }

    pub fn fail_recipe(&self, id: Option<&str>) {
        self.data.lock().unwrap().failing_recipe = id.map(RecipeId::from);
    }

    pub fn fail_marks(&self, fail: bool) {
        self.data.lock().unwrap().failing_marks = fail;
    }

    pub fn bought_ids(&self) -> HashSet<IngredientId> {
        self.data.lock().unwrap().bought.clone()
    }
}

#[async_trait::async_trait]
impl MealPlanStore for MemoryStores {
    async fn list_planned_meals(
        &self,
        day: DayOfWeek,
        meal_slot: MealSlot,
    ) -> anyhow::Result<Vec<PlannedMealEntry>> {
        let data = self.data.lock().unwrap();

        Ok(data
            .plan
            .get(&(day, meal_slot))
            .map(|recipe_id| PlannedMealEntry {
                day,
                meal_slot,
                recipe_id: recipe_id.clone(),
            })
            .into_iter()
            .collect())
    }
}

#[async_trait::async_trait]
impl RecipeIngredientStore for MemoryStores {
    async fn list_requirements(
        &self,
        recipe_id: &RecipeId,
    ) -> anyhow::Result<Vec<RecipeRequirement>> {
        self.recipe_reads.fetch_add(1, Ordering::SeqCst);
        let data = self.data.lock().unwrap();

        if data.failing_recipe.as_ref() == Some(recipe_id) {
            anyhow::bail!("recipe {recipe_id} is unreadable");
        }

        Ok(data.recipes.get(recipe_id).cloned().unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl PantryStore for MemoryStores {
    async fn list_stock(&self) -> anyhow::Result<Vec<PantryStock>> {
        Ok(self.data.lock().unwrap().stock.clone())
    }
}

#[async_trait::async_trait]
impl BoughtStore for MemoryStores {
    async fn list_bought_ids(&self) -> anyhow::Result<HashSet<IngredientId>> {
        Ok(self.data.lock().unwrap().bought.clone())
    }

    async fn mark_bought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()> {
        let mut data = self.data.lock().unwrap();
        if data.failing_marks {
            anyhow::bail!("bought store is read-only");
        }

        data.bought.insert(ingredient_id.clone());

        Ok(())
    }

    async fn mark_unbought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()> {
        let mut data = self.data.lock().unwrap();
        if data.failing_marks {
            anyhow::bail!("bought store is read-only");
        }

        data.bought.remove(ingredient_id);

        Ok(())
    }
}

#[async_trait::async_trait]
impl IngredientCatalog for MemoryStores {
    async fn resolve_name(&self, ingredient_id: &IngredientId) -> anyhow::Result<Option<String>> {
        Ok(self.data.lock().unwrap().names.get(ingredient_id).cloned())
    }
}

/// Pantry whose first read parks until released.
pub struct GatedPantry {
    pub inner: Arc<MemoryStores>,
    pub entered: Notify,
    pub release: Notify,
    calls: AtomicUsize,
}

impl GatedPantry {
    pub fn new(inner: Arc<MemoryStores>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl PantryStore for GatedPantry {
    async fn list_stock(&self) -> anyhow::Result<Vec<PantryStock>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.entered.notify_one();
            self.release.notified().await;
        }

        self.inner.list_stock().await
    }
}

/// Bought store whose next read, once armed, returns its snapshot only after
/// being released.
pub struct GatedBought {
    pub inner: Arc<MemoryStores>,
    pub entered: Notify,
    pub release: Notify,
    armed: AtomicBool,
}

impl GatedBought {
    pub fn new(inner: Arc<MemoryStores>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            entered: Notify::new(),
            release: Notify::new(),
            armed: AtomicBool::new(false),
        })
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl BoughtStore for GatedBought {
    async fn list_bought_ids(&self) -> anyhow::Result<HashSet<IngredientId>> {
        let ids = self.inner.list_bought_ids().await?;

        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }

        Ok(ids)
    }

    async fn mark_bought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()> {
        self.inner.mark_bought(ingredient_id).await
    }

    async fn mark_unbought(&self, ingredient_id: &IngredientId) -> anyhow::Result<()> {
        self.inner.mark_unbought(ingredient_id).await
    }
}

pub fn aggregator(stores: &Arc<MemoryStores>) -> GroceryAggregator {
    GroceryAggregator::new(stores.clone(), stores.clone(), stores.clone(), stores.clone())
        .with_bought_tracking(stores.clone())
}

pub fn names(lines: &[mealcart_shopping::GroceryLine]) -> Vec<&str> {
    lines.iter().map(|l| l.name.as_str()).collect()
}

pub async fn setup_sqlite_store(path: PathBuf) -> anyhow::Result<SqliteStore> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    mealcart_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(SqliteStore(pool))
}
