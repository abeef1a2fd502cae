use mealcart_shopping::{GroceryAggregator, GroceryBoard, SqliteStore};
use sqlx::SqlitePool;

use crate::config::GroceryConfig;

/// Composes a board over the SQLite stores.
///
/// Ingredient names are loaded once into a snapshot owned by the board, so a
/// rename only shows up on the next session.
pub async fn open_board(pool: SqlitePool, config: &GroceryConfig) -> anyhow::Result<GroceryBoard> {
    let store = SqliteStore(pool);
    let catalog = store.catalog_snapshot().await?;
    tracing::debug!(ingredients = catalog.len(), "loaded ingredient catalog");

    let mut aggregator =
        GroceryAggregator::new(store.clone(), store.clone(), store.clone(), catalog)
            .with_options(config.aggregator_options());

    if config.bought_tracking {
        aggregator = aggregator.with_bought_tracking(store);
    }

    Ok(GroceryBoard::new(aggregator))
}
