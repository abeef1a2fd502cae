use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use mealcart_shared::{IngredientId, Result};
use tokio::sync::RwLock;

use crate::{GroceryAggregator, GroceryList};

/// Outcome of [`GroceryBoard::refresh`].
#[derive(Debug, Clone)]
pub enum Refresh {
    Published(Arc<GroceryList>),
    /// A later refresh or a bought mark overtook this one; its result was dropped.
    Stale,
}

#[derive(Default)]
struct Published {
    ticket: u64,
    list: Option<Arc<GroceryList>>,
}

/// Holds the grocery list currently shown to the user.
///
/// A list is only replaced by a complete newer computation, so failed or
/// overtaken refreshes never leave a partial list behind. Marks are written
/// through before the shown list changes, and invalidate refreshes started
/// before them.
pub struct GroceryBoard {
    aggregator: GroceryAggregator,
    next_ticket: AtomicU64,
    published: RwLock<Published>,
}

impl GroceryBoard {
    pub fn new(aggregator: GroceryAggregator) -> Self {
        Self {
            aggregator,
            next_ticket: AtomicU64::new(0),
            published: RwLock::new(Published::default()),
        }
    }

    pub fn aggregator(&self) -> &GroceryAggregator {
        &self.aggregator
    }

    pub async fn current(&self) -> Option<Arc<GroceryList>> {
        self.published.read().await.list.clone()
    }

    pub async fn refresh(&self) -> Result<Refresh> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        let list = match self.aggregator.compute_grocery_list().await {
            Ok(list) => list,
            Err(err) => {
                tracing::error!(ticket, "grocery list refresh failed, keeping previous list: {err}");
                return Err(err);
            }
        };

        let mut published = self.published.write().await;
        if published.ticket > ticket {
            tracing::debug!(
                ticket,
                newer = published.ticket,
                "discarding stale grocery list"
            );
            return Ok(Refresh::Stale);
        }

        let list = Arc::new(list);
        published.ticket = ticket;
        published.list = Some(list.clone());

        Ok(Refresh::Published(list))
    }

    pub async fn mark_bought(&self, ingredient_id: &IngredientId) -> Result<()> {
        self.aggregator.mark_bought(ingredient_id).await?;
        self.apply_mark(|list| list.with_bought(ingredient_id)).await;

        Ok(())
    }

    pub async fn mark_unbought(&self, ingredient_id: &IngredientId) -> Result<()> {
        self.aggregator.mark_unbought(ingredient_id).await?;
        self.apply_mark(|list| list.with_unbought(ingredient_id)).await;

        Ok(())
    }

    /// Takes a ticket of its own: a refresh still in flight may have read the
    /// bought store before the write landed, so it must come back `Stale`.
    async fn apply_mark(&self, moved: impl FnOnce(&GroceryList) -> GroceryList) {
        let mut published = self.published.write().await;
        published.ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        let updated = published.list.as_deref().map(|list| Arc::new(moved(list)));
        published.list = updated;
    }
}
