use strum::{AsRefStr, Display};

use crate::IngredientId;

/// Collaborator a read or write went to.
#[derive(Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum StoreKind {
    MealPlan,
    RecipeIngredient,
    Pantry,
    Bought,
    Catalog,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{store} store read failed: {source}")]
    Read {
        store: StoreKind,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to update bought mark for ingredient {ingredient_id}: {source}")]
    MarkWrite {
        ingredient_id: IngredientId,
        #[source]
        source: anyhow::Error,
    },

    #[error("bought tracking is disabled")]
    BoughtTrackingDisabled,

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn read(store: StoreKind) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Read { store, source }
    }

    pub fn mark_write(ingredient_id: IngredientId) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::MarkWrite {
            ingredient_id,
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Unknown(value.into())
    }
}
