mod error;
mod id;
pub mod mealplan;
pub mod pantry;
pub mod recipe;

pub use error::*;
pub use id::*;
