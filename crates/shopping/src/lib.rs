mod aggregator;
mod board;
mod catalog;
mod list;
mod store;

pub use aggregator::*;
pub use board::*;
pub use catalog::*;
pub use list::{GroceryLine, GroceryList};
pub use store::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod sqlite;

        pub use sqlite::*;
    }
}
