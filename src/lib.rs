pub mod config;
pub mod db;
pub mod fixture;
pub mod grocery;
pub mod migrate;
pub mod observability;

pub use config::Config;
pub use db::create_pool;
pub use fixture::Fixture;
pub use grocery::open_board;
