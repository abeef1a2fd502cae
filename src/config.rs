use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mealcart_shared::mealplan::{self, DayOfWeek, MealSlot};
use mealcart_shopping::{AggregatorOptions, StockPolicy};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub grocery: GroceryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct GroceryConfig {
    /// Keep a persisted bought mark per ingredient
    #[serde(default = "default_bought_tracking")]
    pub bought_tracking: bool,
    #[serde(default)]
    pub stock_policy: StockPolicy,
    #[serde(default = "default_days")]
    pub days: Vec<DayOfWeek>,
    #[serde(default = "default_meal_slots")]
    pub meal_slots: Vec<MealSlot>,
}

impl Default for GroceryConfig {
    fn default() -> Self {
        Self {
            bought_tracking: default_bought_tracking(),
            stock_policy: StockPolicy::default(),
            days: default_days(),
            meal_slots: default_meal_slots(),
        }
    }
}

impl GroceryConfig {
    pub fn aggregator_options(&self) -> AggregatorOptions {
        AggregatorOptions {
            schedule: mealplan::schedule(&self.days, &self.meal_slots),
            stock_policy: self.stock_policy,
        }
    }
}

fn default_bought_tracking() -> bool {
    true
}

fn default_days() -> Vec<DayOfWeek> {
    DayOfWeek::ALL.to_vec()
}

fn default_meal_slots() -> Vec<MealSlot> {
    MealSlot::ALL.to_vec()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MEALCART__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("database.url", "sqlite:mealcart.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional: a missing file falls through to defaults
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALCART")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(format!(
                "Unknown log format '{}', expected json or pretty",
                self.logging.format
            ));
        }
        if self.grocery.days.is_empty() || self.grocery.meal_slots.is_empty() {
            return Err("Grocery schedule needs at least one day and one meal slot".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            logging: LoggingConfig::default(),
            grocery: GroceryConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = config();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_log_format() {
        let mut config = config();
        config.logging.format = "xml".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_schedule() {
        let mut config = config();
        config.grocery.meal_slots.clear();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_schedule_is_the_whole_week() {
        let options = config().grocery.aggregator_options();

        assert_eq!(options.schedule.len(), 21);
        assert_eq!(options.schedule[0], (DayOfWeek::Monday, MealSlot::Breakfast));
        assert_eq!(options.stock_policy, StockPolicy::Raw);
    }
}
