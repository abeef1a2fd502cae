mod grocery_bought;
mod ingredient;
mod mealplan_slot;
mod pantry_stock;
mod recipe_ingredient;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "mealcart",
    "m0001",
    vec_box![],
    vec_box![
        ingredient::CreateTable,
        recipe_ingredient::CreateTable,
        recipe_ingredient::CreateIdx1,
        mealplan_slot::CreateTable,
        pantry_stock::CreateTable,
        grocery_bought::CreateTable
    ]
);
