use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Ingredient {
    Table,
    Id,
    Name,
}

#[derive(Iden, Clone)]
pub enum RecipeIngredient {
    Table,
    RecipeId,
    IngredientId,
    Quantity,
    Unit,
}

#[derive(Iden, Clone)]
pub enum MealPlanSlot {
    Table,
    Day,
    MealSlot,
    RecipeId,
}

#[derive(Iden, Clone)]
pub enum PantryStock {
    Table,
    IngredientId,
    Quantity,
    Unit,
}

#[derive(Iden, Clone)]
pub enum GroceryBought {
    Table,
    IngredientId,
}
