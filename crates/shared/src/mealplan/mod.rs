use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::RecipeId;

#[derive(
    Serialize,
    Deserialize,
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(
    Serialize,
    Deserialize,
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl DayOfWeek {
    /// Monday first.
    pub const ALL: &'static [DayOfWeek] = Self::VARIANTS;
}

impl MealSlot {
    pub const ALL: &'static [MealSlot] = Self::VARIANTS;
}

/// A recipe assigned to one day and meal slot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlannedMealEntry {
    pub day: DayOfWeek,
    pub meal_slot: MealSlot,
    pub recipe_id: RecipeId,
}

/// Every (day, slot) pair of the week, day-major.
pub fn full_week() -> Vec<(DayOfWeek, MealSlot)> {
    schedule(DayOfWeek::ALL, MealSlot::ALL)
}

pub fn schedule(days: &[DayOfWeek], slots: &[MealSlot]) -> Vec<(DayOfWeek, MealSlot)> {
    days.iter()
        .flat_map(|day| slots.iter().map(move |slot| (*day, *slot)))
        .collect()
}
