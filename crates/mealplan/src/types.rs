use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use uuid::Uuid;

pub const MEAL_CALORIES: RangeInclusive<u32> = 200..=1000;
pub const MIN_INGREDIENTS: usize = 3;
pub const MIN_INSTRUCTIONS: usize = 2;

#[derive(EnumString, Display, AsRefStr, VariantArray, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// The literal tag a meal name must start with, e.g. `Breakfast:`.
    pub fn prefix(&self) -> String {
        format!("{}:", self.as_ref())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|meal_type| name.starts_with(&meal_type.prefix()))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    pub description: String,
    pub calories: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub date: NaiveDate,
    pub meals: Vec<Meal>,
    pub total_calories: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_from_name() {
        assert_eq!(
            MealType::from_name("Breakfast: Oatmeal with Fruit"),
            Some(MealType::Breakfast)
        );
        assert_eq!(MealType::from_name("Dinner: Salmon"), Some(MealType::Dinner));
        assert_eq!(MealType::from_name("Snack: Almonds"), None);
        assert_eq!(MealType::from_name("breakfast: lowercase"), None);
        assert_eq!(MealType::from_name("Lunch Salad"), None);
    }

    #[test]
    fn test_meal_plan_serializes_camel_case_with_iso_date() {
        let plan = MealPlan {
            id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            meals: vec![],
            total_calories: 0,
        };

        let value = serde_json::to_value(&plan).unwrap();

        assert_eq!(value["date"], "2026-10-19");
        assert_eq!(value["totalCalories"], 0);
        assert!(value.get("total_calories").is_none());
    }
}
