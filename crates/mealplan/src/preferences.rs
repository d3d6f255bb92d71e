use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

pub const DEFAULT_CALORIE_GOAL: u32 = 2000;
pub const DEFAULT_MEALS_PER_DAY: u32 = 3;

#[derive(
    EnumString, Display, AsRefStr, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MealPrepTime {
    Quick,
    Medium,
    Long,
}

impl MealPrepTime {
    pub fn describe(&self) -> &'static str {
        match self {
            MealPrepTime::Quick => "< 30 mins",
            MealPrepTime::Medium => "30-60 mins",
            MealPrepTime::Long => "> 60 mins",
        }
    }
}

/// Dietary preferences supplied with a single generation request.
#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[validate(range(min = 1000, max = 5000, message = "Must be between 1000 and 5000"))]
    pub calorie_goal: u32,

    /// `None` and `Some(0)` both mean "use the default".
    #[serde(default)]
    #[validate(range(max = 6, message = "Must be between 1 and 6"))]
    pub meals_per_day: Option<u32>,

    #[serde(default)]
    pub dietary_restrictions: Vec<String>,

    #[serde(default)]
    pub allergies: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cuisine_preferences: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_prep_time: Option<MealPrepTime>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            calorie_goal: DEFAULT_CALORIE_GOAL,
            meals_per_day: Some(DEFAULT_MEALS_PER_DAY),
            dietary_restrictions: vec![],
            allergies: vec![],
            cuisine_preferences: vec![],
            meal_prep_time: None,
        }
    }
}

impl Preferences {
    pub fn meals_per_day(&self) -> u32 {
        match self.meals_per_day {
            None | Some(0) => DEFAULT_MEALS_PER_DAY,
            Some(n) => n,
        }
    }

    pub fn calories_per_meal(&self) -> u32 {
        self.calorie_goal / self.meals_per_day()
    }
}
