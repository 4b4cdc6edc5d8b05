use serde::{Deserialize, Serialize};

use crate::{catalog::FoodItem, users::MealLogEntry};

#[derive(Debug, Serialize)]
pub struct MealsOverview {
    pub user_meals: Vec<MealLogEntry>,
    pub foods: Vec<FoodItem>,
    pub user_allergies: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogMealRequest {
    pub food_id: i64, // inventory id, as listed by GET /foods
    pub quantity: f64, // grams
    pub meal_type: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMealRequest {
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedMeals {
    pub removed: usize,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default = "default_meal_time")]
    pub meal_time: String,
}

fn default_meal_time() -> String {
    "lunch".into()
}
