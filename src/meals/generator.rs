use std::{collections::BTreeSet, fmt, str::FromStr};

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::filter::safe_foods;
use crate::{catalog::FoodItem, users::UserProfile};

/// Independent draws per recommendation request.
pub const SUGGESTIONS_PER_REQUEST: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown meal time '{0}'")]
pub struct UnknownMealTime(pub String);

impl MealTime {
    pub const ALL: [MealTime; 3] = [MealTime::Breakfast, MealTime::Lunch, MealTime::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealTime::Breakfast => "breakfast",
            MealTime::Lunch => "lunch",
            MealTime::Dinner => "dinner",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MealTime::Breakfast => "Breakfast",
            MealTime::Lunch => "Lunch",
            MealTime::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealTime {
    type Err = UnknownMealTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MealTime::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMealTime(s.to_string()))
    }
}

pub fn meal_times() -> &'static [MealTime] {
    &MealTime::ALL
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealFood {
    pub name: String,
    pub category: String,
}

/// A suggested meal. Lives for one request; `id` is only locally unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub foods: Vec<MealFood>,
    pub total_calories: f64,
    pub categories: Vec<String>,
}

/// Two or three distinct safe foods, or `None` when fewer than two are safe.
pub fn generate_meal<R: Rng + ?Sized>(
    user: &UserProfile,
    foods: &[FoodItem],
    meal_time: MealTime,
    rng: &mut R,
) -> Option<Meal> {
    let safe = safe_foods(foods, user);
    if safe.len() < 2 {
        return None;
    }

    let count = rng.gen_range(2..=3).min(safe.len());
    let selected: Vec<&FoodItem> = safe.choose_multiple(rng, count).copied().collect();

    let total_calories = selected.iter().map(|f| f.calories).sum();
    let names: Vec<&str> = selected.iter().map(|f| f.name.as_str()).collect();
    let categories: BTreeSet<&str> = selected.iter().map(|f| f.category.as_str()).collect();

    Some(Meal {
        id: rng.gen_range(1000..=9999),
        name: format!("{}: {}", meal_time.title(), names.join(", ")),
        description: format!("A simple {} meal", meal_time.as_str()),
        foods: selected
            .iter()
            .map(|f| MealFood {
                name: f.name.clone(),
                category: f.category.clone(),
            })
            .collect(),
        total_calories,
        categories: categories.into_iter().map(String::from).collect(),
    })
}

/// Independent suggestions; the same meal may come up more than once.
pub fn recommend_meals<R: Rng + ?Sized>(
    user: &UserProfile,
    foods: &[FoodItem],
    meal_time: MealTime,
    rng: &mut R,
) -> Vec<Meal> {
    (0..SUGGESTIONS_PER_REQUEST)
        .filter_map(|_| generate_meal(user, foods, meal_time, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::Role;
    use rand::{rngs::StdRng, SeedableRng};

    fn user() -> UserProfile {
        UserProfile::new(1, "Ada", Role::Elderly)
    }

    fn three_foods() -> Vec<FoodItem> {
        vec![
            FoodItem::new(1, "Apple", 50.0, "fruit"),
            FoodItem::new(2, "Rice", 80.0, "grain"),
            FoodItem::new(3, "Egg", 120.0, "protein"),
        ]
    }

    #[test]
    fn meal_time_parsing() {
        assert_eq!("Breakfast".parse::<MealTime>(), Ok(MealTime::Breakfast));
        assert_eq!(" dinner ".parse::<MealTime>(), Ok(MealTime::Dinner));
        assert!("brunch".parse::<MealTime>().is_err());
        assert_eq!(meal_times().len(), 3);
    }

    #[test]
    fn none_when_fewer_than_two_safe_foods() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_meal(&user(), &[], MealTime::Lunch, &mut rng).is_none());

        let one = vec![FoodItem::new(1, "Apple", 50.0, "fruit")];
        assert!(generate_meal(&user(), &one, MealTime::Lunch, &mut rng).is_none());

        let foods = three_foods();
        let allergic = user().with_allergies(["apple", "rice"]);
        assert!(generate_meal(&allergic, &foods, MealTime::Lunch, &mut rng).is_none());
    }

    #[test]
    fn meals_have_two_or_three_distinct_foods_and_exact_calories() {
        let foods = three_foods();
        let mut rng = StdRng::seed_from_u64(42);
        let mut sizes = BTreeSet::new();
        for _ in 0..200 {
            let meal = generate_meal(&user(), &foods, MealTime::Dinner, &mut rng).expect("meal");
            assert!((2..=3).contains(&meal.foods.len()));
            sizes.insert(meal.foods.len());

            let unique: BTreeSet<&str> = meal.foods.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(unique.len(), meal.foods.len());

            let expected: f64 = meal
                .foods
                .iter()
                .map(|mf| foods.iter().find(|f| f.name == mf.name).unwrap().calories)
                .sum();
            assert_eq!(meal.total_calories, expected);
            assert!((1000..=9999).contains(&meal.id));
        }
        assert_eq!(sizes.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn two_safe_foods_always_give_both() {
        let foods = three_foods();
        let u = user().with_allergies(["egg"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let meal = generate_meal(&u, &foods, MealTime::Lunch, &mut rng).unwrap();
            assert_eq!(meal.foods.len(), 2);
            assert_eq!(meal.total_calories, 130.0);
        }
    }

    #[test]
    fn allergic_foods_never_appear() {
        let foods = vec![
            FoodItem::new(1, "Peanut Butter", 588.0, "protein"),
            FoodItem::new(2, "Apple", 52.0, "fruit"),
            FoodItem::new(3, "Banana", 89.0, "fruit"),
            FoodItem::new(4, "Oatmeal", 68.0, "grain"),
        ];
        let u = user().with_allergies(["Peanut"]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let meal = generate_meal(&u, &foods, MealTime::Breakfast, &mut rng).unwrap();
            assert!(meal.foods.iter().all(|f| f.name != "Peanut Butter"));
        }
    }

    #[test]
    fn name_description_and_categories() {
        let foods = vec![
            FoodItem::new(1, "Apple", 50.0, "fruit"),
            FoodItem::new(2, "Pear", 57.0, "fruit"),
        ];
        let mut rng = StdRng::seed_from_u64(9);
        let meal = generate_meal(&user(), &foods, MealTime::Breakfast, &mut rng).unwrap();
        assert!(meal.name == "Breakfast: Apple, Pear" || meal.name == "Breakfast: Pear, Apple");
        assert_eq!(meal.description, "A simple breakfast meal");
        assert_eq!(meal.categories, vec!["fruit"]);
    }

    #[test]
    fn recommendations_are_three_independent_draws() {
        let foods = three_foods();
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(recommend_meals(&user(), &foods, MealTime::Lunch, &mut rng).len(), 3);
        assert!(recommend_meals(&user(), &foods[..1], MealTime::Lunch, &mut rng).is_empty());
    }
}
