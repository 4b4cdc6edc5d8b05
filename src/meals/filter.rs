//! Which catalog foods a user may eat.
//!
//! Allergy matching is a case-insensitive substring test against the food
//! name, so "nut" also rules out "Coconut Water". That over-matching is
//! accepted: a missed allergen costs more than a missed suggestion.

use std::fmt;

use crate::{catalog::FoodItem, users::UserProfile};

/// Dietary restriction label → categories it permits.
pub const RESTRICTION_CATEGORIES: &[(&str, &[&str])] = &[
    ("low sodium", &["fruit", "vegetable", "protein"]),
    ("gluten free", &["fruit", "vegetable", "protein"]),
    ("heart healthy", &["fruit", "vegetable", "grain", "protein", "dairy"]),
    ("diabetic", &["vegetable", "grain", "protein"]),
    ("high cholesterol", &["fruit", "vegetable", "grain"]),
    ("vegetarian", &["fruit", "vegetable", "grain", "dairy"]),
    ("lactose intolerant", &["fruit", "vegetable", "grain", "protein"]),
];

/// Permitted categories for a restriction, or `None` for labels we do not
/// know (those constrain nothing).
pub fn permitted_categories(restriction: &str) -> Option<&'static [&'static str]> {
    let label = restriction.trim().to_lowercase();
    RESTRICTION_CATEGORIES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, cats)| *cats)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// An allergy term occurs in the food name.
    Allergy(String),
    /// The food declares an allergen the user is allergic to.
    DeclaredAllergen(String),
    /// The category is outside what a restriction permits.
    Restriction { restriction: String, category: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Allergy(term) => write!(f, "name matches allergy '{term}'"),
            Rejection::DeclaredAllergen(term) => write!(f, "declares allergen '{term}'"),
            Rejection::Restriction {
                restriction,
                category,
            } => write!(f, "category '{category}' not allowed by '{restriction}'"),
        }
    }
}

/// First allergy term found in `name`, compared case-insensitively.
pub fn name_allergy<'a>(name: &str, allergies: &'a [String]) -> Option<&'a str> {
    let name = name.to_lowercase();
    allergies
        .iter()
        .map(String::as_str)
        .find(|a| name.contains(&a.to_lowercase()))
}

fn declared_allergen<'a>(food: &FoodItem, allergies: &'a [String]) -> Option<&'a str> {
    allergies
        .iter()
        .map(String::as_str)
        .find(|a| food.allergens.iter().any(|d| d.eq_ignore_ascii_case(a)))
}

fn restriction_violation<'a>(food: &FoodItem, restrictions: &'a [String]) -> Option<&'a str> {
    restrictions
        .iter()
        .map(String::as_str)
        .find(|r| match permitted_categories(r) {
            Some(cats) => !cats.iter().any(|c| c.eq_ignore_ascii_case(food.category.trim())),
            None => false,
        })
}

/// Why `food` is unsafe for `user`, or `None` when it passes every stage.
pub fn rejection_reason(food: &FoodItem, user: &UserProfile) -> Option<Rejection> {
    if let Some(term) = name_allergy(&food.name, &user.allergies) {
        return Some(Rejection::Allergy(term.to_string()));
    }
    if let Some(term) = declared_allergen(food, &user.allergies) {
        return Some(Rejection::DeclaredAllergen(term.to_string()));
    }
    restriction_violation(food, &user.dietary_restrictions).map(|r| Rejection::Restriction {
        restriction: r.to_string(),
        category: food.category.clone(),
    })
}

pub fn is_safe(food: &FoodItem, user: &UserProfile) -> bool {
    rejection_reason(food, user).is_none()
}

/// The foods `user` may eat, in catalog order.
pub fn safe_foods<'a>(foods: &'a [FoodItem], user: &UserProfile) -> Vec<&'a FoodItem> {
    foods.iter().filter(|f| is_safe(f, user)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::Role;

    fn user() -> UserProfile {
        UserProfile::new(1, "Ada", Role::Elderly)
    }

    fn pantry() -> Vec<FoodItem> {
        vec![
            FoodItem::new(1, "Apple", 52.0, "fruit"),
            FoodItem::new(2, "Peanut Butter", 588.0, "protein"),
            FoodItem::new(3, "Whole Wheat Bread", 247.0, "grain"),
            FoodItem::new(4, "Cheddar Cheese", 403.0, "dairy"),
            FoodItem::new(5, "Broccoli", 34.0, "vegetable"),
            FoodItem::new(6, "Coconut Water", 19.0, "fruit"),
            FoodItem::new(7, "Salmon", 208.0, "protein"),
            FoodItem::new(8, "Granola Bar", 471.0, "snack"),
        ]
    }

    fn names(foods: &[&FoodItem]) -> Vec<String> {
        foods.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn allergy_match_ignores_case() {
        let foods = pantry();
        let safe = safe_foods(&foods, &user().with_allergies(["PEANUT"]));
        assert!(!names(&safe).contains(&"Peanut Butter".to_string()));
        assert_eq!(safe.len(), foods.len() - 1);
    }

    #[test]
    fn allergy_match_is_a_loose_substring() {
        let foods = pantry();
        let safe = safe_foods(&foods, &user().with_allergies(["nut"]));
        let safe = names(&safe);
        assert!(!safe.contains(&"Peanut Butter".to_string()));
        assert!(!safe.contains(&"Coconut Water".to_string()));
    }

    #[test]
    fn allergies_that_match_nothing_keep_everything() {
        let foods = vec![
            FoodItem::new(1, "Apple", 50.0, "fruit"),
            FoodItem::new(2, "Rice", 80.0, "grain"),
            FoodItem::new(3, "Egg", 120.0, "protein"),
        ];
        assert_eq!(safe_foods(&foods, &user().with_allergies(["nut"])).len(), 3);
    }

    #[test]
    fn no_safe_food_contains_any_allergy_term() {
        let foods = pantry();
        for terms in [vec!["a"], vec!["an", "ee"], vec!["SALMON", "bread"], vec!["r"]] {
            let u = user().with_allergies(&terms);
            for food in safe_foods(&foods, &u) {
                let lower = food.name.to_lowercase();
                assert!(terms.iter().all(|t| !lower.contains(&t.to_lowercase())));
            }
        }
    }

    #[test]
    fn declared_allergens_also_exclude() {
        let foods = vec![FoodItem::new(1, "Trail Mix", 480.0, "snack").with_allergens(["Almonds"])];
        assert!(safe_foods(&foods, &user().with_allergies(["almonds"])).is_empty());
        assert_eq!(safe_foods(&foods, &user().with_allergies(["milk"])).len(), 1);
    }

    #[test]
    fn restriction_table_is_exact() {
        assert_eq!(permitted_categories("low sodium"), Some(&["fruit", "vegetable", "protein"][..]));
        assert_eq!(permitted_categories("gluten free"), Some(&["fruit", "vegetable", "protein"][..]));
        assert_eq!(
            permitted_categories("heart healthy"),
            Some(&["fruit", "vegetable", "grain", "protein", "dairy"][..])
        );
        assert_eq!(permitted_categories("diabetic"), Some(&["vegetable", "grain", "protein"][..]));
        assert_eq!(permitted_categories("high cholesterol"), Some(&["fruit", "vegetable", "grain"][..]));
        assert_eq!(
            permitted_categories("vegetarian"),
            Some(&["fruit", "vegetable", "grain", "dairy"][..])
        );
        assert_eq!(
            permitted_categories("lactose intolerant"),
            Some(&["fruit", "vegetable", "grain", "protein"][..])
        );
        assert_eq!(RESTRICTION_CATEGORIES.len(), 7);
    }

    #[test]
    fn older_labels_are_not_in_the_table() {
        for label in ["low salt", "diabetes", "cholesterol"] {
            assert_eq!(permitted_categories(label), None);
        }
    }

    #[test]
    fn restriction_labels_are_matched_loosely_on_case_and_padding() {
        assert!(permitted_categories("  Diabetic ").is_some());
    }

    #[test]
    fn survivors_stay_inside_every_known_restriction() {
        let foods = pantry();
        for (label, cats) in RESTRICTION_CATEGORIES {
            let safe = safe_foods(&foods, &user().with_restrictions([*label]));
            assert!(!safe.is_empty());
            assert!(safe.iter().all(|f| cats.contains(&f.category.as_str())), "{label}");
        }
    }

    #[test]
    fn unknown_restrictions_fail_open() {
        let foods = pantry();
        let safe = safe_foods(&foods, &user().with_restrictions(["paleo", "no spicy food"]));
        assert_eq!(safe.len(), foods.len());
    }

    #[test]
    fn several_restrictions_intersect() {
        let foods = pantry();
        let u = user().with_restrictions(["diabetic", "high cholesterol"]);
        let safe = safe_foods(&foods, &u);
        assert!(safe
            .iter()
            .all(|f| f.category == "vegetable" || f.category == "grain"));
        assert_eq!(names(&safe), vec!["Whole Wheat Bread", "Broccoli"]);
    }

    #[test]
    fn rejection_reasons_name_the_stage() {
        let u = user()
            .with_allergies(["peanut"])
            .with_restrictions(["vegetarian"]);
        let butter = FoodItem::new(1, "Peanut Butter", 588.0, "protein");
        let salmon = FoodItem::new(2, "Salmon", 208.0, "protein");
        assert_eq!(
            rejection_reason(&butter, &u),
            Some(Rejection::Allergy("peanut".into()))
        );
        assert_eq!(
            rejection_reason(&salmon, &u),
            Some(Rejection::Restriction {
                restriction: "vegetarian".into(),
                category: "protein".into()
            })
        );
    }
}
