use tracing::{instrument, warn};

use super::generator::{recommend_meals, Meal, MealTime};
use crate::{
    catalog::Inventory,
    users::{UserDirectory, UserProfile},
};

/// Three suggestions for `user_id`. Unknown users, unreadable data and an
/// empty catalog all give an empty list.
#[instrument(skip(users, inventory))]
pub async fn get_meal_recommendations(
    users: &UserDirectory,
    inventory: &Inventory,
    user_id: i64,
    meal_time: MealTime,
) -> Vec<Meal> {
    match users.profile(user_id).await {
        Ok(Some(user)) => recommendations_for(inventory, &user, meal_time).await,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "loading users failed");
            Vec::new()
        }
    }
}

/// Three suggestions for an already resolved profile.
#[instrument(skip(inventory, user), fields(user_id = user.id))]
pub async fn recommendations_for(
    inventory: &Inventory,
    user: &UserProfile,
    meal_time: MealTime,
) -> Vec<Meal> {
    let foods = match inventory.foods().await {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, "loading foods failed");
            return Vec::new();
        }
    };
    if foods.is_empty() {
        return Vec::new();
    }

    let mut rng = rand::thread_rng();
    recommend_meals(user, &foods, meal_time, &mut rng)
}
