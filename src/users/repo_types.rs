use serde::{Deserialize, Serialize};

use super::profile::Role;

pub const DEFAULT_DAILY_CALORIES: u32 = 1800;

/// Persisted users: `{ "elderly_users": [...], "caretaker_users": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub elderly_users: Vec<ElderlyRecord>,
    #[serde(default)]
    pub caretaker_users: Vec<CaretakerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String, // argon2 PHC string
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInformation {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElderlyRecord {
    pub id: i64,
    #[serde(default = "elderly_role")]
    pub role: Role,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub weight_lbs: Option<u32>,
    #[serde(default)]
    pub height_in: Option<u32>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default = "default_daily_calories")]
    pub daily_calories: u32,
    #[serde(default)]
    pub cooking_skill: u8,
    #[serde(default)]
    pub preferred_cuisines: Vec<String>,
    pub account: Account,
    #[serde(default)]
    pub contact_information: ContactInformation,
    #[serde(default)]
    pub caretaker_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meals: Vec<MealLogEntry>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub last_meal_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaretakerRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub association: String,
    pub account: Account,
    #[serde(default)]
    pub contact_information: ContactInformation,
    #[serde(default)]
    pub elderly_user_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dietary_restrictions: Vec<String>,
    #[serde(default = "default_daily_calories")]
    pub daily_calories: u32,
    #[serde(default)]
    pub cooking_skill: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_cuisines: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meals: Vec<MealLogEntry>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub last_meal_id: u64,
}

/// A logged portion of a catalog food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLogEntry {
    #[serde(default)]
    pub id: u64,
    pub food_id: i64,
    pub name: String,
    pub quantity: f64, // grams
    pub meal_type: String,
    pub calories: f64,
    pub timestamp: String,
    #[serde(default)]
    pub allergens: Vec<String>,
}

fn elderly_role() -> Role {
    Role::Elderly
}

fn default_daily_calories() -> u32 {
    DEFAULT_DAILY_CALORIES
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

/// A user's meal log together with the highest entry id ever handed out.
pub struct MealLogMut<'a> {
    pub entries: &'a mut Vec<MealLogEntry>,
    last_id: &'a mut u64,
}

impl MealLogMut<'_> {
    /// Ids never come back, even after the newest entry is deleted.
    pub fn next_id(&mut self) -> u64 {
        let id = self
            .entries
            .iter()
            .map(|m| m.id)
            .chain([*self.last_id])
            .max()
            .unwrap_or(0)
            + 1;
        *self.last_id = id;
        id
    }
}

impl UserDocument {
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.elderly_users
            .iter()
            .map(|e| &e.account)
            .chain(self.caretaker_users.iter().map(|c| &c.account))
    }

    pub fn accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.elderly_users
            .iter_mut()
            .map(|e| &mut e.account)
            .chain(self.caretaker_users.iter_mut().map(|c| &mut c.account))
    }

    pub fn username_exists(&self, username: &str) -> bool {
        self.accounts().any(|a| a.username == username)
    }

    /// Meal log of the user with this id and role.
    pub fn meals_mut(&mut self, user_id: i64, role: Role) -> Option<MealLogMut<'_>> {
        match role {
            Role::Elderly => self
                .elderly_users
                .iter_mut()
                .find(|e| e.id == user_id)
                .map(|e| MealLogMut {
                    entries: &mut e.meals,
                    last_id: &mut e.last_meal_id,
                }),
            Role::Caretaker => self
                .caretaker_users
                .iter_mut()
                .find(|c| c.id == user_id)
                .map(|c| MealLogMut {
                    entries: &mut c.meals,
                    last_id: &mut c.last_meal_id,
                }),
        }
    }

    pub fn meals(&self, user_id: i64, role: Role) -> Option<&[MealLogEntry]> {
        match role {
            Role::Elderly => self
                .elderly_users
                .iter()
                .find(|e| e.id == user_id)
                .map(|e| e.meals.as_slice()),
            Role::Caretaker => self
                .caretaker_users
                .iter()
                .find(|c| c.id == user_id)
                .map(|c| c.meals.as_slice()),
        }
    }
}
