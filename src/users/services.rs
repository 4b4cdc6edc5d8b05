use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::{
    profile::{normalize_terms, UserProfile},
    repo_types::{
        Account, CaretakerRecord, ContactInformation, ElderlyRecord, MealLogEntry, UserDocument,
        DEFAULT_DAILY_CALORIES,
    },
    Role,
};
use crate::{
    auth::password::{hash_password, is_password_hash, verify_password},
    catalog::FoodItem,
    clock::now_rfc3339,
    error::LoadError,
    meals::filter::rejection_reason,
    storage::{load_or_default, JsonStore},
};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Username already exists")]
    UsernameTaken,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum MealLogError {
    #[error("user {0} not found")]
    UnknownUser(i64),
    #[error("{food} is not safe: {reason}")]
    UnsafeFood { food: String, reason: String },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Registration data for an elderly user; `password` is plain text.
#[derive(Debug, Clone)]
pub struct NewElderly {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub weight_lbs: Option<u32>,
    pub height_in: Option<u32>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub cooking_skill: u8,
    pub preferred_cuisines: Vec<String>,
    pub contact: ContactInformation,
}

#[derive(Debug, Clone)]
pub struct NewCaretaker {
    pub username: String,
    pub password: String,
    pub name: String,
    pub association: String,
    pub contact: ContactInformation,
    pub elderly_user_ids: Vec<i64>,
}

/// Elderly record joined with its caretaker, if the reference resolves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElderlyWithCaretaker {
    pub elderly: ElderlyRecord,
    pub caretaker: Option<CaretakerRecord>,
}

/// All users as profiles: elderly first, then caretakers.
pub fn profiles_from_document(doc: &UserDocument) -> Vec<UserProfile> {
    doc.elderly_users
        .iter()
        .map(UserProfile::from)
        .chain(doc.caretaker_users.iter().map(UserProfile::from))
        .collect()
}

pub async fn load_profiles(
    store: &dyn JsonStore<UserDocument>,
) -> Result<Vec<UserProfile>, LoadError> {
    Ok(profiles_from_document(&store.load().await?))
}

/// Linear scan; the first profile with `id` wins.
pub fn find_profile(profiles: &[UserProfile], id: i64) -> Option<&UserProfile> {
    profiles.iter().find(|p| p.id == id)
}

/// Like [`find_profile`], but elderly and caretaker ids are separate spaces.
pub fn find_profile_as(profiles: &[UserProfile], id: i64, role: Role) -> Option<&UserProfile> {
    profiles.iter().find(|p| p.id == id && p.role == role)
}

pub fn elderly_with_caretakers(doc: &UserDocument) -> Vec<ElderlyWithCaretaker> {
    doc.elderly_users
        .iter()
        .map(|e| ElderlyWithCaretaker {
            elderly: e.clone(),
            caretaker: e
                .caretaker_id
                .and_then(|cid| doc.caretaker_users.iter().find(|c| c.id == cid))
                .cloned(),
        })
        .collect()
}

/// Elderly ids start at 1.
pub fn next_elderly_id(doc: &UserDocument) -> i64 {
    doc.elderly_users.iter().map(|e| e.id).chain([0]).max().unwrap_or(0) + 1
}

/// Caretaker ids start at 100.
pub fn next_caretaker_id(doc: &UserDocument) -> i64 {
    doc.caretaker_users.iter().map(|c| c.id).chain([99]).max().unwrap_or(99) + 1
}

pub fn insert_elderly(doc: &mut UserDocument, new: NewElderly, password_hash: String) -> i64 {
    let id = next_elderly_id(doc);
    doc.elderly_users.push(ElderlyRecord {
        id,
        role: Role::Elderly,
        name: format!("{} {}", new.first_name.trim(), new.last_name.trim()),
        age: new.age,
        weight_lbs: new.weight_lbs,
        height_in: new.height_in,
        medications: normalize_terms(&new.medications),
        allergies: normalize_terms(&new.allergies),
        dietary_restrictions: normalize_terms(&new.dietary_restrictions),
        daily_calories: DEFAULT_DAILY_CALORIES,
        cooking_skill: new.cooking_skill,
        preferred_cuisines: normalize_terms(&new.preferred_cuisines),
        account: Account {
            username: new.username,
            password: password_hash,
        },
        contact_information: new.contact,
        caretaker_id: None,
        meals: Vec::new(),
        last_meal_id: 0,
    });
    id
}

/// Adds the caretaker and points every selected elderly user at it.
pub fn insert_caretaker(doc: &mut UserDocument, new: NewCaretaker, password_hash: String) -> i64 {
    let id = next_caretaker_id(doc);
    for elderly in doc
        .elderly_users
        .iter_mut()
        .filter(|e| new.elderly_user_ids.contains(&e.id))
    {
        elderly.caretaker_id = Some(id);
    }
    doc.caretaker_users.push(CaretakerRecord {
        id,
        name: new.name.trim().to_string(),
        association: new.association,
        account: Account {
            username: new.username,
            password: password_hash,
        },
        contact_information: new.contact,
        elderly_user_ids: new.elderly_user_ids,
        allergies: Vec::new(),
        dietary_restrictions: Vec::new(),
        daily_calories: DEFAULT_DAILY_CALORIES,
        cooking_skill: 0,
        preferred_cuisines: Vec::new(),
        meals: Vec::new(),
        last_meal_id: 0,
    });
    id
}

/// Append a log entry for `food`, refusing foods unsafe for the user.
pub fn append_meal(
    doc: &mut UserDocument,
    user_id: i64,
    role: Role,
    food: &FoodItem,
    quantity: f64,
    meal_type: &str,
    timestamp: String,
) -> Result<MealLogEntry, MealLogError> {
    let profile = find_profile_as(&profiles_from_document(doc), user_id, role)
        .cloned()
        .ok_or(MealLogError::UnknownUser(user_id))?;
    if let Some(reason) = rejection_reason(food, &profile) {
        return Err(MealLogError::UnsafeFood {
            food: food.name.clone(),
            reason: reason.to_string(),
        });
    }

    let mut log = doc
        .meals_mut(user_id, role)
        .ok_or(MealLogError::UnknownUser(user_id))?;
    let entry = MealLogEntry {
        id: log.next_id(),
        food_id: food.item_id,
        name: food.name.clone(),
        quantity,
        meal_type: meal_type.trim().to_string(),
        // catalog calories are per 100g
        calories: food.calories * quantity / 100.0,
        timestamp,
        allergens: food.allergens.clone(),
    };
    log.entries.push(entry.clone());
    Ok(entry)
}

/// Removes every entry with this exact timestamp. Returns how many went.
pub fn remove_meals(doc: &mut UserDocument, user_id: i64, role: Role, timestamp: &str) -> usize {
    let Some(log) = doc.meals_mut(user_id, role) else {
        return 0;
    };
    let meals = log.entries;
    let before = meals.len();
    meals.retain(|m| m.timestamp != timestamp);
    before - meals.len()
}

/// Replace every plain-text password with its argon2 hash. Accounts that
/// already hold a hash are left alone. Returns how many were rewritten.
pub fn hash_plaintext_passwords(doc: &mut UserDocument) -> anyhow::Result<usize> {
    let mut hashed = 0;
    for account in doc.accounts_mut() {
        if is_password_hash(&account.password) {
            continue;
        }
        account.password = hash_password(&account.password)?;
        hashed += 1;
    }
    Ok(hashed)
}

/// Users file behind a store, with writers in this process serialized.
pub struct UserDirectory {
    store: Arc<dyn JsonStore<UserDocument>>,
    write_lock: Mutex<()>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn JsonStore<UserDocument>>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn document(&self) -> Result<UserDocument, LoadError> {
        self.store.load().await
    }

    pub async fn profiles(&self) -> Result<Vec<UserProfile>, LoadError> {
        load_profiles(self.store.as_ref()).await
    }

    pub async fn profile(&self, id: i64) -> Result<Option<UserProfile>, LoadError> {
        let profiles = self.profiles().await?;
        Ok(find_profile(&profiles, id).cloned())
    }

    pub async fn profile_as(&self, id: i64, role: Role) -> Result<Option<UserProfile>, LoadError> {
        let profiles = self.profiles().await?;
        Ok(find_profile_as(&profiles, id, role).cloned())
    }

    pub async fn elderly_with_caretakers(&self) -> Result<Vec<ElderlyWithCaretaker>, LoadError> {
        Ok(elderly_with_caretakers(&self.store.load().await?))
    }

    /// Profile of the account with these credentials, if they match.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<UserProfile>> {
        let doc = load_or_default(self.store.as_ref()).await?;
        let found = doc
            .elderly_users
            .iter()
            .find(|e| e.account.username == username)
            .map(|e| (UserProfile::from(e), &e.account))
            .or_else(|| {
                doc.caretaker_users
                    .iter()
                    .find(|c| c.account.username == username)
                    .map(|c| (UserProfile::from(c), &c.account))
            });

        let Some((profile, account)) = found else {
            return Ok(None);
        };
        if verify_password(password, &account.password)? {
            Ok(Some(profile))
        } else {
            Ok(None)
        }
    }

    #[instrument(skip(self, new), fields(username = %new.username))]
    pub async fn register_elderly(&self, new: NewElderly) -> Result<UserProfile, RegisterError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = load_or_default(self.store.as_ref()).await?;
        if doc.username_exists(&new.username) {
            warn!("username already registered");
            return Err(RegisterError::UsernameTaken);
        }
        let hash = hash_password(&new.password)?;
        let id = insert_elderly(&mut doc, new, hash);
        self.store.save(&doc).await?;
        info!(user_id = id, "elderly user registered");
        let profiles = profiles_from_document(&doc);
        find_profile_as(&profiles, id, Role::Elderly)
            .cloned()
            .ok_or_else(|| RegisterError::Other(anyhow::anyhow!("user {id} missing after insert")))
    }

    #[instrument(skip(self, new), fields(username = %new.username))]
    pub async fn register_caretaker(&self, new: NewCaretaker) -> Result<UserProfile, RegisterError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = load_or_default(self.store.as_ref()).await?;
        if doc.username_exists(&new.username) {
            warn!("username already registered");
            return Err(RegisterError::UsernameTaken);
        }
        let hash = hash_password(&new.password)?;
        let id = insert_caretaker(&mut doc, new, hash);
        self.store.save(&doc).await?;
        info!(user_id = id, "caretaker registered");
        let profiles = profiles_from_document(&doc);
        find_profile_as(&profiles, id, Role::Caretaker)
            .cloned()
            .ok_or_else(|| RegisterError::Other(anyhow::anyhow!("user {id} missing after insert")))
    }

    /// `None` when the user does not exist.
    pub async fn meal_log(
        &self,
        user_id: i64,
        role: Role,
    ) -> Result<Option<Vec<MealLogEntry>>, LoadError> {
        let doc = self.store.load().await?;
        Ok(doc.meals(user_id, role).map(<[MealLogEntry]>::to_vec))
    }

    #[instrument(skip(self, food), fields(food_id = food.item_id))]
    pub async fn log_meal(
        &self,
        user_id: i64,
        role: Role,
        food: &FoodItem,
        quantity: f64,
        meal_type: &str,
    ) -> Result<MealLogEntry, MealLogError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.load().await?;
        let entry = append_meal(&mut doc, user_id, role, food, quantity, meal_type, now_rfc3339())?;
        self.store.save(&doc).await?;
        info!(user_id, entry_id = entry.id, calories = entry.calories, "meal logged");
        Ok(entry)
    }

    #[instrument(skip(self))]
    pub async fn delete_meals(
        &self,
        user_id: i64,
        role: Role,
        timestamp: &str,
    ) -> anyhow::Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.load().await?;
        let removed = remove_meals(&mut doc, user_id, role, timestamp);
        if removed > 0 {
            self.store.save(&doc).await?;
            info!(user_id, removed, "meal entries deleted");
        }
        Ok(removed)
    }
}
