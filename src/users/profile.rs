use std::fmt;

use serde::{Deserialize, Serialize};

use super::repo_types::{CaretakerRecord, ElderlyRecord, DEFAULT_DAILY_CALORIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Elderly,
    Caretaker,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Elderly => f.write_str("elderly"),
            Role::Caretaker => f.write_str("caretaker"),
        }
    }
}

/// The fields meal planning cares about, for either kind of user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub age: Option<u32>,
    pub role: Role,
    pub allergies: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub daily_calories: u32,
    pub cooking_skill: u8,
    pub preferred_cuisines: Vec<String>,
    pub caretaker_id: Option<i64>,
    pub elderly_user_ids: Vec<i64>,
}

/// Trim terms and drop blank ones. An empty allergy term would otherwise
/// match every food name.
pub fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl UserProfile {
    pub fn new(id: i64, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            age: None,
            role,
            allergies: Vec::new(),
            dietary_restrictions: Vec::new(),
            daily_calories: DEFAULT_DAILY_CALORIES,
            cooking_skill: 0,
            preferred_cuisines: Vec::new(),
            caretaker_id: None,
            elderly_user_ids: Vec::new(),
        }
    }

    pub fn with_allergies<I, S>(mut self, allergies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allergies = normalize_terms(allergies);
        self
    }

    pub fn with_restrictions<I, S>(mut self, restrictions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dietary_restrictions = normalize_terms(restrictions);
        self
    }
}

impl From<&ElderlyRecord> for UserProfile {
    fn from(e: &ElderlyRecord) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            age: Some(e.age),
            role: Role::Elderly,
            allergies: normalize_terms(&e.allergies),
            dietary_restrictions: normalize_terms(&e.dietary_restrictions),
            daily_calories: e.daily_calories,
            cooking_skill: e.cooking_skill,
            preferred_cuisines: e.preferred_cuisines.clone(),
            caretaker_id: e.caretaker_id,
            elderly_user_ids: Vec::new(),
        }
    }
}

impl From<&CaretakerRecord> for UserProfile {
    fn from(c: &CaretakerRecord) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            age: None,
            role: Role::Caretaker,
            allergies: normalize_terms(&c.allergies),
            dietary_restrictions: normalize_terms(&c.dietary_restrictions),
            daily_calories: c.daily_calories,
            cooking_skill: c.cooking_skill,
            preferred_cuisines: c.preferred_cuisines.clone(),
            caretaker_id: None,
            elderly_user_ids: c.elderly_user_ids.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_terms_are_dropped() {
        let terms = normalize_terms([" peanut ", "", "   ", "shellfish"]);
        assert_eq!(terms, vec!["peanut", "shellfish"]);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Caretaker).unwrap(), "\"caretaker\"");
        assert_eq!(Role::Elderly.to_string(), "elderly");
    }
}
