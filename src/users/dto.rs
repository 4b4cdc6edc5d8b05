use serde::Serialize;

use super::{
    repo_types::{CaretakerRecord, ContactInformation},
    services::ElderlyWithCaretaker,
};

/// Caretaker as shown to other users; no account data.
#[derive(Debug, Serialize)]
pub struct CaretakerSummary {
    pub id: i64,
    pub name: String,
    pub association: String,
    pub contact_information: ContactInformation,
}

impl From<CaretakerRecord> for CaretakerSummary {
    fn from(c: CaretakerRecord) -> Self {
        Self {
            id: c.id,
            name: c.name,
            association: c.association,
            contact_information: c.contact_information,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ElderlyListItem {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub allergies: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub medications: Vec<String>,
    pub daily_calories: u32,
    pub contact_information: ContactInformation,
    pub caretaker: Option<CaretakerSummary>,
}

impl From<ElderlyWithCaretaker> for ElderlyListItem {
    fn from(v: ElderlyWithCaretaker) -> Self {
        let e = v.elderly;
        Self {
            id: e.id,
            name: e.name,
            age: e.age,
            allergies: e.allergies,
            dietary_restrictions: e.dietary_restrictions,
            medications: e.medications,
            daily_calories: e.daily_calories,
            contact_information: e.contact_information,
            caretaker: v.caretaker.map(CaretakerSummary::from),
        }
    }
}
