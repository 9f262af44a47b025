use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Credential row backing Basic Authentication. Never serialized into an
/// API response.
#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub pwd_hash: String,
    pub created_at: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Participant {
    pub id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub dob: String,
}

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct ParticipantSummary {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct PersonalDetails {
    pub firstname: String,
    pub lastname: String,
    pub dob: String,
}

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct WorkDetails {
    pub companyname: String,
    pub salary: f64,
    pub currency: String,
}

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct HomeDetails {
    pub country: String,
    pub city: String,
}

/// Body shape accepted by add and update. Every field is optional at the
/// serde layer so the validator can report all missing fields in one pass
/// instead of failing on the first.
#[derive(Deserialize, Debug, Clone)]
pub struct ParticipantPayload {
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub dob: Option<String>,
    pub work: Option<WorkPayload>,
    pub home: Option<HomePayload>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WorkPayload {
    pub companyname: Option<String>,
    pub salary: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HomePayload {
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Validated participant record, ready for the store.
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub dob: String,
    pub work: NewWork,
    pub home: NewHome,
}

#[derive(Debug, Clone)]
pub struct NewWork {
    pub companyname: String,
    pub salary: f64,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct NewHome {
    pub country: String,
    pub city: String,
}
