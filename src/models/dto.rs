//pour les requêtes et réponses de l'API
use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::users::{self, Role};

/// Champ obligatoire: espaces retirés à la lecture, un texte blanc devient "" et échoue à length(min = 1)
fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

// ----------------------------------------------------------------------------
// Comptes
// ----------------------------------------------------------------------------

// DTO pour POST /registerCompany (admin + entreprise)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompanyRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "companyName is required"))]
    pub company_name: String,
}

// DTO pour POST /register (host créé par un admin)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterHostRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

/// Profil public d'un utilisateur (sans hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub is_verified: bool,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            company_name: user.company_name,
            is_verified: user.is_verified,
        }
    }
}

// Réponse après login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Entrée de la liste déroulante des hosts
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct HostOption {
    pub id: i32,
    pub name: String,
}

// ----------------------------------------------------------------------------
// Visites
// ----------------------------------------------------------------------------

// DTO pour POST /visits (check-in)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub company: Option<String>,
    pub company_tel: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub photo: Option<String>,
    pub id_card_photo: Option<String>,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "idCardNumber is required"))]
    pub id_card_number: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "hostName is required"))]
    pub host_name: String,
    pub reason: Option<String>,
    pub items_carried: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub visit_id: i32,
    pub message: String,
}

/// Filtres bruts de GET /visits (les dates sont parsées par le service)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitQuery {
    pub host_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub host_name: Option<String>,
    pub visitor_name: Option<String>,
}

/// Une ligne du journal des visites (visit + visitor + host)
#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub id: i32,
    pub visitor_id: i32,
    pub visitor_name: String,
    pub visitor_email: String,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub company: Option<String>,
    pub company_tel: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub photo: Option<String>,
    pub id_card_photo: Option<String>,
    pub id_card_number: String,
    pub host_id: i32,
    pub host_name: String,
    pub reason: Option<String>,
    pub items_carried: Option<String>,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
}
