// Helpers partagés par les tests des services et des routes

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::middleware::AuthUser;
use crate::models::dto::CheckInRequest;
use crate::models::users::{self, Role};
use crate::models::{visitors, visits};
use crate::utils::password;

pub const TEST_PASSWORD: &str = "password123";

/// Insère un utilisateur déjà vérifié (mot de passe TEST_PASSWORD)
pub async fn insert_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    role: Role,
    company_name: Option<&str>,
) -> users::Model {
    users::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password::hash_password(TEST_PASSWORD).unwrap()),
        role: Set(role),
        company_name: Set(company_name.map(str::to_string)),
        is_verified: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub fn auth(user: &users::Model) -> AuthUser {
    AuthUser {
        user_id: user.id,
        role: user.role,
    }
}

pub fn check_in_request(visitor_name: &str, email: &str, host_name: &str) -> CheckInRequest {
    CheckInRequest {
        name: visitor_name.to_string(),
        email: email.to_string(),
        phone: Some("555-0100".to_string()),
        designation: None,
        company: Some("Globex".to_string()),
        company_tel: None,
        website: None,
        address: None,
        photo: None,
        id_card_photo: None,
        id_card_number: "ID-42".to_string(),
        host_name: host_name.to_string(),
        reason: Some("Meeting".to_string()),
        items_carried: None,
    }
}

/// Insère une visite à une date donnée sans passer par le check-in
pub async fn insert_visit_at(
    db: &DatabaseConnection,
    host: &users::Model,
    visitor_name: &str,
    visitor_email: &str,
    check_in_time: DateTime<Utc>,
    check_out_time: Option<DateTime<Utc>>,
) -> visits::Model {
    let visitor = visitors::ActiveModel {
        name: Set(visitor_name.to_string()),
        email: Set(visitor_email.to_string()),
        id_card_number: Set("ID-1".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    visits::ActiveModel {
        visitor_id: Set(visitor.id),
        host_id: Set(host.id),
        reason: Set(None),
        items_carried: Set(None),
        check_in_time: Set(check_in_time),
        check_out_time: Set(check_out_time),
        visitor_email: Set(visitor_email.to_lowercase()),
        company_name: Set(host.company_name.clone().unwrap_or_default()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
