// ============================================================================
// MODÈLE : USERS
// ============================================================================
//
// Description:
//   Utilisateurs de l'application (admins et hosts). Le champ company_name
//   regroupe les utilisateurs d'une même entreprise (tenant).
//
// Colonnes de la table users:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - name (VARCHAR, NOT NULL)
//   - email (VARCHAR, UNIQUE, NOT NULL)
//   - password_hash (VARCHAR, NOT NULL) - pbkdf2:sha256:iterations$salt$hash
//   - role (VARCHAR(16), NOT NULL) - "admin" ou "host"
//   - company_name (VARCHAR, NULL)
//   - is_verified (BOOLEAN, DEFAULT FALSE)
//   - created_at (TIMESTAMPTZ, NOT NULL)
//
// Points d'attention:
//   - Le rôle est fixé à la création, jamais modifié
//   - password_hash n'est jamais sérialisé en JSON
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "host")]
    Host,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)] // Ne jamais exposer le hash en JSON
    pub password_hash: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::visits::Entity")]
    Visits,

    #[sea_orm(has_many = "super::email_verification_tokens::Entity")]
    EmailVerificationTokens,
}

impl Related<super::visits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Visits.def()
    }
}

impl Related<super::email_verification_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmailVerificationTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
