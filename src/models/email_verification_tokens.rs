// ============================================================================
// MODÈLE : EMAIL VERIFICATION TOKENS
// ============================================================================
//
// Description:
//   Tokens de vérification d'email émis à la création d'un admin
//   (POST /registerCompany) ou d'un host (POST /register).
//
// Colonnes de la table email_verification_tokens:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - user_id (INTEGER, NOT NULL, FK vers users, ON DELETE CASCADE)
//   - token (VARCHAR, UNIQUE, NOT NULL) - UUID v4
//   - expires_at (TIMESTAMPTZ, NOT NULL) - created_at + 24 heures
//   - used (BOOLEAN, DEFAULT FALSE, NOT NULL)
//   - created_at (TIMESTAMPTZ, NOT NULL)
//
// Workflow:
//   1. Admin/host créé avec is_verified = false
//   2. Backend génère un token UUID v4 et l'insère dans cette table
//   3. Backend envoie un email avec le lien /verify-email?token=xxx
//   4. Backend vérifie: token existe, not expired, not used
//   5. Backend met users.is_verified = true et used = true
//
// ============================================================================

use chrono::{Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durée de validité d'un token (24 heures)
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "email_verification_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(unique)]
    pub token: String,

    pub expires_at: DateTimeUtc,

    pub used: bool,

    pub created_at: DateTimeUtc,
}

impl Model {
    /// Un token est utilisable s'il n'a pas servi et n'a pas expiré
    pub fn is_usable(&self, now: DateTimeUtc) -> bool {
        !self.used && self.expires_at > now
    }
}

impl ActiveModel {
    /// Prépare un nouveau token UUID v4 pour un utilisateur
    pub fn issue(user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            user_id: Set(user_id),
            token: Set(Uuid::new_v4().to_string()),
            expires_at: Set(now + Duration::hours(TOKEN_TTL_HOURS)),
            used: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
