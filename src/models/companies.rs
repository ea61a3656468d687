// ============================================================================
// MODÈLE : COMPANIES
// ============================================================================
//
// Description:
//   Une ligne par entreprise enregistrée via POST /registerCompany.
//   admin_id pointe vers l'admin créé en même temps que l'entreprise.
//
// Colonnes de la table companies:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - name (VARCHAR, UNIQUE, NOT NULL)
//   - admin_id (INTEGER, NOT NULL, FK vers users, ON DELETE CASCADE)
//   - created_at (TIMESTAMPTZ, NOT NULL)
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub admin_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AdminId",
        to = "super::users::Column::Id"
    )]
    Admin,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
