// ============================================================================
// MODÈLE : VISITORS
// ============================================================================
//
// Description:
//   Identité déclarée par un visiteur lors d'UNE visite. Une nouvelle ligne
//   est créée à chaque check-in, même si l'email a déjà été vu.
//
// Colonnes de la table visitors:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - name, email (VARCHAR, NOT NULL)
//   - phone, designation, company, company_tel, website, address (NULL)
//   - photo, id_card_photo (TEXT, NULL) - URL ou data URI
//   - id_card_number (VARCHAR, NOT NULL)
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "visitors")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub company: Option<String>,
    pub company_tel: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub photo: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub id_card_photo: Option<String>,
    pub id_card_number: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::visits::Entity")]
    Visits,
}

impl Related<super::visits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Visits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
