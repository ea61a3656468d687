// ============================================================================
// MODÈLE : VISITS
// ============================================================================
//
// Description:
//   Une visite = un check-in d'un visitor chez un host. check_out_time reste
//   NULL tant que la visite est active.
//
// Colonnes de la table visits:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - visitor_id (INTEGER, NOT NULL, FK vers visitors, ON DELETE CASCADE)
//   - host_id (INTEGER, NOT NULL, FK vers users, ON DELETE CASCADE)
//   - reason, items_carried (VARCHAR, NULL)
//   - check_in_time (TIMESTAMPTZ, NOT NULL)
//   - check_out_time (TIMESTAMPTZ, NULL)
//   - visitor_email (VARCHAR, NOT NULL) - copie en minuscules de visitors.email
//   - company_name (VARCHAR, NOT NULL) - copie de users.company_name du host
//
// Points d'attention:
//   - Index unique partiel ux_visits_active_per_company sur
//     (visitor_email, company_name) WHERE check_out_time IS NULL :
//     un visiteur ne peut pas être "dedans" deux fois dans la même entreprise
//   - check_out_time n'est modifié qu'une seule fois (checkout)
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "visits")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub visitor_id: i32,
    pub host_id: i32,
    pub reason: Option<String>,
    pub items_carried: Option<String>,
    pub check_in_time: DateTimeUtc,
    pub check_out_time: Option<DateTimeUtc>,
    pub visitor_email: String,
    pub company_name: String,
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.check_out_time.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::visitors::Entity",
        from = "Column::VisitorId",
        to = "super::visitors::Column::Id"
    )]
    Visitor,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::HostId",
        to = "super::users::Column::Id"
    )]
    Host,
}

impl Related<super::visitors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Visitor.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Host.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
