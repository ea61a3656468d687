use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::*;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{CheckInRequest, VisitQuery, VisitRecord};
use crate::models::users::{self, Role};
use crate::models::{visitors, visits};
use crate::services::tenant_service::TenantService;

const ALREADY_CHECKED_IN: &str = "Visitor is already checked in to this company";
const VISIT_NOT_FOUND: &str = "Visit not found or already checked out";

/// Filtres typés de GET /visits (tous optionnels, combinés en ET)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VisitFilter {
    pub host_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub host_name: Option<String>,
    pub visitor_name: Option<String>,
}

impl VisitFilter {
    /// Parse les paramètres bruts; une chaîne vide équivaut à un filtre absent
    pub fn from_query(query: VisitQuery) -> Result<Self, AppError> {
        let start_date = parse_date("startDate", query.start_date.as_deref())?;
        let end_date = parse_date("endDate", query.end_date.as_deref())?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(AppError::Validation("startDate must not be after endDate".to_string()));
            }
        }

        Ok(Self {
            host_id: query.host_id,
            start_date,
            end_date,
            host_name: non_blank(query.host_name),
            visitor_name: non_blank(query.visitor_name),
        })
    }
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} must be a date (YYYY-MM-DD)", field))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// LOWER(table.col) LIKE '%needle%' ESCAPE '!', le texte est cherché littéralement
fn contains_ignore_case<C: ColumnTrait>(col: C, needle: &str) -> sea_query::SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(col.as_column_ref())))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

const LIKE_ESCAPE: char = '!';

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

pub struct VisitService;

impl VisitService {
    /// Check-in: crée visitor + visit dans une seule transaction.
    /// Refuse si le visiteur a déjà une visite active dans l'entreprise du host.
    pub async fn check_in(
        db: &DatabaseConnection,
        auth_user: &AuthUser,
        request: CheckInRequest,
    ) -> Result<visits::Model, AppError> {
        let visitor_email = normalize_email(&request.email);
        let txn = db.begin().await?;

        // 1. Trouver le host (le drop de txn fait le rollback en cas d'erreur)
        let host = Self::resolve_host(&txn, auth_user, &request.host_name).await?;

        // 2. Entreprise du host
        let company_name = TenantService::company_of(&host)?;

        // 3. Visite active pour ce visiteur dans cette entreprise ?
        let active_visit = visits::Entity::find()
            .inner_join(visitors::Entity)
            .inner_join(users::Entity)
            .filter(
                Expr::expr(Func::lower(Expr::col(visitors::Column::Email.as_column_ref())))
                    .eq(visitor_email.as_str()),
            )
            .filter(users::Column::CompanyName.eq(company_name.as_str()))
            .filter(visits::Column::CheckOutTime.is_null())
            .one(&txn)
            .await?;

        if active_visit.is_some() {
            return Err(AppError::Conflict(ALREADY_CHECKED_IN.to_string()));
        }

        // 4. Nouveau visitor (une ligne par visite)
        let visitor = visitors::ActiveModel {
            name: Set(request.name.trim().to_string()),
            email: Set(request.email.trim().to_string()),
            phone: Set(non_blank(request.phone)),
            designation: Set(non_blank(request.designation)),
            company: Set(non_blank(request.company)),
            company_tel: Set(non_blank(request.company_tel)),
            website: Set(non_blank(request.website)),
            address: Set(non_blank(request.address)),
            photo: Set(non_blank(request.photo)),
            id_card_photo: Set(non_blank(request.id_card_photo)),
            id_card_number: Set(request.id_card_number.trim().to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        // 5. Nouvelle visite; l'index unique partiel couvre la course entre deux check-ins
        let visit = visits::ActiveModel {
            visitor_id: Set(visitor.id),
            host_id: Set(host.id),
            reason: Set(non_blank(request.reason)),
            items_carried: Set(non_blank(request.items_carried)),
            check_in_time: Set(Utc::now()),
            check_out_time: Set(None),
            visitor_email: Set(visitor_email),
            company_name: Set(company_name),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, ALREADY_CHECKED_IN))?;

        // 6. Commit
        txn.commit()
            .await
            .map_err(|e| AppError::conflict_on_unique(e, ALREADY_CHECKED_IN))?;

        tracing::info!(
            visit_id = visit.id,
            host_id = visit.host_id,
            company = %visit.company_name,
            "check-in created"
        );
        Ok(visit)
    }

    /// Host: hostName doit être son propre nom. Admin: hostName doit être un host de son entreprise.
    async fn resolve_host<C: ConnectionTrait>(
        db: &C,
        auth_user: &AuthUser,
        host_name: &str,
    ) -> Result<users::Model, AppError> {
        let host_name = host_name.trim().to_lowercase();

        match auth_user.role {
            Role::Host => {
                let me = users::Entity::find_by_id(auth_user.user_id)
                    .one(db)
                    .await?
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

                if me.name.trim().to_lowercase() != host_name {
                    return Err(AppError::Forbidden(
                        "Hosts can only check in visitors for themselves".to_string(),
                    ));
                }
                Ok(me)
            }
            Role::Admin => {
                let company_name = TenantService::resolve_company(db, auth_user.user_id).await?;

                users::Entity::find()
                    .filter(users::Column::Role.eq(Role::Host))
                    .filter(users::Column::CompanyName.eq(company_name.as_str()))
                    .filter(Expr::expr(Func::lower(Expr::col(users::Column::Name.as_column_ref()))).eq(host_name.as_str()))
                    .order_by_asc(users::Column::Id)
                    .one(db)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Host not found in your company".to_string()))
            }
        }
    }

    /// Checkout: UPDATE conditionnel (check_out_time IS NULL), sûr en concurrence.
    /// Visite inconnue et visite déjà terminée donnent la même réponse NotFound.
    pub async fn check_out(
        db: &DatabaseConnection,
        auth_user: &AuthUser,
        visit_id: i32,
    ) -> Result<visits::Model, AppError> {
        let txn = db.begin().await?;

        let visit = visits::Entity::find_by_id(visit_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(VISIT_NOT_FOUND.to_string()))?;

        match auth_user.role {
            Role::Host => {
                if visit.host_id != auth_user.user_id {
                    return Err(AppError::Forbidden(
                        "You can only check out your own visitors".to_string(),
                    ));
                }
            }
            Role::Admin => {
                // Une visite d'une autre entreprise n'existe pas pour cet admin
                let company_name = TenantService::resolve_company(&txn, auth_user.user_id).await?;
                if visit.company_name != company_name {
                    return Err(AppError::NotFound(VISIT_NOT_FOUND.to_string()));
                }
            }
        }

        if !visit.is_active() {
            return Err(AppError::NotFound(VISIT_NOT_FOUND.to_string()));
        }

        // Le WHERE check_out_time IS NULL reste l'arbitre en cas de checkouts concurrents
        let result = visits::Entity::update_many()
            .col_expr(visits::Column::CheckOutTime, Expr::value(Utc::now()))
            .filter(visits::Column::Id.eq(visit_id))
            .filter(visits::Column::CheckOutTime.is_null())
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(VISIT_NOT_FOUND.to_string()));
        }

        let updated = visits::Entity::find_by_id(visit_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(VISIT_NOT_FOUND.to_string()))?;

        txn.commit().await?;

        tracing::info!(visit_id, by = auth_user.user_id, "checkout");
        Ok(updated)
    }

    /// Journal des visites d'une entreprise (admin), filtres combinés en ET
    pub async fn list_company_visits(
        db: &DatabaseConnection,
        auth_user: &AuthUser,
        filter: &VisitFilter,
    ) -> Result<Vec<VisitRecord>, AppError> {
        let company_name = TenantService::resolve_company(db, auth_user.user_id).await?;

        let mut query = Self::visit_records().filter(users::Column::CompanyName.eq(company_name.as_str()));

        if let Some(host_id) = filter.host_id {
            query = query.filter(visits::Column::HostId.eq(host_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(visits::Column::CheckInTime.gte(start_of_day(start)));
        }
        if let Some(end) = filter.end_date {
            // Inclusif: tout ce qui précède minuit du lendemain
            if let Some(next_day) = end.succ_opt() {
                query = query.filter(visits::Column::CheckInTime.lt(start_of_day(next_day)));
            }
        }
        if let Some(host_name) = &filter.host_name {
            query = query.filter(contains_ignore_case(users::Column::Name, host_name));
        }
        if let Some(visitor_name) = &filter.visitor_name {
            query = query.filter(contains_ignore_case(visitors::Column::Name, visitor_name));
        }

        Ok(Self::newest_first(query).into_model::<VisitRecord>().all(db).await?)
    }

    /// Visites d'un host (sans filtre)
    pub async fn list_host_visits(
        db: &DatabaseConnection,
        host_id: i32,
    ) -> Result<Vec<VisitRecord>, AppError> {
        let query = Self::visit_records().filter(visits::Column::HostId.eq(host_id));

        Ok(Self::newest_first(query).into_model::<VisitRecord>().all(db).await?)
    }

    fn newest_first(query: Select<visits::Entity>) -> Select<visits::Entity> {
        query
            .order_by_desc(visits::Column::CheckInTime)
            .order_by_desc(visits::Column::Id)
    }

    /// SELECT visits JOIN visitors JOIN users (host), colonnes de VisitRecord
    fn visit_records() -> Select<visits::Entity> {
        visits::Entity::find()
            .select_only()
            .column(visits::Column::Id)
            .column(visits::Column::VisitorId)
            .column_as(visitors::Column::Name, "visitor_name")
            .column_as(visitors::Column::Email, "visitor_email")
            .column(visitors::Column::Phone)
            .column(visitors::Column::Designation)
            .column(visitors::Column::Company)
            .column(visitors::Column::CompanyTel)
            .column(visitors::Column::Website)
            .column(visitors::Column::Address)
            .column(visitors::Column::Photo)
            .column(visitors::Column::IdCardPhoto)
            .column(visitors::Column::IdCardNumber)
            .column(visits::Column::HostId)
            .column_as(users::Column::Name, "host_name")
            .column(visits::Column::Reason)
            .column(visits::Column::ItemsCarried)
            .column(visits::Column::CheckInTime)
            .column(visits::Column::CheckOutTime)
            .inner_join(visitors::Entity)
            .inner_join(users::Entity)
    }
}
