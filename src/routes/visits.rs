use actix_web::{get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{CheckInRequest, CheckInResponse, VisitQuery};
use crate::services::visit_service::{VisitFilter, VisitService};

/// POST /visits - Check-in d'un visiteur (ADMIN/HOST)
#[post("/visits")]
pub async fn create_visit(
    auth_user: AuthUser,
    request: web::Json<CheckInRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let visit = VisitService::check_in(db.get_ref(), &auth_user, request.into_inner()).await?;

    Ok(HttpResponse::Created().json(CheckInResponse {
        visit_id: visit.id,
        message: "Visitor checked in successfully".to_string(),
    }))
}

/// GET /visits - Journal des visites de l'entreprise, filtrable (ADMIN)
#[get("/visits")]
pub async fn list_visits(
    auth_user: AuthUser,
    query: web::Query<VisitQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    auth_user.require_admin()?;

    let filter = VisitFilter::from_query(query.into_inner())?;
    let visits = VisitService::list_company_visits(db.get_ref(), &auth_user, &filter).await?;

    Ok(HttpResponse::Ok().json(visits))
}

/// GET /host-visits - Visites du host connecté (HOST)
#[get("/host-visits")]
pub async fn host_visits(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    auth_user.require_host()?;

    let visits = VisitService::list_host_visits(db.get_ref(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(visits))
}

/// PUT /visits/{id}/checkout - Terminer une visite (ADMIN/HOST)
#[put("/visits/{id}/checkout")]
pub async fn checkout(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let visit = VisitService::check_out(db.get_ref(), &auth_user, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Visitor checked out successfully",
        "visitId": visit.id,
        "checkOutTime": visit.check_out_time
    })))
}

pub fn visits_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_visit)
        .service(list_visits)
        .service(host_visits)
        .service(checkout);
}
