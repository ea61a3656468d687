use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::UserResponse;
use crate::services::account_service::AccountService;

/// GET /users - Utilisateurs de l'entreprise (ADMIN)
#[get("/users")]
pub async fn list_users(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let users: Vec<UserResponse> = AccountService::list_users(db.get_ref(), &auth_user)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

/// GET /hosts - Hosts de l'entreprise pour la liste déroulante (ADMIN/HOST)
#[get("/hosts")]
pub async fn list_hosts(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let hosts = AccountService::list_hosts(db.get_ref(), &auth_user).await?;

    Ok(HttpResponse::Ok().json(hosts))
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users).service(list_hosts);
}
