use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{
    AuthResponse, LoginRequest, RegisterCompanyRequest, RegisterHostRequest, UserResponse, VerifyEmailQuery,
};
use crate::services::account_service::{AccountService, Registration};
use crate::utils::jwt::JwtKeys;
use crate::utils::mailer::Mailer;

fn registered(registration: &Registration, email_sent: bool) -> HttpResponse {
    HttpResponse::Created().json(serde_json::json!({
        "message": "Registration successful, please verify your email",
        "userId": registration.user.id,
        "emailSent": email_sent
    }))
}

/// POST /registerCompany - Créer une entreprise et son admin (PUBLIC)
#[post("/registerCompany")]
pub async fn register_company(
    body: web::Json<RegisterCompanyRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let registration = AccountService::register_company(db.get_ref(), body.into_inner()).await?;
    let email_sent = AccountService::send_verification(mailer.get_ref(), &config.public_base_url, &registration).await;

    Ok(registered(&registration, email_sent))
}

/// POST /register - Créer un host dans l'entreprise de l'admin (ADMIN)
#[post("/register")]
pub async fn register_host(
    auth_user: AuthUser,
    body: web::Json<RegisterHostRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    auth_user.require_admin()?;
    body.validate()?;

    let registration = AccountService::register_host(db.get_ref(), &auth_user, body.into_inner()).await?;
    let email_sent = AccountService::send_verification(mailer.get_ref(), &config.public_base_url, &registration).await;

    Ok(registered(&registration, email_sent))
}

/// GET /verify-email?token=xxx - Valider l'email (PUBLIC)
#[get("/verify-email")]
pub async fn verify_email(
    query: web::Query<VerifyEmailQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let user = AccountService::verify_email(db.get_ref(), &query.token).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Email verified successfully",
        "userId": user.id
    })))
}

/// POST /login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    keys: web::Data<JwtKeys>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let (token, user) = AccountService::login(db.get_ref(), keys.get_ref(), &body).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register_company)
        .service(register_host)
        .service(verify_email)
        .service(login);
}
