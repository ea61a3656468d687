use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{HostOption, LoginRequest, RegisterCompanyRequest, RegisterHostRequest};
use crate::models::users::{self, Role};
use crate::models::{companies, email_verification_tokens};
use crate::services::tenant_service::TenantService;
use crate::utils::jwt::JwtKeys;
use crate::utils::mailer::{MailMessage, Mailer};
use crate::utils::password;

const EMAIL_TAKEN: &str = "Email already registered";
const COMPANY_TAKEN: &str = "Company already registered";
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Utilisateur créé + token de vérification à envoyer par email
#[derive(Debug)]
pub struct Registration {
    pub user: users::Model,
    pub verification_token: String,
}

pub struct AccountService;

impl AccountService {
    /// Crée l'admin fondateur et son entreprise (POST /registerCompany)
    pub async fn register_company(
        db: &DatabaseConnection,
        request: RegisterCompanyRequest,
    ) -> Result<Registration, AppError> {
        let email = request.email.trim().to_lowercase();
        let company_name = request.company_name.trim().to_string();
        if company_name.is_empty() {
            return Err(AppError::Validation("companyName is required".to_string()));
        }

        Self::ensure_email_free(db, &email).await?;

        // Un tenant par nom, sans tenir compte de la casse
        let existing_company = companies::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(companies::Column::Name.as_column_ref())))
                    .eq(company_name.to_lowercase()),
            )
            .one(db)
            .await?;
        if existing_company.is_some() {
            return Err(AppError::Conflict(COMPANY_TAKEN.to_string()));
        }

        let password_hash = password::hash_password(&request.password).map_err(AppError::Internal)?;

        let txn = db.begin().await?;

        let admin = Self::new_user(&request.name, &email, password_hash, Role::Admin, &company_name)
            .insert(&txn)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, EMAIL_TAKEN))?;

        companies::ActiveModel {
            name: Set(company_name.clone()),
            admin_id: Set(admin.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, COMPANY_TAKEN))?;

        let token = email_verification_tokens::ActiveModel::issue(admin.id).insert(&txn).await?;

        txn.commit().await?;

        tracing::info!(user_id = admin.id, company = %company_name, "company registered");
        Ok(Registration {
            user: admin,
            verification_token: token.token,
        })
    }

    /// Un admin crée un host dans sa propre entreprise (POST /register)
    pub async fn register_host(
        db: &DatabaseConnection,
        auth_user: &AuthUser,
        request: RegisterHostRequest,
    ) -> Result<Registration, AppError> {
        auth_user.require_admin()?;

        let email = request.email.trim().to_lowercase();
        let company_name = TenantService::resolve_company(db, auth_user.user_id).await?;

        Self::ensure_email_free(db, &email).await?;

        let password_hash = password::hash_password(&request.password).map_err(AppError::Internal)?;

        let txn = db.begin().await?;

        let host = Self::new_user(&request.name, &email, password_hash, Role::Host, &company_name)
            .insert(&txn)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, EMAIL_TAKEN))?;

        let token = email_verification_tokens::ActiveModel::issue(host.id).insert(&txn).await?;

        txn.commit().await?;

        tracing::info!(user_id = host.id, admin_id = auth_user.user_id, company = %company_name, "host registered");
        Ok(Registration {
            user: host,
            verification_token: token.token,
        })
    }

    /// Envoie le lien de vérification. Un échec d'envoi est loggé, pas remonté:
    /// le compte est déjà créé.
    pub async fn send_verification(mailer: &dyn Mailer, public_base_url: &str, registration: &Registration) -> bool {
        let message = MailMessage::verification(
            &registration.user.email,
            &registration.user.name,
            public_base_url,
            &registration.verification_token,
        );

        match mailer.send(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(user_id = registration.user.id, error = %e, "verification email not sent");
                false
            }
        }
    }

    /// GET /verify-email?token= : token existant, non utilisé, non expiré
    pub async fn verify_email(db: &DatabaseConnection, token: &str) -> Result<users::Model, AppError> {
        let invalid = || AppError::Validation("Invalid or expired token".to_string());

        let txn = db.begin().await?;

        let record = email_verification_tokens::Entity::find()
            .filter(email_verification_tokens::Column::Token.eq(token.trim()))
            .one(&txn)
            .await?
            .ok_or_else(invalid)?;

        if !record.is_usable(Utc::now()) {
            return Err(invalid());
        }

        let user = users::Entity::find_by_id(record.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut active_user: users::ActiveModel = user.into();
        active_user.is_verified = Set(true);
        let user = active_user.update(&txn).await?;

        let mut active_token: email_verification_tokens::ActiveModel = record.into();
        active_token.used = Set(true);
        active_token.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, "email verified");
        Ok(user)
    }

    /// POST /login : vérifie le hash puis émet un JWT
    pub async fn login(
        db: &DatabaseConnection,
        keys: &JwtKeys,
        request: &LoginRequest,
    ) -> Result<(String, users::Model), AppError> {
        let email = request.email.trim().to_lowercase();

        // 1. Trouver l'utilisateur
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

        // 2. Vérifier le mot de passe (un hash illisible vaut un mauvais mot de passe)
        let is_valid = match password::verify_password(&request.password, &user.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "unreadable password hash");
                false
            }
        };
        if !is_valid {
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        if !user.is_verified {
            return Err(AppError::Forbidden(
                "Please verify your email before logging in".to_string(),
            ));
        }

        // 3. Générer le JWT
        let token = keys
            .generate_token(user.id, user.role, &user.name)
            .map_err(AppError::Internal)?;

        Ok((token, user))
    }

    /// Tous les utilisateurs de l'entreprise de l'admin
    pub async fn list_users(db: &DatabaseConnection, auth_user: &AuthUser) -> Result<Vec<users::Model>, AppError> {
        auth_user.require_admin()?;
        let company_name = TenantService::resolve_company(db, auth_user.user_id).await?;

        Ok(users::Entity::find()
            .filter(users::Column::CompanyName.eq(company_name.as_str()))
            .order_by_asc(users::Column::Name)
            .order_by_asc(users::Column::Id)
            .all(db)
            .await?)
    }

    /// Hosts de l'entreprise de l'appelant (liste déroulante du check-in)
    pub async fn list_hosts(db: &DatabaseConnection, auth_user: &AuthUser) -> Result<Vec<HostOption>, AppError> {
        let company_name = TenantService::resolve_company(db, auth_user.user_id).await?;

        Ok(users::Entity::find()
            .select_only()
            .column(users::Column::Id)
            .column(users::Column::Name)
            .filter(users::Column::CompanyName.eq(company_name.as_str()))
            .filter(users::Column::Role.eq(Role::Host))
            .order_by_asc(users::Column::Name)
            .order_by_asc(users::Column::Id)
            .into_model::<HostOption>()
            .all(db)
            .await?)
    }

    async fn ensure_email_free(db: &DatabaseConnection, email: &str) -> Result<(), AppError> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?;

        match existing {
            Some(_) => Err(AppError::Conflict(EMAIL_TAKEN.to_string())),
            None => Ok(()),
        }
    }

    fn new_user(name: &str, email: &str, password_hash: String, role: Role, company_name: &str) -> users::ActiveModel {
        users::ActiveModel {
            name: Set(name.trim().to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            role: Set(role),
            company_name: Set(Some(company_name.to_string())),
            is_verified: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::db::connect_test_db;
    use crate::services::test_support::{auth, insert_user, TEST_PASSWORD};
    use crate::utils::mailer::LogMailer;

    fn company_request(email: &str, company: &str) -> RegisterCompanyRequest {
        RegisterCompanyRequest {
            name: "Ann".to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
            company_name: company.to_string(),
        }
    }

    fn host_request(name: &str, email: &str) -> RegisterHostRequest {
        RegisterHostRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[actix_web::test]
    async fn test_register_company_creates_unverified_admin() {
        let db = connect_test_db().await;

        let registration = AccountService::register_company(&db, company_request("Ann@Acme.com", "Acme")).await.unwrap();

        assert_eq!(registration.user.role, Role::Admin);
        assert_eq!(registration.user.email, "ann@acme.com");
        assert_eq!(registration.user.company_name.as_deref(), Some("Acme"));
        assert!(!registration.user.is_verified);
        assert_ne!(registration.user.password_hash, "hunter22");

        let company = companies::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(company.admin_id, registration.user.id);
        assert!(AccountService::send_verification(&LogMailer, "http://localhost:8080", &registration).await);
    }

    #[actix_web::test]
    async fn test_register_company_conflicts() {
        let db = connect_test_db().await;
        AccountService::register_company(&db, company_request("ann@acme.com", "Acme")).await.unwrap();

        let same_email = AccountService::register_company(&db, company_request("ann@acme.com", "Other")).await;
        let same_company = AccountService::register_company(&db, company_request("zoe@acme.com", "Acme")).await;
        let other_case = AccountService::register_company(&db, company_request("max@acme.com", " ACME ")).await;

        assert!(matches!(same_email, Err(AppError::Conflict(_))));
        assert!(matches!(same_company, Err(AppError::Conflict(_))));
        assert!(matches!(other_case, Err(AppError::Conflict(_))));
        assert_eq!(users::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_register_host_in_admin_company() {
        let db = connect_test_db().await;
        let admin = insert_user(&db, "Ann", "ann@acme.com", Role::Admin, Some("Acme")).await;

        let registration = AccountService::register_host(&db, &auth(&admin), host_request("Bob", "bob@acme.com"))
            .await
            .unwrap();

        assert_eq!(registration.user.role, Role::Host);
        assert_eq!(registration.user.company_name.as_deref(), Some("Acme"));

        let duplicate = AccountService::register_host(&db, &auth(&admin), host_request("Bob 2", "BOB@acme.com")).await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    }

    #[actix_web::test]
    async fn test_host_cannot_register_hosts() {
        let db = connect_test_db().await;
        let bob = insert_user(&db, "Bob", "bob@acme.com", Role::Host, Some("Acme")).await;

        let result = AccountService::register_host(&db, &auth(&bob), host_request("Eve", "eve@acme.com")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[actix_web::test]
    async fn test_verify_then_login() {
        let db = connect_test_db().await;
        let keys = JwtKeys::from_secret("test-secret");
        let registration = AccountService::register_company(&db, company_request("ann@acme.com", "Acme")).await.unwrap();

        let before = AccountService::login(&db, &keys, &login_request("ann@acme.com", "hunter22")).await;
        assert!(matches!(before, Err(AppError::Forbidden(_))));

        let user = AccountService::verify_email(&db, &registration.verification_token).await.unwrap();
        assert!(user.is_verified);

        // Token à usage unique
        let again = AccountService::verify_email(&db, &registration.verification_token).await;
        assert!(matches!(again, Err(AppError::Validation(_))));

        let (token, user) = AccountService::login(&db, &keys, &login_request("ANN@acme.com", "hunter22")).await.unwrap();
        let claims = keys.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[actix_web::test]
    async fn test_expired_token_is_rejected() {
        let db = connect_test_db().await;
        let registration = AccountService::register_company(&db, company_request("ann@acme.com", "Acme")).await.unwrap();

        email_verification_tokens::Entity::update_many()
            .col_expr(
                email_verification_tokens::Column::ExpiresAt,
                sea_query::Expr::value(Utc::now() - Duration::hours(1)),
            )
            .exec(&db)
            .await
            .unwrap();

        let result = AccountService::verify_email(&db, &registration.verification_token).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(matches!(
            AccountService::verify_email(&db, "unknown").await,
            Err(AppError::Validation(_))
        ));
    }

    #[actix_web::test]
    async fn test_login_rejects_bad_credentials() {
        let db = connect_test_db().await;
        let keys = JwtKeys::from_secret("test-secret");
        insert_user(&db, "Bob", "bob@acme.com", Role::Host, Some("Acme")).await;

        let wrong_password = AccountService::login(&db, &keys, &login_request("bob@acme.com", "nope")).await;
        let unknown = AccountService::login(&db, &keys, &login_request("who@acme.com", TEST_PASSWORD)).await;

        assert!(matches!(wrong_password, Err(AppError::Unauthorized(_))));
        assert!(matches!(unknown, Err(AppError::Unauthorized(_))));
        assert!(AccountService::login(&db, &keys, &login_request("bob@acme.com", TEST_PASSWORD)).await.is_ok());
    }

    #[actix_web::test]
    async fn test_users_and_hosts_are_company_scoped() {
        let db = connect_test_db().await;
        let admin = insert_user(&db, "Ann", "ann@acme.com", Role::Admin, Some("Acme")).await;
        let bob = insert_user(&db, "Bob", "bob@acme.com", Role::Host, Some("Acme")).await;
        insert_user(&db, "Carol", "carol@acme.com", Role::Host, Some("Acme")).await;
        insert_user(&db, "Dave", "dave@initech.com", Role::Host, Some("Initech")).await;

        let users = AccountService::list_users(&db, &auth(&admin)).await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob", "Carol"]);

        let hosts = AccountService::list_hosts(&db, &auth(&bob)).await.unwrap();
        let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Carol"]);

        assert!(matches!(AccountService::list_users(&db, &auth(&bob)).await, Err(AppError::Forbidden(_))));
    }
}
