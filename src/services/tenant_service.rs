use sea_orm::{ConnectionTrait, EntityTrait};

use crate::error::AppError;
use crate::models::users;

pub struct TenantService;

impl TenantService {
    /// Retourne le company_name d'un utilisateur (admin ou host).
    /// Un company_name absent est une erreur de configuration, pas un cas normal.
    pub async fn resolve_company<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<String, AppError> {
        let user = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Self::company_of(&user)
    }

    pub fn company_of(user: &users::Model) -> Result<String, AppError> {
        user.company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::NotFound(format!("No company configured for user {}", user.id)))
    }
}
