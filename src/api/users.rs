//! User endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::error::AppError;
use crate::store::{User, UserRepository, UserWithPosts};

use super::extract::{ApiJson, ApiPath};
use super::MessageResponse;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdateUserRequest {
    /// Supplied, non-blank fields only; blank strings mean "leave as is"
    fn fields(&self) -> (Option<&str>, Option<&str>) {
        (non_blank(&self.email), non_blank(&self.name))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserWithPosts>,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub user: UserWithPosts,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: &'static str,
    pub user: User,
}

// =========================================================================
// Handlers
// =========================================================================

/// GET /users
pub async fn list_users(State(pool): State<PgPool>) -> Result<Json<UsersResponse>, AppError> {
    let users = UserRepository::new(pool).list_with_posts().await?;
    Ok(Json(UsersResponse { users }))
}

/// GET /users/:id
pub async fn get_user(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserDetailResponse>, AppError> {
    let user = UserRepository::new(pool)
        .find_with_posts(id)
        .await?
        .ok_or(DomainError::UserNotFound(id))?;

    Ok(Json(UserDetailResponse { user }))
}

/// POST /users
pub async fn create_user(
    State(pool): State<PgPool>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(DomainError::MissingField("email").into());
    }
    let name = non_blank(&request.name);

    let user = UserRepository::new(pool)
        .create(email, name)
        .await
        .map_err(AppError::from)
        .map_err(AppError::write_failure("Failed to create user"))?;

    tracing::info!(user_id = %user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User created successfully",
            user,
        }),
    ))
}

/// PUT /users/:id
pub async fn update_user(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let (email, name) = request.fields();

    let user = UserRepository::new(pool)
        .update(id, email, name)
        .await
        .map_err(AppError::from)
        .map_err(AppError::write_failure("Failed to update user"))?
        .ok_or(DomainError::UserNotFound(id))?;

    Ok(Json(UserResponse {
        message: "User updated successfully",
        user,
    }))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = UserRepository::new(pool)
        .delete(id)
        .await
        .map_err(AppError::from)
        .map_err(AppError::write_failure("Failed to delete user"))?;

    if !deleted {
        return Err(DomainError::UserNotFound(id).into());
    }

    tracing::info!(user_id = %id, "User deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_deserialize() {
        let request: CreateUserRequest =
            serde_json::from_str(r#"{"email": "alice@example.com"}"#).unwrap();
        assert_eq!(request.email, "alice@example.com");
        assert!(request.name.is_none());
    }

    #[test]
    fn test_update_user_ignores_blank_fields() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"email": "", "name": " Bob "}"#).unwrap();
        assert_eq!(request.fields(), (None, Some("Bob")));

        let request = UpdateUserRequest::default();
        assert_eq!(request.fields(), (None, None));
    }
}
