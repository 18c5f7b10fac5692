//! User Repository

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Post, User, UserWithPosts};

/// Data access for users and their posts
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All users with their posts, oldest first
    pub async fn list_with_posts(&self) -> Result<Vec<UserWithPosts>, sqlx::Error> {
        let users: Vec<User> = sqlx::query_as(
            "SELECT id, email, name, created_at FROM users ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let mut posts_by_author = self.posts_by_author(&ids).await?;

        Ok(users
            .into_iter()
            .map(|user| UserWithPosts {
                posts: posts_by_author.remove(&user.id).unwrap_or_default(),
                user,
            })
            .collect())
    }

    pub async fn find_with_posts(&self, id: Uuid) -> Result<Option<UserWithPosts>, sqlx::Error> {
        let user: Option<User> =
            sqlx::query_as("SELECT id, email, name, created_at FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        let posts = self
            .posts_by_author(&[user.id])
            .await?
            .remove(&user.id)
            .unwrap_or_default();

        Ok(Some(UserWithPosts { user, posts }))
    }

    pub async fn create(&self, email: &str, name: Option<&str>) -> Result<User, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    /// Update the supplied fields; `None` keeps the stored value.
    /// Returns `None` when the user does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = COALESCE($3, name)
            WHERE id = $1
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a user; posts cascade. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn posts_by_author(&self, author_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Post>>, sqlx::Error> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let posts: Vec<Post> = sqlx::query_as(
            r#"
            SELECT id, title, content, published, author_id, created_at
            FROM posts
            WHERE author_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(author_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Post>> = HashMap::new();
        for post in posts {
            grouped.entry(post.author_id).or_default().push(post);
        }
        Ok(grouped)
    }
}
