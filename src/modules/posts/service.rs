use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::authz::engine::{ActorSnapshot, ScopeTarget};
use crate::modules::posts::model::{
    Comment, CommentResponse, CreateCommentDto, CreatePostDto, FeedParams,
    PaginatedPostsResponse, Post, PostResponse, ToggleResponse, UpdatePostDto,
};
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const POST_COLUMNS: &str = "id, author_id, title, content, category, priority, image_url, \
     faculty_id, level_id, is_pinned, is_published, views_count, created_at, updated_at";

const POST_RESPONSE_COLUMNS: &str = "p.id, p.author_id, u.name AS author_name, p.title, \
     p.content, p.category, p.priority, p.image_url, p.faculty_id, p.level_id, p.is_pinned, \
     p.views_count, \
     (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS likes_count, \
     (SELECT COUNT(*) FROM post_reposts pr WHERE pr.post_id = p.id) AS reposts_count, \
     (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count, \
     p.created_at, p.updated_at";

// Optional feed filters, appended after the scope predicates.
// `first_bind` is the next free placeholder number.
fn filter_sql(first_bind: usize, category: &Option<String>, priority: &Option<String>) -> String {
    let mut sql = String::new();
    let mut next = first_bind;
    if category.is_some() {
        sql.push_str(&format!(" AND p.category = ${next}"));
        next += 1;
    }
    if priority.is_some() {
        sql.push_str(&format!(" AND p.priority = ${next}"));
    }
    sql
}

pub struct PostService;

impl PostService {
    /// Persists a post with its resolved scope. The target has already
    /// passed the creation rules.
    #[instrument(skip(db, dto))]
    pub async fn create(
        db: &PgPool,
        author_id: Uuid,
        dto: CreatePostDto,
        target: ScopeTarget,
    ) -> Result<Post, AppError> {
        let (faculty_id, level_id) = match target {
            ScopeTarget::Global => (None, None),
            ScopeTarget::Faculty { faculty_id } => (Some(faculty_id), None),
            ScopeTarget::Level { level_id, .. } => (None, Some(level_id)),
        };

        let query = format!(
            "INSERT INTO posts
                (author_id, title, content, category, priority, image_url,
                 faculty_id, level_id, is_pinned)
             VALUES ($1, $2, $3, COALESCE($4, 'General'), COALESCE($5, 'normal'), $6, $7, $8, $9)
             RETURNING {POST_COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(author_id)
            .bind(&dto.title)
            .bind(&dto.content)
            .bind(&dto.category)
            .bind(&dto.priority)
            .bind(&dto.image_url)
            .bind(faculty_id)
            .bind(level_id)
            .bind(dto.is_pinned)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    /// The actor's feed: every published post their role and affiliation
    /// allow them to see, pinned posts first, then newest.
    #[instrument(skip(db))]
    pub async fn feed(
        db: &PgPool,
        actor: &ActorSnapshot,
        params: FeedParams,
    ) -> Result<PaginatedPostsResponse, AppError> {
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let mut where_sql = String::from("p.is_published");
        let mut scope_binds: Vec<Option<Uuid>> = Vec::new();

        match actor.role {
            UserRole::Admin | UserRole::Power => {}
            UserRole::User => {
                where_sql.push_str(
                    " AND ((p.faculty_id IS NULL AND p.level_id IS NULL)
                        OR (p.level_id IS NULL AND p.faculty_id = $1)
                        OR p.level_id = $2)",
                );
                scope_binds.push(actor.faculty_id);
                scope_binds.push(actor.level_id);
            }
            UserRole::DAdmin => {
                where_sql.push_str(
                    " AND ((p.faculty_id IS NULL AND p.level_id IS NULL)
                        OR (p.level_id IS NULL AND p.faculty_id = $1)
                        OR p.level_id IN (SELECT id FROM levels WHERE department_id = $2))",
                );
                scope_binds.push(actor.faculty_id);
                scope_binds.push(actor.managed_department_id);
            }
        }

        where_sql.push_str(&filter_sql(
            scope_binds.len() + 1,
            &params.category,
            &params.priority,
        ));

        let count_query = format!("SELECT COUNT(*) FROM posts p WHERE {where_sql}");
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for bind in &scope_binds {
            count_sql = count_sql.bind(*bind);
        }
        if let Some(category) = &params.category {
            count_sql = count_sql.bind(category);
        }
        if let Some(priority) = &params.priority {
            count_sql = count_sql.bind(priority);
        }
        let total = count_sql.fetch_one(db).await.map_err(AppError::database)?;

        let data_query = format!(
            "SELECT {POST_RESPONSE_COLUMNS}
             FROM posts p
             JOIN users u ON u.id = p.author_id
             WHERE {where_sql}
             ORDER BY p.is_pinned DESC, p.created_at DESC
             LIMIT {limit} OFFSET {offset}"
        );
        let mut data_sql = sqlx::query_as::<_, PostResponse>(&data_query);
        for bind in &scope_binds {
            data_sql = data_sql.bind(*bind);
        }
        if let Some(category) = &params.category {
            data_sql = data_sql.bind(category);
        }
        if let Some(priority) = &params.priority {
            data_sql = data_sql.bind(priority);
        }
        let posts = data_sql.fetch_all(db).await.map_err(AppError::database)?;

        Ok(PaginatedPostsResponse {
            data: posts,
            meta: PaginationMeta::new(total, limit, offset),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_row(db: &PgPool, post_id: Uuid) -> Result<Post, AppError> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(post_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Post not found".to_string()))
    }

    /// Full response for one post, bumping the view counter.
    #[instrument(skip(db))]
    pub async fn get_response(db: &PgPool, post_id: Uuid) -> Result<PostResponse, AppError> {
        sqlx::query("UPDATE posts SET views_count = views_count + 1 WHERE id = $1")
            .bind(post_id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        let query = format!(
            "SELECT {POST_RESPONSE_COLUMNS}
             FROM posts p JOIN users u ON u.id = p.author_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, PostResponse>(&query)
            .bind(post_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Post not found".to_string()))
    }

    /// Scope columns are fixed at creation and deliberately not updatable.
    #[instrument(skip(db, dto))]
    pub async fn update(db: &PgPool, post_id: Uuid, dto: UpdatePostDto) -> Result<Post, AppError> {
        let query = format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                category = COALESCE($4, category),
                priority = COALESCE($5, priority),
                image_url = COALESCE($6, image_url),
                is_pinned = COALESCE($7, is_pinned),
                is_published = COALESCE($8, is_published),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {POST_COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(post_id)
            .bind(&dto.title)
            .bind(&dto.content)
            .bind(&dto.category)
            .bind(&dto.priority)
            .bind(&dto.image_url)
            .bind(dto.is_pinned)
            .bind(dto.is_published)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Post not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, post_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Post not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn toggle_like(
        db: &PgPool,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleResponse, AppError> {
        Self::toggle_mark(db, "post_likes", post_id, user_id).await
    }

    #[instrument(skip(db))]
    pub async fn toggle_repost(
        db: &PgPool,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleResponse, AppError> {
        Self::toggle_mark(db, "post_reposts", post_id, user_id).await
    }

    // Insert-or-delete toggle over the (post_id, user_id) unique pair.
    async fn toggle_mark(
        db: &PgPool,
        table: &str,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleResponse, AppError> {
        let insert = format!(
            "INSERT INTO {table} (post_id, user_id) VALUES ($1, $2)
             ON CONFLICT (post_id, user_id) DO NOTHING"
        );
        let inserted = sqlx::query(&insert)
            .bind(post_id)
            .bind(user_id)
            .execute(db)
            .await
            .map_err(AppError::database)?
            .rows_affected();

        let active = if inserted == 0 {
            let delete = format!("DELETE FROM {table} WHERE post_id = $1 AND user_id = $2");
            sqlx::query(&delete)
                .bind(post_id)
                .bind(user_id)
                .execute(db)
                .await
                .map_err(AppError::database)?;
            false
        } else {
            true
        };

        let count_query = format!("SELECT COUNT(*) FROM {table} WHERE post_id = $1");
        let count = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(post_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;

        Ok(ToggleResponse { active, count })
    }

    #[instrument(skip(db))]
    pub async fn list_comments(
        db: &PgPool,
        post_id: Uuid,
    ) -> Result<Vec<CommentResponse>, AppError> {
        sqlx::query_as::<_, CommentResponse>(
            "SELECT c.id, c.post_id, c.user_id, u.name AS author_name, c.parent_id, c.content,
                    (SELECT COUNT(*) FROM comment_likes cl WHERE cl.comment_id = c.id) AS likes_count,
                    (SELECT COUNT(*) FROM comments r WHERE r.parent_id = c.id) AS replies_count,
                    c.created_at
             FROM comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.post_id = $1
             ORDER BY c.created_at",
        )
        .bind(post_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_comment(
        db: &PgPool,
        post_id: Uuid,
        user_id: Uuid,
        dto: CreateCommentDto,
    ) -> Result<Comment, AppError> {
        if let Some(parent_id) = dto.parent_id {
            let parent_matches = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM comments WHERE id = $1 AND post_id = $2",
            )
            .bind(parent_id)
            .bind(post_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;
            if parent_matches == 0 {
                return Err(AppError::bad_request(
                    "Parent comment does not belong to this post".to_string(),
                ));
            }
        }

        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, user_id, parent_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING id, post_id, user_id, parent_id, content, created_at",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(dto.parent_id)
        .bind(&dto.content)
        .fetch_one(db)
        .await
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_comment(db: &PgPool, comment_id: Uuid) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, user_id, parent_id, content, created_at
             FROM comments WHERE id = $1",
        )
        .bind(comment_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found("Comment not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn delete_comment(db: &PgPool, comment_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(db)
            .await
            .map_err(AppError::database)?;
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn toggle_comment_like(
        db: &PgPool,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleResponse, AppError> {
        let inserted = sqlx::query(
            "INSERT INTO comment_likes (comment_id, user_id) VALUES ($1, $2)
             ON CONFLICT (comment_id, user_id) DO NOTHING",
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(db)
        .await
        .map_err(AppError::database)?
        .rows_affected();

        let active = if inserted == 0 {
            sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1 AND user_id = $2")
                .bind(comment_id)
                .bind(user_id)
                .execute(db)
                .await
                .map_err(AppError::database)?;
            false
        } else {
            true
        };

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1",
        )
        .bind(comment_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(ToggleResponse { active, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filters_add_no_clauses() {
        assert_eq!(filter_sql(3, &None, &None), "");
    }

    #[test]
    fn test_category_filter_uses_next_placeholder() {
        let sql = filter_sql(3, &Some("academics".to_string()), &None);
        assert_eq!(sql, " AND p.category = $3");
    }

    #[test]
    fn test_priority_filter_uses_next_placeholder() {
        let sql = filter_sql(3, &None, &Some("urgent".to_string()));
        assert_eq!(sql, " AND p.priority = $3");
    }

    #[test]
    fn test_category_and_priority_filters_number_in_order() {
        let sql = filter_sql(
            3,
            &Some("academics".to_string()),
            &Some("urgent".to_string()),
        );
        assert_eq!(sql, " AND p.category = $3 AND p.priority = $4");
    }
}
