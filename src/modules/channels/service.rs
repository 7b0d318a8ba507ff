use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::authz::engine::{ActorSnapshot, ScopeTarget};
use crate::modules::channels::model::{
    Channel, ChannelMemberResponse, ChannelResponse, CreateChannelDto, CreateMessageDto,
    MessageParams, MessageResponse, PaginatedMessagesResponse,
};
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const CHANNEL_COLUMNS: &str = "id, name, description, visibility, created_by, faculty_id, \
     level_id, created_at, updated_at";

const CHANNEL_RESPONSE_COLUMNS: &str = "ch.id, ch.name, ch.description, ch.visibility, \
     ch.created_by, u.name AS creator_name, ch.faculty_id, ch.level_id, \
     (SELECT COUNT(*) FROM channel_members cm WHERE cm.channel_id = ch.id) AS member_count, \
     ch.created_at";

pub struct ChannelService;

impl ChannelService {
    /// Creates the channel and enrolls the creator as its owner.
    #[instrument(skip(db, dto))]
    pub async fn create(
        db: &PgPool,
        creator_id: Uuid,
        dto: CreateChannelDto,
        target: ScopeTarget,
    ) -> Result<Channel, AppError> {
        let (faculty_id, level_id) = match target {
            ScopeTarget::Global => (None, None),
            ScopeTarget::Faculty { faculty_id } => (Some(faculty_id), None),
            ScopeTarget::Level { level_id, .. } => (None, Some(level_id)),
        };

        let mut tx = db.begin().await.map_err(AppError::database)?;

        let query = format!(
            "INSERT INTO channels (name, description, created_by, faculty_id, level_id)
             VALUES ($1, COALESCE($2, ''), $3, $4, $5)
             RETURNING {CHANNEL_COLUMNS}"
        );
        let channel = sqlx::query_as::<_, Channel>(&query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(creator_id)
            .bind(faculty_id)
            .bind(level_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::database)?;

        sqlx::query(
            "INSERT INTO channel_members (channel_id, user_id, member_role)
             VALUES ($1, $2, 'owner')",
        )
        .bind(channel.id)
        .bind(creator_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::database)?;

        tx.commit().await.map_err(AppError::database)?;
        Ok(channel)
    }

    /// Channels whose scope the actor can see, most recent first.
    #[instrument(skip(db))]
    pub async fn list_visible(
        db: &PgPool,
        actor: &ActorSnapshot,
    ) -> Result<Vec<ChannelResponse>, AppError> {
        let mut where_sql = String::from("TRUE");
        let mut scope_binds: Vec<Option<Uuid>> = Vec::new();

        match actor.role {
            UserRole::Admin | UserRole::Power => {}
            UserRole::User => {
                where_sql = String::from(
                    "((ch.faculty_id IS NULL AND ch.level_id IS NULL)
                        OR (ch.level_id IS NULL AND ch.faculty_id = $1)
                        OR ch.level_id = $2)",
                );
                scope_binds.push(actor.faculty_id);
                scope_binds.push(actor.level_id);
            }
            UserRole::DAdmin => {
                where_sql = String::from(
                    "((ch.faculty_id IS NULL AND ch.level_id IS NULL)
                        OR (ch.level_id IS NULL AND ch.faculty_id = $1)
                        OR ch.level_id IN (SELECT id FROM levels WHERE department_id = $2))",
                );
                scope_binds.push(actor.faculty_id);
                scope_binds.push(actor.managed_department_id);
            }
        }

        let query = format!(
            "SELECT {CHANNEL_RESPONSE_COLUMNS}
             FROM channels ch
             JOIN users u ON u.id = ch.created_by
             WHERE {where_sql}
             ORDER BY ch.created_at DESC"
        );
        let mut sql = sqlx::query_as::<_, ChannelResponse>(&query);
        for bind in &scope_binds {
            sql = sql.bind(*bind);
        }
        sql.fetch_all(db).await.map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_row(db: &PgPool, channel_id: Uuid) -> Result<Channel, AppError> {
        let query = format!("SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = $1");
        sqlx::query_as::<_, Channel>(&query)
            .bind(channel_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Channel not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn get_response(db: &PgPool, channel_id: Uuid) -> Result<ChannelResponse, AppError> {
        let query = format!(
            "SELECT {CHANNEL_RESPONSE_COLUMNS}
             FROM channels ch JOIN users u ON u.id = ch.created_by
             WHERE ch.id = $1"
        );
        sqlx::query_as::<_, ChannelResponse>(&query)
            .bind(channel_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Channel not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn join(db: &PgPool, channel_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let inserted = sqlx::query(
            "INSERT INTO channel_members (channel_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (channel_id, user_id) DO NOTHING",
        )
        .bind(channel_id)
        .bind(user_id)
        .execute(db)
        .await
        .map_err(AppError::database)?
        .rows_affected();

        if inserted == 0 {
            return Err(AppError::bad_request(
                "Already a member of this channel".to_string(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn leave(db: &PgPool, channel_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let removed = sqlx::query(
            "DELETE FROM channel_members WHERE channel_id = $1 AND user_id = $2
             AND member_role <> 'owner'",
        )
        .bind(channel_id)
        .bind(user_id)
        .execute(db)
        .await
        .map_err(AppError::database)?
        .rows_affected();

        if removed == 0 {
            return Err(AppError::bad_request(
                "Not a removable member of this channel".to_string(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn is_member(db: &PgPool, channel_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM channel_members WHERE channel_id = $1 AND user_id = $2",
        )
        .bind(channel_id)
        .bind(user_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;
        Ok(count > 0)
    }

    #[instrument(skip(db))]
    pub async fn members(
        db: &PgPool,
        channel_id: Uuid,
    ) -> Result<Vec<ChannelMemberResponse>, AppError> {
        sqlx::query_as::<_, ChannelMemberResponse>(
            "SELECT cm.user_id, u.name, cm.member_role, cm.joined_at
             FROM channel_members cm
             JOIN users u ON u.id = cm.user_id
             WHERE cm.channel_id = $1
             ORDER BY cm.joined_at",
        )
        .bind(channel_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_messages(
        db: &PgPool,
        channel_id: Uuid,
        params: MessageParams,
    ) -> Result<PaginatedMessagesResponse, AppError> {
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE channel_id = $1",
        )
        .bind(channel_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        let query = format!(
            "SELECT m.id, m.channel_id, m.user_id, u.name AS author_name, m.content, m.created_at
             FROM messages m
             JOIN users u ON u.id = m.user_id
             WHERE m.channel_id = $1
             ORDER BY m.created_at DESC
             LIMIT {limit} OFFSET {offset}"
        );
        let messages = sqlx::query_as::<_, MessageResponse>(&query)
            .bind(channel_id)
            .fetch_all(db)
            .await
            .map_err(AppError::database)?;

        Ok(PaginatedMessagesResponse {
            data: messages,
            meta: PaginationMeta::new(total, limit, offset),
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn create_message(
        db: &PgPool,
        channel_id: Uuid,
        user_id: Uuid,
        dto: CreateMessageDto,
    ) -> Result<MessageResponse, AppError> {
        let message_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO messages (channel_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(channel_id)
        .bind(user_id)
        .bind(&dto.content)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        sqlx::query_as::<_, MessageResponse>(
            "SELECT m.id, m.channel_id, m.user_id, u.name AS author_name, m.content, m.created_at
             FROM messages m JOIN users u ON u.id = m.user_id
             WHERE m.id = $1",
        )
        .bind(message_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, channel_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM channels WHERE id = $1")
            .bind(channel_id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Channel not found".to_string()));
        }
        Ok(())
    }
}
