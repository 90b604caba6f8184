//! Content store: microposts authored by accounts, listed newest
//! first.

use chrono::Utc;
use model::entities::micropost;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, info, instrument};

use crate::accounts::find_account;
use crate::error::{DomainError, FieldError, Result, ValidationReason};

pub const CONTENT_MAX: usize = 140;

fn validate_content(content: &str, errors: &mut Vec<FieldError>) {
    if content.trim().is_empty() {
        errors.push(FieldError::new("content", ValidationReason::Blank));
    } else if content.chars().count() > CONTENT_MAX {
        errors.push(FieldError::new(
            "content",
            ValidationReason::TooLong { max: CONTENT_MAX },
        ));
    }
}

/// Creates a micropost attributed to the given author.
#[instrument(skip(db, content))]
pub async fn create_post(
    db: &DatabaseConnection,
    author_id: i32,
    content: &str,
) -> Result<micropost::Model> {
    find_account(db, author_id).await?;

    let mut errors = Vec::new();
    validate_content(content, &mut errors);
    if !errors.is_empty() {
        debug!(?errors, "micropost rejected");
        return Err(DomainError::Validation(errors));
    }

    let post = micropost::ActiveModel {
        author_id: Set(author_id),
        content: Set(content.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(id = post.id, author_id, "micropost created");
    Ok(post)
}

/// Removes a single post. No cascading effects on other entities.
#[instrument(skip(db))]
pub async fn destroy_post(db: &DatabaseConnection, id: i32) -> Result<()> {
    let result = micropost::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound {
            entity: "micropost",
            id,
        });
    }
    info!(id, "micropost destroyed");
    Ok(())
}

/// All posts by one author, most recent first. The id is the
/// tie-break for posts created within the same timestamp.
pub async fn list_by_author(
    db: &DatabaseConnection,
    author_id: i32,
) -> Result<Vec<micropost::Model>> {
    Ok(micropost::Entity::find()
        .filter(micropost::Column::AuthorId.eq(author_id))
        .order_by_desc(micropost::Column::CreatedAt)
        .order_by_desc(micropost::Column::Id)
        .all(db)
        .await?)
}

pub async fn post_count(db: &DatabaseConnection, author_id: i32) -> Result<u64> {
    Ok(micropost::Entity::find()
        .filter(micropost::Column::AuthorId.eq(author_id))
        .count(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_account, setup_db};

    #[tokio::test]
    async fn test_create_valid_post() {
        let db = setup_db().await;
        let alice = fixture_account(&db, "Alice", "alice@example.com").await;

        let post = create_post(&db, alice.id, "Lorem ipsum").await.unwrap();
        assert_eq!(post.author_id, alice.id);
        assert_eq!(post.content, "Lorem ipsum");
    }

    #[tokio::test]
    async fn test_content_must_be_present() {
        let db = setup_db().await;
        let alice = fixture_account(&db, "Alice", "alice@example.com").await;

        let result = create_post(&db, alice.id, "   ").await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_content_must_not_exceed_140_chars() {
        let db = setup_db().await;
        let alice = fixture_account(&db, "Alice", "alice@example.com").await;

        // Exactly at the bound is fine.
        create_post(&db, alice.id, &"a".repeat(140)).await.unwrap();
        let result = create_post(&db, alice.id, &"a".repeat(141)).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_author_must_exist() {
        let db = setup_db().await;
        let result = create_post(&db, 9999, "no author").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_by_author_is_newest_first() {
        let db = setup_db().await;
        let alice = fixture_account(&db, "Alice", "alice@example.com").await;
        let bob = fixture_account(&db, "Bob", "bob@example.com").await;

        let first = create_post(&db, alice.id, "first").await.unwrap();
        let second = create_post(&db, alice.id, "second").await.unwrap();
        let third = create_post(&db, alice.id, "third").await.unwrap();
        create_post(&db, bob.id, "someone else's").await.unwrap();

        let posts = list_by_author(&db, alice.id).await.unwrap();
        assert_eq!(
            posts.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![third.id, second.id, first.id]
        );
    }

    #[tokio::test]
    async fn test_destroy_post() {
        let db = setup_db().await;
        let alice = fixture_account(&db, "Alice", "alice@example.com").await;
        let post = create_post(&db, alice.id, "ephemeral").await.unwrap();

        destroy_post(&db, post.id).await.unwrap();
        assert_eq!(post_count(&db, alice.id).await.unwrap(), 0);

        assert!(matches!(
            destroy_post(&db, post.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
