use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create accounts table. The email column carries the unique
        // index; the application lower-cases every address before it is
        // checked or persisted, so the index is effectively
        // case-insensitive.
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::Name))
                    .col(string(Accounts::Email).unique_key())
                    .col(string(Accounts::PasswordDigest))
                    .col(string_null(Accounts::RememberDigest))
                    .col(timestamp_with_time_zone(Accounts::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create relationships table (directed follow edges)
        manager
            .create_table(
                Table::create()
                    .table(Relationships::Table)
                    .if_not_exists()
                    .col(pk_auto(Relationships::Id))
                    .col(integer(Relationships::FollowerId))
                    .col(integer(Relationships::FollowedId))
                    .col(timestamp_with_time_zone(Relationships::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationships_follower")
                            .from(Relationships::Table, Relationships::FollowerId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationships_followed")
                            .from(Relationships::Table, Relationships::FollowedId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .check(
                        Expr::col(Relationships::FollowerId)
                            .ne(Expr::col(Relationships::FollowedId)),
                    )
                    .to_owned(),
            )
            .await?;

        // The composite unique index backs the follow operation's
        // idempotency under concurrent inserts.
        manager
            .create_index(
                Index::create()
                    .name("idx_relationships_follower_followed")
                    .table(Relationships::Table)
                    .col(Relationships::FollowerId)
                    .col(Relationships::FollowedId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create microposts table
        manager
            .create_table(
                Table::create()
                    .table(Microposts::Table)
                    .if_not_exists()
                    .col(pk_auto(Microposts::Id))
                    .col(integer(Microposts::AuthorId))
                    .col(string(Microposts::Content))
                    .col(timestamp_with_time_zone(Microposts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_microposts_author")
                            .from(Microposts::Table, Microposts::AuthorId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for per-author listing and the feed query.
        manager
            .create_index(
                Index::create()
                    .name("idx_microposts_author_created_at")
                    .table(Microposts::Table)
                    .col(Microposts::AuthorId)
                    .col(Microposts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Microposts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Relationships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Name,
    Email,
    PasswordDigest,
    RememberDigest,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Relationships {
    Table,
    Id,
    FollowerId,
    FollowedId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Microposts {
    Table,
    Id,
    AuthorId,
    Content,
    CreatedAt,
}
