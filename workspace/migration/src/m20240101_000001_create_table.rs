use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create guides table
        manager
            .create_table(
                Table::create()
                    .table(Guides::Table)
                    .if_not_exists()
                    .col(pk_auto(Guides::Id))
                    .col(string_len(Guides::Name, 20))
                    .col(string_len(Guides::Surname, 20))
                    .col(string_len(Guides::Phone, 20))
                    .col(string_len(Guides::Email, 120).unique_key())
                    .col(string_len(Guides::Password, 128))
                    .col(string_len(Guides::ImageFile, 120).default("default.jpg"))
                    .to_owned(),
            )
            .await?;

        // Create travels table
        manager
            .create_table(
                Table::create()
                    .table(Travels::Table)
                    .if_not_exists()
                    .col(pk_auto(Travels::Id))
                    .col(string_len(Travels::Title, 40))
                    .col(text(Travels::Content))
                    .col(integer(Travels::GuideId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_travel_guide")
                            .from(Travels::Table, Travels::GuideId)
                            .to(Guides::Table, Guides::Id)
                            // A guide cannot be removed while their travels exist.
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sessions table
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(pk_auto(Sessions::Id))
                    .col(string(Sessions::Token).unique_key())
                    .col(integer(Sessions::GuideId))
                    .col(timestamp_with_time_zone(Sessions::ExpiresAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_guide")
                            .from(Sessions::Table, Sessions::GuideId)
                            .to(Guides::Table, Guides::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Travels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Guides::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Guides {
    Table,
    Id,
    Name,
    Surname,
    Phone,
    Email,
    Password,
    ImageFile,
}

#[derive(DeriveIden)]
enum Travels {
    Table,
    Id,
    Title,
    Content,
    GuideId,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
    Token,
    GuideId,
    ExpiresAt,
}
