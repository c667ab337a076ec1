//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the travel blogging application here.
//! The structure mirrors the original relational layout but is adapted
//! for Rust's type system and the SeaORM framework.

pub mod guide;
pub mod session;
pub mod travel;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::guide::Entity as Guide;
    pub use super::session::Entity as Session;
    pub use super::travel::Entity as Travel;
}

#[cfg(test)]
mod test {
    use chrono::{Duration, Utc};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn guide_active(name: &str, email: &str) -> guide::ActiveModel {
        guide::ActiveModel {
            name: Set(name.to_string()),
            surname: Set("Doe".to_string()),
            phone: Set("123456789".to_string()),
            email: Set(email.to_string()),
            password: Set("$argon2id$v=19$m=19456,t=2,p=1$test$test".to_string()),
            image_file: Set("default.jpg".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        // Create guides
        let guide1 = guide_active("Alice", "alice@example.com").insert(&db).await?;
        let guide2 = guide_active("Bob", "bob@example.com").insert(&db).await?;

        // Create travels for guide1
        let travel1 = travel::ActiveModel {
            title: Set("Lisbon weekend".to_string()),
            content: Set("Tram 28 and pasteis de nata.".to_string()),
            guide_id: Set(guide1.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let travel2 = travel::ActiveModel {
            title: Set("Alps hike".to_string()),
            content: Set("Three days above the tree line.".to_string()),
            guide_id: Set(guide1.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a session for guide2
        let session = session::ActiveModel {
            token: Set("deadbeef-token".to_string()),
            guide_id: Set(guide2.id),
            expires_at: Set(Utc::now() + Duration::days(1)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data
        let guides = Guide::find().all(&db).await?;
        assert_eq!(guides.len(), 2);
        assert!(guides.iter().any(|g| g.email == "alice@example.com"));
        assert!(guides.iter().any(|g| g.email == "bob@example.com"));

        // Travels belong to guide1, newest first by id
        let travels = Travel::find()
            .filter(travel::Column::GuideId.eq(guide1.id))
            .order_by_desc(travel::Column::Id)
            .all(&db)
            .await?;
        assert_eq!(travels.len(), 2);
        assert_eq!(travels[0].id, travel2.id);
        assert_eq!(travels[1].id, travel1.id);

        // Related travels via the relation definition
        let related = guide1.find_related(Travel).all(&db).await?;
        assert_eq!(related.len(), 2);

        // Session resolves back to its guide
        let owner = session.find_related(Guide).one(&db).await?;
        assert_eq!(owner.map(|g| g.id), Some(guide2.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_email_unique_constraint() -> Result<(), DbErr> {
        let db = setup_db().await?;

        guide_active("Alice", "dup@example.com").insert(&db).await?;
        let duplicate = guide_active("Mallory", "dup@example.com").insert(&db).await;

        assert!(duplicate.is_err(), "second insert with same email must fail");
        assert_eq!(Guide::find().all(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_guide_delete_restricted_while_travels_exist() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let guide = guide_active("Alice", "alice@example.com").insert(&db).await?;
        let travel = travel::ActiveModel {
            title: Set("Sahara crossing".to_string()),
            content: Set("Sand.".to_string()),
            guide_id: Set(guide.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // RESTRICT foreign key blocks the delete while travels exist
        let blocked = Guide::delete_by_id(guide.id).exec(&db).await;
        assert!(blocked.is_err());
        assert!(Guide::find_by_id(guide.id).one(&db).await?.is_some());

        // After removing the travel the guide can go
        Travel::delete_by_id(travel.id).exec(&db).await?;
        Guide::delete_by_id(guide.id).exec(&db).await?;
        assert!(Guide::find_by_id(guide.id).one(&db).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_sessions_cascade_on_guide_delete() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let guide = guide_active("Alice", "alice@example.com").insert(&db).await?;
        session::ActiveModel {
            token: Set("cascade-token".to_string()),
            guide_id: Set(guide.id),
            expires_at: Set(Utc::now() + Duration::days(1)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        Guide::delete_by_id(guide.id).exec(&db).await?;

        let leftovers = Session::find()
            .filter(session::Column::GuideId.eq(guide.id))
            .all(&db)
            .await?;
        assert!(leftovers.is_empty());

        Ok(())
    }
}
