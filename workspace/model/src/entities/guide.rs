use sea_orm::entity::prelude::*;

/// Represents a registered guide, the authoring user of the system.
/// The email doubles as the login identifier and is unique at the
/// storage level.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guides")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub phone: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC hash string. Plaintext credentials never reach storage.
    pub password: String,
    /// Stored filename of the profile picture.
    #[sea_orm(default_value = "default.jpg")]
    pub image_file: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A guide can author multiple travels.
    #[sea_orm(has_many = "super::travel::Entity")]
    Travel,
    // Login sessions held by this guide.
    #[sea_orm(has_many = "super::session::Entity")]
    Session,
}

impl Related<super::travel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Travel.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
