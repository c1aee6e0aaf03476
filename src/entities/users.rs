use sea_orm::entity::prelude::*;

pub const ROLE_USER: &str = "USER";
pub const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// `USER` or `SUPER_ADMIN`; fixed at creation
    pub role: String,

    /// Opaque refresh token, rotated on every refresh and cleared on logout
    pub refresh_token: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::addresses::Entity")]
    Addresses,

    #[sea_orm(has_one = "super::carts::Entity")]
    Cart,
}

impl Related<super::addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl Related<super::carts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
