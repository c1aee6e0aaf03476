use sea_orm::entity::prelude::*;

/// `sizes`, `colors` and `images` are JSON array text; the api layer converts
/// them to `Vec<String>` on the way out.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub brand: String,

    pub description: String,

    pub category: String,

    pub gender: String,

    pub sizes: String,

    pub colors: String,

    pub price: f64,

    pub stock: i32,

    pub sold_count: i32,

    pub rating: f64,

    pub images: String,

    /// Set only through the settings component, capped at 8 true rows
    pub is_featured: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cart_items::Entity")]
    CartItems,
}

impl Related<super::cart_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
