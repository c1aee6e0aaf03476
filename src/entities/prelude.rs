pub use super::addresses::Entity as Addresses;
pub use super::cart_items::Entity as CartItems;
pub use super::carts::Entity as Carts;
pub use super::coupons::Entity as Coupons;
pub use super::feature_banners::Entity as FeatureBanners;
pub use super::products::Entity as Products;
pub use super::users::Entity as Users;
