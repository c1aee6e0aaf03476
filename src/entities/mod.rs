pub mod prelude;

pub mod addresses;
pub mod cart_items;
pub mod carts;
pub mod coupons;
pub mod feature_banners;
pub mod products;
pub mod users;
