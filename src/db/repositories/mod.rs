pub mod address;
pub mod banner;
pub mod cart;
pub mod coupon;
pub mod product;
pub mod user;
