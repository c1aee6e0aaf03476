pub mod tokens;

pub use tokens::{Claims, TokenError, TokenPair, TokenService};
