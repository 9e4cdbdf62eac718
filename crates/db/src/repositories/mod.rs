//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod item_repo;
pub mod swap_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use item_repo::ItemRepo;
pub use swap_repo::{SwapRepo, SwapTransitionError};
pub use user_repo::UserRepo;
