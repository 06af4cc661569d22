pub mod error;
pub mod sort;
pub mod users;

pub use error::*;
pub use sort::{sort_users, SortKey};
pub use users::{NameLookup, NamePage, PageRequest, SortOrder, UserService, UsersPage};
