mod dto;
pub mod memory;
pub mod password;
mod record;
pub mod repo;
mod repo_types;
pub mod services;

pub use dto::{NewUser, UserView};
pub use memory::MemoryUserStore;
pub use password::{verify_password, Argon2Hasher, CredentialHasher};
pub use record::{Password, UserRecord};
pub use repo::{PgUserStore, UserStore};
pub use repo_types::{UserRow, UserWrite};
pub use services::UserService;
