pub mod user;

pub use user::{PublicUser, Role, User, UserDraft};
