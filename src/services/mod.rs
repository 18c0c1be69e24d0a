pub mod credentials;
pub mod hierarchy;

pub use hierarchy::{HierarchyError, HierarchyService, NewUser};
