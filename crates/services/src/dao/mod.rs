pub mod base;
pub mod entry;
pub mod user;

pub use base::BaseDao;
