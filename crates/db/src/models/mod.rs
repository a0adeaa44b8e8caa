mod diary_entry;
mod user;

pub use diary_entry::DiaryEntry;
pub use user::User;
