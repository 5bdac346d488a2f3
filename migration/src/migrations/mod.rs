pub mod m202608250001_create_users;
pub mod m202608250002_create_questions;
