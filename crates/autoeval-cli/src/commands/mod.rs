pub mod compose;
pub mod grade;
pub mod init;
pub mod validate;
