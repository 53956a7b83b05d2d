pub mod grade;
pub mod init;
pub mod strip;
pub mod validate;
