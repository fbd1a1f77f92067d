pub mod generate;
pub mod grade;
pub mod init;
pub mod list_models;
pub mod parse;
pub mod review;
pub mod take;
pub mod validate;
