pub mod generate;
pub mod info;
pub mod pump;
pub mod template;
pub mod validate;
