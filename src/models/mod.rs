pub mod member;
pub mod movie;
pub mod rating;
