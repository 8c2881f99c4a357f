pub mod prelude;

pub mod family_members;
pub mod movies;
pub mod ratings;
