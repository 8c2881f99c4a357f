pub use super::family_members::Entity as FamilyMembers;
pub use super::movies::Entity as Movies;
pub use super::ratings::Entity as Ratings;
