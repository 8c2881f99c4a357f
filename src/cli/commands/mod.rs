mod list;
mod member;
mod search;

pub use list::cmd_list_movies;
pub use member::{cmd_member_add, cmd_member_list};
pub use search::cmd_search_movies;
