pub mod credits;
pub mod diary;
pub mod home;
pub mod stats;

pub mod metadata;
pub use metadata::{MetadataService, MetadataSource};

pub mod movie_service;
pub use movie_service::{AdminFilter, MovieError, MovieService};

pub mod movie_service_impl;
pub use movie_service_impl::SeaOrmMovieService;
