pub mod auth_service;
pub mod movie_service;
pub mod saved_movie_service;
pub mod token_service;
