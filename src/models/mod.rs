pub mod movie;
pub mod saved_movie;
pub mod user;

pub use movie::*;
pub use saved_movie::*;
pub use user::*;
