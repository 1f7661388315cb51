//! Production collaborator implementations

pub mod api_client;
pub mod contexts;
pub mod token;

pub use api_client::{normalize_course_payload, NewtonClient};
pub use contexts::{EnvContextProvider, NoContexts};
pub use token::TokenProvider;
