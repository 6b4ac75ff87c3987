pub mod client;
pub mod error;
pub mod model;

pub use client::RsvpApi;
pub use error::RsvpError;
pub use model::{
    Category, DietarySelection, GuestResponse, Group, Language, NewGuestResponse,
};
