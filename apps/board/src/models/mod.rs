pub mod card;
pub mod viewport;
