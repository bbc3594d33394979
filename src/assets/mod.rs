pub mod hydrate;
pub mod media;
