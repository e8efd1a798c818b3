// Job listings: retrieval from the store and rendering into model context.
// Nothing here talks to the language model.

pub mod formatter;
pub mod repository;
