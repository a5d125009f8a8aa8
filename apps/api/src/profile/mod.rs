// Student profiles: lookup across users/students and rendering for prompts.

pub mod store;
pub mod text;
