pub mod roadmap;

pub use roadmap::{Item, Personalization, Roadmap, Status};
