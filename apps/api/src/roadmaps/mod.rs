// Canonical roadmaps: career label → job-file key → roadmap document.
// Handlers for previewing a canonical roadmap live here too.

pub mod career;
pub mod handlers;
pub mod loader;
