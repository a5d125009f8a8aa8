// Roadmap personalization core.
// normalize → recovery → extractor → reconcile, driven by pipeline.
// The core is synchronous and infallible; all I/O happens in handlers.

pub mod extractor;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod reconcile;
pub mod recovery;
