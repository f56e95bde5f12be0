// Similarity matching: cosine ranking over stored embeddings plus score banding.
// Handlers re-read both metadata files on every request.

pub mod bands;
pub mod handlers;
pub mod ranking;
