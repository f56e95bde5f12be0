// Job postings: form upload, lookup by id and listing by key.

pub mod form;
pub mod handlers;
pub mod ingest;
