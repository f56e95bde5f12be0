pub mod job;
pub mod resume;

/// Generates a short document id: the first 8 hex characters of a random UUID.
pub fn new_document_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_is_eight_hex_chars() {
        let id = new_document_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
