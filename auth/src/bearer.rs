/// Extracts the token from an `Authorization` header value.
///
/// The scheme is matched case-sensitively as `Bearer ` and the token must be non-blank.
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bearer_scheme() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Bearer  abc "), Some("abc"));
    }

    #[test]
    fn rejects_other_shapes() {
        for value in ["", "Bearer", "Bearer ", "Bearer    ", "bearer abc", "Basic abc", "abc"] {
            assert_eq!(extract_bearer(value), None, "{value:?}");
        }
    }
}
