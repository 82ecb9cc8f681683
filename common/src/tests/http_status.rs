use crate::HttpStatusCode;

#[test]
fn given_403_when_classified_then_is_forbidden() {
    assert!(HttpStatusCode::from(403).is_forbidden());
    assert!(!HttpStatusCode(404).is_forbidden());
    assert!(!HttpStatusCode(200).is_forbidden());
}

/// **VALUE**: The Display form is what ends up in every `<url>: <status>` line.
#[test]
fn given_status_when_displayed_then_prints_bare_number() {
    assert_eq!(HttpStatusCode(404).to_string(), "404");
    assert_eq!(HttpStatusCode(404).as_u16(), 404);
}
