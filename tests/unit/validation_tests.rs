use phishdrill::validation::{email_error, is_valid_email, EMAIL_INVALID, EMAIL_REQUIRED};

#[test]
fn accepts_plain_company_addresses() {
    assert!(is_valid_email("ada@guestcompany.com"));
    assert!(is_valid_email("first.last@sub.example.co"));
    assert!(is_valid_email("ADA@GUESTCOMPANY.COM"));
}

#[test]
fn rejects_malformed_addresses() {
    assert!(!is_valid_email(""));
    assert!(!is_valid_email("not-an-email"));
    assert!(!is_valid_email("missing-domain@"));
    assert!(!is_valid_email("@missing-local.com"));
    assert!(!is_valid_email("no-tld@host"));
    assert!(!is_valid_email("two@@signs.com"));
    assert!(!is_valid_email("spa ce@example.com"));
}

#[test]
fn surrounding_whitespace_never_changes_validity() {
    for email in ["ada@guestcompany.com", "not-an-email", "", "a@b.c"] {
        let padded = format!("  {email}\t\n");
        assert_eq!(
            is_valid_email(email),
            is_valid_email(&padded),
            "trim invariance broken for {email:?}"
        );
    }
}

#[test]
fn empty_input_is_required() {
    assert_eq!(email_error(""), Some(EMAIL_REQUIRED));
    assert_eq!(email_error("   "), Some(EMAIL_REQUIRED));
}

#[test]
fn invalid_input_gets_the_invalid_message() {
    assert_eq!(email_error("not-an-email"), Some(EMAIL_INVALID));
}

#[test]
fn valid_input_has_no_error() {
    assert_eq!(email_error("ada@guestcompany.com"), None);
    assert_eq!(email_error("  ada@guestcompany.com  "), None);
}
