//! Identity record and payload decoding tests.

use smarthealth::identity::{decode_record, encode_record, Identity, IdentityError, Role};

#[test]
fn decodes_auth_payload() {
    let payload = r#"{"id":"42","name":"Dr. Meera Rao","email":"meera@district.gov","role":"health_officer"}"#;
    let identity = Identity::from_auth_payload(payload).expect("payload should decode");
    assert_eq!(identity.id(), "42");
    assert_eq!(identity.name(), "Dr. Meera Rao");
    assert_eq!(identity.email(), "meera@district.gov");
    assert_eq!(identity.role(), Role::HealthOfficer);
}

#[test]
fn encode_then_decode_preserves_all_fields() {
    let identity = Identity::new("7", "Ravi", "ravi@clinic.org", Role::ClinicStaff);
    let raw = encode_record(&identity).expect("encode");
    assert_eq!(decode_record(&raw).expect("decode"), identity);
}

#[test]
fn unrecognized_role_falls_back_to_public() {
    let raw = r#"{"id":"1","name":"n","email":"e@x","role":"superuser"}"#;
    let identity = decode_record(raw).expect("well-shaped record decodes");
    assert_eq!(identity.role(), Role::Public);
}

#[test]
fn rejects_structurally_invalid_records() {
    let cases = [
        "not json at all",
        "",
        "null",
        "[]",
        r#""a string""#,
        r#"{"id":"1","name":"n","email":"e"}"#,
        r#"{"id":"1","name":"n","email":"e","role":"admin","token":"x"}"#,
        r#"{"id":"1","name":"n","email":"e","role":null}"#,
        r#"{"id":"1","name":"n","email":["e"],"role":"admin"}"#,
        r#"{"id":"1","name":"n","email":"e","role":"admin""#,
    ];
    for raw in cases {
        assert!(
            matches!(decode_record(raw), Err(IdentityError::Malformed(_))),
            "{raw:?} should be rejected"
        );
    }
}
