use request_bot::signature::{sign, verify};

const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
const TIMESTAMP: &str = "1531420618";
const BODY: &[u8] = b"command=%2Frequests&text=list&user_id=U2CERLKJA";

#[test]
fn test_known_vector() {
    let expected = "v0=2dfc0a9b2242f29bac95ebbb746abbd0fb34c8101ebcb645ba389d2b1ad6d426";
    assert_eq!(sign(SECRET, TIMESTAMP, BODY), expected);
    assert!(verify(Some(expected), Some(TIMESTAMP), BODY, SECRET));
}

#[test]
fn test_any_body_mutation_fails() {
    let sig = sign(SECRET, TIMESTAMP, BODY);
    for i in 0..BODY.len() {
        let mut tampered = BODY.to_vec();
        tampered[i] ^= 0x01;
        assert!(!verify(Some(&sig), Some(TIMESTAMP), &tampered, SECRET), "byte {i}");
    }
}

#[test]
fn test_any_signature_character_change_fails() {
    let sig = sign(SECRET, TIMESTAMP, BODY);
    assert_eq!(sig.len(), 3 + 64);
    for i in 3..sig.len() {
        let mut chars: Vec<char> = sig.chars().collect();
        chars[i] = if chars[i] == '0' { '1' } else { '0' };
        let flipped: String = chars.into_iter().collect();
        assert_eq!(flipped.len(), sig.len());
        assert!(!verify(Some(&flipped), Some(TIMESTAMP), BODY, SECRET), "char {i}");
    }
}

#[test]
fn test_wrong_secret_fails() {
    let sig = sign(SECRET, TIMESTAMP, BODY);
    assert!(!verify(Some(&sig), Some(TIMESTAMP), BODY, "another-secret"));
}

#[test]
fn test_timestamp_is_part_of_the_signature() {
    let sig = sign(SECRET, TIMESTAMP, BODY);
    assert!(!verify(Some(&sig), Some("1531420619"), BODY, SECRET));
}

#[test]
fn test_missing_headers_fail_closed() {
    let sig = sign(SECRET, TIMESTAMP, BODY);
    assert!(!verify(None, Some(TIMESTAMP), BODY, SECRET));
    assert!(!verify(Some(&sig), None, BODY, SECRET));
    assert!(!verify(None, None, BODY, SECRET));
}

#[test]
fn test_malformed_signatures_fail() {
    let sig = sign(SECRET, TIMESTAMP, BODY);
    let bare_hex = sig.trim_start_matches("v0=");
    assert!(!verify(Some(bare_hex), Some(TIMESTAMP), BODY, SECRET));
    assert!(!verify(Some(&format!("v1={bare_hex}")), Some(TIMESTAMP), BODY, SECRET));
    assert!(!verify(Some("v0=zz"), Some(TIMESTAMP), BODY, SECRET));
    assert!(!verify(Some(&sig[..sig.len() - 2]), Some(TIMESTAMP), BODY, SECRET));
    assert!(!verify(Some(""), Some(TIMESTAMP), BODY, SECRET));
}

#[test]
fn test_empty_body_is_signable() {
    let sig = sign(SECRET, TIMESTAMP, b"");
    assert!(verify(Some(&sig), Some(TIMESTAMP), b"", SECRET));
}
