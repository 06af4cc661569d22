//! Continuation tokens for scan pagination: base64 over the JSON of the
//! store's native key, e.g. `{"id":"u3"}` -> `eyJpZCI6InUzIn0=`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use roster_database::PrimaryKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token does not hold a scan key: {0}")]
    Key(#[from] serde_json::Error),
}

pub fn encode_scan_key(key: &PrimaryKey) -> Result<String, CursorError> {
    let json = serde_json::to_vec(key)?;
    Ok(STANDARD.encode(json))
}

pub fn decode_scan_key(token: &str) -> Result<PrimaryKey, CursorError> {
    let json = STANDARD.decode(token)?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_json_key_with_standard_alphabet() {
        let token = encode_scan_key(&PrimaryKey { id: "u3".into() }).unwrap();
        assert_eq!(token, "eyJpZCI6InUzIn0=");
    }

    #[test]
    fn decoding_an_issued_token_reproduces_it_exactly() {
        let key = PrimaryKey {
            id: "ünïcode/+id?".into(),
        };
        let token = encode_scan_key(&key).unwrap();
        let decoded = decode_scan_key(&token).unwrap();

        assert_eq!(decoded, key);
        assert_eq!(encode_scan_key(&decoded).unwrap(), token);
    }

    #[test]
    fn rejects_non_base64_tokens() {
        assert!(matches!(
            decode_scan_key("not base64!"),
            Err(CursorError::Encoding(_))
        ));
    }

    #[test]
    fn rejects_base64_that_is_not_a_key() {
        let token = STANDARD.encode(r#"{"name":"Ada"}"#);
        assert!(matches!(decode_scan_key(&token), Err(CursorError::Key(_))));

        let token = STANDARD.encode("plain text");
        assert!(matches!(decode_scan_key(&token), Err(CursorError::Key(_))));
    }
}
