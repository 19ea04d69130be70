// [crates/windi-virtue-token/src/issuer.rs]
//! Token issuance and validation, plus the append-only issuance log.

use std::sync::Mutex;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

use windi_common::hmac_sign::{hmac_sha256, verify_hmac_sha256};
use windi_common::nonce::generate_nonce_b64;
use windi_common::{now_epoch_ms, to_canonical_json};

use crate::error::{Result, TokenError};
use crate::token::{complete_draft, SignedToken, SignedTokenHeader, TokenDraft, VirtueToken};

#[derive(Debug, Clone, Serialize)]
pub struct IssuanceLogEntry {
    pub actor: String,
    pub s_level: u8,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates Virtue Tokens for one signing key. One lock
/// guards the append-only issuance log; issuance and validation
/// themselves touch no other shared state.
pub struct TokenIssuer {
    hmac_key: Vec<u8>,
    issuance_log: Mutex<Vec<IssuanceLogEntry>>,
}

impl TokenIssuer {
    pub fn new(hmac_key: Vec<u8>) -> Self {
        TokenIssuer {
            hmac_key,
            issuance_log: Mutex::new(Vec::new()),
        }
    }

    fn sign(&self, payload: &VirtueToken) -> String {
        let bytes = to_canonical_json(payload);
        STANDARD.encode(hmac_sha256(&self.hmac_key, &bytes))
    }

    /// Completes `draft`'s defaults, signs it, and appends an issuance
    /// log entry.
    pub fn issue(&self, draft: TokenDraft) -> SignedToken {
        let iat = now_epoch_ms();
        let nonce = generate_nonce_b64();
        let actor = draft.sub.clone();
        let payload = complete_draft(draft, iat, nonce);
        let signature = self.sign(&payload);

        self.issuance_log
            .lock()
            .expect("issuance log lock poisoned")
            .push(IssuanceLogEntry {
                actor,
                s_level: payload.s_level,
                iat: payload.iat,
                exp: payload.exp,
            });

        SignedToken {
            header: SignedTokenHeader::default(),
            payload,
            signature,
        }
    }

    /// Recomputes the signature and expiry; never trusts the caller's
    /// claimed fields without independent verification.
    pub fn validate(&self, token: &SignedToken, now: i64) -> Result<VirtueToken> {
        let expected_bytes = to_canonical_json(&token.payload);
        let received_sig = STANDARD
            .decode(&token.signature)
            .map_err(|_| TokenError::Malformed("signature is not valid base64".to_string()))?;

        if !verify_hmac_sha256(&self.hmac_key, &expected_bytes, &received_sig) {
            return Err(TokenError::SignatureInvalid);
        }

        if now > token.payload.exp {
            return Err(TokenError::TokenExpired);
        }

        Ok(token.payload.clone())
    }

    pub fn issuance_log(&self) -> Vec<IssuanceLogEntry> {
        self.issuance_log.lock().expect("issuance log lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SLevel;
    use std::collections::HashSet;

    fn draft(level: SLevel) -> TokenDraft {
        TokenDraft {
            sub: "user-1".to_string(),
            s_level: level,
            domains: vec!["*".to_string()],
            kill_switch_authority: true,
            signals: None,
            shelves: None,
            temporal_scope_hours: None,
        }
    }

    #[test]
    fn issue_then_validate_reconstructs_the_token() {
        let issuer = TokenIssuer::new(b"issuer-secret".to_vec());
        let signed = issuer.issue(draft(SLevel::Strategic));

        let validated = issuer.validate(&signed, signed.payload.iat).unwrap();
        assert_eq!(validated.s_level, 2);
        assert_eq!(validated.domains, vec!["*".to_string()]);
        assert!(validated.kill_switch_authority);
    }

    #[test]
    fn kill_switch_authority_is_forced_false_below_l2() {
        let issuer = TokenIssuer::new(b"secret".to_vec());
        let signed = issuer.issue(draft(SLevel::Tactical));
        assert!(!signed.payload.kill_switch_authority);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new(b"secret".to_vec());
        let signed = issuer.issue(draft(SLevel::Tactical));
        let err = issuer.validate(&signed, signed.payload.exp + 1).unwrap_err();
        assert_eq!(err, TokenError::TokenExpired);
    }

    #[test]
    fn tampered_payload_invalidates_signature() {
        let issuer = TokenIssuer::new(b"secret".to_vec());
        let mut signed = issuer.issue(draft(SLevel::Tactical));
        signed.payload.signals = {
            let mut s: HashSet<String> = HashSet::new();
            s.insert("DEC-OVR".to_string());
            s.into_iter().collect()
        };
        let err = issuer.validate(&signed, signed.payload.iat).unwrap_err();
        assert_eq!(err, TokenError::SignatureInvalid);
    }

    #[test]
    fn issuance_log_records_every_issue_call() {
        let issuer = TokenIssuer::new(b"secret".to_vec());
        issuer.issue(draft(SLevel::Tactical));
        issuer.issue(draft(SLevel::Sovereign));
        assert_eq!(issuer.issuance_log().len(), 2);
    }
}
