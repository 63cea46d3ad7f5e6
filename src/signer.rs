//! HMAC-SHA256 logon signer

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::core::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer keyed with a base64-decoded API secret
#[derive(Clone)]
pub struct HmacSigner {
    mac: HmacSha256,
}

impl HmacSigner {
    pub fn from_base64(secret_b64: &str) -> Result<Self> {
        let key = BASE64
            .decode(secret_b64)
            .map_err(|e| Error::InvalidCredential(format!("secret is not valid base64: {}", e)))?;
        let mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| Error::InvalidCredential(format!("unusable HMAC key: {}", e)))?;
        Ok(Self { mac })
    }

    /// Raw digest bytes
    pub fn sign_bytes(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    /// Base64 digest, the form the venue expects in RawData
    pub fn sign(&self, message: &str) -> String {
        BASE64.encode(self.sign_bytes(message.as_bytes()))
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner").finish_non_exhaustive()
    }
}

/// Sign `message` with a base64 secret and return the base64 digest.
pub fn sign(message: &str, secret_b64: &str) -> Result<String> {
    Ok(HmacSigner::from_base64(secret_b64)?.sign(message))
}
