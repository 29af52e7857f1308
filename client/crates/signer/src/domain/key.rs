//! Signing key

use std::fmt;

use bitcoin::PrivateKey;
use bitcoin::secp256k1::{Keypair, PublicKey, Secp256k1, SecretKey, Signing, XOnlyPublicKey};
use platform::secret::SecretString;

use crate::error::{SignerError, SignerResult};

/// The wallet's private key
///
/// Read-only for the lifetime of a minting run. Debug output is redacted and
/// the secret bytes are overwritten on drop.
pub struct SigningKey {
    secret: SecretKey,
    public: PublicKey,
}

impl SigningKey {
    /// Parse a WIF-encoded private key
    pub fn from_wif(wif: &SecretString) -> SignerResult<Self> {
        let private = PrivateKey::from_wif(wif.expose())
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self::from_secret_key(private.inner))
    }

    pub fn from_secret_key(secret: SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let public = PublicKey::from_secret_key(&secp, &secret);
        Self { secret, public }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    pub fn x_only_public_key(&self) -> XOnlyPublicKey {
        self.public.x_only_public_key().0
    }

    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    pub(crate) fn keypair<C: Signing>(&self, secp: &Secp256k1<C>) -> Keypair {
        Keypair::from_secret_key(secp, &self.secret)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.secret.non_secure_erase();
    }
}
