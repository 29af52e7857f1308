//! Spend path detection and key tweaking

use bitcoin::key::TweakedPublicKey;
use bitcoin::psbt::Input;
use bitcoin::secp256k1::{Keypair, Scalar, Secp256k1, Verification, XOnlyPublicKey};
use bitcoin::{CompressedPublicKey, ScriptBuf, TxOut};

use crate::domain::key::SigningKey;
use crate::error::{SignerError, SignerResult};

/// How an input is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendPath {
    /// P2TR key path with the BIP-341 tweak and no script tree
    TweakedKey { internal_key: XOnlyPublicKey },
    /// P2WPKH with the untweaked key
    Plain,
}

impl SpendPath {
    /// `tap_internal_key` selects the taproot path
    pub fn of(input: &Input) -> Self {
        match input.tap_internal_key {
            Some(internal_key) => SpendPath::TweakedKey { internal_key },
            None => SpendPath::Plain,
        }
    }
}

/// Apply the key-path-only taproot tweak: `t = H_TapTweak(P.x)`, `d' = d + t`
pub fn tap_tweak<C: Verification>(secp: &Secp256k1<C>, keypair: &Keypair) -> SignerResult<Keypair> {
    let (internal, _) = keypair.x_only_public_key();
    let tweak = platform::crypto::tagged_hash("TapTweak", &internal.serialize());
    let scalar = Scalar::from_be_bytes(tweak).map_err(|_| SignerError::Tweak)?;
    keypair.add_xonly_tweak(secp, &scalar).map_err(|_| SignerError::Tweak)
}

/// Check that `prevout` pays to the output key of `tweaked`
pub fn check_taproot_prevout(index: usize, prevout: &TxOut, tweaked: &Keypair) -> SignerResult<()> {
    if !prevout.script_pubkey.is_p2tr() {
        return Err(SignerError::UnsupportedScript { index });
    }
    let (output_key, _) = tweaked.x_only_public_key();
    let expected = ScriptBuf::new_p2tr_tweaked(TweakedPublicKey::dangerous_assume_tweaked(output_key));
    if prevout.script_pubkey != expected {
        return Err(SignerError::KeyMismatch { index });
    }
    Ok(())
}

/// Check that `prevout` pays to the hash of the signing key
pub fn check_p2wpkh_prevout(index: usize, prevout: &TxOut, key: &SigningKey) -> SignerResult<()> {
    if !prevout.script_pubkey.is_p2wpkh() {
        return Err(SignerError::UnsupportedScript { index });
    }
    let expected = ScriptBuf::new_p2wpkh(&CompressedPublicKey(key.public_key()).wpubkey_hash());
    if prevout.script_pubkey != expected {
        return Err(SignerError::KeyMismatch { index });
    }
    Ok(())
}
