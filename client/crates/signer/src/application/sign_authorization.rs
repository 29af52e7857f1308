//! Sign Authorization Use Case
//!
//! Signs every input of a reservation's PSBT with the wallet key and
//! finalizes the result for broadcast.

use bitcoin::hashes::Hash;
use bitcoin::psbt::{Input, Psbt};
use bitcoin::secp256k1::{All, Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, Prevouts, SighashCache, TapSighashType};
use bitcoin::{Transaction, TxOut, Witness, ecdsa, taproot};

use crate::domain::key::SigningKey;
use crate::domain::spend::{SpendPath, check_p2wpkh_prevout, check_taproot_prevout, tap_tweak};
use crate::error::{SignerError, SignerResult};

/// Signature produced for one input, not yet finalized
#[derive(Debug, Clone, Copy)]
enum InputSignature {
    Taproot(taproot::Signature),
    Ecdsa(ecdsa::Signature),
}

/// Sign a base64 PSBT and return the finalized base64 PSBT
///
/// Either every input ends up finalized or an error is returned; the caller
/// never sees a partially signed blob.
pub fn sign(unsigned_b64: &str, key: &SigningKey) -> SignerResult<String> {
    let bytes = platform::crypto::from_base64(unsigned_b64)
        .map_err(|e| SignerError::MalformedBlob(e.to_string()))?;
    let mut psbt = Psbt::deserialize(&bytes).map_err(|e| SignerError::MalformedBlob(e.to_string()))?;

    let signed = sign_psbt(&mut psbt, key).and_then(|n| finalize_psbt(&mut psbt, key).map(|()| n));
    match signed {
        Ok(inputs) => {
            tracing::info!(inputs, "Authorization signed and finalized");
            Ok(platform::crypto::to_base64(&psbt.serialize()))
        }
        Err(e) => {
            e.log();
            Err(e)
        }
    }
}

/// Attach a signature to every input
///
/// All signatures are computed before any input is modified.
pub fn sign_psbt(psbt: &mut Psbt, key: &SigningKey) -> SignerResult<usize> {
    let secp = Secp256k1::new();
    let prevouts = collect_prevouts(psbt)?;

    let signatures = {
        let mut cache = SighashCache::new(&psbt.unsigned_tx);
        psbt.inputs
            .iter()
            .enumerate()
            .map(|(index, input)| sign_input(&secp, &mut cache, index, input, &prevouts, key))
            .collect::<SignerResult<Vec<_>>>()?
    };

    let public = bitcoin::PublicKey::new(key.public_key());
    for (input, signature) in psbt.inputs.iter_mut().zip(&signatures) {
        match *signature {
            InputSignature::Taproot(sig) => input.tap_key_sig = Some(sig),
            InputSignature::Ecdsa(sig) => {
                input.partial_sigs.insert(public, sig);
            }
        }
    }
    Ok(signatures.len())
}

fn sign_input(
    secp: &Secp256k1<All>,
    cache: &mut SighashCache<&Transaction>,
    index: usize,
    input: &Input,
    prevouts: &[TxOut],
    key: &SigningKey,
) -> SignerResult<InputSignature> {
    let prevout = &prevouts[index];
    match SpendPath::of(input) {
        SpendPath::TweakedKey { internal_key } => {
            if internal_key != key.x_only_public_key() {
                return Err(SignerError::KeyMismatch { index });
            }
            let tweaked = tap_tweak(secp, &key.keypair(secp))?;
            check_taproot_prevout(index, prevout, &tweaked)?;

            let sighash = cache
                .taproot_key_spend_signature_hash(index, &Prevouts::All(prevouts), TapSighashType::Default)
                .map_err(|e| SignerError::Sighash { index, detail: e.to_string() })?;
            let msg = Message::from_digest(sighash.to_byte_array());
            let signature = secp.sign_schnorr_no_aux_rand(&msg, &tweaked);
            tracing::debug!(index, "Signed taproot key-path input");
            Ok(InputSignature::Taproot(taproot::Signature {
                signature,
                sighash_type: TapSighashType::Default,
            }))
        }
        SpendPath::Plain => {
            check_p2wpkh_prevout(index, prevout, key)?;

            let sighash = cache
                .p2wpkh_signature_hash(index, &prevout.script_pubkey, prevout.value, EcdsaSighashType::All)
                .map_err(|e| SignerError::Sighash { index, detail: e.to_string() })?;
            let msg = Message::from_digest(sighash.to_byte_array());
            let signature = secp.sign_ecdsa(&msg, key.secret_key());
            tracing::debug!(index, "Signed p2wpkh input");
            Ok(InputSignature::Ecdsa(ecdsa::Signature {
                signature,
                sighash_type: EcdsaSighashType::All,
            }))
        }
    }
}

/// Turn signatures into final witnesses and clear the partial fields
///
/// Witnesses for every input are built before any input is modified. Plain
/// inputs use the partial signature made by `key`; other keys' entries are
/// ignored.
pub fn finalize_psbt(psbt: &mut Psbt, key: &SigningKey) -> SignerResult<()> {
    let public = bitcoin::PublicKey::new(key.public_key());
    let witnesses = psbt
        .inputs
        .iter()
        .enumerate()
        .map(|(index, input)| final_witness(index, input, &public))
        .collect::<SignerResult<Vec<_>>>()?;

    for (input, witness) in psbt.inputs.iter_mut().zip(witnesses) {
        let utxo = input.witness_utxo.take();
        let non_witness_utxo = input.non_witness_utxo.take();
        let unknown = std::mem::take(&mut input.unknown);
        let proprietary = std::mem::take(&mut input.proprietary);
        *input = Input {
            witness_utxo: utxo,
            non_witness_utxo,
            final_script_witness: Some(witness),
            unknown,
            proprietary,
            ..Input::default()
        };
    }
    Ok(())
}

fn final_witness(index: usize, input: &Input, public: &bitcoin::PublicKey) -> SignerResult<Witness> {
    let mut witness = Witness::new();
    if let Some(sig) = input.tap_key_sig {
        witness.push(sig.to_vec());
        return Ok(witness);
    }
    let sig = input
        .partial_sigs
        .get(public)
        .ok_or(SignerError::MissingSignature { index })?;
    witness.push(sig.to_vec());
    witness.push(public.to_bytes());
    Ok(witness)
}

fn collect_prevouts(psbt: &Psbt) -> SignerResult<Vec<TxOut>> {
    psbt.inputs
        .iter()
        .zip(&psbt.unsigned_tx.input)
        .enumerate()
        .map(|(index, (input, txin))| {
            if let Some(utxo) = &input.witness_utxo {
                return Ok(utxo.clone());
            }
            input
                .non_witness_utxo
                .as_ref()
                .and_then(|tx| tx.output.get(txin.previous_output.vout as usize))
                .cloned()
                .ok_or(SignerError::MissingPrevout { index })
        })
        .collect()
}
