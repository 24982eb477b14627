//! Hex codec between wire envelopes and crypto envelopes.

use crate::errors::RecoveryError;
use vault_crypto::EciesEnvelope;
use vault_types::RecoveryEnvelope;

/// Hex-encode a ciphertext envelope for the wire.
pub fn to_wire(envelope: &EciesEnvelope) -> RecoveryEnvelope {
    RecoveryEnvelope {
        iv: hex::encode(envelope.iv),
        ephemeral_public_key: hex::encode(envelope.ephemeral_public_key),
        ciphertext: hex::encode(&envelope.ciphertext),
        mac: hex::encode(envelope.mac),
    }
}

/// Decode a wire envelope.
///
/// Any malformed field is a decrypt failure: the caller presented an
/// envelope this vault cannot open, and which field broke is not theirs
/// to distinguish.
pub fn from_wire(wire: &RecoveryEnvelope) -> Result<EciesEnvelope, RecoveryError> {
    let iv = decode_array::<16>(&wire.iv)?;
    let ephemeral_public_key = decode_array::<65>(&wire.ephemeral_public_key)?;
    let ciphertext = hex::decode(&wire.ciphertext).map_err(|_| RecoveryError::Decrypt)?;
    let mac = decode_array::<32>(&wire.mac)?;

    Ok(EciesEnvelope {
        iv,
        ephemeral_public_key,
        ciphertext,
        mac,
    })
}

fn decode_array<const N: usize>(field: &str) -> Result<[u8; N], RecoveryError> {
    let bytes = hex::decode(field).map_err(|_| RecoveryError::Decrypt)?;
    bytes.try_into().map_err(|_| RecoveryError::Decrypt)
}
