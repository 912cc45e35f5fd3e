//! Key codec errors
//!
//! Variants map one-to-one onto the points where an import can fail, so
//! callers can show a specific message without parsing strings.

use thiserror::Error;

use super::wire::WireError;

/// Broad classification of a [`CodecError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed base64, truncated buffers, bad lengths
    InvalidInput,
    /// Well-formed input using something this codec does not handle
    Unsupported,
    /// Internally inconsistent container
    StructuralMismatch,
    /// Right shape, but rejected by the curve implementation
    CryptographicRejection,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid wire data: {0}")]
    Wire(#[from] WireError),

    #[error("invalid base64 payload")]
    InvalidBase64,

    #[error("missing or malformed PEM armor")]
    InvalidArmor,

    #[error("invalid prefix: not an openssh-key-v1 container")]
    InvalidPrefix,

    #[error("unsupported cipher: {0}")]
    UnsupportedCipher(String),

    #[error("unsupported KDF: {0}")]
    UnsupportedKdf(String),

    #[error("multiple keys not supported (container holds {0})")]
    MultipleKeysNotSupported(u32),

    #[error("encrypted key requires passphrase")]
    PassphraseRequired,

    #[error("encrypted keys not yet supported")]
    EncryptedKeyNotSupported,

    #[error("encrypted PEM keys not yet supported")]
    EncryptedPemNotSupported,

    #[error("invalid check bytes")]
    InvalidCheckBytes,

    #[error("key type mismatch: public section has {public}, private section has {private}")]
    KeyTypeMismatch { public: String, private: String },

    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("invalid key data: {0}")]
    InvalidKeyData(String),

    #[error("parsing failed: {0}")]
    ParsingFailed(String),

    #[error("unable to parse PEM key")]
    UnableToParsePem,

    #[error("RSA keys are not supported")]
    RsaNotSupported,

    #[error("unrecognized key format")]
    UnknownFormat,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Wire(_)
            | CodecError::InvalidBase64
            | CodecError::InvalidArmor
            | CodecError::InvalidPrefix
            | CodecError::InvalidKeyData(_)
            | CodecError::UnableToParsePem
            | CodecError::UnknownFormat => ErrorKind::InvalidInput,

            CodecError::UnsupportedCipher(_)
            | CodecError::UnsupportedKdf(_)
            | CodecError::MultipleKeysNotSupported(_)
            | CodecError::PassphraseRequired
            | CodecError::EncryptedKeyNotSupported
            | CodecError::EncryptedPemNotSupported
            | CodecError::UnsupportedKeyType(_)
            | CodecError::RsaNotSupported => ErrorKind::Unsupported,

            CodecError::InvalidCheckBytes | CodecError::KeyTypeMismatch { .. } => {
                ErrorKind::StructuralMismatch
            }

            CodecError::ParsingFailed(_) => ErrorKind::CryptographicRejection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(CodecError::RsaNotSupported.kind(), ErrorKind::Unsupported);
        assert_eq!(
            CodecError::InvalidCheckBytes.kind(),
            ErrorKind::StructuralMismatch
        );
        assert_eq!(
            CodecError::from(WireError::InvalidUtf8).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            CodecError::ParsingFailed("scalar".into()).kind(),
            ErrorKind::CryptographicRejection
        );
    }
}
