use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SraError {
    #[error("Invalid integer `{0}`, expect decimal or `0x` prefixed hex")]
    InvalidInteger(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid key file: {0}")]
    InvalidKeyFile(String),

    #[error("The party index `{idx}` out of range, the key file has `{len}` keys")]
    PartyOutOfRange { idx: usize, len: usize },

    #[error("An explicit exponent derives only one key, but `{0}` parties requested")]
    ExplicitExponentParties(usize),

    #[error("Party `{party}` drew a public exponent used by another party {attempts} times")]
    DuplicateExponent { party: usize, attempts: usize },

    #[error("{0}")]
    NotSupport(String),
}
