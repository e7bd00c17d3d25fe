use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// 公钥指数在Carmichael值下不存在模逆
    #[error("invalid public exponent: {0}")]
    InvalidExponent(String),

    /// p, q 不满足共享模数的要求
    #[error("invalid modulus parameters: {0}")]
    InvalidModulusParameters(String),

    #[error("public exponent search exhausted after {iterations} candidates")]
    ExhaustedCandidateSearch { iterations: usize },

    #[error("public exponent search cancelled after {iterations} candidates")]
    SearchCancelled { iterations: usize },

    /// 分组的整数值不在[0, n)内
    #[error("invalid block: {0}")]
    InvalidBlock(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("{0}")]
    Other(String),
}
