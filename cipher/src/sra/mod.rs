//! SRA: Shamir, Rivest, Adleman的可交换加密
//!
//! 多方共享同一个模数$n=p*q$, 每一方各自选择公私钥指数$(e_i, d_i)$. 由于同模数下的模幂运算可交换:
//!
//! $(m^{e_A})^{e_B} \equiv (m^{e_B})^{e_A} \equiv m^{e_A e_B} \mod n$
//!
//! 以任意顺序叠加各方的加密, 得到的密文相同; 以任意顺序用对应的私钥指数解密, 都能恢复$m$.
//! 可用于mental poker(公平洗牌)等协议.
//!
//! 注意: 这里的"公钥"$\{n, e\}$并不是用来公开的, 只应交给参与协议的一方; 泄露$e$不会泄露$p, q$,
//! 但任何持有$e$的人都可以剥掉对应的加密层之外再加一层.
//!
//! SRA的加解密与RSA的模幂原语完全相同, 不做填充, 见[`crate::rsa`].

mod cancel;
pub use cancel::CancelToken;

mod params;
pub use params::SharedModulus;

mod policy;
pub use policy::{ExponentPolicy, ExponentSearch};

mod keygen;
pub use keygen::KeyPair;

pub use crate::rsa::{transform, PrivateKey, PublicKey};

/// SRA的加解密就是RSA的模幂原语: `transform(block, exponent, modulus)`
pub type SraEngine =
    fn(&[u8], &num_bigint::BigUint, &num_bigint::BigUint) -> Result<Vec<u8>, crate::CipherError>;

/// 默认的[`SraEngine`]
pub const SRA_ENGINE: SraEngine = transform;
