use crate::rsa::{PrivateKey, PublicKey};
use crate::sra::{ExponentPolicy, SharedModulus};
use crate::{CipherError, DefaultRand, Rand};
use num_bigint::BigUint;
use num_traits::One;
use utils::BigUintExt;

/// 一方在共享模数下的SRA密钥对.
///
/// `public`为$\{n, e\}$, 只交给协议中的其他参与方, 不应公开.
#[derive(Clone, Debug)]
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}

impl KeyPair {
    /// 在共享的$(p, q)$下派生公私钥指数及CRT预计算值.
    ///
    /// - $n = p * q$; 若$p < q$则交换, 保证$q_{inv} = q^{-1} \mod p$以较大的素数为模;
    /// - $\lambda = lcm(p-1, q-1)$;
    /// - 按`policy`选取$e$, $d = e^{-1} \mod \lambda$, 不存在时返回`InvalidExponent`;
    /// - $d_P = d \mod (p-1)$, $d_Q = d \mod (q-1)$.
    ///
    /// 不检查p, q是否为素数.
    pub fn derive<R: Rand>(
        params: &SharedModulus,
        policy: ExponentPolicy<R>,
    ) -> Result<Self, CipherError> {
        let (mut p, mut q) = (params.p(), params.q());
        let lcm = params.carmichael()?;
        let n = p * q;

        if p < q {
            (p, q) = (q, p);
        }

        let one = BigUint::one();
        let (p_sub1, q_sub1) = (p - &one, q - &one);

        let q_inv = BigUintExt(q).modinv(p).ok_or_else(|| {
            CipherError::InvalidModulusParameters("sra: p and q are not coprime".to_string())
        })?;

        let e = match policy {
            ExponentPolicy::Explicit(e) => e,
            ExponentPolicy::RandomSearch(search) => search.search(&lcm)?,
        };

        let d = BigUintExt(&e).modinv(&lcm).ok_or_else(|| {
            CipherError::InvalidExponent(format!(
                "sra: exponent {e:#x} has no inverse modulo lcm(p-1, q-1)"
            ))
        })?;

        let (d_p, d_q) = (&d % &p_sub1, &d % &q_sub1);

        log::debug!("sra: derived key pair for a {} bits modulus", n.bits());

        let public = PublicKey::new_uncheck(n, e);
        let private = PrivateKey::new_uncheck(
            public.clone(),
            d,
            p.clone(),
            q.clone(),
            d_p,
            d_q,
            q_inv,
        );

        Ok(Self { public, private })
    }

    /// [`KeyPair::derive`] with [`ExponentPolicy::Explicit`]
    pub fn derive_with_exponent(params: &SharedModulus, e: BigUint) -> Result<Self, CipherError> {
        Self::derive(params, ExponentPolicy::<DefaultRand>::Explicit(e))
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    pub fn into_parts(self) -> (PublicKey, PrivateKey) {
        (self.public, self.private)
    }
}
