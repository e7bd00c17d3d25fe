//! 参考notebook 'RSA密码学规范PKCS1_v_2_2.md'
use crate::CipherError;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialOrd, PartialEq, Ord, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    // n = p * q
    n: BigUint,
    // public exponent, gcd(e, lcm(p-1, q-1)) = 1
    e: BigUint,
}

/// 两素数的CRT形式私钥 `{n, e, d, p, q, dP, dQ, qInv}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    pk: PublicKey,
    // d * e = 1 % lambda(n)
    d: BigUint,
    p: BigUint,
    q: BigUint,
    // 预计算值, 加速私钥的计算
    pre: PrecomputedValues,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PrecomputedValues {
    // d % (p - 1)
    d_p: BigUint,
    // d % (q - 1)
    d_q: BigUint,
    // q^{-1} % p
    q_inv: BigUint,
}

impl PublicKey {
    /// n: RSA modules
    /// e: public key exponent
    /// note: not to check the `n` and `exp` are right RSA parameters
    pub fn new_uncheck(n: BigUint, exp: BigUint) -> Self {
        Self { e: exp, n }
    }

    /// n
    pub fn modules(&self) -> &BigUint {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    /// 模数的字节长度
    pub fn modules_len(&self) -> usize {
        super::primitive::modulus_len(&self.n)
    }

    /// $m^e \mod n, m \lt n$
    pub(crate) fn rsaep_uncheck(&self, m: &BigUint) -> BigUint {
        m.modpow(&self.e, &self.n)
    }

    /// RSAEP: RSA Encrypt primitive
    pub fn rsaep(&self, m: &BigUint) -> Result<BigUint, CipherError> {
        if m < &self.n {
            Ok(self.rsaep_uncheck(m))
        } else {
            Err(CipherError::InvalidBlock(format!(
                "rsaep: invalid message that need less than {:#x}",
                self.n
            )))
        }
    }
}

impl PrivateKey {
    /// 由已经计算好的各分量构造私钥, 由`sra::KeyPair::derive`调用.
    /// note: not to check the components are consistent, see [`PrivateKey::is_valid`]
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_uncheck(
        pk: PublicKey,
        d: BigUint,
        p: BigUint,
        q: BigUint,
        d_p: BigUint,
        d_q: BigUint,
        q_inv: BigUint,
    ) -> Self {
        Self {
            pk,
            d,
            p,
            q,
            pre: PrecomputedValues { d_p, d_q, q_inv },
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// d
    pub fn private_exponent(&self) -> &BigUint {
        &self.d
    }

    /// (p, q), p > q
    pub fn primes(&self) -> (&BigUint, &BigUint) {
        (&self.p, &self.q)
    }

    /// d % (p - 1)
    pub fn d_p(&self) -> &BigUint {
        &self.pre.d_p
    }

    /// d % (q - 1)
    pub fn d_q(&self) -> &BigUint {
        &self.pre.d_q
    }

    /// q^{-1} % p
    pub fn q_inv(&self) -> &BigUint {
        &self.pre.q_inv
    }

    /// RSADP: RSA Decrypt primitive
    pub fn rsadp(&self, c: &BigUint) -> Result<BigUint, CipherError> {
        if c < &self.pk.n {
            Ok(self.rsadp_uncheck(c))
        } else {
            Err(CipherError::InvalidBlock(format!(
                "rsadp: invalid cipher message {:#x} that need less than {:#x}",
                c, self.pk.n
            )))
        }
    }

    // m1 = c^{dp} % p, m2 = c^{dq} % q
    // h = (m1 - m2) * qinv % p
    // m = m2 + q * h
    pub(crate) fn rsadp_uncheck(&self, c: &BigUint) -> BigUint {
        let (p, q) = (&self.p, &self.q);
        let (m1, m2) = (c.modpow(&self.pre.d_p, p), c.modpow(&self.pre.d_q, q));

        // m1 + p - (m2 % p) > 0
        let mut h = m1 + p;
        h -= &m2 % p;
        h *= &self.pre.q_inv;
        h %= p;

        h *= q;
        h + m2
    }

    /// 检查`n = p * q`, `e * d = 1 % (p-1), (q-1)`以及CRT预计算值的一致性
    pub fn is_valid(&self) -> Result<(), CipherError> {
        let one = BigUint::one();
        let (p, q) = (&self.p, &self.q);
        if p <= &one || q <= &one {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid prime value".to_string(),
            ));
        }

        if &(p * q) != self.pk.modules() {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid modulus".to_string(),
            ));
        }

        let (p_sub1, q_sub1) = (p - &one, q - &one);
        let de = &self.d * self.pk.exponent();
        let congruent = |m: &BigUint| m.is_one() || (&de % m).is_one();
        if !congruent(&p_sub1) || !congruent(&q_sub1) {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid exponent".to_string(),
            ));
        }

        if self.pre.d_p != &self.d % &p_sub1
            || self.pre.d_q != &self.d % &q_sub1
            || !(q * &self.pre.q_inv % p).is_one()
        {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid CRT values".to_string(),
            ));
        }

        if self.d.is_zero() {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: private exponent is zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{n={:#x}, e={:#x}}}", self.n, self.e)
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{pk: {}, d: {:#x}, p: {:#x}, q: {:#x}, dP: {:#x}, dQ: {:#x}, qInv: {:#x}}}",
            self.pk, self.d, self.p, self.q, self.pre.d_p, self.pre.d_q, self.pre.q_inv
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::rsa::{PrivateKey, PublicKey};
    use crate::CipherError;
    use num_bigint::BigUint;
    use num_traits::Num;

    // gnutls test key, 65537 and the factors are taken as given
    fn gnu_tls_key() -> PrivateKey {
        let n = BigUint::from_str_radix("290684273230919398108010081414538931343", 10).unwrap();
        let e = BigUint::from(65537u32);
        let d = BigUint::from_str_radix("31877380284581499213530787347443987241", 10).unwrap();
        let (p, q) = (
            BigUint::from_str_radix("17328218193455850539", 10).unwrap(),
            BigUint::from_str_radix("16775196964030542637", 10).unwrap(),
        );

        let (d_p, d_q) = (&d % (&p - 1u32), &d % (&q - 1u32));
        let q_inv = utils::BigUintExt(&q).modinv(&p).unwrap();
        PrivateKey::new_uncheck(PublicKey::new_uncheck(n, e), d, p, q, d_p, d_q, q_inv)
    }

    #[test]
    fn crt_matches_plain_modpow() {
        let key = gnu_tls_key();
        key.is_valid().unwrap();

        let n = key.public_key().modules().clone();
        for m in [0u64, 1, 2, 42, 0xdead_beef, u64::MAX] {
            let m = BigUint::from(m) % &n;
            let c = key.public_key().rsaep(&m).unwrap();
            assert_eq!(key.rsadp(&c).unwrap(), m);
            assert_eq!(c.modpow(key.private_exponent(), &n), m);
        }
    }

    #[test]
    fn out_of_range() {
        let key = gnu_tls_key();
        let n = key.public_key().modules().clone();
        assert!(matches!(
            key.public_key().rsaep(&n),
            Err(CipherError::InvalidBlock(_))
        ));
        assert!(matches!(key.rsadp(&n), Err(CipherError::InvalidBlock(_))));
    }

    #[test]
    fn inconsistent_key() {
        let mut key = gnu_tls_key();
        key.pre.d_q += 1u32;
        assert!(matches!(
            key.is_valid(),
            Err(CipherError::InvalidPrivateKey(_))
        ));

        let mut key = gnu_tls_key();
        key.d += 2u32;
        assert!(key.is_valid().is_err());
    }
}
