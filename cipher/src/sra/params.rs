use crate::{CipherError, Rand};
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use utils::BigUintExt;

/// 各方共享的素数对$(p, q)$, 模数$n = p * q$.
///
/// p, q必须是素数且不相等. [`SharedModulus::new`]只做结构检查(都大于1且不相等),
/// 不做素性测试; 需要时调用[`SharedModulus::verify_primes`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedModulus {
    p: BigUint,
    q: BigUint,
}

impl SharedModulus {
    pub fn new(p: BigUint, q: BigUint) -> Result<Self, CipherError> {
        let one = BigUint::one();
        if p <= one || q <= one {
            return Err(CipherError::InvalidModulusParameters(
                "sra: primes must be greater than 1".to_string(),
            ));
        }

        if p == q {
            return Err(CipherError::InvalidModulusParameters(
                "sra: p and q must be distinct".to_string(),
            ));
        }

        Ok(Self { p, q })
    }

    /// note: not to check `p` and `q`, composite or equal values give no security guarantee
    pub fn new_uncheck(p: BigUint, q: BigUint) -> Self {
        Self { p, q }
    }

    /// 生成两个不相等的素数, 其乘积的位长度为`bits_len`.
    ///
    /// 素数的最高两位都置1, 8位的模数只能由4位素数13构成, 所以`bits_len`至少为9.
    ///
    /// `prime_test_rounds`见[`BigUintExt::probably_prime_test`].
    pub fn generate<R: Rand>(
        bits_len: usize,
        prime_test_rounds: usize,
        rng: &mut R,
    ) -> Result<Self, CipherError> {
        if bits_len < 9 {
            return Err(CipherError::Other(format!(
                "sra: modulus of {bits_len} bits is too small"
            )));
        }

        let (p_bits, q_bits) = (bits_len - (bits_len >> 1), bits_len >> 1);
        loop {
            let p = BigUintExt::<BigUint>::generate_prime(p_bits, prime_test_rounds, rng)
                .map_err(CipherError::Other)?;
            let q = BigUintExt::<BigUint>::generate_prime(q_bits, prime_test_rounds, rng)
                .map_err(CipherError::Other)?;

            if p != q && (&p * &q).bits() as usize == bits_len {
                return Ok(Self { p, q });
            }
        }
    }

    /// 对p, q做概率素性测试
    pub fn verify_primes<R: Rand>(
        &self,
        test_rounds: usize,
        rng: &mut R,
    ) -> Result<(), CipherError> {
        for (name, x) in [("p", &self.p), ("q", &self.q)] {
            if !BigUintExt(x).probably_prime_test(test_rounds, rng) {
                return Err(CipherError::InvalidModulusParameters(format!(
                    "sra: {name} = {x:#x} is not a prime"
                )));
            }
        }

        Ok(())
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// n = p * q
    pub fn modulus(&self) -> BigUint {
        &self.p * &self.q
    }

    /// Carmichael值 lcm(p-1, q-1)
    pub fn carmichael(&self) -> Result<BigUint, CipherError> {
        BigUintExt(&self.p).carmichael(&self.q).ok_or_else(|| {
            CipherError::InvalidModulusParameters(
                "sra: primes must be greater than 1".to_string(),
            )
        })
    }
}

impl Display for SharedModulus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{p: {:#x}, q: {:#x}}}", self.p, self.q)
    }
}

#[cfg(test)]
mod tests {
    use super::SharedModulus;
    use crate::{CipherError, DefaultRand};
    use num_bigint::BigUint;

    #[test]
    fn structural_checks() {
        let b = |x: u32| BigUint::from(x);
        assert!(SharedModulus::new(b(11), b(23)).is_ok());
        for (p, q) in [(11, 11), (1, 23), (0, 23), (11, 1)] {
            assert!(matches!(
                SharedModulus::new(b(p), b(q)),
                Err(CipherError::InvalidModulusParameters(_))
            ));
        }

        let m = SharedModulus::new_uncheck(b(11), b(11));
        assert_eq!(m.modulus(), b(121));
    }

    #[test]
    fn carmichael() {
        let m = SharedModulus::new(BigUint::from(23u32), BigUint::from(11u32)).unwrap();
        assert_eq!(m.carmichael().unwrap(), BigUint::from(110u32));
        assert_eq!(m.modulus(), BigUint::from(253u32));
        assert!(SharedModulus::new_uncheck(BigUint::from(1u32), BigUint::from(11u32))
            .carmichael()
            .is_err());
    }

    #[test]
    fn verify_primes() {
        let mut rng = DefaultRand::default();
        let m = SharedModulus::new(BigUint::from(101u32), BigUint::from(103u32)).unwrap();
        m.verify_primes(19, &mut rng).unwrap();

        let m = SharedModulus::new(BigUint::from(101u32), BigUint::from(111u32)).unwrap();
        assert!(matches!(
            m.verify_primes(19, &mut rng),
            Err(CipherError::InvalidModulusParameters(_))
        ));
    }

    #[test]
    fn generate() {
        let mut rng = DefaultRand::default();
        for bits_len in (9..=24).chain([63, 256, 512]) {
            let m = SharedModulus::generate(bits_len, 19, &mut rng).unwrap();
            assert_eq!(m.modulus().bits() as usize, bits_len);
            assert_ne!(m.p(), m.q());
            m.verify_primes(19, &mut rng).unwrap();
        }

        for bits_len in [0, 2, 7, 8] {
            assert!(matches!(
                SharedModulus::generate(bits_len, 19, &mut rng),
                Err(CipherError::Other(_))
            ));
        }
    }
}
