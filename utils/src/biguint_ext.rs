use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Euclid, One, Zero};
use rand::Rand;
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigUint>> PartialEq<BigUint> for BigUintExt<T> {
    fn eq(&self, other: &BigUint) -> bool {
        self.deref().eq(other)
    }
}

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// self * inv = 1 \mod modulus <br>
    /// gcd(self, modulus) != 1 或 modulus == 0 时返回None.
    pub fn modinv(&self, modulus: &BigUint) -> Option<BigUint> {
        if modulus.is_zero() {
            return None;
        }

        let (a, n) = (
            BigInt::from(self.deref() % modulus),
            BigInt::from(modulus.clone()),
        );
        let g = a.extended_gcd(&n);
        if g.gcd.is_one() {
            g.x.rem_euclid(&n).to_biguint()
        } else {
            None
        }
    }

    /// lcm(self-1, other-1), 要求self和other都大于1
    pub fn carmichael(&self, other: &BigUint) -> Option<BigUint> {
        let one = BigUint::one();
        if self.deref() <= &one || other <= &one {
            return None;
        }

        let (p_sub1, q_sub1) = (self.deref() - &one, other - &one);
        let gcd = p_sub1.gcd(&q_sub1);
        Some((p_sub1 / gcd) * q_sub1)
    }

    // 生成[0..self)之间的随机数
    pub fn gen_random<R: Rand>(&self, rng: &mut R) -> BigUint {
        let bits = self.bits() as usize;
        let mut n = vec![0u8; (bits + 7) >> 3];

        loop {
            rng.rand(n.as_mut_slice());
            let r = BigUint::from_bytes_le(n.as_slice());
            if self.deref() > &r {
                return r;
            }
        }
    }

    /// 生成位长度恰为`bits_len`的随机奇数, 即最高位和最低位都置1.
    /// 小端序解释随机字节, 多余的高位被清除.
    pub fn gen_odd_with_bits<R: Rand>(bits_len: usize, rng: &mut R) -> BigUint {
        if bits_len == 0 {
            return BigUint::zero();
        }

        let (mut n, b) = (
            vec![0u8; (bits_len + 7) >> 3],
            if (bits_len & 7) == 0 { 8 } else { bits_len & 7 },
        );
        rng.rand(n.as_mut_slice());

        if let Some(x) = n.last_mut() {
            if b != 8 {
                *x &= (1u8 << b) - 1;
            }
            *x |= 1 << (b - 1);
        }

        if let Some(x) = n.first_mut() {
            *x |= 1;
        }

        BigUint::from_bytes_le(n.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use crate::BigUintExt;
    use num_bigint::BigUint;
    use rand::{DefaultRand, Rand};

    #[derive(Default)]
    struct Fixed(u8);

    impl Rand for Fixed {
        fn rand(&mut self, random: &mut [u8]) {
            random.fill(self.0);
        }
    }

    #[test]
    fn modinv() {
        let (e, lcm) = (BigUint::from(67u32), BigUint::from(110u32));
        assert_eq!(BigUintExt(&e).modinv(&lcm), Some(BigUint::from(23u32)));
        assert_eq!(BigUintExt(BigUint::from(10u32)).modinv(&lcm), None);
        assert_eq!(BigUintExt(&e).modinv(&BigUint::from(0u32)), None);
    }

    #[test]
    fn carmichael() {
        let (p, q) = (BigUint::from(11u32), BigUint::from(23u32));
        assert_eq!(BigUintExt(&p).carmichael(&q), Some(BigUint::from(110u32)));
        assert_eq!(BigUintExt(&q).carmichael(&p), Some(BigUint::from(110u32)));
        assert_eq!(BigUintExt(BigUint::from(1u32)).carmichael(&q), None);
    }

    #[test]
    fn odd_with_bits() {
        let mut rng = DefaultRand::default();
        for bits_len in 1..130 {
            let x = BigUintExt::<BigUint>::gen_odd_with_bits(bits_len, &mut rng);
            assert_eq!(x.bits() as usize, bits_len);
            assert!(x.bit(0));
        }

        let x = BigUintExt::<BigUint>::gen_odd_with_bits(7, &mut Fixed(0));
        assert_eq!(x, BigUint::from(0x41u32));
        let x = BigUintExt::<BigUint>::gen_odd_with_bits(12, &mut Fixed(0xff));
        assert_eq!(x, BigUint::from(0xfffu32));
    }

    #[test]
    fn random_below() {
        let (mut rng, n) = (DefaultRand::default(), BigUint::from(1000u32));
        for _ in 0..100 {
            assert!(BigUintExt(&n).gen_random(&mut rng) < n);
        }
    }
}
