//! 素性测试: 小素数筛选 + Miller-Rabin + "almost extra strong" Lucas(Baillie-PSW组合).

use crate::{BigIntExt, BigUintExt};
use num_bigint::{BigInt, BigUint};
use num_integer::{Integer, Roots};
use num_traits::{One, ToPrimitive, Zero};
use rand::Rand;
use std::borrow::Borrow;
use std::ops::Deref;

// 小于128的素数位图
const SMALL_PRIME_MASK: u128 = {
    const PRIMES: [u32; 31] = [
        2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83,
        89, 97, 101, 103, 107, 109, 113, 127,
    ];

    let (mut mask, mut i) = (0u128, 0);
    while i < PRIMES.len() {
        mask |= 1 << PRIMES[i];
        i += 1;
    }
    mask
};

const SIEVE_PRIMES: [u32; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];
// 3 * 5 * ... * 53
const SIEVE_PRIMES_PRODUCT: u64 = 16294579238595022365;

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// 概率素性测试. `test_rounds`(t)为Miller-Rabin的轮数, 对于任意大于2的奇数,
    /// 单独的Miller-Rabin测试出错概率至多为$2^{-t}$, 再叠加一次Lucas测试.
    pub fn probably_prime_test<Rng: Rand>(&self, test_rounds: usize, rng: &mut Rng) -> bool {
        if self.bits() < 8 {
            return self
                .to_u32()
                .is_some_and(|x| ((1u128 << x) & SMALL_PRIME_MASK) != 0);
        } else if self.is_even() {
            return false;
        }

        let Some(r) = (self.deref() % SIEVE_PRIMES_PRODUCT).to_u64() else {
            return false;
        };
        if SIEVE_PRIMES.iter().any(|&p| r % (p as u64) == 0) {
            return false;
        }

        self.miller_rabin(test_rounds + 1, rng) && self.lucas()
    }

    /// 为true时`a`是self为合数的证据, self - 1 = 2^s * r
    fn miller_rabin_witness(&self, s: u64, r: &BigUint, n_m1: &BigUint, a: &BigUint) -> bool {
        let n = self.deref();
        let mut y = a.modpow(r, n);
        if y.is_one() || &y == n_m1 {
            return false;
        }

        for _ in 1..s {
            y = (&y * &y) % n;
            if &y == n_m1 {
                return false;
            }
            if y.is_one() {
                return true;
            }
        }

        true
    }

    // self是大于2的奇数
    fn miller_rabin<Rng: Rand>(&self, rounds: usize, rng: &mut Rng) -> bool {
        let n_m1 = self.deref() - 1u32;
        let s = n_m1.trailing_zeros().unwrap_or(0);
        let r = &n_m1 >> s;

        for _ in 0..rounds {
            let a = BigUintExt(&n_m1).gen_random(rng);
            // a需在[2, n-1)之间
            if a <= BigUint::one() {
                continue;
            }

            if self.miller_rabin_witness(s, &r, &n_m1, &a) {
                return false;
            }
        }

        true
    }

    /// "almost extra strong" Lucas probable prime test, Baillie-OEIS "method C"选取参数:
    /// P从3开始递增, D = P^2 - 4, Q = 1, 直到Jacobi(D, n) = -1.
    ///
    /// 参考: Baillie and Wagstaff, "Lucas Pseudoprimes", Math. Comp. 35(152), 1980;
    /// Grantham, "Frobenius Pseudoprimes", Math. Comp. 70(234), 2000;
    /// Baillie, "Extra strong Lucas pseudoprimes", OEIS A217719.
    fn lucas(&self) -> bool {
        if self.is_one() {
            return false;
        } else if self.is_even() {
            return self.deref() == &BigUint::from(2u8);
        }

        let (mut p, n) = (3u32, BigInt::from(self.deref().clone()));
        while p <= 10000 {
            let d = BigInt::from(p * p - 4);
            let Some(j) = BigIntExt(d).jacobi(&n) else {
                return false;
            };
            if j == -1 {
                break;
            }

            if j == 0 {
                // d = (p-2)(p+2)与n有公因子, 只可能是p+2
                return self.to_u32().is_some_and(|x| x == p + 2);
            }

            if p == 40 {
                // 完全平方数永远找不到Jacobi(D, n) = -1
                let t = self.sqrt().pow(2u32);
                if self.deref() == &t {
                    return false;
                }
            }

            p += 1;
        }

        // n = 2^r * s + 1
        let (mut s, nm2) = (self.deref() + 1u32, self.deref() - 2u32);
        let r = s.trailing_zeros().unwrap_or(0);
        s >>= r;

        // V(0) = 2, V(1) = P
        // V(2k) = V(k)^2 - 2
        // V(2k+1) = V(k) V(k+1) - P
        let n = self.deref();
        let (mut vk1, mut vk, p) = (BigUint::from(p), BigUint::from(2u32), BigUint::from(p));
        for i in (0..=s.bits()).rev() {
            let mut t1 = &vk * &vk1;
            t1 += n;
            t1 -= &p;

            if s.bit(i) {
                vk = &t1 % n;
                t1 = &vk1 * &vk1;
                t1 += &nm2;
                vk1 = &t1 % n;
            } else {
                vk1 = &t1 % n;
                t1 = &vk * &vk;
                t1 += &nm2;
                vk = &t1 % n;
            }
        }

        let two = BigUint::from(2u32);
        if vk == two || vk == nm2 {
            // U(s) = 0 等价于 P V(s) - 2 V(s+1) = 0 (mod n)
            let t1 = (&vk * &p + (n << 1u32) - (&vk1 << 1u32)) % n;
            if t1.is_zero() {
                return true;
            }
        }

        // V(2^t s) = 0 (mod n), 0 <= t < r-1
        for _ in 0..r.saturating_sub(1) {
            if vk.is_zero() {
                return true;
            }
            if vk == two {
                return false;
            }
            vk = (&vk * &vk + n - 2u32) % n;
        }

        false
    }

    /// 生成位长度为`bits_len`的大概率素数, 最高两位置1以保证两个素数之积不会少一位.
    ///
    /// `test_rounds`见[`BigUintExt::probably_prime_test`].
    pub fn generate_prime<Rng: Rand>(
        bits_len: usize,
        test_rounds: usize,
        rng: &mut Rng,
    ) -> Result<BigUint, String> {
        if bits_len < 2 {
            return Err("prime size must at least 2-bits".to_string());
        }

        let (mut p, b) = (
            vec![0u8; (bits_len + 7) >> 3],
            if (bits_len & 7) == 0 { 8 } else { bits_len & 7 },
        );
        loop {
            rng.rand(p.as_mut_slice());

            if b != 8 {
                if let Some(x) = p.last_mut() {
                    *x &= (1u8 << b) - 1;
                }
            }

            if b >= 2 {
                if let Some(x) = p.last_mut() {
                    *x |= 3 << (b - 2);
                }
            } else {
                // b == 1: 最高位在最后一个字节, 次高位在倒数第二个字节
                let len = p.len();
                p[len - 1] |= 1;
                if len >= 2 {
                    p[len - 2] |= 0x80;
                }
            }

            if let Some(x) = p.first_mut() {
                *x |= 1;
            }

            // 跳过能被小素数整除的候选值
            let mut n = BigUint::from_bytes_le(p.as_slice());
            let Some(modulus) = (&n % SIEVE_PRIMES_PRODUCT).to_u64() else {
                continue;
            };

            'next_delta: for delta in (0u64..(1u64 << 20)).step_by(2) {
                let m = modulus + delta;
                for &prime in SIEVE_PRIMES.iter() {
                    let prime = prime as u64;
                    if (m % prime) == 0 && (bits_len > 6 || m != prime) {
                        continue 'next_delta;
                    }
                }

                if delta > 0 {
                    n += delta;
                }
                break;
            }

            let n = BigUintExt(n);
            if n.bits() as usize == bits_len && n.probably_prime_test(test_rounds, rng) {
                return Ok(n.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::BigUintExt;
    use num_bigint::BigUint;
    use num_traits::Num;
    use rand::DefaultRand;

    #[test]
    fn gen_small_prime() {
        let mut rng = DefaultRand::default();
        for bits_len in 2..10 {
            let p = BigUintExt::<BigUint>::generate_prime(bits_len, 19, &mut rng).unwrap();
            assert_eq!(p.bits() as usize, bits_len);
            assert!(BigUintExt(p).probably_prime_test(31, &mut rng));
        }
    }

    #[test]
    fn gen_prime() {
        let mut rng = DefaultRand::default();
        let p = BigUintExt::<BigUint>::generate_prime(256, 19, &mut rng).unwrap();
        assert_eq!(p.bits(), 256);
        assert!(BigUintExt::<BigUint>::generate_prime(1, 19, &mut rng).is_err());
    }

    #[test]
    fn small_numbers() {
        let mut rng = DefaultRand::default();
        let primes = [2u32, 3, 5, 7, 11, 13, 67, 127, 251, 257, 65537];
        for p in primes {
            assert!(BigUintExt(BigUint::from(p)).probably_prime_test(10, &mut rng), "{p}");
        }

        let composites = [0u32, 1, 4, 9, 65, 111, 121, 255, 341, 561, 65535];
        for c in composites {
            assert!(!BigUintExt(BigUint::from(c)).probably_prime_test(10, &mut rng), "{c}");
        }
    }

    #[test]
    fn composite_validate() {
        let cases = [
            "21284175091214687912771199898307297748211672914763848041968395774954376176754",
            "6084766654921918907427900243509372380954290099172559290432744450051395395951",
            "82793403787388584738507275144194252681",
            // strong pseudoprime to prime bases 2 through 29
            "1195068768795265792518361315725116351898245581",
            // extra strong Lucas pseudoprimes, OEIS A217719
            "989",
            "3239",
            "5777",
            "10877",
            "27971",
            "635627",
            "3673744903",
            "80579735209",
        ];

        let mut rng = DefaultRand::default();
        for s in cases {
            let composite = BigUint::from_str_radix(s, 10).unwrap();
            assert!(
                !BigUintExt(composite).probably_prime_test(10, &mut rng),
                "composite `{s}` passed the prime test"
            );
        }
    }

    #[test]
    fn prime_validate() {
        let cases = [
            "13756265695458089029",
            "13496181268022124907",
            "18699199384836356663",
            "98920366548084643601728869055592650835572950932266967461790948584315647051443",
            // 2^255-19
            "57896044618658097711785492504343953926634992332820282019728792003956564819949",
            // SRA test primes
            "12955773556530031269118407398053780240985417158017426236041694321113885252934587073839263383663631740721619121099983407381626544563820679872220743289888003",
            "9666905794612242961469341874892198944768009152149690432582919643234479727501274690263541776746303115004872701022664635158722723310279745263070197286009159",
        ];

        let mut rng = DefaultRand::default();
        for s in cases {
            let prime = BigUint::from_str_radix(s, 10).unwrap();
            assert!(
                BigUintExt(prime).probably_prime_test(10, &mut rng),
                "prime `{s}` failed the prime test"
            );
        }
    }
}
