use num_bigint::BigInt;
use num_traits::{Euclid, One, Signed, Zero};
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigIntExt<T: Borrow<BigInt>>(pub T);

impl<T: Borrow<BigInt>> Deref for BigIntExt<T> {
    type Target = BigInt;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigInt>> BigIntExt<T> {
    /// compute the Jacobi symbol $(\frac{self}{b})$, returned None if b == 0
    pub fn jacobi(&self, b: &BigInt) -> Option<isize> {
        if b.is_zero() {
            return None;
        }

        let (mut a, mut b) = (self.deref().clone(), b.clone());

        let mut j = if b.is_negative() {
            b = -b;
            if a.is_negative() {
                -1
            } else {
                1
            }
        } else {
            1
        };

        let (three, five, seven) = (BigInt::from(3u8), BigInt::from(5u8), BigInt::from(7u8));
        loop {
            if b.is_one() {
                return Some(j);
            }

            if a.is_zero() {
                return Some(0);
            }

            a = a.rem_euclid(&b);
            if a.is_zero() {
                return Some(0);
            }

            // (2/b) = -1 当且仅当 b = 3, 5 (mod 8)
            let s = a.trailing_zeros().unwrap_or(0);
            if (s & 1) != 0 {
                let bmod8 = &b & &seven;
                if bmod8 == three || bmod8 == five {
                    j = -j;
                }
            }

            a >>= s;
            // 二次互反律
            if (&b & &three) == three && (&a & &three) == three {
                j = -j;
            }

            (a, b) = (b, a);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::BigIntExt;
    use num_bigint::BigInt;

    #[test]
    fn jacobi() {
        // (a, b, (a/b))
        let cases = [
            (0, 1i128, 1),
            (1, -1, 1),
            (0, 5, 0),
            (2, 5, -1),
            (-2, -5, 1),
            (3, 5, -1),
            (-5, 5, 0),
            (6, -5, 1),
            (-6, -5, -1),
            (12, 13756265695458089029, 1),
        ];

        for (a, b, out) in cases {
            let j = BigIntExt(BigInt::from(a)).jacobi(&BigInt::from(b));
            assert_eq!(j, Some(out), "case: jacobi({a}, {b})");
        }

        assert_eq!(BigIntExt(BigInt::from(3)).jacobi(&BigInt::from(0)), None);
    }
}
