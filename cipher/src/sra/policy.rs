use crate::sra::CancelToken;
use crate::{CipherError, Rand};
use num_bigint::BigUint;
use num_traits::One;
use std::time::{Duration, Instant};
use utils::BigUintExt;

/// 公钥指数的选择方式
pub enum ExponentPolicy<R: Rand> {
    /// 调用者给定的公钥指数
    Explicit(BigUint),
    /// 随机搜索一个素数作为公钥指数
    RandomSearch(ExponentSearch<R>),
}

/// 随机公钥指数的搜索参数.
///
/// 每次从`rng`中取一个与$\lambda(n)$位长度相同的随机奇数, 接受第一个满足
/// `1 < candidate < lcm`且通过素性测试的候选值. 默认不限制次数; 每轮开始时检查取消标志和截止时间.
pub struct ExponentSearch<R: Rand> {
    // 素性测试的轮数
    certainty: usize,
    rng: R,
    max_iterations: Option<usize>,
    cancel: Option<CancelToken>,
    deadline: Option<Instant>,
}

impl<R: Rand> From<ExponentSearch<R>> for ExponentPolicy<R> {
    fn from(value: ExponentSearch<R>) -> Self {
        Self::RandomSearch(value)
    }
}

impl<R: Rand> ExponentPolicy<R> {
    pub fn explicit(e: BigUint) -> Self {
        Self::Explicit(e)
    }

    pub fn random(certainty: usize, rng: R) -> Self {
        Self::RandomSearch(ExponentSearch::new(certainty, rng))
    }
}

impl<R: Rand> ExponentSearch<R> {
    /// `certainty`(t)为Miller-Rabin测试的轮数, 合数通过测试的概率至多为$2^{-t}$
    pub fn new(certainty: usize, rng: R) -> Self {
        Self {
            certainty,
            rng,
            max_iterations: None,
            cancel: None,
            deadline: None,
        }
    }

    pub fn certainty(&self) -> usize {
        self.certainty
    }

    /// 最多尝试`n`个候选值, 之后返回`ExhaustedCandidateSearch`
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// 从现在开始计时的截止时间, `Instant`溢出时视为没有截止时间
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// 在$[2, lcm)$中搜索素数公钥指数.
    ///
    /// 候选值的最高位总是置1, 而lcm为偶数, 其素因子都小于$2^{bits(lcm)-1}$, 所以接受的候选值
    /// 与lcm互质; 调用方仍需检查模逆是否存在.
    pub(super) fn search(mut self, lcm: &BigUint) -> Result<BigUint, CipherError> {
        let (bits, one) = (lcm.bits() as usize, BigUint::one());
        let mut iterations = 0usize;

        loop {
            if self.is_cancelled() {
                log::debug!("sra: exponent search cancelled after {iterations} candidates");
                return Err(CipherError::SearchCancelled { iterations });
            }

            if self.max_iterations.is_some_and(|max| iterations >= max) {
                log::debug!("sra: exponent search exhausted after {iterations} candidates");
                return Err(CipherError::ExhaustedCandidateSearch { iterations });
            }

            iterations += 1;
            let candidate = BigUintExt::<BigUint>::gen_odd_with_bits(bits, &mut self.rng);
            if candidate <= one || &candidate >= lcm {
                log::trace!("sra: candidate {iterations} out of range");
                continue;
            }

            if !BigUintExt(&candidate).probably_prime_test(self.certainty, &mut self.rng) {
                continue;
            }

            log::debug!(
                "sra: public exponent of {} bits accepted after {iterations} candidates",
                candidate.bits()
            );
            return Ok(candidate);
        }
    }
}
