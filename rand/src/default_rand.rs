use crate::Rand;
use xrand::rngs::OsRng;
use xrand::RngCore;

/// 默认使用OsRng <br>
/// 无内部状态, 可直接复制到多个线程中使用.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultRand {
    rng: OsRng,
}

impl Rand for DefaultRand {
    fn rand(&mut self, random: &mut [u8]) {
        self.rng.fill_bytes(random);
    }
}
