/// 随机数源 <br>
/// `rand`填充`random`的全部字节.
pub trait Rand: Default {
    fn rand(&mut self, random: &mut [u8]);
}

mod default_rand;
pub use default_rand::DefaultRand;

mod shared_rand;
pub use shared_rand::SharedRand;

impl<T: xrand::RngCore + Default> Rand for T {
    fn rand(&mut self, random: &mut [u8]) {
        self.fill_bytes(random);
    }
}
