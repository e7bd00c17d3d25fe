use crate::Rand;
use std::sync::{Arc, Mutex};

/// 多线程共享的随机数源 <br>
/// clone之后的实例共享同一个内部随机数源, 每次`rand`调用期间持有锁.
#[derive(Default)]
pub struct SharedRand<R: Rand> {
    inner: Arc<Mutex<R>>,
}

impl<R: Rand> SharedRand<R> {
    pub fn new(rng: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rng)),
        }
    }
}

impl<R: Rand> Clone for SharedRand<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Rand> Rand for SharedRand<R> {
    fn rand(&mut self, random: &mut [u8]) {
        // a panic in another holder leaves the generator state untouched
        let mut rng = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.rand(random);
    }
}

#[cfg(test)]
mod tests {
    use super::SharedRand;
    use crate::{DefaultRand, Rand};

    #[derive(Default)]
    struct Counter(u8);

    impl Rand for Counter {
        fn rand(&mut self, random: &mut [u8]) {
            for x in random.iter_mut() {
                self.0 = self.0.wrapping_add(1);
                *x = self.0;
            }
        }
    }

    #[test]
    fn clones_share_state() {
        let mut a = SharedRand::new(Counter::default());
        let mut b = a.clone();
        let (mut x, mut y) = ([0u8; 2], [0u8; 2]);
        a.rand(&mut x);
        b.rand(&mut y);
        assert_eq!(x, [1, 2]);
        assert_eq!(y, [3, 4]);
    }

    #[test]
    fn concurrent_use() {
        let rng = SharedRand::new(DefaultRand::default());
        let handles = (0..4)
            .map(|_| {
                let mut rng = rng.clone();
                std::thread::spawn(move || {
                    let mut buf = [0u8; 64];
                    rng.rand(&mut buf);
                    buf
                })
            })
            .collect::<Vec<_>>();

        let bufs = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>();
        assert!(bufs.windows(2).all(|w| w[0] != w[1]));
    }
}
