//! RSA
//!
//! - 两个质数$p$和$q$($p\neq q$), 模数$n=p*q$. 模数的字节长度$k$满足: $2^{(k-1)*8}\le n \lt 2^{k*8}$;
//! - 公钥指数$e$与$\lambda(n)=lcm(p-1, q-1)$互质;
//! - 私钥指数$d$满足: $d*e \equiv 1 \mod \lambda(n)$;
//!
//! 加密: $y = x ^ e \mod n$;
//!
//! 解密: $x = y^d \mod n$, 私钥持有$p, q$时使用CRT加速;
//!
//! 不做任何填充, 只对整数分组做模幂运算.

mod key;
pub use key::{PrivateKey, PublicKey};

mod primitive;
pub use primitive::transform;
