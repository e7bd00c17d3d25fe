//! 大整数运算的扩展: 模逆, Jacobi符号, 随机数, 素性测试和素数生成.

mod bigint_ext;
pub use bigint_ext::BigIntExt;

mod biguint_ext;
pub use biguint_ext::BigUintExt;

mod prime;
