use crate::rsa::{PrivateKey, PublicKey};
use crate::{CipherError, Decrypt, Encrypt};
use num_bigint::BigUint;
use num_traits::Zero;

/// 模数的字节长度k
pub(super) fn modulus_len(modulus: &BigUint) -> usize {
    (modulus.bits() as usize + 7) >> 3
}

/// 大端序, 左侧补0至`len`字节
fn i2osp(x: &BigUint, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    if x.is_zero() {
        return out;
    }

    let bytes = x.to_bytes_be();
    let start = len.saturating_sub(bytes.len());
    out[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(len)..]);
    out
}

fn os2ip(block: &[u8], modulus: &BigUint) -> Result<BigUint, CipherError> {
    if modulus.is_zero() {
        return Err(CipherError::InvalidBlock("modulus is zero".to_string()));
    }

    let x = BigUint::from_bytes_be(block);
    if &x >= modulus {
        Err(CipherError::InvalidBlock(format!(
            "block value needs to be less than {:#x}",
            modulus
        )))
    } else {
        Ok(x)
    }
}

/// $block^{exponent} \mod modulus$ <br>
/// `block`按大端序解释为整数, 必须小于`modulus`; 结果补齐为模数的字节长度.
pub fn transform(
    block: &[u8],
    exponent: &BigUint,
    modulus: &BigUint,
) -> Result<Vec<u8>, CipherError> {
    let x = os2ip(block, modulus)?;
    Ok(i2osp(&x.modpow(exponent, modulus), modulus_len(modulus)))
}

impl Encrypt for PublicKey {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError> {
        let c = transform(plaintext, self.exponent(), self.modules())?;
        ciphertext.extend(c);
        Ok(())
    }
}

impl Decrypt for PrivateKey {
    /// 输出去掉了前导0字节, 即明文整数的最短大端序表示
    fn decrypt(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError> {
        let c = os2ip(ciphertext, self.public_key().modules())?;
        let m = self.rsadp_uncheck(&c);
        if !m.is_zero() {
            plaintext.extend(m.to_bytes_be());
        }
        Ok(())
    }
}
