use clap::{ArgMatches, Command};
use num_bigint::BigUint;
use num_traits::Num;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::SraError;

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()>;
}

mod config;
pub use config::SraConfig;

mod primes;
pub use primes::PrimesCmd;

mod keygen;
pub use keygen::KeyCmd;

mod transform;
pub use transform::TransformCmd;

/// 十进制或`0x`前缀的十六进制
pub fn parse_biguint(s: &str) -> Result<BigUint, SraError> {
    let s = s.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };

    BigUint::from_str_radix(digits, radix).map_err(|_| SraError::InvalidInteger(s.to_string()))
}

/// 写入`output`指定的新文件, 未指定时输出到stdout
fn write_to_file_or_stdout(m: &ArgMatches, data: &[u8]) -> anyhow::Result<()> {
    match m.get_one::<PathBuf>("output") {
        Some(p) => {
            let mut f = OpenOptions::new().create_new(true).write(true).open(p)?;
            f.write_all(data)?;
            log::info!("write to `{}`", p.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(data)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_biguint;
    use num_bigint::BigUint;

    #[test]
    fn parse_integers() {
        assert_eq!(parse_biguint("17").unwrap(), BigUint::from(17u32));
        assert_eq!(parse_biguint("0x11").unwrap(), BigUint::from(17u32));
        assert_eq!(parse_biguint(" 0XfF ").unwrap(), BigUint::from(255u32));
        assert!(parse_biguint("0xzz").is_err());
        assert!(parse_biguint("").is_err());
        assert!(parse_biguint("-3").is_err());
    }
}
