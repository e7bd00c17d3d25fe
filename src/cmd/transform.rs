use crate::cmd::{write_to_file_or_stdout, Cmd};
use crate::error::SraError;
use cipher::rsa::{PrivateKey, PublicKey};
use cipher::{Decrypt, Encrypt};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Default)]
pub struct TransformCmd;

impl TransformCmd {
    /// 密钥文件可以是`key`命令输出的单个私钥或私钥数组, 也可以是单独的公钥
    fn select_key(value: Value, party: usize) -> anyhow::Result<Value> {
        match value {
            Value::Array(mut keys) => {
                let len = keys.len();
                if party >= len {
                    Err(SraError::PartyOutOfRange { idx: party, len }.into())
                } else {
                    Ok(keys.swap_remove(party))
                }
            }
            value => Ok(value),
        }
    }

    fn public_key(value: Value) -> anyhow::Result<PublicKey> {
        let value = match value.get("pk") {
            Some(pk) => pk.clone(),
            None => value,
        };

        serde_json::from_value(value).map_err(|e| SraError::InvalidKeyFile(e.to_string()).into())
    }

    fn private_key(value: Value) -> anyhow::Result<PrivateKey> {
        let key: PrivateKey = serde_json::from_value(value)
            .map_err(|e| SraError::InvalidKeyFile(e.to_string()))?;
        key.is_valid()?;
        Ok(key)
    }

    fn transform(value: Value, decrypt: bool, block: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(block.len());
        if decrypt {
            Self::private_key(value)?.decrypt(block, &mut out)?;
        } else {
            Self::public_key(value)?.encrypt(block, &mut out)?;
        }
        Ok(out)
    }
}

impl Cmd for TransformCmd {
    const NAME: &'static str = "transform";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("add (encrypt) or remove (decrypt) one SRA layer on a single block, no padding")
            .arg(
                Arg::new("msg")
                    .value_name("MESSAGE")
                    .required(true)
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(String))
                    .help("to specify the message block, must be less than the modulus"),
            )
            .arg(
                Arg::new("key")
                    .short('k')
                    .long("key")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(PathBuf))
                    .required(true)
                    .help("to specify the key file path"),
            )
            .arg(
                Arg::new("party")
                    .long("party")
                    .action(ArgAction::Set)
                    .default_value("0")
                    .value_parser(value_parser!(usize))
                    .help("to specify which key to use when the key file contains several parties"),
            )
            .arg(
                Arg::new("hex")
                    .long("hex")
                    .short('x')
                    .action(ArgAction::SetTrue)
                    .help("the message is hex encoded, otherwise it is taken as raw bytes"),
            )
            .arg(
                Arg::new("decrypt")
                    .short('d')
                    .long("is-decrypt")
                    .action(ArgAction::SetTrue)
                    .required(false)
                    .help("remove a layer with the private key"),
            )
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .help("to specify the output file path to save the hex result"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let (key, msg) = (
            m.get_one::<PathBuf>("key")
                .ok_or_else(|| SraError::InvalidArgument("need to specify the key".to_string()))?,
            m.get_one::<String>("msg").map(|s| s.as_str()).unwrap_or_default(),
        );
        let party = m.get_one::<usize>("party").copied().unwrap_or(0);

        let block = if m.get_flag("hex") {
            hex::decode(msg.trim())?
        } else {
            msg.as_bytes().to_vec()
        };

        let value: Value = serde_json::from_slice(std::fs::read(key)?.as_slice())?;
        let value = Self::select_key(value, party)?;
        let out = Self::transform(value, m.get_flag("decrypt"), block.as_slice())?;

        write_to_file_or_stdout(m, hex::encode(out).as_bytes())
    }
}
