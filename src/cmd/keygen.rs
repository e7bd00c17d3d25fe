use crate::cmd::{parse_biguint, write_to_file_or_stdout, Cmd, SraConfig};
use crate::error::SraError;
use cipher::sra::{ExponentPolicy, ExponentSearch, KeyPair, SharedModulus};
use cipher::{DefaultRand, Rand, SharedRand};
use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use num_bigint::BigUint;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Default)]
pub struct KeyCmd;

// 单个参与方的公钥指数与之前的参与方重复时, 最多重新搜索的次数
const MAX_EXPONENT_REDRAWS: usize = 64;

/// 随机搜索公钥指数的参数, 命令行参数优先于配置, 两者的0都表示不限制
struct SearchArgs {
    rounds: usize,
    max_iterations: Option<usize>,
    timeout: Option<Duration>,
}

impl SearchArgs {
    fn new(m: &ArgMatches, config: &SraConfig) -> Self {
        Self {
            rounds: m
                .get_one::<usize>("rounds")
                .copied()
                .unwrap_or(config.prime_test_rounds),
            max_iterations: m
                .get_one::<usize>("max-iterations")
                .copied()
                .map(|n| (n != 0).then_some(n))
                .unwrap_or(config.max_search_iterations()),
            timeout: m
                .get_one::<u64>("timeout")
                .map(|&s| (s != 0).then(|| Duration::from_secs(s)))
                .unwrap_or(config.search_timeout()),
        }
    }

    fn policy<R: Rand>(&self, rng: R) -> ExponentPolicy<R> {
        let mut search = ExponentSearch::new(self.rounds, rng);
        if let Some(n) = self.max_iterations {
            search = search.max_iterations(n);
        }
        if let Some(t) = self.timeout {
            search = search.timeout(t);
        }
        ExponentPolicy::RandomSearch(search)
    }
}

impl KeyCmd {
    fn shared_modulus(m: &ArgMatches) -> anyhow::Result<SharedModulus> {
        let params = match m.get_one::<PathBuf>("modulus") {
            Some(p) => {
                let data = std::fs::read(p)?;
                let params: SharedModulus = serde_json::from_slice(data.as_slice())
                    .map_err(|e| SraError::InvalidKeyFile(format!("{}: {e}", p.display())))?;
                SharedModulus::new(params.p().clone(), params.q().clone())?
            }
            None => {
                let (p, q) = (
                    m.get_one::<BigUint>("p").cloned(),
                    m.get_one::<BigUint>("q").cloned(),
                );
                match p.zip(q) {
                    Some((p, q)) => SharedModulus::new(p, q)?,
                    None => {
                        return Err(SraError::InvalidArgument(
                            "need to specify both `p` and `q`".to_string(),
                        )
                        .into())
                    }
                }
            }
        };

        Ok(params)
    }

    fn derive_keys(
        params: &SharedModulus,
        exponent: Option<BigUint>,
        parties: usize,
        search: &SearchArgs,
        threads: usize,
    ) -> anyhow::Result<Vec<KeyPair>> {
        match exponent {
            Some(e) if parties == 1 => Ok(vec![KeyPair::derive_with_exponent(params, e)?]),
            Some(_) => Err(SraError::ExplicitExponentParties(parties).into()),
            None => Self::derive_parties(params, parties, search, threads),
        }
    }

    /// 多方并行派生, 共享同一个随机数源. 各方的公钥指数互不相同, 重复时重新搜索.
    fn derive_parties(
        params: &SharedModulus,
        parties: usize,
        search: &SearchArgs,
        threads: usize,
    ) -> anyhow::Result<Vec<KeyPair>> {
        let rng = SharedRand::new(DefaultRand::default());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.min(parties).max(1))
            .build()?;

        let mut keys = pool.install(|| {
            (0..parties)
                .into_par_iter()
                .map(|i| {
                    let key = KeyPair::derive(params, search.policy(rng.clone()));
                    log::debug!("party {i} derived: {}", key.is_ok());
                    key
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut seen = HashSet::with_capacity(parties);
        for (i, key) in keys.iter_mut().enumerate() {
            let mut attempts = 0;
            while !seen.insert(key.public_key().exponent().clone()) {
                if attempts >= MAX_EXPONENT_REDRAWS {
                    return Err(SraError::DuplicateExponent { party: i, attempts }.into());
                }

                attempts += 1;
                log::debug!("party {i} drew an exponent already taken, redraw {attempts}");
                *key = KeyPair::derive(params, search.policy(rng.clone()))?;
            }
        }

        Ok(keys)
    }
}

impl Cmd for KeyCmd {
    const NAME: &'static str = "key";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("derive SRA key pairs over the shared primes")
            .arg(
                Arg::new("p")
                    .value_name("P")
                    .action(ArgAction::Set)
                    .required(false)
                    .requires("q")
                    .value_parser(parse_biguint)
                    .help("to specify the shared prime p, decimal or 0x prefixed hex"),
            )
            .arg(
                Arg::new("q")
                    .value_name("Q")
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(parse_biguint)
                    .help("to specify the shared prime q, decimal or 0x prefixed hex"),
            )
            .arg(
                Arg::new("modulus")
                    .long("modulus")
                    .short('m')
                    .action(ArgAction::Set)
                    .required(false)
                    .conflicts_with_all(["p", "q"])
                    .value_parser(value_parser!(PathBuf))
                    .help("to specify the shared primes file generated by the `primes` command"),
            )
            .group(
                ArgGroup::new("primes")
                    .args(["p", "modulus"])
                    .required(true),
            )
            .arg(
                Arg::new("exponent")
                    .long("exponent")
                    .short('e')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(parse_biguint)
                    .help("to specify the public exponent, randomly searched if absent"),
            )
            .arg(
                Arg::new("parties")
                    .long("parties")
                    .short('n')
                    .action(ArgAction::Set)
                    .default_value("1")
                    .value_parser(value_parser!(usize))
                    .help("to specify the number of parties to derive keys for"),
            )
            .arg(
                Arg::new("rounds")
                    .long("rounds")
                    .short('r')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(usize))
                    .help("to specify the probable prime test rounds"),
            )
            .arg(
                Arg::new("max-iterations")
                    .long("max-iterations")
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(usize))
                    .help("to specify the maximum candidates of the public exponent search"),
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(u64))
                    .help("to specify the public exponent search timeout in seconds"),
            )
            .arg(
                Arg::new("check")
                    .long("check-primes")
                    .action(ArgAction::SetTrue)
                    .required(false)
                    .help("run the probable prime test on p and q before deriving"),
            )
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .help("to specify the output file path to save the keys"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let config = SraConfig::config();
        let params = Self::shared_modulus(m)?;
        let parties = m.get_one::<usize>("parties").copied().unwrap_or(1).max(1);
        let search = SearchArgs::new(m, config);

        if m.get_flag("check") {
            params.verify_primes(search.rounds, &mut DefaultRand::default())?;
        }

        let exponent = m.get_one::<BigUint>("exponent").cloned();
        let keys = Self::derive_keys(&params, exponent, parties, &search, config.threads)?;

        log::info!(
            "derived {} key pairs over a {} bits modulus",
            keys.len(),
            params.modulus().bits()
        );

        let keys = keys
            .into_iter()
            .map(|k| k.into_parts().1)
            .collect::<Vec<_>>();
        let out = if keys.len() == 1 {
            serde_json::to_string_pretty(&keys[0])?
        } else {
            serde_json::to_string_pretty(&keys)?
        };

        write_to_file_or_stdout(m, out.as_bytes())
    }
}
