use crate::cmd::{write_to_file_or_stdout, Cmd, SraConfig};
use cipher::sra::SharedModulus;
use cipher::DefaultRand;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

#[derive(Default)]
pub struct PrimesCmd;

impl Cmd for PrimesCmd {
    const NAME: &'static str = "primes";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("generate the shared primes (p, q) that all parties agree on")
            .arg(
                Arg::new("bits")
                    .value_name("BITS")
                    .action(ArgAction::Set)
                    .required(true)
                    .value_parser(value_parser!(usize))
                    .help("to specify the modulus bits length"),
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
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .help("to specify the output file path to save the primes"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let bits = m.get_one::<usize>("bits").copied().unwrap_or(2048);
        let rounds = m
            .get_one::<usize>("rounds")
            .copied()
            .unwrap_or(SraConfig::config().prime_test_rounds);

        let mut rng = DefaultRand::default();
        let params = SharedModulus::generate(bits, rounds, &mut rng)?;
        log::debug!("generated shared primes {params}");

        let params = serde_json::to_string_pretty(&params)?;
        write_to_file_or_stdout(m, params.as_bytes())
    }
}
