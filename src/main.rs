use clap::{value_parser, Arg, ArgAction, Command};
use log::LevelFilter;
use sra::cmd::{Cmd, KeyCmd, PrimesCmd, SraConfig, TransformCmd};
use sra::error::SraError;
use std::path::PathBuf;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let version = env!("SRA_VERSION_INFO");
    let app = Command::new("sra")
        .version(version)
        .about("SRA commutative encryption: shared modulus, per party exponents")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .action(ArgAction::Set)
                .required(false)
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("to specify the configuration file path"),
        )
        .subcommand(PrimesCmd::cmd())
        .subcommand(KeyCmd::cmd())
        .subcommand(TransformCmd::cmd())
        .get_matches();

    let _config =
        SraConfig::config_with_file(app.get_one::<PathBuf>("config").map(|p| p.as_path()));

    let res = match app.subcommand() {
        Some((PrimesCmd::NAME, m)) => PrimesCmd.run(m),
        Some((KeyCmd::NAME, m)) => KeyCmd.run(m),
        Some((TransformCmd::NAME, m)) => TransformCmd.run(m),
        Some((name, _m)) => Err(SraError::NotSupport(format!("unsupport for {name}")).into()),
        None => {
            println!("{} {}", env!("CARGO_PKG_NAME"), version);
            Ok(())
        }
    };

    if sra::log_error(res).is_none() {
        std::process::exit(1);
    }
}
