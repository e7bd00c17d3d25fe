use chrono::{DateTime, Local};
use std::{process::Command, time::SystemTime};

fn exe_cmd(cmd: &mut Command) -> anyhow::Result<String> {
    let output = cmd.output()?;

    Ok(if output.status.success() {
        String::from_utf8(output.stdout)?
    } else {
        String::default()
    })
}

fn main() {
    // 不在git仓库中或没有git时版本信息只包含构建时间
    let git_commit_hash =
        exe_cmd(Command::new("git").args(["log", "-n", "1", "--pretty=format:%H"]))
            .map(|s| s[..8.min(s.len())].trim().to_string())
            .unwrap_or_default();

    let build_time = DateTime::<Local>::from(SystemTime::now()).format("%Y/%m/%d-%H:%M:%S:%Z");
    if git_commit_hash.is_empty() {
        println!(
            "cargo:rustc-env=SRA_VERSION_INFO={}-{}",
            env!("CARGO_PKG_VERSION"),
            build_time
        );
    } else {
        println!(
            "cargo:rustc-env=SRA_VERSION_INFO={}-{}-{}",
            env!("CARGO_PKG_VERSION"),
            git_commit_hash,
            build_time
        );
    }
}
