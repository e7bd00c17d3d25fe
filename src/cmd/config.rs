use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use config::Config;
use serde::{Deserialize, Serialize};

/// 默认值 -> 配置文件 -> `SRA__`前缀的环境变量, 后者覆盖前者.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SraConfig {
    // Miller-Rabin test rounds
    pub prime_test_rounds: usize,

    // 0 means unbounded
    pub max_search_iterations: usize,

    // 0 means no deadline
    pub search_timeout_secs: u64,

    // maximum creatable threads
    pub threads: usize,
}

impl Default for SraConfig {
    fn default() -> Self {
        Self {
            prime_test_rounds: 19,
            max_search_iterations: 0,
            search_timeout_secs: 0,
            threads: (num_cpus::get() >> 1).max(1),
        }
    }
}

impl SraConfig {
    pub fn config() -> &'static Self {
        Self::config_with_file(None)
    }

    /// 只有第一次调用时的`f`生效
    pub fn config_with_file(f: Option<&Path>) -> &'static Self {
        static CONFIG: OnceLock<SraConfig> = OnceLock::new();

        CONFIG.get_or_init(|| match Self::load(f) {
            Ok(c) => {
                log::trace!("{:?}", c);
                c
            }
            Err(e) => {
                log::error!("load configuration failed, use the default: {e}");
                Self::default()
            }
        })
    }

    fn load(f: Option<&Path>) -> anyhow::Result<Self> {
        let default_config = Config::try_from(&SraConfig::default())?;

        let mut config = Config::builder().add_source(default_config);
        if let Some(f) = f {
            config = config.add_source(config::File::from(f).required(false));
        }
        config = config.add_source(
            config::Environment::with_prefix("SRA")
                .try_parsing(true)
                .separator("__"),
        );

        let mut sra_config: SraConfig = config.build()?.try_deserialize()?;
        sra_config.threads = sra_config.threads.max(1);
        Ok(sra_config)
    }

    pub fn max_search_iterations(&self) -> Option<usize> {
        (self.max_search_iterations != 0).then_some(self.max_search_iterations)
    }

    pub fn search_timeout(&self) -> Option<Duration> {
        (self.search_timeout_secs != 0).then(|| Duration::from_secs(self.search_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::SraConfig;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("sra-config-{}.json", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(br#"{"prime_test_rounds": 7, "search_timeout_secs": 3, "threads": 0}"#)
            .unwrap();
        drop(f);

        let c = SraConfig::load(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(c.prime_test_rounds, 7);
        assert_eq!(c.threads, 1);
        assert_eq!(c.max_search_iterations(), None);
        assert_eq!(c.search_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn missing_file_uses_default() {
        let c = SraConfig::load(Some(std::path::Path::new("/not/exist/sra.json"))).unwrap();
        let d = SraConfig::default();
        assert_eq!(c.prime_test_rounds, d.prime_test_rounds);
        assert_eq!(c.max_search_iterations, 0);
    }
}
