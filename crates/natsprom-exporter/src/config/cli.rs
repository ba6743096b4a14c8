use clap::Parser;

use natsprom_core::error::Result;

use super::ExporterConfig;

/// Export NATS server monitoring data in the Prometheus text format.
#[derive(Debug, Parser)]
#[command(name = "natsprom", version, about)]
pub struct Args {
    /// Optional YAML config file. Flags given on the command line win.
    #[arg(long)]
    pub config: Option<String>,

    /// Address on which to expose metrics and web interface.
    #[arg(long = "web.listen-address", value_name = "ADDR")]
    pub listen_address: Option<String>,

    /// Address on which gnatsd is giving metrics.
    #[arg(long = "nats.address", value_name = "HOST:PORT")]
    pub nats_address: Option<String>,

    /// Time in seconds between data scrapes from gnatsd monitoring.
    #[arg(long = "consume-time", value_name = "SECS", allow_negative_numbers = true)]
    pub consume_time: Option<i64>,
}

impl Args {
    /// Merge defaults, the config file (if any) and flag overrides.
    ///
    /// Nothing is validated here, not even the file on its own; startup
    /// validates the merged result before touching the network.
    pub fn into_config(self) -> Result<ExporterConfig> {
        let mut cfg = match self.config.as_deref() {
            Some(path) => super::parse_file(path)?,
            None => ExporterConfig::default(),
        };
        if let Some(v) = self.listen_address {
            cfg.listen_address = v;
        }
        if let Some(v) = self.nats_address {
            cfg.nats_address = v;
        }
        if let Some(v) = self.consume_time {
            cfg.consume_time_secs = v;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "natsprom",
            "--web.listen-address",
            "127.0.0.1:9200",
            "--nats.address",
            "nats:8222",
            "--consume-time",
            "3",
        ])
        .unwrap();
        let cfg = args.into_config().unwrap();
        assert_eq!(cfg.listen_address, "127.0.0.1:9200");
        assert_eq!(cfg.nats_address, "nats:8222");
        assert_eq!(cfg.consume_time_secs, 3);
    }

    #[test]
    fn negative_interval_reaches_validation() {
        let args = Args::try_parse_from(["natsprom", "--consume-time", "-5"]).unwrap();
        let cfg = args.into_config().unwrap();
        assert_eq!(cfg.consume_time_secs, -5);
        assert!(cfg.validate().is_err());
    }

    fn write_config(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("natsprom-{}-{name}.yaml", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn flag_overrides_invalid_file_value() {
        let path = write_config("zero-interval", "consume_time_secs: 0\nnats_address: \"nats:8222\"\n");
        let args = Args::try_parse_from([
            "natsprom",
            "--config",
            path.to_str().unwrap(),
            "--consume-time",
            "5",
        ])
        .unwrap();
        let cfg = args.into_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.consume_time_secs, 5);
        assert_eq!(cfg.nats_address, "nats:8222");
        cfg.validate().unwrap();
    }

    #[test]
    fn invalid_file_value_without_override_fails_validation() {
        let path = write_config("zero-only", "consume_time_secs: 0\n");
        let args = Args::try_parse_from(["natsprom", "--config", path.to_str().unwrap()]).unwrap();
        let cfg = args.into_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.validate().unwrap_err().kind().as_str(), "CONFIG");
    }

    #[test]
    fn no_flags_gives_defaults() {
        let cfg = Args::try_parse_from(["natsprom"]).unwrap().into_config().unwrap();
        assert_eq!(cfg, ExporterConfig::default());
    }
}
