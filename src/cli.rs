use clap::{Args as ClapArgs, Parser, Subcommand};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

#[derive(Parser, Debug, Clone)]
#[command(
    name = "subzero",
    version,
    long_version = LONG_VERSION,
    about = "Passive subdomain enumeration",
    long_about = "subzero queries many public data sources at once and streams every subdomain it finds as soon as a source reports it."
)]
pub struct Args {
    /// Log debug information to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Enumerate subdomains for the given domains.
    Enumerate(EnumerateArgs),

    /// List all available sources
    Sources,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct EnumerateArgs {
    /// Domains to enumerate
    #[arg(value_name = "DOMAIN", required = true, num_args = 1..)]
    pub domains: Vec<String>,

    /// Show errors and other available diagnostic information.
    #[arg(long = "verbose")]
    pub verbose: bool,

    /// Specific sources to use (comma-separated)
    #[arg(short = 's', long = "sources", value_delimiter = ',')]
    pub sources: Option<Vec<String>>,

    /// Maximum number of sources queried at once
    #[arg(short = 'c', long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Page cap for paginated sources
    #[arg(long = "max-pages", value_name = "N")]
    pub max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short = 't', long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Stop every source after this many seconds
    #[arg(long = "deadline", value_name = "SECS")]
    pub deadline: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_args() {
        let args = Args::try_parse_from([
            "subzero",
            "enumerate",
            "example.com",
            "example.org",
            "--verbose",
            "-s",
            "crtsh,dogpile",
        ])
        .unwrap();

        match args.command {
            Command::Enumerate(enumerate) => {
                assert_eq!(enumerate.domains, vec!["example.com", "example.org"]);
                assert!(enumerate.verbose);
                assert_eq!(
                    enumerate.sources,
                    Some(vec!["crtsh".to_string(), "dogpile".to_string()])
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbose_defaults_off() {
        let args = Args::try_parse_from(["subzero", "enumerate", "example.com"]).unwrap();
        match args.command {
            Command::Enumerate(enumerate) => assert!(!enumerate.verbose),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_enumerate_requires_a_domain() {
        assert!(Args::try_parse_from(["subzero", "enumerate"]).is_err());
    }
}
