//! Command-line argument parsing for hdls.
//!
//! The flags follow `ls`: `-l`, `-a` and `-h` combine freely (`-lah`). Because `-h` means
//! human-readable sizes, help is only available as `--help`.

use crate::core::{ListOptions, RenderOptions};

use clap::{ArgAction, Parser};

use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "hdls",
    version,
    about = "List HDFS directory contents over WebHDFS",
    disable_help_flag = true,
    after_help = ENV_HELP
)]
pub struct Cli {
    /// Use a long listing format
    #[arg(short = 'l')]
    pub long: bool,

    /// Do not ignore entries starting with '.', and show '.' and '..'
    #[arg(short = 'a')]
    pub all: bool,

    /// With -l, print sizes like 1.5K, 23M, 2.0G
    #[arg(short = 'h')]
    pub human_readable: bool,

    /// Print a single JSON array instead of text
    #[arg(long)]
    pub json: bool,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file to read instead of the default location
    #[arg(long, env = "HDLS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Remote paths, URLs like webhdfs://host:port/path, or glob patterns [default: home directory]
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

impl Cli {
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            all: self.all,
            render: RenderOptions {
                long: self.long,
                human_readable: self.human_readable,
                json: self.json,
            },
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT:
  HADOOP_NAMENODE     Namenode HTTP addresses, e.g. nn1:9870,nn2:9870
  HADOOP_CONF_DIR     Directory with core-site.xml and hdfs-site.xml
  HADOOP_USER_NAME    User to act as
  HADOOP_KEYTAB       Keytab to log in with
  HADOOP_KRB_CONF     Kerberos config [default: /etc/krb5.conf]
  HADOOP_SNAME        Namenode service name [default: nn]
  HDLS_CONFIG         Override the default config path";
