//! CLI argument parsing using clap.

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use gopher_core::InstallConfig;
use gopher_core::platform::Arch;
use gopher_core::platform::Os;
use gopher_core::platform::TargetPlatform;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gopher")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding installed versions (default: ~/.gopher/versions)
    #[arg(long, global = true, env = "GOPHER_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Target operating system, as a GOOS name (default: host)
    #[arg(long, global = true, value_name = "GOOS")]
    pub os: Option<String>,

    /// Target architecture, as a GOARCH name (default: host)
    #[arg(long, global = true, value_name = "GOARCH")]
    pub arch: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

impl Cli {
    /// Resolves the install root.
    pub fn root_dir(&self) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        let home = dirs::home_dir().context("cannot determine home directory; pass --root")?;
        Ok(home.join(".gopher").join("versions"))
    }

    /// Platform selected by `--os` and `--arch`.
    pub fn platform(&self) -> TargetPlatform {
        let mut platform = TargetPlatform::current();
        if let Some(os) = &self.os {
            platform.os = Os::from_goos(os);
        }
        if let Some(arch) = &self.arch {
            platform.arch = Arch::from_goarch(arch);
        }
        platform
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install a Go toolchain from a downloaded archive
    Install(InstallArgs),
    /// Remove an installed version
    Uninstall(VersionArgs),
    /// List installed versions
    List,
    /// Show metadata and disk usage of an installed version
    Info(VersionArgs),
    /// Print the path of the go binary of an installed version
    Which(VersionArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

impl Commands {
    /// Operation name used in JSON output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Uninstall(_) => "uninstall",
            Self::List => "list",
            Self::Info(_) => "info",
            Self::Which(_) => "which",
            Self::Completion(_) => "completion",
        }
    }
}

#[derive(clap::Args)]
pub struct InstallArgs {
    /// Version identifier, used as the directory name
    #[arg(id = "version_id", value_name = "VERSION")]
    pub version: String,

    /// Path to the .tar.gz or .zip archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Maximum number of entries to extract
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Maximum total extracted size in bytes
    #[arg(long, value_parser = parse_byte_size)]
    pub max_total_size: Option<u64>,

    /// Maximum single file size in bytes (default: 1G)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_file_size: Option<u64>,

    /// Top-level directory every entry must live under ("" for none)
    #[arg(long, value_name = "DIR")]
    pub prefix: Option<String>,
}

impl InstallArgs {
    /// Builds the install configuration for `platform`.
    pub fn config(&self, platform: TargetPlatform) -> InstallConfig {
        let mut config = InstallConfig::default().with_platform(platform);
        if let Some(count) = self.max_files {
            config = config.with_max_file_count(count);
        }
        if let Some(bytes) = self.max_total_size {
            config = config.with_max_total_size(bytes);
        }
        if let Some(bytes) = self.max_file_size {
            config = config.with_max_file_size(bytes);
        }
        if let Some(prefix) = &self.prefix {
            config = config.with_wrapper_prefix(prefix.clone());
        }
        config
    }
}

#[derive(clap::Args)]
pub struct VersionArgs {
    /// Installed version identifier
    #[arg(id = "version_id", value_name = "VERSION")]
    pub version: String,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_byte_size() {
        assert_eq!(parse_byte_size("100").unwrap(), 100);
        assert_eq!(parse_byte_size("1K").unwrap(), 1024);
        assert_eq!(parse_byte_size("2M").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_byte_size("3G").unwrap(), 3 * 1024 * 1024 * 1024);
        assert_eq!(parse_byte_size("1T").unwrap(), 1024_u64.pow(4));
        assert!(parse_byte_size("invalid").is_err());
        assert!(parse_byte_size("").is_err());
    }

    #[test]
    fn test_parse_byte_size_overflow() {
        assert!(parse_byte_size("18446744073709551615K").is_err());
        assert!(parse_byte_size("18014398509481984M").is_err());
        assert!(parse_byte_size("17592186044416G").is_err());
    }

    #[test]
    fn test_install_config_from_flags() {
        let cli = Cli::try_parse_from([
            "gopher",
            "--os",
            "windows",
            "--arch",
            "arm64",
            "install",
            "1.22.1",
            "go.zip",
            "--max-file-size",
            "64M",
            "--prefix",
            "",
        ])
        .unwrap();

        let Commands::Install(args) = &cli.command else {
            panic!("expected install command");
        };
        let config = args.config(cli.platform());
        assert_eq!(config.platform, TargetPlatform::new(Os::Windows, Arch::Arm64));
        assert_eq!(config.max_file_size, 64 * 1024 * 1024);
        assert_eq!(config.wrapper_prefix, "");
    }

    #[test]
    fn test_root_flag_wins() {
        let cli = Cli::try_parse_from(["gopher", "--root", "/srv/go", "list"]).unwrap();
        assert_eq!(cli.root_dir().unwrap(), PathBuf::from("/srv/go"));
    }
}
