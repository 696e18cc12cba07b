//! Target platform description.
//!
//! The platform decides the name of the runnable binary and the `os`/`arch`
//! values recorded in installation metadata. It is passed in explicitly
//! through [`InstallConfig`](crate::InstallConfig) so that the same logic can
//! be exercised for every target from a single host.

use std::fmt;
use std::path::PathBuf;

/// Operating systems Go distributions are published for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux.
    Linux,
    /// macOS.
    Darwin,
    /// Windows.
    Windows,
    /// FreeBSD.
    FreeBsd,
    /// Anything else, named with Go's `GOOS` spelling.
    Other(String),
}

impl Os {
    /// Returns the host operating system.
    #[must_use]
    pub fn current() -> Self {
        Self::from_goos(std::env::consts::OS)
    }

    /// Parses a `GOOS` or Rust `target_os` name.
    #[must_use]
    pub fn from_goos(name: &str) -> Self {
        match name {
            "linux" => Self::Linux,
            "macos" | "darwin" => Self::Darwin,
            "windows" => Self::Windows,
            "freebsd" => Self::FreeBsd,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the `GOOS` spelling of this operating system.
    #[must_use]
    pub fn as_goos(&self) -> &str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Windows => "windows",
            Self::FreeBsd => "freebsd",
            Self::Other(name) => name,
        }
    }

    /// Returns the file name of executables called `stem` on this OS.
    #[must_use]
    pub fn executable_name(&self, stem: &str) -> String {
        match self {
            Self::Windows => format!("{stem}.exe"),
            _ => stem.to_string(),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_goos())
    }
}

/// CPU architectures, in Go's `GOARCH` spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 64-bit x86.
    Amd64,
    /// 64-bit ARM.
    Arm64,
    /// 32-bit x86.
    I386,
    /// 32-bit ARM (published as `armv6l`).
    Arm,
    /// Anything else, named with Go's `GOARCH` spelling.
    Other(String),
}

impl Arch {
    /// Returns the host architecture.
    #[must_use]
    pub fn current() -> Self {
        Self::from_goarch(std::env::consts::ARCH)
    }

    /// Parses a `GOARCH` or Rust `target_arch` name.
    #[must_use]
    pub fn from_goarch(name: &str) -> Self {
        match name {
            "x86_64" | "amd64" => Self::Amd64,
            "aarch64" | "arm64" => Self::Arm64,
            "x86" | "i386" | "i686" | "386" => Self::I386,
            "arm" | "armv6l" => Self::Arm,
            "powerpc64" => Self::Other("ppc64le".to_string()),
            "loongarch64" => Self::Other("loong64".to_string()),
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the `GOARCH` spelling of this architecture.
    #[must_use]
    pub fn as_goarch(&self) -> &str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::I386 => "386",
            Self::Arm => "armv6l",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_goarch())
    }
}

/// The platform a toolchain is installed for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPlatform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl TargetPlatform {
    /// Creates a platform description.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Returns the host platform.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Os::current(), Arch::current())
    }

    /// Relative location of the `go` binary inside an installation.
    ///
    /// # Examples
    ///
    /// ```
    /// use gopher_core::platform::{Arch, Os, TargetPlatform};
    /// use std::path::PathBuf;
    ///
    /// let windows = TargetPlatform::new(Os::Windows, Arch::Amd64);
    /// assert_eq!(windows.go_binary(), PathBuf::from("bin").join("go.exe"));
    ///
    /// let linux = TargetPlatform::new(Os::Linux, Arch::Arm64);
    /// assert_eq!(linux.go_binary(), PathBuf::from("bin").join("go"));
    /// ```
    #[must_use]
    pub fn go_binary(&self) -> PathBuf {
        PathBuf::from("bin").join(self.os.executable_name("go"))
    }

    /// The same location as [`go_binary`](Self::go_binary), spelled the way
    /// archive entry names are: slash-separated.
    #[must_use]
    pub fn go_binary_entry(&self) -> String {
        format!("bin/{}", self.os.executable_name("go"))
    }
}

impl Default for TargetPlatform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
