//! Cross-compilation target triples handed to the external backend.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arch {
    X86_64,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arch::X86_64 => "x86_64",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Vendor {
    Unknown,
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Vendor::Unknown => "unknown",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Os {
    Linux,
    Darwin,
    Windows64,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows64 => "windows64",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub arch: Arch,
    pub vendor: Vendor,
    pub os: Os,
}

impl Target {
    /// Name of the executable the backend produces.
    pub fn output_name(&self) -> &'static str {
        match self.os {
            Os::Windows64 => "main.exe",
            _ => "main",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.vendor, self.os)
    }
}

/// The triples selectable on the command line.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "snake_case")]
pub enum TargetChoice {
    x86_64_linux,
    x86_64_darwin,
    x86_64_windows64,
}

impl From<TargetChoice> for Target {
    fn from(choice: TargetChoice) -> Self {
        let os = match choice {
            TargetChoice::x86_64_linux => Os::Linux,
            TargetChoice::x86_64_darwin => Os::Darwin,
            TargetChoice::x86_64_windows64 => Os::Windows64,
        };
        Target {
            arch: Arch::X86_64,
            vendor: Vendor::Unknown,
            os,
        }
    }
}

impl fmt::Display for TargetChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Must round-trip through clap's value parser, so spell the
        // command-line form, not the triple.
        f.write_str(match self {
            TargetChoice::x86_64_linux => "x86_64_linux",
            TargetChoice::x86_64_darwin => "x86_64_darwin",
            TargetChoice::x86_64_windows64 => "x86_64_windows64",
        })
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "macos")] {
        pub const DEFAULT_TARGET: TargetChoice = TargetChoice::x86_64_darwin;
    } else if #[cfg(target_os = "windows")] {
        pub const DEFAULT_TARGET: TargetChoice = TargetChoice::x86_64_windows64;
    } else {
        pub const DEFAULT_TARGET: TargetChoice = TargetChoice::x86_64_linux;
    }
}
