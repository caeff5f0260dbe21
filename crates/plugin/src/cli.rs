//! Command line of the plugin process
//!
//! The host launches plugins with single-dash long flags, e.g.
//! `-port 28196 -pluginUUID <uuid> -registerEvent registerPlugin -info {..}`.
//! Those are rewritten to `--flag` before clap sees them.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// Arguments the host launches the plugin with
#[derive(Debug, Parser)]
#[command(name = "toggldeck", version, about = "Toggl Track timers on Stream Deck buttons")]
pub struct Args {
    /// Port of the host's local WebSocket server
    #[arg(long)]
    pub port: u16,

    /// Identifier the host assigned to this plugin instance
    #[arg(long = "pluginUUID")]
    pub plugin_uuid: String,

    /// Event name to register with
    #[arg(long = "registerEvent")]
    pub register_event: String,

    /// Host and device description (JSON)
    #[arg(long)]
    pub info: Option<String>,

    /// Configuration file; probed next to the executable when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Host application version from `-info`, if present.
    pub fn host_version(&self) -> Option<String> {
        let info: serde_json::Value = serde_json::from_str(self.info.as_deref()?).ok()?;
        info.pointer("/application/version")?.as_str().map(str::to_string)
    }
}

/// Rewrite `-flag` to `--flag`. Short flags (`-h`) and values are kept.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            let arg = arg.into();
            if index == 0 {
                return arg;
            }
            match arg.to_str() {
                Some(flag) if is_single_dash_long(flag) => OsString::from(format!("-{flag}")),
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    let mut chars = arg.chars();
    chars.next() == Some('-')
        && chars.next().is_some_and(char::is_alphabetic)
        && chars.next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST_ARGS: [&str; 9] = [
        "toggldeck",
        "-port",
        "28196",
        "-pluginUUID",
        "6C0E1D2A",
        "-registerEvent",
        "registerPlugin",
        "-info",
        r#"{"application":{"version":"6.5.0"}}"#,
    ];

    #[test]
    fn rewrites_single_dash_long_flags() {
        let args = normalize_args(["toggldeck", "-port", "1", "-h", "--config", "-x1", "-5"]);
        let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(args, vec!["toggldeck", "--port", "1", "-h", "--config", "--x1", "-5"]);
    }

    #[test]
    fn parses_host_launch_line() {
        let args = Args::try_parse_from(normalize_args(HOST_ARGS)).unwrap();

        assert_eq!(args.port, 28196);
        assert_eq!(args.plugin_uuid, "6C0E1D2A");
        assert_eq!(args.register_event, "registerPlugin");
        assert_eq!(args.host_version().as_deref(), Some("6.5.0"));
        assert!(args.config.is_none());
    }

    #[test]
    fn missing_port_is_rejected() {
        let result = Args::try_parse_from(normalize_args(["toggldeck", "-pluginUUID", "u"]));
        assert!(result.is_err());
    }

    #[test]
    fn unreadable_info_has_no_version() {
        let mut line = HOST_ARGS.to_vec();
        line[8] = "not json";
        let args = Args::try_parse_from(normalize_args(line)).unwrap();
        assert_eq!(args.host_version(), None);
    }
}
