use clap::{ArgAction, Parser};

/// Updates a dynamic-DNS endpoint with this machine's current WAN address.
///
/// The chosen directory holds both files this tool touches: ddnsup.json
/// (the endpoint records) and ddnsup.log (one line per run).
#[derive(Parser, Debug)]
#[command(name = "ddnsup", version)]
pub struct Args {
    /// Directory for the config and log files; "$HOME" expands to the
    /// user's home directory.
    #[arg(short, long)]
    pub path: Option<String>,

    /// Name of the endpoint record to update (exact, case-sensitive).
    #[arg(short, long)]
    pub service: String,

    /// Resolve the IPv6 WAN address instead of IPv4.
    #[arg(
        short = '6',
        long = "useIP6",
        value_name = "BOOL",
        action = ArgAction::Set,
        default_value_t = false
    )]
    pub use_ip6: bool,

    /// Send the update request even when the address is unchanged.
    #[arg(
        short,
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        default_value_t = false
    )]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_long_flags() {
        let args = Args::try_parse_from([
            "ddnsup",
            "--path",
            "/var/lib/ddnsup",
            "--service",
            "DuckDns",
            "--useIP6",
            "true",
            "--force",
            "true",
        ])
        .unwrap();

        assert_eq!(args.path.as_deref(), Some("/var/lib/ddnsup"));
        assert_eq!(args.service, "DuckDns");
        assert!(args.use_ip6);
        assert!(args.force);
    }

    #[test]
    fn parses_short_aliases() {
        let args =
            Args::try_parse_from(["ddnsup", "-p", "/tmp", "-s", "DynDns", "-6", "false", "-f", "false"])
                .unwrap();

        assert_eq!(args.path.as_deref(), Some("/tmp"));
        assert_eq!(args.service, "DynDns");
        assert!(!args.use_ip6);
        assert!(!args.force);
    }

    #[test]
    fn booleans_and_path_are_optional() {
        let args = Args::try_parse_from(["ddnsup", "-s", "DuckDns"]).unwrap();

        assert_eq!(args.path, None);
        assert!(!args.use_ip6);
        assert!(!args.force);
    }

    #[test]
    fn service_is_required() {
        assert!(Args::try_parse_from(["ddnsup"]).is_err());
    }

    #[test]
    fn boolean_flags_take_explicit_values() {
        // bare flag, no value
        assert!(Args::try_parse_from(["ddnsup", "-s", "DuckDns", "-6"]).is_err());
        // not a boolean
        assert!(Args::try_parse_from(["ddnsup", "-s", "DuckDns", "-6", "yes"]).is_err());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Args::try_parse_from(["ddnsup", "-s", "DuckDns", "--retry"]).is_err());
    }
}
