use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("rompo")
        .about("Password breach gate for pre-update password actions")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("ROMPO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("hibp-url")
                .long("hibp-url")
                .help("Base URL of the breach range API")
                .default_value("https://api.pwnedpasswords.com")
                .env("ROMPO_HIBP_URL"),
        )
        .arg(
            Arg::new("lookup-timeout")
                .long("lookup-timeout")
                .help("Breach lookup timeout in seconds")
                .default_value("5")
                .env("ROMPO_LOOKUP_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..=30)),
        )
        .arg(
            Arg::new("breach-policy")
                .long("breach-policy")
                .help("Decision when the breach lookup fails: fail-open allows the password change, fail-closed rejects it with service_error")
                .default_value("fail-open")
                .env("ROMPO_BREACH_POLICY")
                .value_parser(["fail-open", "fail-closed"]),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ROMPO_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
