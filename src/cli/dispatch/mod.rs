use crate::cli::actions::Action;
use crate::cli::globals::BreachPolicy;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        hibp_url: matches
            .get_one("hibp-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --hibp-url"))?,
        lookup_timeout: matches
            .get_one::<u64>("lookup-timeout")
            .copied()
            .unwrap_or(5),
        policy: matches
            .get_one("breach-policy")
            .map(|s: &String| s.parse::<BreachPolicy>())
            .transpose()
            .map_err(|err| anyhow::anyhow!(err))?
            .unwrap_or_default(),
    })
}
