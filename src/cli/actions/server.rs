use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::rompo::new;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            hibp_url,
            lookup_timeout,
            policy,
        } => {
            let hibp_url = Url::parse(&hibp_url)
                .with_context(|| format!("invalid range API URL: {hibp_url}"))?;

            let globals = GlobalArgs::new(hibp_url.to_string(), lookup_timeout, policy);

            new(port, globals).await?;
        }
    }

    Ok(())
}
