use portal_http::PortalClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api = PortalClient::from_env().map_err(anyhow::Error::msg)?;

    if !api.health_check().await {
        anyhow::bail!("portal API at {} is not reachable", api.base_url());
    }

    match api.albums().await {
        Ok(albums) => println!("{albums:#}"),
        Err(err) => {
            eprintln!("{}", err.user_message);
            return Err(err.into());
        }
    }

    Ok(())
}
