use aeternity_helpers_example::{configs_from_env, contract_loader, deploy_options, gas_options, FRAC};
use aeternity_rs::{decode_contract_address, Env, Harness, Signer};
use dotenv::dotenv;
use std::{env, error::Error};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Loads the owner secret key (hex) from the .env file
    let secret = env::var("AE_SECRET_KEY").expect("AE_SECRET_KEY must be set in .env file");
    let owner = Signer::from_secret_hex(&secret)?;

    // Node urls default to a local devnet
    let configs = configs_from_env();

    let env = Env::new(configs.clone())?;
    let harness = Harness::new(env, owner, contract_loader());

    let deployed = harness
        .deploy_contract(FRAC, gas_options(&configs), &deploy_options(&configs))
        .await?;

    info!(
        address = %deployed.address(),
        raw_id = %decode_contract_address(&deployed),
        owner = %deployed.owner(),
        "Contract deployed successfully"
    );

    Ok(())
}
