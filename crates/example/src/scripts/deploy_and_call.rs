use aeternity_helpers_example::{
    configs_from_env, contract_loader, deploy_options, frac_test_args, gas_options, FRAC,
};
use aeternity_rs::{Env, Harness, Signer, SophiaType};
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

    let secret = env::var("AE_SECRET_KEY").expect("AE_SECRET_KEY must be set in .env file");
    let owner = Signer::from_secret_hex(&secret)?;

    let configs = configs_from_env();

    let harness = Harness::new(Env::new(configs.clone())?, owner, contract_loader());

    let frac = harness
        .deploy_contract(FRAC, gas_options(&configs), &deploy_options(&configs))
        .await?;
    info!(address = %frac.address(), "Contract deployed successfully");

    let value = harness
        .call_contract(&frac, "test", &frac_test_args(&configs)?, &SophiaType::Int)
        .await?;
    info!(?value, "Contract called successfully");

    Ok(())
}
