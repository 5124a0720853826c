//! Example of storing a card and charging it later.
//!
//! Run with:
//! ```bash
//! cargo run --example store
//! ```
//!
//! Uses the same environment variables as the `purchase` example.

use komoju_rs::gateway::{GatewayConfig, KomojuGateway};
use komoju_rs::types::{CreditCard, PaymentInstrument, PaymentOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let gateway = KomojuGateway::new(GatewayConfig::from_env()?)?;
    let card = CreditCard::new("4111111111111111", 12, 2030, "123", "Taro", "Yamada");

    // A reusable token...
    let token = gateway.store(&card.clone().into(), &PaymentOptions::new()).await?;
    println!("🔑 Token: {:?} ({})", token.authorization, token.message);

    // ...or a customer record.
    let options = PaymentOptions::new()
        .with_email("taro@example.com")
        .with_customer_profile();
    let customer = gateway.store(&card.into(), &options).await?;
    println!("👤 Customer: {:?} ({})", customer.authorization, customer.message);

    if let Some(customer_id) = customer.authorization {
        let charge = gateway
            .purchase(
                750,
                &PaymentInstrument::from(customer_id),
                &PaymentOptions::new().with_description("Charge stored customer"),
            )
            .await?;
        println!("💴 Charge: {} {}", charge.success, charge.message);
    }

    Ok(())
}
