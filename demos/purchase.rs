//! Example purchase flow.
//!
//! Charges a sandbox card, then refunds half of it and voids the rest.
//!
//! Run with:
//! ```bash
//! cargo run --example purchase
//! ```
//!
//! Environment variables (a `.env` file is honoured):
//! - KOMOJU_LOGIN: Your secret API key
//! - KOMOJU_SANDBOX: `true` to use the sandbox
//! - KOMOJU_BASE_URL: Optional base URL override

use komoju_rs::gateway::{GatewayConfig, KomojuGateway};
use komoju_rs::types::{CreditCard, PaymentOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .init();

    let config = GatewayConfig::from_env()?;
    println!("💳 Komoju purchase example");
    println!("   API: {}", config.base_url());
    println!();

    let gateway = KomojuGateway::new(config)?;

    let card = CreditCard::new("4111111111111111", 12, 2030, "123", "Taro", "Yamada");
    let options = PaymentOptions::new()
        .with_currency("JPY")
        .with_description("komoju-rs example purchase")
        .with_order_id(format!("example-{}", std::process::id()))
        .with_email("taro@example.com");

    let purchase = gateway.purchase(1000, &card.into(), &options).await?;
    if !purchase.success {
        println!(
            "❌ Purchase declined: {} ({})",
            purchase.message,
            purchase.error_code.as_deref().unwrap_or("unknown")
        );
        return Ok(());
    }

    let payment_id = purchase.authorization.clone().unwrap_or_default();
    println!("✅ Purchase succeeded: {}", payment_id);

    let refund = gateway.refund(500, &payment_id, &PaymentOptions::new()).await?;
    println!("↩️  Partial refund: {} {}", refund.success, refund.message);

    let void = gateway.void(&payment_id, &PaymentOptions::new()).await?;
    println!("🚫 Void: {} {}", void.success, void.message);

    println!("\n📦 Last provider response:");
    println!("{}", serde_json::to_string_pretty(&void.params)?);

    Ok(())
}
