//! # komoju-rs
//!
//! A Rust adapter for the [KOMOJU](https://www.komoju.com/) payments REST API.
//!
//! The adapter translates generic payment operations into single HTTP calls
//! against the provider and maps its JSON answers back into one uniform
//! [`OperationResult`].
//!
//! ## Features
//!
//! - **Five operations**: purchase, refund, void, store (token or customer) and continue
//! - **Heterogeneous instruments**: raw cards, stored `tok_` tokens, customer references
//!   or a pre-built `payment_details` payload
//! - **Normalized error codes**: provider codes are mapped onto a small shared taxonomy
//! - **Pluggable transport**: `reqwest` by default, any [`transport::Transport`] in tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use komoju_rs::gateway::{GatewayConfig, KomojuGateway};
//! use komoju_rs::types::{CreditCard, PaymentOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = KomojuGateway::new(GatewayConfig::new("sk_test_xxx").sandbox())?;
//!
//! let card = CreditCard::new("4111111111111111", 12, 2030, "123", "Taro", "Yamada");
//! let options = PaymentOptions::new()
//!     .with_currency("JPY")
//!     .with_order_id("order-1001");
//!
//! let purchase = gateway.purchase(1000, &card.into(), &options).await?;
//! if let Some(payment_id) = purchase.authorization {
//!     gateway.refund(500, &payment_id, &PaymentOptions::new()).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Results and errors
//!
//! A declined card is not an error: it is an `Ok` result with `success == false`,
//! the provider's message and a normalized `error_code`. An `Err` means no result
//! could be produced (connection failure, unparseable body, bad configuration).
//!
//! | Provider code | Normalized code |
//! |---|---|
//! | `bad_verification_value` | `incorrect_cvc` |
//! | `card_expired` | `expired_card` |
//! | `card_declined` | `card_declined` |
//! | `invalid_number` | `invalid_number` |
//!
//! Other codes pass through unchanged. An HTTP 504 from the provider's edge is
//! reported as a `gateway_timeout` decline.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod errors;
pub mod gateway;
pub mod payload;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use errors::{KomojuError, Result};
pub use gateway::{GatewayConfig, KomojuGateway};
pub use transport::{HttpTransport, Transport};
pub use types::{
    CreditCard, Environment, OperationResult, PaymentInstrument, PaymentOptions, DEFAULT_CURRENCY,
    LIVE_URL, TEST_URL,
};
