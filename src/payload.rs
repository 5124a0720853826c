//! Request payload construction.
//!
//! Every operation body is assembled here from the caller's instrument and
//! options. Nothing in this module performs I/O.

use crate::types::{
    CardDetails, ContinueRequest, FraudDetails, PaymentDetails, PaymentInstrument,
    PaymentOptions, PaymentRequest, PaymentSource, RefundRequest, StoreRequest,
};
use serde_json::Value;

/// Type tag of an expanded card inside `payment_details`.
pub const CREDIT_CARD_TYPE: &str = "credit_card";

/// Normalizes an instrument into the request member it occupies.
///
/// * raw card: a structured card object under `payment_details`, carrying the
///   options' email when present
/// * token: the token string verbatim under `payment_details`
/// * customer reference: the reference verbatim under `customer`
/// * raw payload: passed through unchanged under `payment_details`
///
/// # Examples
///
/// ```
/// use komoju_rs::payload::add_payment_details;
/// use komoju_rs::types::{PaymentInstrument, PaymentOptions, PaymentSource};
///
/// let source = add_payment_details(&PaymentInstrument::from("cus_42"), &PaymentOptions::new());
/// assert_eq!(source, PaymentSource::Customer("cus_42".to_string()));
/// ```
pub fn add_payment_details(
    instrument: &PaymentInstrument,
    options: &PaymentOptions,
) -> PaymentSource {
    match instrument {
        PaymentInstrument::Card(card) => {
            PaymentSource::PaymentDetails(PaymentDetails::Card(CardDetails {
                kind: CREDIT_CARD_TYPE.to_string(),
                number: card.number.clone(),
                month: card.month,
                year: card.year,
                verification_value: card.verification_value.clone(),
                given_name: card.first_name.clone(),
                family_name: card.last_name.clone(),
                email: options.email.clone(),
            }))
        }
        PaymentInstrument::Token(token) => {
            PaymentSource::PaymentDetails(PaymentDetails::Token(token.clone()))
        }
        PaymentInstrument::Customer(customer) => PaymentSource::Customer(customer.clone()),
        PaymentInstrument::Raw(details) => {
            PaymentSource::PaymentDetails(PaymentDetails::Raw(details.clone()))
        }
    }
}

/// Collects the fraud-screening fields, or `None` when none are set.
pub fn add_fraud_details(options: &PaymentOptions) -> Option<FraudDetails> {
    let details = FraudDetails {
        customer_ip: options.ip.clone(),
        customer_email: options.email.clone(),
        browser_language: options.browser_language.clone(),
        browser_user_agent: options.browser_user_agent.clone(),
    };

    if details.is_empty() {
        None
    } else {
        Some(details)
    }
}

/// Builds the body of a payment-creation call.
pub fn build_purchase(
    amount: u64,
    instrument: &PaymentInstrument,
    options: &PaymentOptions,
    default_currency: &str,
) -> PaymentRequest {
    PaymentRequest {
        amount,
        locale: options.locale.clone(),
        description: options.description.clone(),
        source: add_payment_details(instrument, options),
        currency: options
            .currency
            .clone()
            .unwrap_or_else(|| default_currency.to_string()),
        external_order_num: options.order_id.clone(),
        tax: options.tax,
        fraud_details: add_fraud_details(options),
    }
}

/// Builds the body of a refund call. A zero amount is a void.
pub fn build_refund(amount: u64) -> RefundRequest {
    RefundRequest { amount }
}

/// Builds the body of a token or customer creation call.
pub fn build_store(instrument: &PaymentInstrument, options: &PaymentOptions) -> StoreRequest {
    StoreRequest {
        source: add_payment_details(instrument, options),
        email: if options.customer_profile {
            options.email.clone()
        } else {
            None
        },
    }
}

/// Builds the body of a continue call.
pub fn build_continue(payment_details: Value) -> ContinueRequest {
    ContinueRequest { payment_details }
}
