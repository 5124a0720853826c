//! Core type definitions for the KOMOJU adapter.
//!
//! This module contains the caller-facing inputs (instruments and options),
//! the wire payloads sent to the provider, and the uniform [`OperationResult`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Production API base URL.
pub const LIVE_URL: &str = "https://komoju.com/api/v1";

/// Sandbox API base URL.
pub const TEST_URL: &str = "https://sandbox.komoju.com/api/v1";

/// Currency used when the caller does not supply one.
pub const DEFAULT_CURRENCY: &str = "JPY";

/// Human-readable gateway name.
pub const DISPLAY_NAME: &str = "Komoju";

/// Provider homepage.
pub const HOMEPAGE_URL: &str = "https://www.komoju.com/";

/// ISO 3166 country codes the provider accepts merchants from.
pub const SUPPORTED_COUNTRIES: &[&str] = &["JP"];

/// Card brands accepted for raw card payments.
pub const SUPPORTED_CARD_TYPES: &[CardBrand] = &[
    CardBrand::Visa,
    CardBrand::Master,
    CardBrand::AmericanExpress,
    CardBrand::Jcb,
];

/// Prefix that marks a string instrument as a stored token.
pub const TOKEN_PREFIX: &str = "tok_";

/// Message attached to every successful result.
pub const SUCCESS_MESSAGE: &str = "Transaction succeeded";

/// Which provider deployment requests go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// The sandbox, where results are flagged as test results
    Sandbox,
    /// Live traffic
    #[default]
    Production,
}

impl Environment {
    /// Base URL for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => TEST_URL,
            Environment::Production => LIVE_URL,
        }
    }

    /// Whether results from this environment are test results.
    pub fn is_test(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }
}

/// Card brands known to the gateway.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    /// Visa
    Visa,
    /// Mastercard
    Master,
    /// American Express
    AmericanExpress,
    /// JCB
    Jcb,
}

/// Raw card data supplied by the caller.
///
/// # Examples
///
/// ```
/// use komoju_rs::types::CreditCard;
///
/// let card = CreditCard::new("4111111111111111", 12, 2030, "123", "Taro", "Yamada");
/// assert_eq!(card.month, 12);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CreditCard {
    /// Primary account number
    pub number: String,

    /// Expiry month, 1-12
    pub month: u8,

    /// Four-digit expiry year
    pub year: u16,

    /// Card verification code
    pub verification_value: String,

    /// Card holder's given name
    pub first_name: String,

    /// Card holder's family name
    pub last_name: String,
}

impl CreditCard {
    /// Creates a new card.
    pub fn new(
        number: impl Into<String>,
        month: u8,
        year: u16,
        verification_value: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            month,
            year,
            verification_value: verification_value.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Card number with all but the last four digits masked.
    pub fn masked_number(&self) -> String {
        let digits = self.number.chars().count();
        let visible: String = self.number.chars().skip(digits.saturating_sub(4)).collect();
        format!("{}{}", "X".repeat(digits.saturating_sub(4)), visible)
    }
}

// Card data must never end up in logs.
impl std::fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditCard")
            .field("number", &self.masked_number())
            .field("month", &self.month)
            .field("year", &self.year)
            .field("verification_value", &"[FILTERED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// The payment method used for an operation.
///
/// Exactly one representation is active per call. Plain strings are
/// classified on conversion: a `tok_` prefix marks a stored token, anything
/// else is a stored customer reference.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentInstrument {
    /// Raw card data, expanded into a structured card object
    Card(CreditCard),
    /// A stored token (`tok_...`), sent verbatim as `payment_details`
    Token(String),
    /// A stored customer reference, sent as `customer`
    Customer(String),
    /// A pre-built `payment_details` value, passed through unchanged
    Raw(Value),
}

impl PaymentInstrument {
    /// Classifies a string reference as a token or a customer.
    ///
    /// # Examples
    ///
    /// ```
    /// use komoju_rs::types::PaymentInstrument;
    ///
    /// let token = PaymentInstrument::from_reference("tok_abc");
    /// assert!(matches!(token, PaymentInstrument::Token(_)));
    ///
    /// let customer = PaymentInstrument::from_reference("cus_abc");
    /// assert!(matches!(customer, PaymentInstrument::Customer(_)));
    /// ```
    pub fn from_reference(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        if reference.starts_with(TOKEN_PREFIX) {
            PaymentInstrument::Token(reference)
        } else {
            PaymentInstrument::Customer(reference)
        }
    }
}

impl From<CreditCard> for PaymentInstrument {
    fn from(card: CreditCard) -> Self {
        PaymentInstrument::Card(card)
    }
}

impl From<&str> for PaymentInstrument {
    fn from(reference: &str) -> Self {
        PaymentInstrument::from_reference(reference)
    }
}

impl From<String> for PaymentInstrument {
    fn from(reference: String) -> Self {
        PaymentInstrument::from_reference(reference)
    }
}

impl From<Value> for PaymentInstrument {
    fn from(details: Value) -> Self {
        PaymentInstrument::Raw(details)
    }
}

/// Optional per-call fields.
///
/// All fields are optional; `currency` falls back to the gateway default.
/// The fraud fields (`ip`, `email`, `browser_language`, `browser_user_agent`)
/// produce a `fraud_details` object only when at least one is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentOptions {
    /// ISO 4217 currency code
    pub currency: Option<String>,
    /// Locale for provider-rendered pages (e.g. "ja")
    pub locale: Option<String>,
    /// Free-form description
    pub description: Option<String>,
    /// Merchant order reference, sent as `external_order_num`
    pub order_id: Option<String>,
    /// Tax in minor currency units
    pub tax: Option<u64>,
    /// Customer email
    pub email: Option<String>,
    /// Customer IP address
    pub ip: Option<String>,
    /// Browser `Accept-Language`
    pub browser_language: Option<String>,
    /// Browser `User-Agent`
    pub browser_user_agent: Option<String>,
    /// `store` creates a customer record instead of a token
    pub customer_profile: bool,
}

impl PaymentOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the merchant order reference.
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Sets the tax amount.
    pub fn with_tax(mut self, tax: u64) -> Self {
        self.tax = Some(tax);
        self
    }

    /// Sets the customer email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the customer IP address.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Sets the browser language.
    pub fn with_browser_language(mut self, language: impl Into<String>) -> Self {
        self.browser_language = Some(language.into());
        self
    }

    /// Sets the browser user agent.
    pub fn with_browser_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.browser_user_agent = Some(user_agent.into());
        self
    }

    /// Makes `store` create a customer record.
    pub fn with_customer_profile(mut self) -> Self {
        self.customer_profile = true;
        self
    }
}

/// Structured card object inside `payment_details`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardDetails {
    /// Always `"credit_card"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Card number
    pub number: String,
    /// Expiry month
    pub month: u8,
    /// Expiry year
    pub year: u16,
    /// Card verification code
    pub verification_value: String,
    /// Holder's given name
    pub given_name: String,
    /// Holder's family name
    pub family_name: String,
    /// Customer email, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Value of the `payment_details` field.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PaymentDetails {
    /// Expanded raw card
    Card(CardDetails),
    /// Stored token string
    Token(String),
    /// Caller-built payload
    Raw(Value),
}

/// Where the instrument lands in the request body.
///
/// Flattened into the enclosing request, so it serializes as either a
/// `payment_details` or a `customer` member.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSource {
    /// `"payment_details": ...`
    PaymentDetails(PaymentDetails),
    /// `"customer": "..."`
    Customer(String),
}

/// Fraud-screening context.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FraudDetails {
    /// Customer IP address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_ip: Option<String>,
    /// Customer email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Browser language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_language: Option<String>,
    /// Browser user agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_user_agent: Option<String>,
}

impl FraudDetails {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.customer_ip.is_none()
            && self.customer_email.is_none()
            && self.browser_language.is_none()
            && self.browser_user_agent.is_none()
    }
}

/// Body of `POST /payments`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    /// Amount in minor currency units
    pub amount: u64,

    /// Locale for provider-rendered pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The normalized instrument
    #[serde(flatten)]
    pub source: PaymentSource,

    /// ISO 4217 currency code
    pub currency: String,

    /// Merchant order reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_order_num: Option<String>,

    /// Tax in minor currency units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<u64>,

    /// Present only when at least one fraud field is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_details: Option<FraudDetails>,
}

/// Body of `POST /payments/{id}/refund`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RefundRequest {
    /// Amount to refund in minor currency units; zero voids the payment
    pub amount: u64,
}

/// Body of `POST /tokens` and `POST /customers`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StoreRequest {
    /// The normalized instrument
    #[serde(flatten)]
    pub source: PaymentSource,

    /// Only sent when creating a customer record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Body of `PATCH /payments/{id}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ContinueRequest {
    /// Additional details for a pending payment
    pub payment_details: Value,
}

/// The `error` member of a provider error response.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProviderError {
    /// Provider error code (e.g. "card_declined")
    #[serde(default)]
    pub code: Option<String>,

    /// Provider error message
    #[serde(default)]
    pub message: Option<String>,
}

/// A provider error response: `{"error": {...}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorEnvelope {
    /// Code and message
    pub error: ProviderError,
}

/// Uniform outcome of every operation.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OperationResult {
    /// Whether the provider accepted the request
    pub success: bool,

    /// Fixed success text, or the provider's error message
    pub message: String,

    /// The parsed provider response body
    pub params: Value,

    /// True when the call went to the sandbox
    pub test: bool,

    /// Normalized error code, only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Provider resource id, only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
}
