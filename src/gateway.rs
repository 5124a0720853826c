//! The KOMOJU gateway adapter.
//!
//! [`KomojuGateway`] turns the five generic operations (purchase, refund,
//! void, store, continue) into one HTTP call each and normalizes the JSON
//! answer into an [`OperationResult`].
//!
//! Two failure channels are kept apart:
//!
//! - provider-reported errors (declines, invalid cards, ...) come back as
//!   `Ok(OperationResult { success: false, .. })` with a normalized code;
//! - transport failures and unparseable bodies are `Err(KomojuError)`.

use crate::errors::{KomojuError, Result};
use crate::payload::{build_continue, build_purchase, build_refund, build_store};
use crate::transport::{ApiRequest, HttpTransport, Transport};
use crate::types::{
    CardBrand, Environment, OperationResult, PaymentInstrument, PaymentOptions, ProviderError,
    DEFAULT_CURRENCY, SUCCESS_MESSAGE, SUPPORTED_CARD_TYPES, SUPPORTED_COUNTRIES,
};
use crate::utils::{
    basic_auth_header, default_user_agent, gateway_timeout_body, normalize_error_code,
    DEFAULT_TIMEOUT_MESSAGE,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Status for which the provider's edge body is replaced by a synthetic error.
const GATEWAY_TIMEOUT_STATUS: u16 = 504;

/// Configuration for a [`KomojuGateway`].
///
/// Immutable once the gateway is built.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Secret API key, sent as the Basic-Auth user name
    pub login: String,

    /// Sandbox or production
    pub environment: Environment,

    /// Currency used when a purchase does not name one
    pub default_currency: String,

    /// Message placed in the synthetic error for a 504 response
    pub timeout_message: String,

    /// `User-Agent` header value
    pub user_agent: String,

    /// Overrides the environment's base URL (e.g. a local stub server)
    pub base_url: Option<String>,
}

impl GatewayConfig {
    /// Creates a production configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use komoju_rs::gateway::GatewayConfig;
    /// use komoju_rs::types::Environment;
    ///
    /// let config = GatewayConfig::new("sk_live_xxx");
    /// assert_eq!(config.environment, Environment::Production);
    /// assert_eq!(config.default_currency, "JPY");
    /// ```
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            environment: Environment::Production,
            default_currency: DEFAULT_CURRENCY.to_string(),
            timeout_message: DEFAULT_TIMEOUT_MESSAGE.to_string(),
            user_agent: default_user_agent(),
            base_url: None,
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// * `KOMOJU_LOGIN` (required)
    /// * `KOMOJU_SANDBOX`: `1`, `true` or `yes` selects the sandbox
    /// * `KOMOJU_BASE_URL` (optional override)
    pub fn from_env() -> Result<Self> {
        let login = std::env::var("KOMOJU_LOGIN")
            .map_err(|_| KomojuError::ConfigError("KOMOJU_LOGIN is not set".to_string()))?;

        let sandbox = std::env::var("KOMOJU_SANDBOX")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let mut config = Self::new(login);
        if sandbox {
            config = config.sandbox();
        }
        if let Ok(base_url) = std::env::var("KOMOJU_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }

    /// Selects the sandbox.
    pub fn sandbox(self) -> Self {
        self.with_environment(Environment::Sandbox)
    }

    /// Sets the environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the default currency.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Sets the (localized) message used for gateway timeouts.
    pub fn with_timeout_message(mut self, message: impl Into<String>) -> Self {
        self.timeout_message = message.into();
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Points the gateway at a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    /// Whether results are test results.
    pub fn is_test(&self) -> bool {
        self.environment.is_test()
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("login", &"[FILTERED]")
            .field("environment", &self.environment)
            .field("default_currency", &self.default_currency)
            .field("timeout_message", &self.timeout_message)
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Adapter for the KOMOJU payments API.
///
/// Holds no state across calls beyond its configuration, so a single
/// instance can be shared between tasks.
///
/// # Examples
///
/// ```no_run
/// use komoju_rs::gateway::{GatewayConfig, KomojuGateway};
/// use komoju_rs::types::{CreditCard, PaymentOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gateway = KomojuGateway::new(GatewayConfig::new("sk_test_xxx").sandbox())?;
/// let card = CreditCard::new("4111111111111111", 12, 2030, "123", "Taro", "Yamada");
///
/// let result = gateway.purchase(1000, &card.into(), &PaymentOptions::new()).await?;
/// if result.success {
///     println!("authorized: {:?}", result.authorization);
/// } else {
///     println!("declined: {:?} {}", result.error_code, result.message);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct KomojuGateway {
    config: GatewayConfig,
    base_url: Url,
    headers: HeaderMap,
    transport: Arc<dyn Transport>,
}

impl KomojuGateway {
    /// Creates a gateway that sends requests with `reqwest`.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Creates a gateway on top of a custom transport.
    ///
    /// Fails when the login is empty, the base URL does not parse, or a
    /// header value cannot be encoded.
    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        if config.login.is_empty() {
            return Err(KomojuError::MissingField("login".to_string()));
        }

        let base_url = Url::parse(config.base_url())?;
        if base_url.cannot_be_a_base() {
            return Err(KomojuError::ConfigError(format!(
                "Base URL cannot carry paths: {}",
                base_url
            )));
        }

        let headers = Self::build_headers(&config)?;

        Ok(Self {
            config,
            base_url,
            headers,
            transport,
        })
    }

    /// The gateway's configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Whether merchants in the given country can use this gateway.
    pub fn supports_country(&self, country: &str) -> bool {
        SUPPORTED_COUNTRIES
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country))
    }

    /// Card brands accepted for raw card payments.
    pub fn supported_card_types(&self) -> &'static [CardBrand] {
        SUPPORTED_CARD_TYPES
    }

    /// Creates a payment.
    ///
    /// On success the result's `authorization` is the provider's payment id,
    /// which later `refund`, `void` and `continue_payment` calls refer to.
    pub async fn purchase(
        &self,
        amount: u64,
        instrument: &PaymentInstrument,
        options: &PaymentOptions,
    ) -> Result<OperationResult> {
        let post = build_purchase(amount, instrument, options, &self.config.default_currency);
        self.commit(Method::POST, &["payments"], &post).await
    }

    /// Refunds `amount` of a prior payment.
    pub async fn refund(
        &self,
        amount: u64,
        authorization: &str,
        _options: &PaymentOptions,
    ) -> Result<OperationResult> {
        self.commit(
            Method::POST,
            &["payments", authorization, "refund"],
            &build_refund(amount),
        )
        .await
    }

    /// Voids a prior payment.
    ///
    /// The provider has no dedicated void endpoint; a zero-amount refund
    /// cancels the payment. The request is identical to `refund(0, ..)`.
    pub async fn void(
        &self,
        authorization: &str,
        options: &PaymentOptions,
    ) -> Result<OperationResult> {
        self.refund(0, authorization, options).await
    }

    /// Stores an instrument for later use.
    ///
    /// With `customer_profile` set this creates a customer record (including
    /// the options' email); otherwise it creates a reusable token.
    pub async fn store(
        &self,
        instrument: &PaymentInstrument,
        options: &PaymentOptions,
    ) -> Result<OperationResult> {
        let post = build_store(instrument, options);
        let resource = if options.customer_profile {
            "customers"
        } else {
            "tokens"
        };
        self.commit(Method::POST, &[resource], &post).await
    }

    /// Supplies additional payment details to a pending payment.
    ///
    /// Used by multi-step flows where `purchase` returned a payment that still
    /// awaits details (redirects, convenience-store payments).
    pub async fn continue_payment(
        &self,
        payment_id: &str,
        payment_details: Value,
    ) -> Result<OperationResult> {
        self.commit(
            Method::PATCH,
            &["payments", payment_id],
            &build_continue(payment_details),
        )
        .await
    }

    fn build_headers(config: &GatewayConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut authorization = HeaderValue::from_str(&basic_auth_header(&config.login))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        Ok(headers)
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                KomojuError::ConfigError(format!("Base URL cannot carry paths: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one request and parses the body as JSON.
    ///
    /// A 504 is replaced by a synthetic `gateway_timeout` error; any other
    /// non-2xx body is parsed as-is, so a malformed body surfaces as a
    /// `JsonError`.
    async fn api_request(&self, method: Method, url: Url, body: String) -> Result<Value> {
        #[cfg(feature = "tracing")]
        tracing::debug!(method = %method, path = url.path(), "sending request to komoju");

        let response = self
            .transport
            .send(ApiRequest {
                method,
                url: url.into(),
                headers: self.headers.clone(),
                body,
            })
            .await?;

        let raw = if response.is_success() {
            response.body
        } else if response.status == GATEWAY_TIMEOUT_STATUS {
            #[cfg(feature = "tracing")]
            tracing::warn!(status = response.status, "komoju gateway timeout");
            gateway_timeout_body(&self.config.timeout_message)?
        } else {
            response.body
        };

        Ok(serde_json::from_str(&raw)?)
    }

    async fn commit<T: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        params: &T,
    ) -> Result<OperationResult> {
        let url = self.endpoint(segments)?;
        let body = serde_json::to_string(params)?;
        let response = self.api_request(method, url, body).await?;
        self.build_result(response)
    }

    /// Normalizes a parsed body: success is a JSON object without an `error`
    /// member. Any other top-level value is an `InvalidResponse`.
    fn build_result(&self, response: Value) -> Result<OperationResult> {
        let test = self.config.is_test();

        let Some(object) = response.as_object() else {
            return Err(KomojuError::InvalidResponse(format!(
                "response body is not an object: {}",
                response
            )));
        };

        let error = match object.get("error") {
            None => {
                let authorization = object.get("id").and_then(|id| match id {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                });
                return Ok(OperationResult {
                    success: true,
                    message: SUCCESS_MESSAGE.to_string(),
                    params: response,
                    test,
                    error_code: None,
                    authorization,
                });
            }
            Some(error) => ProviderError::deserialize_from(error)?,
        };

        let error_code = error
            .code
            .as_deref()
            .map(|code| normalize_error_code(code).to_string());

        #[cfg(feature = "tracing")]
        tracing::warn!(
            code = ?error.code,
            normalized = ?error_code,
            "komoju rejected request"
        );

        Ok(OperationResult {
            success: false,
            message: error.message.unwrap_or_default(),
            params: response,
            test,
            error_code,
            authorization: None,
        })
    }
}

impl ProviderError {
    fn deserialize_from(error: &Value) -> Result<Self> {
        if !error.is_object() {
            return Err(KomojuError::InvalidResponse(format!(
                "error member is not an object: {}",
                error
            )));
        }
        Ok(serde_json::from_value(error.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RawResponse;
    use crate::types::CreditCard;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers every request with a fixed response and records what was sent.
    struct StubTransport {
        response: RawResponse,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: RawResponse::new(status, body),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> ApiRequest {
            self.requests.lock().unwrap().last().cloned().expect("no request sent")
        }

        fn last_body(&self) -> Value {
            serde_json::from_str(&self.last().body).unwrap()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    fn gateway(stub: &Arc<StubTransport>) -> KomojuGateway {
        KomojuGateway::with_transport(GatewayConfig::new("sk_test").sandbox(), stub.clone())
            .unwrap()
    }

    fn card() -> PaymentInstrument {
        CreditCard::new("4242424242424242", 12, 2030, "123", "Jane", "Doe").into()
    }

    #[test]
    fn test_config_defaults_and_builders() {
        let config = GatewayConfig::new("sk_test");
        assert_eq!(config.base_url(), "https://komoju.com/api/v1");
        assert!(!config.is_test());

        let config = config
            .sandbox()
            .with_default_currency("USD")
            .with_timeout_message("Zeitüberschreitung");
        assert_eq!(config.base_url(), "https://sandbox.komoju.com/api/v1");
        assert!(config.is_test());
        assert_eq!(config.default_currency, "USD");
        assert_eq!(config.timeout_message, "Zeitüberschreitung");

        let config = config.with_base_url("http://127.0.0.1:8080");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_debug_hides_login() {
        let config = GatewayConfig::new("sk_live_secret");
        assert!(!format!("{:?}", config).contains("sk_live_secret"));
    }

    #[test]
    fn test_empty_login_is_rejected() {
        let result = KomojuGateway::new(GatewayConfig::new(""));
        assert!(matches!(result, Err(KomojuError::MissingField(_))));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = KomojuGateway::new(GatewayConfig::new("sk").with_base_url("not a url"));
        assert!(matches!(result, Err(KomojuError::UrlParseError(_))));

        let config = GatewayConfig::new("sk").with_base_url("mailto:ops@example.com");
        let result = KomojuGateway::new(config);
        assert!(matches!(result, Err(KomojuError::ConfigError(_))));
    }

    #[test]
    fn test_gateway_metadata() {
        let stub = StubTransport::new(200, "{}");
        let gateway = gateway(&stub);
        assert!(gateway.supports_country("JP"));
        assert!(gateway.supports_country("jp"));
        assert!(!gateway.supports_country("US"));
        assert_eq!(gateway.supported_card_types().len(), 4);
    }

    #[tokio::test]
    async fn test_purchase_request() {
        let stub = StubTransport::new(200, r#"{"id":"pay_1","status":"captured"}"#);
        let result = gateway(&stub)
            .purchase(1000, &card(), &PaymentOptions::new().with_currency("JPY"))
            .await
            .unwrap();

        let request = stub.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://sandbox.komoju.com/api/v1/payments");
        assert_eq!(
            stub.last_body(),
            json!({
                "amount": 1000,
                "currency": "JPY",
                "payment_details": {
                    "type": "credit_card",
                    "number": "4242424242424242",
                    "month": 12,
                    "year": 2030,
                    "verification_value": "123",
                    "given_name": "Jane",
                    "family_name": "Doe"
                }
            })
        );

        assert!(result.success);
        assert!(result.test);
        assert_eq!(result.message, "Transaction succeeded");
        assert_eq!(result.authorization.as_deref(), Some("pay_1"));
        assert!(result.error_code.is_none());
        assert_eq!(result.params["status"], "captured");
    }

    #[tokio::test]
    async fn test_purchase_uses_default_currency() {
        let stub = StubTransport::new(200, r#"{"id":"pay_1"}"#);
        let gateway = KomojuGateway::with_transport(
            GatewayConfig::new("sk_test").with_default_currency("USD"),
            stub.clone(),
        )
        .unwrap();
        gateway
            .purchase(100, &"tok_abc".into(), &PaymentOptions::new())
            .await
            .unwrap();
        assert_eq!(stub.last_body()["currency"], "USD");
        assert_eq!(stub.last_body()["payment_details"], "tok_abc");
        assert_eq!(stub.last().url, "https://komoju.com/api/v1/payments");
    }

    #[tokio::test]
    async fn test_headers() {
        let stub = StubTransport::new(200, "{}");
        gateway(&stub)
            .purchase(100, &"cus_1".into(), &PaymentOptions::new())
            .await
            .unwrap();
        let headers = stub.last().headers;
        assert_eq!(headers[AUTHORIZATION], "Basic c2tfdGVzdDo=");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert!(headers[USER_AGENT].to_str().unwrap().starts_with("Komoju/v1"));
    }

    #[tokio::test]
    async fn test_declined_purchase() {
        let stub = StubTransport::new(
            200,
            r#"{"error":{"code":"card_declined","message":"Card was declined"}}"#,
        );
        let result = gateway(&stub)
            .purchase(1000, &card(), &PaymentOptions::new())
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "Card was declined");
        assert_eq!(result.error_code.as_deref(), Some("card_declined"));
        assert!(result.authorization.is_none());
    }

    #[tokio::test]
    async fn test_error_code_normalization_on_non_2xx() {
        let stub = StubTransport::new(
            422,
            r#"{"error":{"code":"bad_verification_value","message":"CVC is wrong"}}"#,
        );
        let result = gateway(&stub)
            .purchase(1000, &card(), &PaymentOptions::new())
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.error_code.as_deref(), Some("incorrect_cvc"));
        assert_eq!(result.message, "CVC is wrong");
    }

    #[tokio::test]
    async fn test_unmapped_error_code_passes_through() {
        let stub = StubTransport::new(
            404,
            r#"{"error":{"code":"not_found","message":"Payment not found"}}"#,
        );
        let result = gateway(&stub)
            .refund(100, "pay_missing", &PaymentOptions::new())
            .await
            .unwrap();
        assert_eq!(result.error_code.as_deref(), Some("not_found"));
    }

    #[tokio::test]
    async fn test_gateway_timeout_is_synthesized() {
        let stub = StubTransport::new(504, "<html>Gateway Timeout</html>");
        let gateway = KomojuGateway::with_transport(
            GatewayConfig::new("sk_test").with_timeout_message("決済処理に失敗しました"),
            stub.clone(),
        )
        .unwrap();
        let result = gateway
            .purchase(1000, &card(), &PaymentOptions::new())
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.error_code.as_deref(), Some("gateway_timeout"));
        assert_eq!(result.message, "決済処理に失敗しました");
        assert_eq!(result.params["error"]["code"], "gateway_timeout");
    }

    #[tokio::test]
    async fn test_malformed_error_body_is_a_parse_failure() {
        let stub = StubTransport::new(500, "<html>Internal Server Error</html>");
        let result = gateway(&stub)
            .purchase(1000, &card(), &PaymentOptions::new())
            .await;
        assert!(matches!(result, Err(KomojuError::JsonError(_))));
    }

    #[tokio::test]
    async fn test_non_object_error_member() {
        let stub = StubTransport::new(400, r#"{"error":"bad request"}"#);
        let result = gateway(&stub)
            .purchase(1000, &card(), &PaymentOptions::new())
            .await;
        assert!(matches!(result, Err(KomojuError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_non_object_body_is_never_a_success() {
        let cases = [
            (200, "null"),
            (503, "null"),
            (200, "[]"),
            (500, "[]"),
            (201, r#""ok""#),
            (502, r#""Service Unavailable""#),
            (200, "42"),
        ];
        for (status, body) in cases {
            let stub = StubTransport::new(status, body);
            let result = gateway(&stub)
                .purchase(100, &"tok_1".into(), &PaymentOptions::new())
                .await;
            assert!(
                matches!(result, Err(KomojuError::InvalidResponse(_))),
                "status {} body {} gave {:?}",
                status,
                body,
                result
            );
        }
    }

    #[tokio::test]
    async fn test_null_error_code_is_a_failure_without_code() {
        let stub = StubTransport::new(400, r#"{"error":{"code":null,"message":"Invalid"}}"#);
        let result = gateway(&stub)
            .purchase(100, &"tok_1".into(), &PaymentOptions::new())
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error_code.is_none());
        assert_eq!(result.message, "Invalid");
        assert!(result.authorization.is_none());
    }

    #[tokio::test]
    async fn test_null_error_message_is_a_failure_with_empty_message() {
        let stub = StubTransport::new(
            200,
            r#"{"error":{"code":"bad_verification_value","message":null}}"#,
        );
        let result = gateway(&stub)
            .purchase(100, &"tok_1".into(), &PaymentOptions::new())
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.error_code.as_deref(), Some("incorrect_cvc"));
        assert_eq!(result.message, "");
    }

    #[tokio::test]
    async fn test_empty_error_object_is_a_failure() {
        let stub = StubTransport::new(422, r#"{"error":{}}"#);
        let result = gateway(&stub)
            .refund(100, "pay_1", &PaymentOptions::new())
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error_code.is_none());
        assert_eq!(result.message, "");
    }

    #[tokio::test]
    async fn test_refund_request() {
        let stub = StubTransport::new(200, r#"{"id":"pay_1","status":"refunded"}"#);
        let result = gateway(&stub)
            .refund(400, "pay_1", &PaymentOptions::new())
            .await
            .unwrap();
        let request = stub.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://sandbox.komoju.com/api/v1/payments/pay_1/refund");
        assert_eq!(stub.last_body(), json!({"amount": 400}));
        assert_eq!(result.authorization.as_deref(), Some("pay_1"));
    }

    #[tokio::test]
    async fn test_void_matches_zero_refund() {
        let stub = StubTransport::new(200, r#"{"id":"pay_1","status":"cancelled"}"#);
        let gateway = gateway(&stub);

        gateway.void("pay_1", &PaymentOptions::new()).await.unwrap();
        let void = stub.last();
        gateway.refund(0, "pay_1", &PaymentOptions::new()).await.unwrap();
        let refund = stub.last();

        assert_eq!(void.method, refund.method);
        assert_eq!(void.url, refund.url);
        assert_eq!(void.body, refund.body);
    }

    #[tokio::test]
    async fn test_identifier_is_percent_encoded() {
        let stub = StubTransport::new(200, "{}");
        gateway(&stub)
            .refund(1, "pay/../tokens", &PaymentOptions::new())
            .await
            .unwrap();
        assert_eq!(
            stub.last().url,
            "https://sandbox.komoju.com/api/v1/payments/pay%2F..%2Ftokens/refund"
        );
    }

    #[tokio::test]
    async fn test_store_token() {
        let stub = StubTransport::new(200, r#"{"id":"tok_new"}"#);
        let result = gateway(&stub)
            .store(&card(), &PaymentOptions::new().with_email("jane@example.com"))
            .await
            .unwrap();
        assert_eq!(stub.last().url, "https://sandbox.komoju.com/api/v1/tokens");
        let body = stub.last_body();
        assert_eq!(body["payment_details"]["email"], "jane@example.com");
        assert!(body.get("email").is_none());
        assert_eq!(result.authorization.as_deref(), Some("tok_new"));
    }

    #[tokio::test]
    async fn test_store_customer_profile() {
        let stub = StubTransport::new(200, r#"{"id":"cus_new"}"#);
        let options = PaymentOptions::new()
            .with_email("jane@example.com")
            .with_customer_profile();
        let result = gateway(&stub).store(&"tok_abc".into(), &options).await.unwrap();
        assert_eq!(stub.last().url, "https://sandbox.komoju.com/api/v1/customers");
        assert_eq!(
            stub.last_body(),
            json!({"payment_details": "tok_abc", "email": "jane@example.com"})
        );
        assert_eq!(result.authorization.as_deref(), Some("cus_new"));
    }

    #[tokio::test]
    async fn test_continue_payment() {
        let stub = StubTransport::new(200, r#"{"id":"pay_pending","status":"authorized"}"#);
        let details = json!({"type": "konbini", "store": "lawson", "email": "a@example.com"});
        let result = gateway(&stub)
            .continue_payment("pay_pending", details.clone())
            .await
            .unwrap();
        let request = stub.last();
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.url, "https://sandbox.komoju.com/api/v1/payments/pay_pending");
        assert_eq!(stub.last_body(), json!({"payment_details": details}));
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_production_results_are_not_test() {
        let stub = StubTransport::new(200, r#"{"id":"pay_1"}"#);
        let gateway =
            KomojuGateway::with_transport(GatewayConfig::new("sk_live"), stub.clone()).unwrap();
        let result = gateway
            .purchase(1, &"tok_1".into(), &PaymentOptions::new())
            .await
            .unwrap();
        assert!(!result.test);
    }
}
