//! Forward and reverse geocoding against a Nominatim-compatible service.
//!
//! Responses are returned as raw JSON so the API can pass them through
//! verbatim.

/// Errors from the geocoding client.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream service returned a non-2xx status code.
    #[error("Geocoding service returned {status}")]
    Upstream { status: u16, body: String },
}

/// HTTP client for a geocoding service.
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    contact_email: Option<String>,
}

impl Geocoder {
    /// * `user_agent` - Sent on every request; public instances require it.
    /// * `contact_email` - Sent as the `From` header when set.
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        user_agent: String,
        contact_email: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
            contact_email,
        }
    }

    /// `GET /search?format=json&q=..&limit=..&addressdetails=1`
    pub async fn search(&self, query: &str, limit: u32) -> Result<serde_json::Value, GeocodeError> {
        let limit = limit.to_string();
        self.get(
            "/search",
            &[
                ("format", "json"),
                ("q", query),
                ("limit", &limit),
                ("addressdetails", "1"),
            ],
        )
        .await
    }

    /// `GET /reverse?format=json&lat=..&lon=..`
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<serde_json::Value, GeocodeError> {
        let (lat, lon) = (lat.to_string(), lon.to_string());
        self.get("/reverse", &[("format", "json"), ("lat", &lat), ("lon", &lon)])
            .await
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, GeocodeError> {
        let mut request = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(params)
            .header(reqwest::header::USER_AGENT, &self.user_agent);
        if let Some(email) = &self.contact_email {
            request = request.header(reqwest::header::FROM, email);
        }

        tracing::debug!(path, "Geocoding request");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeocodeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<serde_json::Value>().await?)
    }
}
