use layout_blocks_core::{
    async_trait,
    driver::{operation::Operation, Driver, Response},
    err, Error, Result,
};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Driver for the host's REST API.
///
/// Requests are issued with `ureq` on tokio's blocking pool. A static access
/// token, when configured, is sent as a bearer token.
#[derive(Debug, Clone)]
pub struct Http {
    base: Url,
    access_token: Option<String>,
    agent: ureq::Agent,
}

impl Http {
    /// Connects to `http(s)://host[:port][/base]`. An `access_token` query
    /// parameter is lifted out of the URL and used for authentication.
    pub fn connect(url: &str) -> Result<Http> {
        let mut base = Url::parse(url).map_err(|e| err!("invalid host URL `{url}`: {e}"))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(err!(
                "host URL does not have an `http` or `https` scheme; url={url}"
            ));
        }

        let access_token = base
            .query_pairs()
            .find(|(key, _)| key == "access_token")
            .map(|(_, value)| value.into_owned());
        base.set_query(None);

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();

        Ok(Http {
            base,
            access_token,
            agent,
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Http {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, op: &Operation) -> Result<Url> {
        let root = self.base.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{root}{}", op.path()))
            .map_err(|e| err!("invalid endpoint for `{op}`: {e}"))?;

        let params = op.params();
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &params {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl Driver for Http {
    async fn exec(&self, op: Operation) -> Result<Response> {
        let url = self.endpoint(&op)?;
        let mut request = self.agent.request_url(op.method().as_str(), &url);
        if let Some(token) = &self.access_token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let body = op.body().map(Value::to_string);
        let collection = op.collection().map(String::from);

        tracing::trace!(%op, "sending request");

        let result = tokio::task::spawn_blocking(move || send(request, body))
            .await
            .map_err(|e| Error::remote(None, format!("request task failed: {e}")))?;

        match result {
            Ok(body) => Response::from_body(&body),
            Err((status, message)) => {
                tracing::trace!(%op, ?status, %message, "request failed");
                Err(match collection {
                    Some(collection) => Error::remote_for(collection, status, message),
                    None => Error::remote(status, message),
                })
            }
        }
    }
}

fn send(
    request: ureq::Request,
    body: Option<String>,
) -> std::result::Result<String, (Option<u16>, String)> {
    let response = match body {
        Some(body) => request
            .set("Content-Type", "application/json")
            .send_string(&body),
        None => request.call(),
    };

    match response {
        Ok(response) => response
            .into_string()
            .map_err(|e| (None, format!("failed to read response body: {e}"))),
        Err(ureq::Error::Status(status, response)) => {
            let text = response.status_text().to_string();
            let body = response.into_string().unwrap_or_default();
            Err((Some(status), error_message(&body).unwrap_or(text)))
        }
        Err(ureq::Error::Transport(transport)) => Err((None, transport.to_string())),
    }
}

/// First message of the host's `{ "errors": [{ "message": .. }] }` body.
fn error_message(body: &str) -> Option<String> {
    let body: Value = serde_json::from_str(body).ok()?;
    body.get("errors")?
        .get(0)?
        .get("message")?
        .as_str()
        .map(String::from)
}
