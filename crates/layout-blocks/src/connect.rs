use crate::{Driver, Result};

use layout_blocks_core::{
    async_trait,
    driver::{Operation, Response},
    err,
};
use url::Url;

/// A host connection chosen by URL scheme, wrapping the matching driver.
///
/// `http://` and `https://` reach a live host; `memory://` opens an empty
/// in-process host. Each needs its driver's cargo feature.
#[derive(Debug)]
pub struct Connect {
    url: Url,
    driver: Box<dyn Driver>,
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| err!("invalid host URL `{url}`: {e}"))?;

        let driver = match parsed.scheme() {
            "http" | "https" => connect_http(url)?,
            "memory" => connect_memory(url)?,
            scheme => return Err(err!("unsupported host; scheme={scheme}; url={url}")),
        };

        Ok(Self {
            url: parsed,
            driver,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Driver for Connect {
    async fn exec(&self, op: Operation) -> Result<Response> {
        self.driver.exec(op).await
    }
}

#[cfg(feature = "http")]
fn connect_http(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(layout_blocks_driver_http::Http::connect(url)?))
}

#[cfg(not(feature = "http"))]
fn connect_http(_url: &str) -> Result<Box<dyn Driver>> {
    Err(err!("`http` feature not enabled"))
}

#[cfg(feature = "memory")]
fn connect_memory(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(layout_blocks_driver_memory::Memory::connect(url)?))
}

#[cfg(not(feature = "memory"))]
fn connect_memory(_url: &str) -> Result<Box<dyn Driver>> {
    Err(err!("`memory` feature not enabled"))
}
