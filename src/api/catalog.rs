//! Plan catalog: a JSON array of plans, stored locally or served over HTTP.

use std::{
    convert::Infallible,
    fmt::{Display, Formatter},
    path::PathBuf,
    str::FromStr,
};

use async_trait::async_trait;
use reqwest::Url;

use crate::{api::client, core::plan::Plan, prelude::*};

#[async_trait]
pub trait PlanSource: Send + Sync {
    async fn fetch_plans(&self) -> Result<Vec<Plan>>;
}

/// Where to get the catalog from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Catalog {
    File(PathBuf),
    Remote(Url),
}

impl FromStr for Catalog {
    type Err = Infallible;

    /// `http(s)` URLs are fetched, anything else is a path.
    fn from_str(location: &str) -> Result<Self, Self::Err> {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Remote(url)),
            _ => Ok(Self::File(PathBuf::from(location))),
        }
    }
}

impl Display for Catalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

#[async_trait]
impl PlanSource for Catalog {
    #[instrument(skip_all, fields(catalog = %self))]
    async fn fetch_plans(&self) -> Result<Vec<Plan>> {
        info!("fetching the plans…");
        let plans = match self {
            Self::File(path) => {
                let contents = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("failed to read `{}`", path.display()))?;
                serde_json::from_slice::<Vec<Plan>>(&contents)
                    .context("failed to deserialize the plans")?
            }
            Self::Remote(url) => client::try_new()?
                .get(url.clone())
                .send()
                .await
                .context("failed to call")?
                .error_for_status()
                .context("request failed")?
                .json::<Vec<Plan>>()
                .await
                .context("failed to deserialize the plans")?,
        };
        info!(n_plans = plans.len(), "fetched");
        Ok(plans)
    }
}
