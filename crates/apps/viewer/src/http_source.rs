//! HTTP implementation of the catalog source against the monitoring API.

use catalog::mineplan::MinePlan;
use catalog::records::{Event, Ray, ScatterSample, Site, StationPage};
use catalog::source::{CatalogSource, EventQuery, SourceError};
use serde::de::DeserializeOwned;

pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    site: Option<String>,
    network: Option<String>,
}

impl HttpCatalogSource {
    pub fn new(
        base_url: String,
        auth_token: Option<String>,
        site: Option<String>,
        network: Option<String>,
    ) -> Self {
        HttpCatalogSource {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            site,
            network,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn scope_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(site) = &self.site {
            params.push(("site", site.clone()));
        }
        if let Some(network) = &self.network {
            params.push(("network", network.clone()));
        }
        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let mut request = self.client.get(url).query(params);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}

impl CatalogSource for HttpCatalogSource {
    async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Event>, SourceError> {
        let mut params = self.scope_params();
        params.push(("start_time", query.start_time.clone()));
        params.push(("end_time", query.end_time.clone()));
        params.push(("status", query.status.clone()));
        self.get_json(&self.url("v1/catalog"), &params).await
    }

    async fn fetch_mine_plans(&self) -> Result<Vec<MinePlan>, SourceError> {
        self.get_json(&self.url("v1/mineplan"), &self.scope_params())
            .await
    }

    async fn fetch_stations_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<StationPage, SourceError> {
        // Follow-up pages come back as absolute URLs.
        match cursor {
            Some(next) => self.get_json(next, &[]).await,
            None => {
                self.get_json(&self.url("v1/inventory/stations"), &self.scope_params())
                    .await
            }
        }
    }

    async fn fetch_rays(&self, event_resource_id: &str) -> Result<Vec<Ray>, SourceError> {
        let mut params = self.scope_params();
        params.push(("event_id", event_resource_id.to_string()));
        self.get_json(&self.url("v1/rays"), &params).await
    }

    async fn fetch_scatters(
        &self,
        event_resource_id: &str,
    ) -> Result<Vec<ScatterSample>, SourceError> {
        let mut params = self.scope_params();
        params.push(("event_id", event_resource_id.to_string()));
        self.get_json(&self.url("v1/scatters"), &params).await
    }

    async fn fetch_sites(&self) -> Result<Vec<Site>, SourceError> {
        self.get_json(&self.url("v1/sites"), &[]).await
    }
}
