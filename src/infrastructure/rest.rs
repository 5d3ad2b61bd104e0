//! Hosted table store spoken to over its REST interface.

use reqwest::blocking::{Client, RequestBuilder, Response};

use super::config::RemoteConfig;
use super::persistence::{BouquetGateway, GatewayError, GatewayResult};
use crate::domain::{BouquetId, NewBouquet, StoredBouquet};

pub struct RestGateway {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RestGateway {
    pub fn new(config: &RemoteConfig) -> GatewayResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: table_endpoint(&config.url, &config.table),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn rows(response: Response) -> GatewayResult<Vec<StoredBouquet>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json()?)
    }
}

impl BouquetGateway for RestGateway {
    fn create(&self, bouquet: &NewBouquet<'_>) -> GatewayResult<StoredBouquet> {
        let request = self
            .authorized(self.client.post(&self.endpoint))
            .header("Prefer", "return=representation")
            .json(&[bouquet]);
        let rows = Self::rows(request.send()?)?;
        let stored = rows.into_iter().next().ok_or(GatewayError::EmptyInsert)?;
        tracing::debug!(id = stored.id, "bouquet inserted into hosted store");
        Ok(stored)
    }

    fn get_by_id(&self, id: BouquetId) -> GatewayResult<Option<StoredBouquet>> {
        let request = self
            .authorized(self.client.get(&self.endpoint))
            .query(&lookup_query(id));
        Ok(Self::rows(request.send()?)?.into_iter().next())
    }

    fn list_all(&self) -> GatewayResult<Vec<StoredBouquet>> {
        let request = self
            .authorized(self.client.get(&self.endpoint))
            .query(&[("select", "*"), ("order", "id.desc")]);
        Self::rows(request.send()?)
    }
}

fn table_endpoint(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
}

fn lookup_query(id: BouquetId) -> [(&'static str, String); 2] {
    [("id", format!("eq.{id}")), ("select", "*".to_string())]
}
