//! REST access to the bus booking backend.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{CityId, UserId},
    error::ApiError,
    protocol::{
        AddStopsRequest, BusListResponse, CityListResponse, CityLookupResponse, CreateBusRequest,
        CreateCityRequest, UserListResponse, UserLookupResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::{config::parse_base_url, error::ClientError, listing::ListingQuery};

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_buses(&self, query: &ListingQuery) -> Result<BusListResponse, ClientError>;
    async fn list_cities(&self, query: &ListingQuery) -> Result<CityListResponse, ClientError>;
    async fn list_users(&self, query: &ListingQuery) -> Result<UserListResponse, ClientError>;
    async fn fetch_user(&self, user_id: &UserId) -> Result<UserLookupResponse, ClientError>;
    async fn fetch_city(&self, city_id: &CityId) -> Result<CityLookupResponse, ClientError>;
    async fn create_bus(&self, request: &CreateBusRequest) -> Result<(), ClientError>;
    async fn create_city(&self, request: &CreateCityRequest) -> Result<(), ClientError>;
    async fn add_stops(&self, pincode: &str, request: &AddStopsRequest)
        -> Result<(), ClientError>;
    async fn delete_stop(&self, pincode: &str, stop_id: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpAdminApi {
    http: Client,
    base_url: Url,
}

impl HttpAdminApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn from_base_url(raw: &str) -> Result<Self, ClientError> {
        parse_base_url(raw).map(Self::new)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ClientError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: "url cannot carry a path".to_string(),
                })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        let endpoint = url.path().to_string();
        let body = self.execute(self.http.get(url).query(query), &endpoint).await?;
        serde_json::from_slice(&body).map_err(|err| ClientError::malformed(endpoint, err))
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<Vec<u8>, ClientError> {
        debug!(endpoint, "sending api request");
        let response = request
            .send()
            .await
            .map_err(|err| ClientError::transport(endpoint, err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ClientError::transport(endpoint, err))?;
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status,
                message: ApiError::from_body(&body).map(|err| err.message),
            });
        }
        Ok(body.to_vec())
    }

    async fn execute_unit(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<(), ClientError> {
        self.execute(request, endpoint).await.map(|_| ())
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn list_buses(&self, query: &ListingQuery) -> Result<BusListResponse, ClientError> {
        self.get_json(&["api", "bus", "list"], &query.to_query_pairs())
            .await
    }

    async fn list_cities(&self, query: &ListingQuery) -> Result<CityListResponse, ClientError> {
        self.get_json(&["api", "cities", "list"], &query.to_query_pairs())
            .await
    }

    async fn list_users(&self, query: &ListingQuery) -> Result<UserListResponse, ClientError> {
        self.get_json(&["api", "users"], &query.to_query_pairs())
            .await
    }

    async fn fetch_user(&self, user_id: &UserId) -> Result<UserLookupResponse, ClientError> {
        self.get_json(&["api", "users", user_id.as_str()], &[]).await
    }

    async fn fetch_city(&self, city_id: &CityId) -> Result<CityLookupResponse, ClientError> {
        self.get_json(&["api", "cities", "city", city_id.as_str()], &[])
            .await
    }

    async fn create_bus(&self, request: &CreateBusRequest) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "bus", "add"])?;
        let endpoint = url.path().to_string();
        self.execute_unit(self.http.post(url).json(request), &endpoint)
            .await
    }

    async fn create_city(&self, request: &CreateCityRequest) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "cities", "create"])?;
        let endpoint = url.path().to_string();
        self.execute_unit(self.http.post(url).json(request), &endpoint)
            .await
    }

    async fn add_stops(
        &self,
        pincode: &str,
        request: &AddStopsRequest,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "cities", "add-stops", pincode])?;
        let endpoint = url.path().to_string();
        self.execute_unit(self.http.patch(url).json(request), &endpoint)
            .await
    }

    async fn delete_stop(&self, pincode: &str, stop_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "cities", "delete-stop", pincode, stop_id])?;
        let endpoint = url.path().to_string();
        self.execute_unit(self.http.delete(url), &endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments_and_keeps_base_path() {
        let api = HttpAdminApi::from_base_url("http://localhost:5000/backend/").expect("api");
        let url = api
            .endpoint(&["api", "cities", "delete-stop", "282001", "taj mahal"])
            .expect("endpoint");
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/backend/api/cities/delete-stop/282001/taj%20mahal"
        );

        let api = HttpAdminApi::from_base_url("http://localhost:5000").expect("api");
        let url = api.endpoint(&["api", "users", "O1"]).expect("endpoint");
        assert_eq!(url.as_str(), "http://localhost:5000/api/users/O1");
    }
}
