use std::fmt;

use async_trait::async_trait;
#[cfg(feature = "gcp-authorizer")]
use std::sync::Arc;
use tonic::metadata::MetadataValue;
use tonic::Request;
#[cfg(feature = "tls")]
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

#[cfg(feature = "tls")]
use crate::proto::monitoring::v3::metric_service_client::MetricServiceClient;
use crate::proto::{
    api::MetricDescriptor,
    monitoring::v3::{CreateMetricDescriptorRequest, CreateTimeSeriesRequest},
};
use crate::Error;

#[cfg(feature = "tls")]
const MONITORING_ENDPOINT: &str = "https://monitoring.googleapis.com:443";
const MONITORING: &str = "https://www.googleapis.com/auth/monitoring";
const MONITORING_WRITE: &str = "https://www.googleapis.com/auth/monitoring.write";

/// The Cloud Monitoring calls made by the exporter.
///
/// Implementations report rejected calls as [`Error::Rpc`] carrying the
/// backend's status message, which is used to count dropped time series.
#[async_trait]
pub trait MetricClient: Send + Sync + 'static {
    async fn create_metric_descriptor(
        &self,
        request: CreateMetricDescriptorRequest,
    ) -> Result<MetricDescriptor, Error>;

    async fn create_time_series(&self, request: CreateTimeSeriesRequest) -> Result<(), Error>;

    /// Writes time series of Google Cloud service metrics, such as
    /// `kubernetes.io/` metrics.
    async fn create_service_time_series(
        &self,
        request: CreateTimeSeriesRequest,
    ) -> Result<(), Error>;
}

/// Decorates outgoing requests with credentials.
#[async_trait]
pub trait Authorizer: Sync + Send + 'static {
    type Error: std::error::Error + fmt::Debug + Send + Sync + 'static;

    fn project_id(&self) -> &str;
    async fn authorize<T: Send + Sync>(
        &self,
        request: &mut Request<T>,
        scopes: &[&str],
    ) -> Result<(), Self::Error>;
}

/// A [`MetricClient`] talking gRPC to `monitoring.googleapis.com`.
#[cfg(feature = "tls")]
pub struct GcmClient<A> {
    client: MetricServiceClient<Channel>,
    authorizer: A,
}

#[cfg(feature = "tls")]
impl<A: Authorizer> GcmClient<A> {
    pub async fn connect(authorizer: A, user_agent: &str) -> Result<Self, Error> {
        let channel = Endpoint::from_static(MONITORING_ENDPOINT)
            .user_agent(user_agent.to_owned())
            .map_err(|e| Error::Transport(e.into()))?
            .tls_config(ClientTlsConfig::new().with_webpki_roots())
            .map_err(|e| Error::Transport(e.into()))?
            .connect()
            .await
            .map_err(|e| Error::Transport(e.into()))?;

        Ok(GcmClient {
            client: MetricServiceClient::new(channel),
            authorizer,
        })
    }

    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    async fn request<T: Send + Sync>(&self, message: T, scope: &str) -> Result<Request<T>, Error> {
        let mut request = Request::new(message);
        self.authorizer
            .authorize(&mut request, &[scope])
            .await
            .map_err(|e| Error::Authorizer(e.into()))?;
        Ok(request)
    }
}

#[cfg(feature = "tls")]
#[async_trait]
impl<A: Authorizer> MetricClient for GcmClient<A> {
    async fn create_metric_descriptor(
        &self,
        request: CreateMetricDescriptorRequest,
    ) -> Result<MetricDescriptor, Error> {
        let request = self.request(request, MONITORING).await?;
        let response = self.client.clone().create_metric_descriptor(request).await?;
        Ok(response.into_inner())
    }

    async fn create_time_series(&self, request: CreateTimeSeriesRequest) -> Result<(), Error> {
        let request = self.request(request, MONITORING_WRITE).await?;
        self.client.clone().create_time_series(request).await?;
        Ok(())
    }

    async fn create_service_time_series(
        &self,
        request: CreateTimeSeriesRequest,
    ) -> Result<(), Error> {
        let request = self.request(request, MONITORING_WRITE).await?;
        self.client
            .clone()
            .create_service_time_series(request)
            .await?;
        Ok(())
    }
}

#[cfg(feature = "tls")]
impl<A> fmt::Debug for GcmClient<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcmClient")
            .field("client", &"(elided)")
            .field("authorizer", &"(elided)")
            .finish()
    }
}

/// An [`Authorizer`] using Google application default credentials.
#[cfg(feature = "gcp-authorizer")]
pub struct GcpAuthorizer {
    provider: Arc<dyn gcp_auth::TokenProvider>,
    project_id: Arc<str>,
}

#[cfg(feature = "gcp-authorizer")]
impl GcpAuthorizer {
    pub async fn new() -> Result<Self, Error> {
        let provider = gcp_auth::provider()
            .await
            .map_err(|e| Error::Authorizer(e.into()))?;

        let project_id = provider
            .project_id()
            .await
            .map_err(|e| Error::Authorizer(e.into()))?;

        Ok(Self {
            provider,
            project_id,
        })
    }
}

#[cfg(feature = "gcp-authorizer")]
#[async_trait]
impl Authorizer for GcpAuthorizer {
    type Error = Error;

    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn authorize<T: Send + Sync>(
        &self,
        req: &mut Request<T>,
        scopes: &[&str],
    ) -> Result<(), Self::Error> {
        let token = self
            .provider
            .token(scopes)
            .await
            .map_err(|e| Error::Authorizer(e.into()))?;

        let value = MetadataValue::try_from(format!("Bearer {}", token.as_str()))
            .map_err(|e| Error::Authorizer(e.into()))?;
        req.metadata_mut().insert("authorization", value);

        Ok(())
    }
}

#[cfg(feature = "gcp-authorizer")]
impl fmt::Debug for GcpAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcpAuthorizer")
            .field("provider", &"(elided)")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// An [`Authorizer`] for a fixed bearer token, or none at all.
#[derive(Clone)]
pub struct StaticAuthorizer {
    project_id: String,
    token: Option<String>,
}

impl StaticAuthorizer {
    pub fn new(project_id: impl Into<String>, token: Option<String>) -> Self {
        StaticAuthorizer {
            project_id: project_id.into(),
            token,
        }
    }
}

#[async_trait]
impl Authorizer for StaticAuthorizer {
    type Error = Error;

    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn authorize<T: Send + Sync>(
        &self,
        req: &mut Request<T>,
        _scopes: &[&str],
    ) -> Result<(), Self::Error> {
        if let Some(token) = &self.token {
            let value = MetadataValue::try_from(format!("Bearer {token}"))
                .map_err(|e| Error::Authorizer(e.into()))?;
            req.metadata_mut().insert("authorization", value);
        }
        Ok(())
    }
}

impl fmt::Debug for StaticAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAuthorizer")
            .field("project_id", &self.project_id)
            .field("token", &self.token.as_ref().map(|_| "(elided)"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_authorizer_sets_bearer_token() {
        let authorizer = StaticAuthorizer::new("my-project", Some("secret".into()));
        let mut request = Request::new(());
        authorizer
            .authorize(&mut request, &[MONITORING_WRITE])
            .await
            .unwrap();
        assert_eq!(
            request
                .metadata()
                .get("authorization")
                .unwrap()
                .to_str()
                .unwrap(),
            "Bearer secret"
        );
        assert_eq!(authorizer.project_id(), "my-project");
    }

    #[tokio::test]
    async fn static_authorizer_without_token() {
        let authorizer = StaticAuthorizer::new("my-project", None);
        let mut request = Request::new(());
        authorizer.authorize(&mut request, &[MONITORING]).await.unwrap();
        assert!(request.metadata().get("authorization").is_none());
    }
}
