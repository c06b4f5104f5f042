//! Operations context for dependency injection

use gh2npm_config::RunConfig;
use gh2npm_errors::Error;
use gh2npm_events::EventSender;
use gh2npm_github::GithubClient;
use gh2npm_net::NetClient;

/// Operations context providing access to all pipeline components
#[derive(Debug)]
pub struct OpsCtx {
    /// Per-run configuration
    pub config: RunConfig,
    /// Network client used for asset downloads
    pub net: NetClient,
    /// Release API client
    pub github: GithubClient,
    /// Event sender for progress reporting
    pub tx: EventSender,
}

/// Builder for the operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    config: Option<RunConfig>,
    net: Option<NetClient>,
    github: Option<GithubClient>,
    tx: Option<EventSender>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set run configuration
    #[must_use]
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    /// Set release API client
    #[must_use]
    pub fn with_github(mut self, github: GithubClient) -> Self {
        self.github = Some(github);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let config = self
            .config
            .ok_or_else(|| Error::internal("missing component: config"))?;
        let net = self
            .net
            .ok_or_else(|| Error::internal("missing component: net"))?;
        let github = self
            .github
            .ok_or_else(|| Error::internal("missing component: github"))?;
        let tx = self
            .tx
            .ok_or_else(|| Error::internal("missing component: event_sender"))?;

        Ok(OpsCtx {
            config,
            net,
            github,
            tx,
        })
    }
}
