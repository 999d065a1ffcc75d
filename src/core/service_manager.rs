use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
#[error("{0}")]
pub struct Error(String);

impl Error {
    pub fn new(s: &str) -> Error {
        Error(s.to_string())
    }

    pub fn from<E: std::error::Error>(e: E) -> Self {
        Self(e.to_string())
    }
}

/// A long-running channel. `new` failing is fatal; `run` failing restarts it.
#[async_trait]
pub trait Service: Sized {
    type Context: Clone + Send;
    const NAME: &'static str;
    async fn new(context: Self::Context) -> Result<Self, Error>;
    async fn run(self) -> Result<(), Error>;
}

pub struct ServiceManager<C> {
    context: C,
    restart_delay: Duration,
    services: JoinSet<()>,
}

impl<C> ServiceManager<C>
where
    C: 'static + Clone + Send,
{
    pub fn new(context: C) -> Self {
        Self::with_restart_delay(context, DEFAULT_RESTART_DELAY)
    }

    pub fn with_restart_delay(context: C, restart_delay: Duration) -> Self {
        Self {
            context,
            restart_delay,
            services: JoinSet::new(),
        }
    }

    pub fn spawn<T>(&mut self)
    where
        T: Service<Context = C> + Send + 'static,
    {
        let context = self.context.clone();
        let restart_delay = self.restart_delay;
        self.services.spawn(async move {
            loop {
                let service = match T::new(context.clone()).await {
                    Ok(service) => service,
                    Err(e) => {
                        error!(service = T::NAME, err = %e, "Service failed to initialise");
                        break;
                    }
                };
                info!(service = T::NAME, "Service started");
                match service.run().await {
                    Ok(()) => {
                        info!(service = T::NAME, "Service stopped");
                        break;
                    }
                    Err(e) => {
                        warn!(service = T::NAME, err = %e, "Service failed, restarting");
                        tokio::time::sleep(restart_delay).await;
                    }
                }
            }
        });
    }

    /// Resolves once any service has stopped for good.
    pub async fn wait(&mut self) -> Result<(), Error> {
        if self.services.join_next().await.is_some() {
            return Err(Error::new("Internal Service Error"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Counters {
        started: Arc<AtomicUsize>,
    }

    // Fails its first two runs
    struct Flaky {
        counters: Counters,
    }

    #[async_trait]
    impl Service for Flaky {
        type Context = Counters;
        const NAME: &'static str = "flaky";

        async fn new(counters: Counters) -> Result<Self, Error> {
            Ok(Self { counters })
        }

        async fn run(self) -> Result<(), Error> {
            let run = self.counters.started.fetch_add(1, Ordering::SeqCst);
            if run < 2 {
                return Err(Error::new("connection dropped"));
            }
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Service for Broken {
        type Context = Counters;
        const NAME: &'static str = "broken";

        async fn new(_: Counters) -> Result<Self, Error> {
            Err(Error::new("missing token"))
        }

        async fn run(self) -> Result<(), Error> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failed_run_is_restarted() {
        let counters = Counters::default();
        let mut manager = ServiceManager::with_restart_delay(counters.clone(), Duration::ZERO);
        manager.spawn::<Flaky>();

        assert!(manager.wait().await.is_err());
        assert_eq!(counters.started.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_initialisation_stops_service() {
        let mut manager = ServiceManager::with_restart_delay(Counters::default(), Duration::ZERO);
        manager.spawn::<Broken>();

        let err = manager.wait().await.unwrap_err();
        assert_eq!(err.to_string(), "Internal Service Error");
    }

    #[tokio::test]
    async fn test_wait_without_services() {
        let mut manager = ServiceManager::new(Counters::default());
        assert!(manager.wait().await.is_ok());
    }
}
