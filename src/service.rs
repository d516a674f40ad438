//! Chat service lifecycle
//!
//! `Uninitialized -> Compiling -> Serving -> Draining -> Stopped`
//!
//! Compilation happens in [`ChatService::build`], so a broken chain never
//! reaches `Serving`. [`ChatService::serve`] runs the accept loop until the
//! shutdown future resolves, then grants in-flight requests a bounded drain
//! window.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::{AppConfig, PromptConfig};
use crate::domain::{ChainBuilder, ChatChain, ChatModel, DomainError, PromptStage};
use crate::infrastructure::llm::ChatModelFactory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Compiling,
    Serving,
    Draining,
    Stopped,
}

/// Owns the compiled chain (through its router) and the process lifecycle
#[derive(Debug)]
pub struct ChatService {
    router: Router,
    drain_timeout: Duration,
    state: Arc<watch::Sender<ServiceState>>,
}

impl ChatService {
    /// Construct the configured chat model and compile the chain.
    /// Any failure here is fatal for startup.
    pub fn build(config: &AppConfig) -> Result<Self, DomainError> {
        let (state, _) = watch::channel(ServiceState::Uninitialized);
        state.send_replace(ServiceState::Compiling);

        let model = ChatModelFactory::create(&config.model)?;
        info!(model = %model.name(), "Chat model constructed");

        let chain = compile_chain(&config.prompt, model)?;
        info!(stages = ?chain.stage_names(), "Chat chain compiled");

        Ok(Self::with_state(chain, config, state))
    }

    /// Wrap an already compiled chain
    pub fn with_chain(chain: ChatChain, config: &AppConfig) -> Self {
        let (state, _) = watch::channel(ServiceState::Compiling);
        Self::with_state(chain, config, state)
    }

    fn with_state(chain: ChatChain, config: &AppConfig, state: watch::Sender<ServiceState>) -> Self {
        let app_state = AppState::new(chain, &config.service);

        Self {
            router: create_router(app_state),
            drain_timeout: config.server.shutdown_timeout(),
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> ServiceState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.state.subscribe()
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves, then drain.
    ///
    /// New connections are refused as soon as draining starts. If in-flight
    /// requests outlive the drain window the server is abandoned; their
    /// connections are torn down when the runtime exits.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            router,
            drain_timeout,
            state,
        } = self;

        let addr = listener.local_addr()?;
        state.send_replace(ServiceState::Serving);
        info!(%addr, "Chat service accepting connections");

        let drain_started = Arc::new(Notify::new());
        let signal = {
            let state = Arc::clone(&state);
            let drain_started = Arc::clone(&drain_started);
            async move {
                shutdown.await;
                state.send_replace(ServiceState::Draining);
                info!(
                    drain_timeout_ms = %drain_timeout.as_millis(),
                    "Shutdown requested, draining in-flight requests"
                );
                drain_started.notify_one();
            }
        };

        let server = axum::serve(listener, router)
            .with_graceful_shutdown(signal)
            .into_future();

        let drain_deadline = async {
            drain_started.notified().await;
            tokio::time::sleep(drain_timeout).await;
        };

        let result = tokio::select! {
            result = server => result,
            _ = drain_deadline => {
                warn!(
                    drain_timeout_ms = %drain_timeout.as_millis(),
                    "Drain window elapsed, abandoning remaining connections"
                );
                Ok(())
            }
        };

        state.send_replace(ServiceState::Stopped);
        result?;

        info!("Chat service stopped");
        Ok(())
    }
}

/// One system-prompt stage feeding the chat model
pub fn compile_chain(
    prompt: &PromptConfig,
    model: Arc<dyn ChatModel>,
) -> Result<ChatChain, DomainError> {
    let prompt_stage = PromptStage::from_template(&prompt.system, &prompt.variables)?;

    ChainBuilder::new().append_stage(prompt_stage).compile(model)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Instant;

    use tokio::sync::oneshot;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::MockChatModel;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config
    }

    fn service_with_model(model: Arc<MockChatModel>, drain: Duration) -> ChatService {
        let config = test_config();
        let chain = compile_chain(&config.prompt, model).unwrap();
        let mut service = ChatService::with_chain(chain, &config);
        // sub-second drain windows cannot be expressed in whole-second config
        service.drain_timeout = drain;
        service
    }

    async fn start(
        service: ChatService,
    ) -> (
        SocketAddr,
        oneshot::Sender<()>,
        tokio::task::JoinHandle<anyhow::Result<()>>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(service.serve(listener, async move {
            let _ = rx.await;
        }));

        (addr, tx, handle)
    }

    async fn post_chat(addr: SocketAddr, message: &str) -> reqwest::Result<reqwest::Response> {
        reqwest::Client::new()
            .post(format!("http://{}/chat", addr))
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
    }

    #[test]
    fn test_build_compiles_default_chain() {
        let service = ChatService::build(&AppConfig::default()).unwrap();
        assert_eq!(service.state(), ServiceState::Compiling);
    }

    #[test]
    fn test_build_fails_on_bad_prompt_template() {
        let mut config = AppConfig::default();
        config.prompt.system = "Answer in ${var:language}.".to_string();

        let result = ChatService::build(&config);
        assert!(matches!(result, Err(DomainError::Compilation { .. })));
    }

    #[test]
    fn test_build_renders_prompt_variables() {
        let mut config = AppConfig::default();
        config.prompt.system = "Answer in ${var:language}.".to_string();
        config
            .prompt
            .variables
            .insert("language".to_string(), "Chinese".to_string());

        assert!(ChatService::build(&config).is_ok());
    }

    #[tokio::test]
    async fn test_router_answers_without_listener() {
        let service = ChatService::build(&AppConfig::default()).unwrap();

        let response = service
            .router()
            .oneshot(
                axum::http::Request::get("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(service.state(), ServiceState::Compiling);
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let service = ChatService::build(&test_config()).unwrap();
        let mut states = service.subscribe();
        let (addr, shutdown, handle) = start(service).await;

        states
            .wait_for(|s| *s == ServiceState::Serving)
            .await
            .unwrap();

        let response = post_chat(addr, "hello").await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let health = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert_eq!(health.status(), reqwest::StatusCode::OK);

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(*states.borrow(), ServiceState::Stopped);
    }

    #[tokio::test]
    async fn test_in_flight_request_completes_while_new_ones_are_refused() {
        let model = Arc::new(
            MockChatModel::new()
                .with_reply("slow reply")
                .with_delay(Duration::from_millis(500)),
        );
        let service = service_with_model(model.clone(), Duration::from_secs(5));
        let mut states = service.subscribe();
        let (addr, shutdown, handle) = start(service).await;

        let in_flight = tokio::spawn(async move { post_chat(addr, "first").await });

        while model.calls() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        shutdown.send(()).unwrap();
        states
            .wait_for(|s| *s == ServiceState::Draining)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(post_chat(addr, "second").await.is_err());

        let response = in_flight.await.unwrap().unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["response"], "slow reply");

        handle.await.unwrap().unwrap();
        assert_eq!(*states.borrow(), ServiceState::Stopped);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_drain_window_bounds_shutdown() {
        let model = Arc::new(MockChatModel::new().with_delay(Duration::from_secs(30)));
        let service = service_with_model(model.clone(), Duration::from_millis(200));
        let states = service.subscribe();
        let (addr, shutdown, handle) = start(service).await;

        let _stuck = tokio::spawn(async move { post_chat(addr, "never finishes").await });

        while model.calls() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let started = Instant::now();
        shutdown.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("serve should return once the drain window elapses")
            .unwrap()
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(*states.borrow(), ServiceState::Stopped);
    }
}
