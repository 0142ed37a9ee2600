//! Messenger Relay - Server Entry Point

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use messenger_relay::adapters::http::{app_router, WebhookAppState};
use messenger_relay::adapters::nlu::ServiceAccountKey;
use messenger_relay::adapters::{
    DialogflowClient, DialogflowConfig, GraphApiConfig, GraphSendAdapter,
    InMemorySessionRegistry, LoggingEmailNotifier, RecordingSendAdapter, ResendConfig,
    ResendEmailNotifier,
};
use messenger_relay::application::{
    ActionFlowSettings, ActionFlows, DispatchScheduler, ProcessTurnHandler, ReceiveWebhookHandler,
};
use messenger_relay::config::AppConfig;
use messenger_relay::domain::dispatch::ResponseSequencer;
use messenger_relay::domain::messenger::MessengerSignatureVerifier;
use messenger_relay::ports::{EmailNotifier, SendAdapter, SessionRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Starting Messenger Relay"
    );

    let sender: Arc<dyn SendAdapter> = if config.messenger.dry_run {
        info!("Dry run enabled, outbound sends are recorded and logged only");
        Arc::new(RecordingSendAdapter::new())
    } else {
        let graph = GraphApiConfig::new(config.messenger.page_access_token.clone())
            .with_base_url(config.messenger.graph_api_base.clone())
            .with_api_version(config.messenger.graph_api_version.clone());
        Arc::new(GraphSendAdapter::new(graph)?)
    };

    let nlu = DialogflowClient::with_service_account(
        DialogflowConfig::new(config.nlu.project_id.clone())
            .with_language_code(config.nlu.language_code.clone())
            .with_api_base(config.nlu.api_base.clone())
            .with_timeout(Duration::from_secs(config.nlu.timeout_secs)),
        ServiceAccountKey::new(
            config.nlu.client_email.clone(),
            &config.nlu.private_key,
            config.nlu.token_uri.clone(),
        ),
    )?;

    let notifier: Arc<dyn EmailNotifier> = if config.email.enabled {
        let resend = ResendConfig::new(config.email.resend_api_key.clone(), config.email.from_header())
            .with_api_base(config.email.api_base.clone());
        Arc::new(ResendEmailNotifier::new(resend, Client::new()))
    } else {
        info!("Email disabled, notifications are logged only");
        Arc::new(LoggingEmailNotifier::new())
    };

    let sessions: Arc<dyn SessionRegistry> = Arc::new(InMemorySessionRegistry::new());
    let sequencer = ResponseSequencer::new(config.dispatch.pacing());
    let flows = ActionFlows::new(
        sequencer,
        notifier,
        ActionFlowSettings {
            notify_to: config.email.notify_to.clone(),
            shipping_tracking_url: config.dispatch.shipping_tracking_url.clone(),
            support_phone_number: config.dispatch.support_phone_number.clone(),
            follow_up_delay: config.dispatch.follow_up_delay(),
        },
    );

    let turns = ProcessTurnHandler::new(
        Arc::new(nlu),
        sessions.clone(),
        DispatchScheduler::new(sender),
        sequencer,
        Arc::new(flows),
    );
    let receiver = ReceiveWebhookHandler::new(Arc::new(turns), sessions);

    let state = WebhookAppState::new(
        MessengerSignatureVerifier::new(config.messenger.app_secret.clone()),
        config.messenger.verify_token.clone(),
        receiver,
    );
    let app = app_router(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(error) => tracing::error!(error = %error, "Failed to listen for shutdown signal"),
    }
}
