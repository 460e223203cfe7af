//! One planning run: load config, wire the agent and present its events.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use wayfarer_agent::{AgentLoop, RunOutcome, RunState, TRAVEL_PLANNER_PROMPT};
use wayfarer_config::{AppConfig, ConfigError, StoreBackend};
use wayfarer_core::event::EventBus;
use wayfarer_core::memory::{MessageStore, RunId};
use wayfarer_core::provider::Provider;
use wayfarer_memory::{FileStore, InMemoryStore};
use wayfarer_providers::openai_compat::OpenAiCompatProvider;

use crate::presenter::{self, ConsolePresenter};

/// Command-line overrides, applied on top of the loaded config.
pub struct PlanOptions {
    pub turns: Option<u32>,
    pub model: Option<String>,
    pub config: Option<PathBuf>,
    pub store: Option<StoreBackend>,
}

pub async fn run(
    options: PlanOptions,
    message: String,
) -> Result<RunOutcome, Box<dyn std::error::Error>> {
    let config = load_config(&options).map_err(|e| format!("Failed to load config: {e}"))?;

    // Setup errors surface before anything is printed.
    config.require_api_key()?;
    let provider: Arc<dyn Provider> = Arc::new(OpenAiCompatProvider::from_config(&config)?);
    let tools = Arc::new(wayfarer_tools::default_registry(
        provider.clone(),
        &config.image,
    )?);

    let run_id = RunId::new();
    let store: Arc<dyn MessageStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
        StoreBackend::File => {
            let store = FileStore::open(&config.store.runs_dir(), &run_id);
            debug!(path = %store.path().display(), "Writing run log");
            Arc::new(store)
        }
    };

    let bus = Arc::new(EventBus::default());
    let presenter = ConsolePresenter::stdio().spawn(bus.subscribe());

    let agent = AgentLoop::new(provider, &config.model, tools)
        .with_system_prompt(TRAVEL_PLANNER_PROMPT)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_event_bus(bus.clone());

    let state = RunState::new(store, config.max_turns).with_run_id(run_id);
    let result = agent.run(state, message).await;

    // Closing the bus lets the presenter drain and exit.
    drop(agent);
    drop(bus);
    presenter::join(presenter).await;

    Ok(result?)
}

fn load_config(options: &PlanOptions) -> Result<AppConfig, ConfigError> {
    let mut config = match &options.config {
        Some(path) => AppConfig::load_with_env(path, |key| std::env::var(key).ok())?,
        None => AppConfig::load()?,
    };

    if let Some(model) = &options.model {
        config.model = model.clone();
    }
    if let Some(turns) = options.turns {
        config.max_turns = turns;
    }
    if let Some(store) = options.store {
        config.store.backend = store;
    }

    config.validate()?;
    Ok(config)
}
