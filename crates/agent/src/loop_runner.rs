//! The agent loop state machine.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use wayfarer_core::event::{DomainEvent, EventBus, RunStatus};
use wayfarer_core::memory::{MessageStore, RunId};
use wayfarer_core::message::{Message, NextAction, ToolCallRequest};
use wayfarer_core::provider::{Provider, ProviderRequest};
use wayfarer_core::tool::ToolRegistry;

use crate::dispatcher::ToolDispatcher;

/// Turns allowed per run unless configured otherwise.
pub const DEFAULT_TURN_BUDGET: u32 = 20;

/// Per-run state: the turn budget and the history this run writes to.
///
/// Each concurrent run needs its own `RunState` (and its own store); the
/// tool registry and provider can be shared.
pub struct RunState {
    run_id: RunId,
    turn_budget: u32,
    turns_left: u32,
    store: Arc<dyn MessageStore>,
}

impl RunState {
    /// A fresh run with a new id. A budget of 0 exhausts before the first LLM call.
    pub fn new(store: Arc<dyn MessageStore>, turn_budget: u32) -> Self {
        Self {
            run_id: RunId::new(),
            turn_budget,
            turns_left: turn_budget,
            store,
        }
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn turn_budget(&self) -> u32 {
        self.turn_budget
    }

    pub fn turns_left(&self) -> u32 {
        self.turns_left
    }

    pub fn turns_used(&self) -> u32 {
        self.turn_budget - self.turns_left
    }

    pub fn store(&self) -> &Arc<dyn MessageStore> {
        &self.store
    }
}

/// The states a run moves through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the provider's next message
    Planning,
    /// Waiting for this tool call to finish
    ToolExecuting(ToolCallRequest),
    /// The provider gave a final answer
    Done,
    /// The turn budget ran out first
    Exhausted,
}

/// What a finished run hands back.
pub struct RunOutcome {
    pub status: RunStatus,

    /// The full history, in append order
    pub messages: Vec<Message>,

    pub llm_calls: u32,
    pub tool_dispatches: u32,

    /// The state the run finished with
    pub state: RunState,
}

impl RunOutcome {
    /// The final answer. `None` when the run was exhausted.
    pub fn final_answer(&self) -> Option<&str> {
        if self.status != RunStatus::Done {
            return None;
        }
        match self.messages.last()?.as_assistant()?.next_action() {
            NextAction::Answer(text) => Some(text),
            NextAction::CallTool(_) => None,
        }
    }
}

/// Drives a provider and a tool registry through bounded turns.
pub struct AgentLoop {
    provider: Arc<dyn Provider>,
    dispatcher: ToolDispatcher,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    system_prompt: Option<String>,
    event_bus: Arc<EventBus>,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            dispatcher: ToolDispatcher::new(tools),
            model: model.into(),
            temperature: 0.1,
            max_tokens: None,
            system_prompt: None,
            event_bus: Arc::new(EventBus::default()),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: Option<u32>) -> Self {
        self.max_tokens = max;
        self
    }

    /// Publish run events on `bus` instead of a private one.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = bus;
        self
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Run one task to completion.
    ///
    /// Errors come only from the provider or the store; tool failures are
    /// folded into the history. Exhausting the budget is not an error.
    pub async fn run(
        &self,
        mut state: RunState,
        user_message: impl Into<String>,
    ) -> Result<RunOutcome, wayfarer_core::Error> {
        let user_message = user_message.into();
        let run_id = state.run_id.to_string();

        state.store.reset().await?;
        state.turns_left = state.turn_budget;

        info!(run_id = %run_id, turn_budget = state.turn_budget, store = state.store.name(), "Starting run");
        self.event_bus.publish(DomainEvent::RunStarted {
            run_id: run_id.clone(),
            turn_budget: state.turn_budget,
            timestamp: Utc::now(),
        });

        self.append(&state, Message::user(&user_message)).await?;

        let tool_specs = self.dispatcher.registry().specs();
        let mut llm_calls = 0u32;
        let mut tool_dispatches = 0u32;
        let mut current = if state.turns_left == 0 {
            LoopState::Exhausted
        } else {
            LoopState::Planning
        };

        let status = loop {
            current = match current {
                LoopState::Planning => {
                    debug!(run_id = %run_id, turns_left = state.turns_left, "Planning");
                    let request = ProviderRequest {
                        model: self.model.clone(),
                        system_prompt: self.system_prompt.clone(),
                        messages: state.store.read_all().await?,
                        tools: tool_specs.clone(),
                        temperature: self.temperature,
                        max_tokens: self.max_tokens,
                    };

                    llm_calls += 1;
                    let response = self.provider.complete(request).await?;

                    let next = match response.message.next_action() {
                        NextAction::Answer(_) => LoopState::Done,
                        NextAction::CallTool(call) => LoopState::ToolExecuting(call.clone()),
                    };
                    self.append(&state, response.message.into()).await?;
                    next
                }

                LoopState::ToolExecuting(call) => {
                    self.event_bus.publish(DomainEvent::ToolStarted {
                        run_id: run_id.clone(),
                        tool_name: call.name.clone(),
                        timestamp: Utc::now(),
                    });

                    let outcome = self.dispatcher.dispatch(&call, &user_message).await;
                    tool_dispatches += 1;

                    self.event_bus.publish(DomainEvent::ToolFinished {
                        run_id: run_id.clone(),
                        tool_name: call.name.clone(),
                        success: !outcome.failed,
                        duration_ms: outcome.duration.as_millis() as u64,
                        timestamp: Utc::now(),
                    });

                    self.append(&state, Message::tool_result(&call.id, outcome.content))
                        .await?;

                    state.turns_left -= 1;
                    if state.turns_left == 0 {
                        LoopState::Exhausted
                    } else {
                        LoopState::Planning
                    }
                }

                LoopState::Done => break RunStatus::Done,
                LoopState::Exhausted => break RunStatus::Exhausted,
            };
        };

        match status {
            RunStatus::Done => info!(run_id = %run_id, llm_calls, tool_dispatches, "Run finished"),
            RunStatus::Exhausted => warn!(
                run_id = %run_id,
                llm_calls,
                tool_dispatches,
                "Max turns reached without a final response"
            ),
        }
        self.event_bus.publish(DomainEvent::RunFinished {
            run_id,
            status,
            turns_used: state.turns_used(),
            timestamp: Utc::now(),
        });

        Ok(RunOutcome {
            status,
            messages: state.store.read_all().await?,
            llm_calls,
            tool_dispatches,
            state,
        })
    }

    async fn append(&self, state: &RunState, message: Message) -> Result<(), wayfarer_core::Error> {
        state.store.append(vec![message.clone()]).await?;
        self.event_bus.publish(DomainEvent::MessageAppended {
            run_id: state.run_id.to_string(),
            message,
            timestamp: Utc::now(),
        });
        Ok(())
    }
}
