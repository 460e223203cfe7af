//! The agent loop: the heart of Wayfarer.
//!
//! A run follows a bounded **Plan → Act** cycle:
//!
//! 1. **Reset** the run's message store and append the user's task
//! 2. **Plan**: send the full history and the tool specs to the provider
//! 3. **Act**: if the reply requests a tool, dispatch the first request,
//!    append its textual result, spend one turn and go back to 2
//! 4. **Finish** when a reply carries no tool request (`Done`), or when the
//!    turn budget is spent (`Exhausted`)
//!
//! Tool failures never end a run; they come back to the model as text.

pub mod dispatcher;
pub mod loop_runner;
pub mod prompts;

#[cfg(test)]
mod test_helpers;

pub use dispatcher::{DispatchOutcome, ToolDispatcher};
pub use loop_runner::{AgentLoop, DEFAULT_TURN_BUDGET, LoopState, RunOutcome, RunState};
pub use prompts::TRAVEL_PLANNER_PROMPT;
pub use wayfarer_core::event::RunStatus;
