use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{AgentSpec, SessionStore, TurnEvent};
use crate::config::AgentConfig;
use crate::error::{AgentError, AgentResult, AppResult};
use crate::llm::{ChatMessage, ChatModel, ChatRequest, ToolCall};
use crate::tools::{query_argument, ToolBox, ToolKind, TRANSFER_TOOL};

/// Drives one user message through the agent tree.
pub struct AgentRunner {
    model: Arc<dyn ChatModel>,
    tools: ToolBox,
    agents: Vec<AgentSpec>,
    sessions: SessionStore,
    max_steps: u32,
}

/// Outcome of a `transfer_to_agent` call.
enum Transfer<'a> {
    To(&'a AgentSpec),
    Rejected(String),
}

impl AgentRunner {
    /// Create a runner over the logistics agent tree
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolBox, config: &AgentConfig) -> Self {
        Self {
            model,
            tools,
            agents: AgentSpec::all(),
            sessions: SessionStore::new(config.history_limit),
            max_steps: config.max_steps,
        }
    }

    /// Conversation memory shared by all turns
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn agent(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Run one turn to completion and return every event it produced.
    ///
    /// The turn ends when the active agent replies without calling a
    /// function. Tool failures abort the turn and nothing is remembered.
    pub async fn run_turn(&self, session_id: &str, user_message: &str) -> AppResult<Vec<TurnEvent>> {
        // AgentSpec::all() puts the router first
        let mut active = &self.agents[0];

        let mut conversation = self.sessions.history(session_id).await;
        conversation.push(ChatMessage::user(user_message));
        let phase_start = conversation.len();

        let mut events = vec![TurnEvent::user_text(user_message)];

        info!(session_id = %session_id, agent = active.name, "Turn started");

        for step in 1..=self.max_steps {
            let mut messages = Vec::with_capacity(conversation.len() + 1);
            messages.push(ChatMessage::system(active.system_prompt(&self.agents)));
            messages.extend(conversation.iter().cloned());

            let request =
                ChatRequest::new(self.model.model(), messages).with_tools(active.tool_definitions());

            debug!(step, agent = active.name, "Requesting model step");

            let response = self.model.complete(request).await?;
            let message = response
                .choices
                .into_iter()
                .next()
                .map(|c| c.message)
                .ok_or(AgentError::EmptyResponse)?;

            if let Some(text) = message.text_content() {
                events.push(TurnEvent::model_text(active.name, text));
            }

            let calls: Vec<ToolCall> = message.calls().to_vec();

            if calls.is_empty() {
                let answer = message.text_content().unwrap_or_default().to_string();
                let mut remembered = vec![ChatMessage::user(user_message)];
                if !answer.is_empty() {
                    remembered.push(ChatMessage::assistant(answer));
                }
                self.sessions.append(session_id, remembered).await;

                info!(
                    session_id = %session_id,
                    agent = active.name,
                    steps = step,
                    events = events.len(),
                    "Turn completed"
                );
                return Ok(events);
            }

            conversation.push(message);
            let mut next_agent = None;

            for call in &calls {
                let name = call.function.name.as_str();
                events.push(TurnEvent::function_call(
                    active.name,
                    name,
                    parse_args(&call.function.arguments),
                ));

                if name == TRANSFER_TOOL {
                    let response = match self.resolve_transfer(active, &call.function.arguments)? {
                        Transfer::To(target) => {
                            info!(from = active.name, to = target.name, "Agent transfer");
                            next_agent = Some(target);
                            json!({ "transferred_to": target.name })
                        }
                        Transfer::Rejected(error) => {
                            warn!(agent = active.name, error = %error, "Transfer rejected");
                            json!({ "error": error })
                        }
                    };
                    conversation.push(ChatMessage::tool(response.to_string(), call.id.clone()));
                    events.push(TurnEvent::function_response(
                        active.name,
                        TRANSFER_TOOL,
                        response,
                        None,
                    ));
                    continue;
                }

                let kind = ToolKind::from_name(name)
                    .filter(|kind| active.offers(*kind))
                    .ok_or_else(|| AgentError::UnknownTool {
                        tool_name: name.to_string(),
                    })?;
                let query = query_argument(name, &call.function.arguments)?;

                let output = self.tools.execute(kind, &query).await?;

                conversation.push(ChatMessage::tool(output.model_content(), call.id.clone()));
                events.push(TurnEvent::function_response(
                    active.name,
                    name,
                    output.response(),
                    output.visualization().cloned(),
                ));
            }

            if let Some(target) = next_agent {
                // The specialist starts from the user's question, not the hand-off exchange
                conversation.truncate(phase_start);
                active = target;
            }
        }

        warn!(session_id = %session_id, max_steps = self.max_steps, "Turn hit step limit");
        Err(AgentError::StepLimitExceeded {
            max_steps: self.max_steps,
        }
        .into())
    }

    fn resolve_transfer(&self, active: &AgentSpec, arguments: &str) -> AgentResult<Transfer<'_>> {
        let args: Value = serde_json::from_str(arguments).map_err(|e| AgentError::InvalidArguments {
            tool_name: TRANSFER_TOOL.to_string(),
            message: e.to_string(),
        })?;
        let target = args
            .get("agent_name")
            .and_then(Value::as_str)
            .ok_or_else(|| AgentError::InvalidArguments {
                tool_name: TRANSFER_TOOL.to_string(),
                message: "missing string field 'agent_name'".to_string(),
            })?;

        match self.agent(target) {
            Some(agent) if active.sub_agents.contains(&agent.name) => Ok(Transfer::To(agent)),
            _ => Ok(Transfer::Rejected(format!(
                "Agent '{}' is not available. Choose one of: {}",
                target,
                active.sub_agents.join(", ")
            ))),
        }
    }
}

/// Decode call arguments for the event record, keeping malformed text as-is.
fn parse_args(arguments: &str) -> Value {
    if arguments.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(arguments).unwrap_or_else(|_| Value::String(arguments.to_string()))
}
