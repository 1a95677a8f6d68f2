//! Router and specialist agents.
//!
//! A turn starts at [`ROUTER_AGENT`], which hands the question to either
//! [`SQL_AGENT`] or [`GQL_AGENT`] through `transfer_to_agent`. The specialist
//! then calls its tool and answers. Everything that happens is recorded as
//! an ordered list of [`TurnEvent`]s.

mod events;
mod runner;
mod session;

pub use events::{EventPart, EventRole, TurnEvent};
pub use runner::AgentRunner;
pub use session::SessionStore;

use crate::llm::ToolDefinition;
use crate::prompts::{GQL_AGENT_PROMPT, ROUTER_PROMPT, SQL_AGENT_PROMPT};
use crate::tools::{transfer_tool, ToolKind};

/// Name of the entry agent.
pub const ROUTER_AGENT: &str = "spanner_router_agent";

/// Name of the tabular query agent.
pub const SQL_AGENT: &str = "sql_agent";

/// Name of the graph visualization agent.
pub const GQL_AGENT: &str = "gql_agent";

/// Static definition of one agent.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
    /// Domain tools the agent may call.
    pub tools: Vec<ToolKind>,
    /// Agents this one may transfer to.
    pub sub_agents: Vec<&'static str>,
}

impl AgentSpec {
    /// The entry agent that only delegates
    pub fn router() -> Self {
        Self {
            name: ROUTER_AGENT,
            description: "Main agent that routes user requests to either the SQL agent for data retrieval or the Graph agent for visualization.",
            instruction: ROUTER_PROMPT,
            tools: Vec::new(),
            sub_agents: vec![SQL_AGENT, GQL_AGENT],
        }
    }

    /// The tabular query specialist
    pub fn sql() -> Self {
        Self {
            name: SQL_AGENT,
            description: "Specialized agent for running SQL queries on Spanner to retrieve tabular data.",
            instruction: SQL_AGENT_PROMPT,
            tools: vec![ToolKind::Sql],
            sub_agents: Vec::new(),
        }
    }

    /// The graph query and visualization specialist
    pub fn gql() -> Self {
        Self {
            name: GQL_AGENT,
            description: "Specialized agent for running Graph queries on Spanner and visualizing the network.",
            instruction: GQL_AGENT_PROMPT,
            tools: vec![ToolKind::Graph],
            sub_agents: Vec::new(),
        }
    }

    /// Every agent in the logistics tree, router first
    pub fn all() -> Vec<Self> {
        vec![Self::router(), Self::sql(), Self::gql()]
    }

    /// Whether the agent offers `tool` to the model
    pub fn offers(&self, tool: ToolKind) -> bool {
        self.tools.contains(&tool)
    }

    /// Function definitions sent with each request for this agent
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.tools.iter().map(|t| t.definition()).collect();
        if !self.sub_agents.is_empty() {
            definitions.push(transfer_tool(&self.sub_agents));
        }
        definitions
    }

    /// System prompt, with the hand-off targets appended for delegating agents
    pub fn system_prompt(&self, catalog: &[AgentSpec]) -> String {
        if self.sub_agents.is_empty() {
            return self.instruction.to_string();
        }

        let mut prompt = format!("{}\n\nAvailable agents:", self.instruction);
        for name in &self.sub_agents {
            if let Some(agent) = catalog.iter().find(|a| a.name == *name) {
                prompt.push_str(&format!("\n- {}: {}", agent.name, agent.description));
            }
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_only_transfers() {
        let router = AgentSpec::router();
        let names: Vec<String> = router
            .tool_definitions()
            .into_iter()
            .map(|d| d.function.name)
            .collect();
        assert_eq!(names, vec!["transfer_to_agent"]);
    }

    #[test]
    fn test_specialists_offer_their_tool() {
        assert!(AgentSpec::sql().offers(ToolKind::Sql));
        assert!(!AgentSpec::sql().offers(ToolKind::Graph));
        assert!(AgentSpec::gql().offers(ToolKind::Graph));
        assert_eq!(AgentSpec::gql().tool_definitions().len(), 1);
    }

    #[test]
    fn test_router_prompt_lists_sub_agents() {
        let catalog = AgentSpec::all();
        let prompt = AgentSpec::router().system_prompt(&catalog);
        assert!(prompt.starts_with(ROUTER_PROMPT));
        assert!(prompt.contains("- sql_agent: Specialized agent for running SQL"));
        assert!(prompt.contains("- gql_agent: Specialized agent for running Graph"));
        assert_eq!(AgentSpec::sql().system_prompt(&catalog), SQL_AGENT_PROMPT);
    }
}
