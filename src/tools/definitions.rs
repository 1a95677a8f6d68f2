use serde_json::json;

use super::{GRAPH_TOOL, SQL_TOOL, TRANSFER_TOOL};
use crate::llm::ToolDefinition;

/// Function definition for `run_sql_query`
pub fn sql_tool() -> ToolDefinition {
    ToolDefinition::function(
        SQL_TOOL,
        "Execute a standard GoogleSQL query against the logistics tables (Products, Customers, \
         Warehouses, Shipments, Items, ShipmentItems) and return every result row as a JSON \
         object keyed by column name. Use it for counts, aggregates, lists and lookups.",
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "A complete GoogleSQL SELECT statement, e.g. 'SELECT COUNT(*) AS total FROM Shipments WHERE Status = \\'DELIVERED\\''"
                }
            },
            "required": ["query"]
        }),
    )
}

/// Function definition for `run_graph_query_viz`
pub fn graph_tool() -> ToolDefinition {
    ToolDefinition::function(
        GRAPH_TOOL,
        "Execute a Spanner Graph (GQL) query against LogisticsGraph and render the matched \
         nodes and edges as an interactive visualization. The query must project elements \
         with TO_JSON so they can be drawn. Returns the location of the generated file, or a \
         message with raw rows when nothing drawable came back.",
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "An ISO GQL query starting with 'GRAPH LogisticsGraph', e.g. 'GRAPH LogisticsGraph MATCH (s:Warehouses)-[d:DISPATCHED]->(t:Shipments) RETURN TO_JSON(s) AS s_node, TO_JSON(d) AS d_edge, TO_JSON(t) AS t_node'"
                }
            },
            "required": ["query"]
        }),
    )
}

/// Function definition for handing the conversation to a sub-agent
pub fn transfer_tool(agent_names: &[&str]) -> ToolDefinition {
    ToolDefinition::function(
        TRANSFER_TOOL,
        "Transfer the user's question to the specialist agent best suited to answer it.",
        json!({
            "type": "object",
            "properties": {
                "agent_name": {
                    "type": "string",
                    "enum": agent_names,
                    "description": "Name of the agent to hand the conversation to"
                }
            },
            "required": ["agent_name"]
        }),
    )
}
