//! Authentication tools: interactive login and the stored-session check.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use brewhands_protocols::error::ToolError;
use brewhands_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};

use crate::session::SessionManager;

use super::{invalid_params, workflow_error};

// ============================================================================
// Login Tool
// ============================================================================

/// Open a visible browser at the sign-in page.
pub struct LoginTool {
    definition: ToolDefinition,
    session: Arc<SessionManager>,
}

impl LoginTool {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "order_login",
                "Order Login",
                "Open a visible browser window at the sign-in page for interactive login. \
                 Follow with order_complete_login once signed in.",
            ),
            session,
        }
    }
}

#[async_trait]
impl Tool for LoginTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let instructions = self
            .session
            .begin_interactive_login()
            .await
            .map_err(workflow_error)?;
        Ok(ToolResult::success(instructions))
    }
}

// ============================================================================
// Complete Login Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CompleteLoginParams {
    #[serde(default = "default_login_timeout")]
    pub timeout_secs: u64,
}

fn default_login_timeout() -> u64 {
    300
}

/// Wait for the interactive sign-in to finish and persist the session.
pub struct CompleteLoginTool {
    definition: ToolDefinition,
    session: Arc<SessionManager>,
}

impl CompleteLoginTool {
    pub fn new(session: Arc<SessionManager>) -> Self {
        let definition = ToolDefinition::new(
            "order_complete_login",
            "Complete Login",
            "Wait for the interactive sign-in to finish, then save the session for reuse.",
        )
        .with_parameters_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "timeout_secs": {
                    "type": "integer",
                    "description": "How long to wait for sign-in, in seconds (default 300)"
                }
            },
            "required": []
        }));
        Self { definition, session }
    }
}

#[async_trait]
impl Tool for CompleteLoginTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: CompleteLoginParams = serde_json::from_value(params).map_err(invalid_params)?;
        let message = self
            .session
            .await_login_completion(Duration::from_secs(params.timeout_secs))
            .await
            .map_err(workflow_error)?;
        Ok(ToolResult::success(message))
    }
}

// ============================================================================
// Check Auth Tool
// ============================================================================

/// Report sign-in state from the persisted cookie jar.
pub struct CheckAuthTool {
    definition: ToolDefinition,
    session: Arc<SessionManager>,
}

impl CheckAuthTool {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "order_check_auth",
                "Check Auth",
                "Report whether a saved session exists. This checks stored cookies, not the \
                 live site; an expired session is detected during ordering.",
            ),
            session,
        }
    }
}

#[async_trait]
impl Tool for CheckAuthTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let (authenticated, message) = self.session.check_authenticated();
        Ok(ToolResult::success_json(
            message.clone(),
            serde_json::json!({
                "authenticated": authenticated,
                "message": message,
            }),
        ))
    }
}
