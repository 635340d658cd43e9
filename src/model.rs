//! Model abstraction for LLM interactions
//!
//! Wraps the async-openai crate to provide a clean seam between the runner
//! and the hosted model. The wire format, retries, and transport are the
//! client library's responsibility; this module only translates between the
//! crate's value objects and the chat-completions types.

use async_openai::{
    config::Config,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolArgs,
        ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionObjectArgs,
        ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AgentsError, Result};
use crate::items::{Message, ModelResponse, Role, ToolCall};
use crate::usage::Usage;

/// Per-call generation settings, taken from the active agent's configuration.
#[derive(Debug, Clone, Default)]
pub struct ModelSettings {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// JSON schema for structured output, if the agent requires it.
    pub output_schema: Option<Value>,
}

/// Trait for model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Generate a completion for the given conversation and advertised tools.
    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: Vec<ChatCompletionTool>,
        settings: &ModelSettings,
    ) -> Result<(ModelResponse, Usage)>;

    /// The model (or deployment) name completions are generated with.
    fn model_name(&self) -> &str;
}

/// Convert a tool surface (name, description, parameters schema) to the
/// chat-completions tool declaration.
pub fn tool_declaration(name: &str, description: &str, parameters: Value) -> Result<ChatCompletionTool> {
    Ok(ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name(name)
                .description(description)
                .parameters(parameters)
                .build()?,
        )
        .build()?)
}

/// Chat-completions provider over an `async_openai` client.
///
/// Generic over the client configuration so the same provider serves both
/// the standard endpoint (`OpenAIConfig`) and Azure deployments
/// (`AzureConfig`).
pub struct OpenAIProvider<C: Config> {
    client: Client<C>,
    model: String,
}

impl<C: Config> OpenAIProvider<C> {
    /// Create a provider from a configured client.
    pub fn with_client(client: Client<C>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn convert_message(&self, msg: &Message) -> Result<ChatCompletionRequestMessage> {
        let converted = match msg.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(msg.content.clone())
                .build()?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content.clone())
                .build()?
                .into(),
            Role::Assistant => {
                let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
                builder.content(msg.content.clone());

                if let Some(tool_calls) = &msg.tool_calls {
                    let openai_tool_calls: Vec<_> = tool_calls
                        .iter()
                        .map(|tc| async_openai::types::ChatCompletionMessageToolCall {
                            id: tc.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: async_openai::types::FunctionCall {
                                name: tc.name.clone(),
                                arguments: tc.arguments.to_string(),
                            },
                        })
                        .collect();
                    builder.tool_calls(openai_tool_calls);
                }

                builder.build()?.into()
            }
            Role::Tool => ChatCompletionRequestToolMessageArgs::default()
                .content(msg.content.clone())
                .tool_call_id(msg.tool_call_id.clone().unwrap_or_default())
                .build()?
                .into(),
        };
        Ok(converted)
    }
}

#[async_trait]
impl<C: Config + Send + Sync + 'static> ModelProvider for OpenAIProvider<C> {
    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: Vec<ChatCompletionTool>,
        settings: &ModelSettings,
    ) -> Result<(ModelResponse, Usage)> {
        let openai_messages = messages
            .iter()
            .map(|msg| self.convert_message(msg))
            .collect::<Result<Vec<ChatCompletionRequestMessage>>>()?;

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(&self.model).messages(openai_messages);

        if !tools.is_empty() {
            request.tools(tools);
        }
        if let Some(temp) = settings.temperature {
            request.temperature(temp);
        }
        if let Some(max) = settings.max_tokens {
            request.max_tokens(max);
        }
        if let Some(schema) = &settings.output_schema {
            request.response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: "structured_output".to_string(),
                    schema: Some(schema.clone()),
                    strict: None,
                },
            });
        }

        let response = self.client.chat().create(request.build()?).await?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| AgentsError::ModelBehaviorError {
                message: "No choices in response".to_string(),
            })?;

        let tool_calls = choice
            .message
            .tool_calls
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|tc| ToolCall {
                id: tc.id.clone(),
                name: tc.function.name.clone(),
                arguments: serde_json::from_str(&tc.function.arguments).unwrap_or(Value::Null),
            })
            .collect();

        let model_response = ModelResponse {
            id: response.id.clone(),
            content: choice.message.content.clone(),
            tool_calls,
            finish_reason: choice.finish_reason.as_ref().map(|r| format!("{:?}", r)),
            created_at: chrono::Utc::now(),
        };

        let usage = response
            .usage
            .map(|u| Usage::new(u.prompt_tokens as usize, u.completion_tokens as usize))
            .unwrap_or_else(Usage::empty);

        Ok((model_response, usage))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// A provider that replays a fixed queue of responses.
///
/// Used by the integration tests to drive the runner offline; once the queue
/// is drained it answers with a plain message.
pub struct ScriptedProvider {
    model: String,
    responses: std::sync::Mutex<std::collections::VecDeque<ModelResponse>>,
}

impl ScriptedProvider {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            responses: std::sync::Mutex::new(std::collections::VecDeque::new()),
        }
    }

    pub fn with_response(self, response: ModelResponse) -> Self {
        self.responses
            .lock()
            .expect("scripted provider lock")
            .push_back(response);
        self
    }

    pub fn with_message(self, content: impl Into<String>) -> Self {
        self.with_response(ModelResponse::new_message(content))
    }

    pub fn with_tool_call(self, tool_name: impl Into<String>, arguments: Value) -> Self {
        let tool_call = ToolCall {
            id: uuid::Uuid::new_v4().to_string(),
            name: tool_name.into(),
            arguments,
        };
        self.with_response(ModelResponse::new_tool_calls(vec![tool_call]))
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn complete(
        &self,
        _messages: Vec<Message>,
        _tools: Vec<ChatCompletionTool>,
        _settings: &ModelSettings,
    ) -> Result<(ModelResponse, Usage)> {
        let next = self
            .responses
            .lock()
            .expect("scripted provider lock")
            .pop_front();
        let response = next.unwrap_or_else(|| ModelResponse::new_message("Scripted response"));
        Ok((response, Usage::new(10, 5)))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Convenience: build a `Vec<ChatCompletionTool>` for an agent's tools plus
/// its hand-offs.
pub fn advertised_tools(agent: &crate::agent::Agent) -> Result<Vec<ChatCompletionTool>> {
    let mut declarations = Vec::with_capacity(agent.tools().len() + agent.handoffs().len());
    for tool in agent.tools() {
        declarations.push(tool_declaration(
            tool.name(),
            tool.description(),
            tool.parameters_schema(),
        )?);
    }
    for handoff in agent.handoffs() {
        let ht = crate::handoff::HandoffTool::from(handoff);
        use crate::tool::Tool;
        declarations.push(tool_declaration(
            ht.name(),
            ht.description(),
            ht.parameters_schema(),
        )?);
    }
    Ok(declarations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::config::OpenAIConfig;

    #[test]
    fn test_provider_model_name() {
        let provider =
            OpenAIProvider::with_client(Client::<OpenAIConfig>::new(), "gpt-4o-mini");
        assert_eq!(provider.model_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_message_conversion() {
        let provider =
            OpenAIProvider::with_client(Client::<OpenAIConfig>::new(), "gpt-4o-mini");

        for msg in [
            Message::system("You are helpful"),
            Message::user("Hello"),
            Message::assistant("Hi there"),
            Message::tool("Result", "call_123"),
        ] {
            provider.convert_message(&msg).unwrap();
        }
    }

    #[test]
    fn test_tool_declaration() {
        let decl = tool_declaration(
            "check_nsg_rules",
            "Check NSG rules for blocking issues",
            serde_json::json!({"type": "object", "properties": {}}),
        )
        .unwrap();
        assert_eq!(decl.function.name, "check_nsg_rules");
    }

    #[tokio::test]
    async fn test_scripted_provider_queue() {
        let provider = ScriptedProvider::new("scripted")
            .with_message("First")
            .with_tool_call("check_dns", serde_json::json!({"hostname": "example.com"}));

        let settings = ModelSettings::default();
        let (first, usage) = provider.complete(vec![], vec![], &settings).await.unwrap();
        assert_eq!(first.content, Some("First".to_string()));
        assert_eq!(usage.total_tokens, 15);

        let (second, _) = provider.complete(vec![], vec![], &settings).await.unwrap();
        assert_eq!(second.tool_calls.len(), 1);
        assert_eq!(second.tool_calls[0].name, "check_dns");

        // Drained queue falls back to a default message.
        let (third, _) = provider.complete(vec![], vec![], &settings).await.unwrap();
        assert!(third.has_content());
    }
}
