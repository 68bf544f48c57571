//! Agent loop controller
//!
//! Drives the think/act/observe cycle: prompt the model with the full
//! history, decode its single-step reply, act on it, and feed results back
//! until an output step or a terminal error.

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::agent::conversation::{ConversationHistory, CONTINUE_PROMPT};
use crate::agent::events::{AgentEvent, ConsoleSink, EventSink};
use crate::agent::prompt::system_prompt;
use crate::agent::step::Step;
use crate::core::{AgentError, Config, Result, ToolResult};
use crate::llm::{AnthropicClient, CompletionProvider, CompletionRequest};
use crate::tools::ToolRegistry;

/// How a session ended
#[derive(Debug)]
pub enum TerminalResult {
    /// The model produced an output step
    Completed(String),
    /// A terminal error stopped the loop
    Aborted(AgentError),
}

impl TerminalResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Final answer, if the session completed
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Completed(text) => Some(text),
            Self::Aborted(_) => None,
        }
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<String> {
        match self {
            Self::Completed(text) => Ok(text),
            Self::Aborted(e) => Err(e),
        }
    }
}

/// Outcome of one iteration
pub type Flow = ControlFlow<TerminalResult>;

/// The think/act/observe loop
pub struct AgentLoop {
    provider: Arc<dyn CompletionProvider>,
    tools: ToolRegistry,
    system_prompt: String,
    sink: Arc<dyn EventSink>,
    max_steps: Option<usize>,
}

impl AgentLoop {
    /// Create a loop over a provider and a fixed tool registry
    pub fn new(provider: Arc<dyn CompletionProvider>, tools: ToolRegistry) -> Self {
        let system_prompt = system_prompt(&tools);
        Self {
            provider,
            tools,
            system_prompt,
            sink: Arc::new(ConsoleSink),
            max_steps: None,
        }
    }

    /// Create a loop talking to the Anthropic API with the default tools
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = Arc::new(AnthropicClient::from_config(config)?);
        let tools = ToolRegistry::with_defaults(&config.tools);

        let mut agent = Self::new(provider, tools);
        if let Some(ref prompt) = config.agent.system_prompt {
            agent = agent.with_system_prompt(prompt.clone());
        }
        agent.max_steps = config.agent.max_steps;
        Ok(agent)
    }

    /// Replace the system instruction
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Send events somewhere other than the console
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Abort after this many model calls
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Run a session to its terminal state
    pub async fn run(&self, query: &str) -> TerminalResult {
        self.run_with_history(query).await.0
    }

    /// Run a session, also returning the final history
    pub async fn run_with_history(&self, query: &str) -> (TerminalResult, ConversationHistory) {
        self.sink.emit(&AgentEvent::Started {
            query: query.to_string(),
        });

        let mut history = ConversationHistory::new(query);
        let mut steps = 0usize;

        loop {
            if let Some(limit) = self.max_steps {
                if steps >= limit {
                    let error = AgentError::format(format!("step limit of {} reached", limit));
                    return self.finish(TerminalResult::Aborted(error), history);
                }
            }
            steps += 1;

            let (next, flow) = self.iterate(history).await;
            history = next;

            if let ControlFlow::Break(result) = flow {
                return self.finish(result, history);
            }
        }
    }

    /// Perform one model call and act on its reply.
    ///
    /// History is taken by value and always handed back, whatever the outcome.
    pub async fn iterate(&self, mut history: ConversationHistory) -> (ConversationHistory, Flow) {
        let reply = self
            .provider
            .complete(CompletionRequest {
                system: &self.system_prompt,
                messages: history.messages(),
            })
            .await;

        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => return (history, ControlFlow::Break(TerminalResult::Aborted(e))),
        };

        let value = match Step::decode(&reply) {
            Ok(value) => value,
            Err(e) => return (history, ControlFlow::Break(TerminalResult::Aborted(e))),
        };

        // Recorded verbatim before the tag is interpreted.
        history.push_assistant(reply);

        let step = match Step::from_value(value) {
            Ok(step) => step,
            Err(e) => return (history, ControlFlow::Break(TerminalResult::Aborted(e))),
        };

        tracing::debug!(step = step.kind(), history = history.len(), "dispatching step");

        let flow = match step {
            Step::Think { content } => {
                self.sink.emit(&AgentEvent::Think { content });
                history.push_user(CONTINUE_PROMPT);
                ControlFlow::Continue(())
            }
            Step::Output { content } => {
                self.sink.emit(&AgentEvent::Output {
                    content: content.clone(),
                });
                ControlFlow::Break(TerminalResult::Completed(content))
            }
            Step::Action { tool, input } => self.act(&mut history, tool, input).await,
        };

        (history, flow)
    }

    async fn act(&self, history: &mut ConversationHistory, tool: String, input: String) -> Flow {
        if !self.tools.contains(&tool) {
            return ControlFlow::Break(TerminalResult::Aborted(AgentError::UnknownTool(tool)));
        }

        self.sink.emit(&AgentEvent::Action {
            tool: tool.clone(),
            input: input.clone(),
        });

        let result = match self.tools.execute(&tool, &input).await {
            Ok(output) => {
                self.sink.emit(&AgentEvent::Observe {
                    output: output.clone(),
                });
                ToolResult::success(output)
            }
            // Recoverable: the model sees the error and decides what to do next.
            Err(AgentError::ToolExecution(message)) => {
                self.sink.emit(&AgentEvent::ToolFailed {
                    tool,
                    error: message.clone(),
                });
                ToolResult::failure(message)
            }
            Err(e) => return ControlFlow::Break(TerminalResult::Aborted(e)),
        };

        history.push_user(result.observation());
        ControlFlow::Continue(())
    }

    fn finish(
        &self,
        result: TerminalResult,
        history: ConversationHistory,
    ) -> (TerminalResult, ConversationHistory) {
        match result {
            TerminalResult::Aborted(ref e) => {
                tracing::info!(messages = history.len(), "session aborted: {}", e);
                self.sink.emit(&AgentEvent::aborted(e));
            }
            TerminalResult::Completed(_) => {
                tracing::info!(messages = history.len(), "session completed");
            }
        }
        (result, history)
    }
}
