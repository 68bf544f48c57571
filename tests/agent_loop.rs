//! Agent loop control-flow tests
//!
//! The completion endpoint is replaced by a scripted provider so each test
//! can assert exactly which requests were made and what history resulted.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use thinkloop::agent::{AgentEvent, AgentLoop, EventSink, TerminalResult, CONTINUE_PROMPT};
use thinkloop::core::{AgentError, Message, Result, Role};
use thinkloop::llm::{CompletionProvider, CompletionRequest};
use thinkloop::tools::{Tool, ToolRegistry};
use tokio_test::{assert_err, assert_ok};

/// Replays canned replies and records every request it sees
#[derive(Default)]
struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<Vec<Message>>>,
    systems: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            ..Default::default()
        })
    }

    fn failing(error: AgentError) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err(error)])),
            ..Default::default()
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        self.requests.lock().unwrap().push(request.messages.to_vec());
        self.systems.lock().unwrap().push(request.system.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::transport("script exhausted")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Collects emitted events
#[derive(Default)]
struct Recorder(Mutex<Vec<AgentEvent>>);

impl EventSink for Recorder {
    fn emit(&self, event: &AgentEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

/// Tool that counts invocations and fails on "fail"
#[derive(Default)]
struct CountingTool {
    calls: AtomicUsize,
}

#[async_trait]
impl Tool for CountingTool {
    fn name(&self) -> &str {
        "count"
    }

    fn description(&self) -> &str {
        "Counts invocations"
    }

    async fn invoke(&self, input: &str) -> std::result::Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if input == "fail" {
            Err("counter jammed".to_string())
        } else {
            Ok(format!("counted {}", input))
        }
    }
}

fn agent_with(provider: Arc<ScriptedProvider>, tools: ToolRegistry) -> (AgentLoop, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let agent = AgentLoop::new(provider, tools).with_sink(recorder.clone());
    (agent, recorder)
}

fn think(content: &str) -> String {
    format!(r#"{{"step":"think","content":"{}"}}"#, content)
}

#[tokio::test]
async fn test_thinks_then_output_completes() {
    for thinks in 0..4 {
        let mut script: Vec<String> = (0..thinks).map(|i| think(&format!("t{}", i))).collect();
        script.push(r#"{"step":"output","content":"all done"}"#.to_string());
        let script: Vec<&str> = script.iter().map(String::as_str).collect();

        let provider = ScriptedProvider::new(&script);
        let (agent, _) = agent_with(provider.clone(), ToolRegistry::new());
        let (result, history) = agent.run_with_history("query").await;

        assert_eq!(result.text(), Some("all done"));
        assert_eq!(history.len(), 1 + 2 * thinks + 1);
        assert_eq!(provider.calls(), thinks + 1);
    }
}

#[tokio::test]
async fn test_think_appends_reply_then_continue() {
    let provider = ScriptedProvider::new(&[&think("plan"), r#"{"step":"output","content":"x"}"#]);
    let (agent, recorder) = agent_with(provider.clone(), ToolRegistry::new());
    let (_, history) = agent.run_with_history("query").await;

    let messages = history.messages();
    assert_eq!(messages[0], Message::user("query"));
    assert_eq!(messages[1], Message::assistant(think("plan")));
    assert_eq!(messages[2], Message::user(CONTINUE_PROMPT));

    // Second request carried the whole history so far.
    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests[1].len(), 3);

    let events = recorder.0.lock().unwrap();
    assert!(events.contains(&AgentEvent::Think {
        content: "plan".into()
    }));
    assert!(events.contains(&AgentEvent::Output {
        content: "x".into()
    }));
}

#[tokio::test]
async fn test_same_system_prompt_every_call() {
    let provider = ScriptedProvider::new(&[
        &think("a"),
        &think("b"),
        r#"{"step":"output","content":"x"}"#,
    ]);
    let (agent, _) = agent_with(provider.clone(), ToolRegistry::new());
    let agent = agent.with_system_prompt("fixed instruction");
    assert_ok!(agent.run("q").await.into_result());

    let systems = provider.systems.lock().unwrap();
    assert_eq!(systems.len(), 3);
    assert!(systems.iter().all(|s| s == "fixed instruction"));
}

#[tokio::test]
async fn test_invalid_json_aborts_without_more_requests() {
    let chatter = "Sure! Here are your files";
    let provider = ScriptedProvider::new(&[chatter, &think("unreachable")]);
    let (agent, recorder) = agent_with(provider.clone(), ToolRegistry::new());
    let (result, history) = agent.run_with_history("query").await;

    assert!(matches!(
        result,
        TerminalResult::Aborted(AgentError::Parse { ref raw, .. }) if raw == chatter
    ));
    assert_eq!(provider.calls(), 1);
    assert_eq!(history.len(), 1);
    assert!(matches!(
        recorder.0.lock().unwrap().last(),
        Some(AgentEvent::Aborted { .. })
    ));
}

#[tokio::test]
async fn test_unknown_step_aborts_after_recording_reply() {
    let reply = r#"{"step":"observe","content":"?"}"#;
    let provider = ScriptedProvider::new(&[reply, &think("unreachable")]);
    let (agent, _) = agent_with(provider.clone(), ToolRegistry::new());
    let (result, history) = agent.run_with_history("query").await;

    assert!(matches!(result, TerminalResult::Aborted(AgentError::Format(_))));
    assert_eq!(provider.calls(), 1);
    assert_eq!(history.last().unwrap(), &Message::assistant(reply));
}

#[tokio::test]
async fn test_unknown_tool_aborts_without_invoking() {
    let counter = Arc::new(CountingTool::default());
    let mut tools = ToolRegistry::new();
    tools.register(counter.clone());

    let reply = r#"{"step":"action","tool":"rm_rf","input":"/"}"#;
    let provider = ScriptedProvider::new(&[reply, &think("unreachable")]);
    let (agent, recorder) = agent_with(provider.clone(), tools);
    let (result, history) = agent.run_with_history("query").await;

    assert!(matches!(
        result,
        TerminalResult::Aborted(AgentError::UnknownTool(ref name)) if name == "rm_rf"
    ));
    assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.calls(), 1);
    assert_eq!(history.len(), 2);
    assert!(!history
        .messages()
        .iter()
        .any(|m| m.content.starts_with("OBSERVE:")));
    assert!(!recorder
        .0
        .lock()
        .unwrap()
        .iter()
        .any(|e| matches!(e, AgentEvent::Action { .. })));
}

#[tokio::test]
async fn test_tool_success_and_failure_are_observed() {
    let counter = Arc::new(CountingTool::default());
    let mut tools = ToolRegistry::new();
    tools.register(counter.clone());

    let provider = ScriptedProvider::new(&[
        r#"{"step":"action","tool":"count","input":"one"}"#,
        r#"{"step":"action","tool":"count","input":"fail"}"#,
        r#"{"step":"output","content":"counted"}"#,
    ]);
    let (agent, recorder) = agent_with(provider.clone(), tools);
    let (result, history) = agent.run_with_history("query").await;

    assert_eq!(assert_ok!(result.into_result()), "counted");
    assert_eq!(counter.calls.load(Ordering::SeqCst), 2);

    let messages = history.messages();
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[2], Message::user("OBSERVE: counted one"));
    assert_eq!(messages[4], Message::user("OBSERVE: Error - counter jammed"));

    let events = recorder.0.lock().unwrap();
    assert!(events.contains(&AgentEvent::Observe {
        output: "counted one".into()
    }));
    assert!(events.contains(&AgentEvent::ToolFailed {
        tool: "count".into(),
        error: "counter jammed".into()
    }));
}

#[tokio::test]
async fn test_transport_error_is_terminal() {
    let provider = ScriptedProvider::failing(AgentError::transport("503 overloaded"));
    let (agent, _) = agent_with(provider.clone(), ToolRegistry::new());
    let result = agent.run("query").await;

    let err = assert_err!(result.into_result());
    assert!(matches!(err, AgentError::Transport(ref m) if m.contains("503")));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_replies_recorded_byte_identical() {
    let replies = [
        "  {\"step\" : \"think\",\n \"content\": \"spacing\" }  ",
        "{\"step\":\"think\",\"content\":\"caf\\u00e9 ☕\",\"extra\":[1,2]}",
        "{\"content\":\"last\",\"step\":\"output\"}",
    ];
    let provider = ScriptedProvider::new(&replies);
    let (agent, _) = agent_with(provider, ToolRegistry::new());
    let (result, history) = agent.run_with_history("query").await;
    assert_eq!(result.text(), Some("last"));

    let assistant: Vec<&str> = history
        .messages()
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(assistant, replies);
}

#[cfg(unix)]
mod shell {
    use super::*;
    use thinkloop::core::config::ToolsConfig;

    #[tokio::test]
    async fn test_echo_observation() {
        let provider = ScriptedProvider::new(&[
            r#"{"step":"action","tool":"executeCommand","input":"echo hi"}"#,
            r#"{"step":"output","content":"said hi"}"#,
        ]);
        let (agent, _) = agent_with(
            provider,
            ToolRegistry::with_defaults(&ToolsConfig::default()),
        );
        let (result, history) = agent.run_with_history("say hi").await;

        assert!(result.is_completed());
        let observe = &history.messages()[2];
        assert_eq!(observe.role, Role::User);
        assert!(observe.content.starts_with("OBSERVE: stdout: hi"));
    }

    #[tokio::test]
    async fn test_failing_command_continues() {
        let provider = ScriptedProvider::new(&[
            r#"{"step":"action","tool":"executeCommand","input":"no-such-binary-thinkloop"}"#,
            r#"{"step":"output","content":"recovered"}"#,
        ]);
        let (agent, _) = agent_with(
            provider.clone(),
            ToolRegistry::with_defaults(&ToolsConfig::default()),
        );
        let (result, history) = agent.run_with_history("run it").await;

        assert_eq!(result.text(), Some("recovered"));
        assert_eq!(provider.calls(), 2);
        assert!(history.messages()[2]
            .content
            .starts_with("OBSERVE: Error - "));
    }
}
