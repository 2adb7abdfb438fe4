//! End-to-end dialogue tests
//!
//! Runs the orchestrator built from configuration against scripted
//! providers and checks transcript shape and history growth.

use async_trait::async_trait;
use duologue::agent::DialogueOrchestrator;
use duologue::core::config::API_KEY_VAR;
use duologue::core::{Config, DuologueError, Message, Role};
use duologue::llm::{CompletionProvider, GenerateOptions, LLMResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Replies with the incoming user message unchanged
#[derive(Default)]
struct Echo {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionProvider for Echo {
    async fn chat(
        &self,
        messages: &[Message],
        _options: Option<GenerateOptions>,
    ) -> duologue::Result<LLMResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let input = messages
            .last()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(LLMResponse::text(input, "echo"))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Succeeds `ok_calls` times, then fails every call
struct FailAfter {
    ok_calls: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionProvider for FailAfter {
    async fn chat(
        &self,
        _messages: &[Message],
        _options: Option<GenerateOptions>,
    ) -> duologue::Result<LLMResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.ok_calls {
            Ok(LLMResponse::text(format!("ok {}", n + 1), "fail-after"))
        } else {
            Err(DuologueError::RequestFailed {
                provider: "fail-after".into(),
                reason: "HTTP 503: unavailable".into(),
            })
        }
    }

    fn name(&self) -> &str {
        "fail-after"
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.apply_env(|key| (key == API_KEY_VAR).then(|| "sk-test".to_string()));
    config
}

fn printed_lines(output: &[u8]) -> Vec<String> {
    String::from_utf8(output.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn history_grows_linearly_with_rounds() {
    for rounds in 0..5 {
        let mut dialogue = DialogueOrchestrator::with_provider(&config(), Arc::new(Echo::default()))
            .unwrap()
            .with_output(Vec::new());

        dialogue.run(rounds, "seed").await.unwrap();

        assert_eq!(dialogue.initiator().history().len(), 2 * rounds);
        assert_eq!(dialogue.responder().history().len(), 2 * rounds);
    }
}

#[tokio::test]
async fn echo_provider_repeats_the_seed() {
    let provider = Arc::new(Echo::default());
    let mut dialogue = DialogueOrchestrator::with_provider(&config(), provider.clone())
        .unwrap()
        .with_output(Vec::new());

    let transcript = dialogue.run(2, "M0").await.unwrap();

    assert_eq!(
        printed_lines(dialogue.output()),
        vec![
            "repository : M0",
            "developer : M0",
            "repository : M0",
            "developer : M0",
        ]
    );
    assert_eq!(transcript.len(), 4);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);

    for agent in [dialogue.initiator(), dialogue.responder()] {
        let history: Vec<&Message> = agent.history().messages().collect();
        assert_eq!(
            history,
            vec![
                &Message::user("M0"),
                &Message::assistant("M0"),
                &Message::user("M0"),
                &Message::assistant("M0"),
            ]
        );
    }
}

#[tokio::test]
async fn transcript_alternates_responder_then_initiator() {
    let rounds = 3;
    let mut dialogue = DialogueOrchestrator::with_provider(&config(), Arc::new(Echo::default()))
        .unwrap()
        .with_output(Vec::new());

    let transcript = dialogue.run(rounds, "hi").await.unwrap();
    let printed = printed_lines(dialogue.output());

    assert_eq!(printed.len(), 2 * rounds);
    assert_eq!(transcript.len(), 2 * rounds);
    for (i, line) in printed.iter().enumerate() {
        let expected = if i % 2 == 0 { "repository" } else { "developer" };
        assert!(line.starts_with(&format!("{expected} : ")), "line {i}: {line}");
        assert_eq!(transcript.lines()[i].speaker, expected);
    }
}

#[test]
fn missing_credential_stops_before_any_turn() {
    let provider = Arc::new(Echo::default());
    let result = DialogueOrchestrator::with_provider(&Config::default(), provider.clone());

    match result {
        Err(DuologueError::MissingCredential(var)) => assert_eq!(var, API_KEY_VAR),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("orchestrator built without a credential"),
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

    let err = DialogueOrchestrator::from_config(&Config::default()).err().unwrap();
    assert!(err.is_startup());
}

#[tokio::test]
async fn failure_on_second_call_halts_after_one_turn() {
    let provider = Arc::new(FailAfter {
        ok_calls: 1,
        calls: AtomicUsize::new(0),
    });
    let mut dialogue = DialogueOrchestrator::with_provider(&config(), provider.clone())
        .unwrap()
        .with_output(Vec::new());

    let err = dialogue.run(2, "seed").await.unwrap_err();
    assert!(matches!(err, DuologueError::RequestFailed { .. }));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

    assert_eq!(printed_lines(dialogue.output()), vec!["repository : ok 1"]);

    let responder: Vec<&Message> = dialogue.responder().history().messages().collect();
    assert_eq!(
        responder,
        vec![&Message::user("seed"), &Message::assistant("ok 1")]
    );
    assert!(dialogue.initiator().history().is_empty());
}

#[tokio::test]
async fn seed_line_printed_only_when_enabled() {
    let mut config = config();
    config.dialogue.announce_seed = true;

    let mut dialogue = DialogueOrchestrator::with_provider(&config, Arc::new(Echo::default()))
        .unwrap()
        .with_output(Vec::new());
    let transcript = dialogue.run(1, "M0").await.unwrap();

    assert_eq!(
        printed_lines(dialogue.output()),
        vec!["developer : M0", "repository : M0", "developer : M0"]
    );
    assert_eq!(transcript.len(), 2);
}

#[tokio::test]
async fn history_cap_bounds_long_runs() {
    let mut config = config();
    config.dialogue.max_history = Some(4);

    let mut dialogue = DialogueOrchestrator::with_provider(&config, Arc::new(Echo::default()))
        .unwrap()
        .with_output(Vec::new());
    dialogue.run(6, "seed").await.unwrap();

    assert_eq!(dialogue.initiator().history().len(), 4);
    assert_eq!(dialogue.responder().history().len(), 4);
    assert_eq!(
        dialogue.responder().history().messages().next().unwrap().role,
        Role::User
    );
}

#[tokio::test]
async fn configured_sampling_reaches_the_provider() {
    #[derive(Default)]
    struct Capture {
        seen: std::sync::Mutex<Vec<Option<GenerateOptions>>>,
    }

    #[async_trait]
    impl CompletionProvider for Capture {
        async fn chat(
            &self,
            _messages: &[Message],
            options: Option<GenerateOptions>,
        ) -> duologue::Result<LLMResponse> {
            self.seen.lock().unwrap().push(options);
            Ok(LLMResponse::text("x", "capture"))
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    let mut config = config();
    config.completion.temperature = 0.3;
    config.completion.max_tokens = 50;

    let provider = Arc::new(Capture::default());
    let mut dialogue = DialogueOrchestrator::with_provider(&config, provider.clone())
        .unwrap()
        .with_output(std::io::sink());
    dialogue.run(1, "seed").await.unwrap();

    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    for options in seen.iter() {
        let options = options.as_ref().unwrap();
        assert_eq!(options.temperature, Some(0.3));
        assert_eq!(options.max_tokens, Some(50));
    }
}
