use crate::actors::completion::{CompletionActorHandle, CompletionServiceConfig};
use crate::actors::messages::{ActorError, AppError, ComposerMessage};
use crate::actors::traits::CompletionActor;
use crate::analysis::{KnowledgeBase, KnowledgeEntry, RiskAssessment, RiskScorer};
use crate::models::{CompletionConfig, Turn};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument};

/// Persona instruction sent to the completion service for free-form questions.
const SYSTEM_PROMPT: &str = "\
You are CyberShield AI, a cybersecurity and fraud detection assistant.

For every response:
- Clearly explain the threat
- Identify attack type
- Explain why it is dangerous
- Provide technical prevention controls
- Provide user awareness advice
- Give step-by-step protection recommendations
- Keep response professional, structured, and actionable";

/// Footer appended to knowledge-base replies.
const AWARENESS_FOOTER: &str = "🛡 Awareness Advice:\n\
Always verify suspicious communications, enable MFA, and never share sensitive credentials.";

/// Footer appended to model-generated and fallback replies.
const PROTECTION_CHECKLIST: &str = "🔐 General Protection Checklist:\n\
• Enable Multi-Factor Authentication (MFA)\n\
• Use strong unique passwords\n\
• Keep systems updated\n\
• Avoid suspicious links\n\
• Verify sender identity before sharing data";

/// Body used when the completion service cannot produce a reply.
const FALLBACK_BODY: &str = "\
The security assistant could not be reached right now, so only the local risk assessment \
above is available. Please try again shortly. Until then: do not click unexpected links, \
never share credentials or one-time codes, and verify any request through official channels.";

const RESPOND_TIMEOUT: Duration = Duration::from_secs(150);

/// A handle to the `ComposerActor`.
///
/// This is the primary entry point for reply generation. It orchestrates the
/// risk scorer, the knowledge base, and the `CompletionActor` to turn one
/// user message (plus optional prior turns) into the final reply text.
#[derive(Clone)]
pub struct ComposerHandle {
    sender: mpsc::Sender<ComposerMessage>,
}

impl ComposerHandle {
    /// Creates a new `ComposerActor` backed by a freshly spawned
    /// `CompletionActor`, and returns a handle to it.
    pub fn new(service: CompletionServiceConfig) -> Self {
        let completion = Arc::new(CompletionActorHandle::new(service));
        Self::with_completion_actor(completion)
    }

    /// Creates a new `ComposerActor` over an existing completion actor.
    /// Used directly by tests to substitute a mock backend.
    pub fn with_completion_actor<C>(completion: Arc<C>) -> Self
    where
        C: CompletionActor,
    {
        let (sender, receiver) = mpsc::channel(32);
        let actor = ComposerRunner::new(receiver, completion);
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }

    /// A convenience method for composing a reply without prior turns.
    pub async fn respond(
        &self,
        message: String,
        config: CompletionConfig,
    ) -> Result<String, AppError> {
        self.respond_with_history(message, Vec::new(), config).await
    }

    /// Composes the assistant reply for `message`, given the conversation's
    /// prior turns (oldest first).
    ///
    /// # Returns
    ///
    /// The complete reply text. The reply is assembled in full before it is
    /// returned; there is no partial delivery.
    #[instrument(skip(self, history, config))]
    pub async fn respond_with_history(
        &self,
        message: String,
        history: Vec<Turn>,
        config: CompletionConfig,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = ComposerMessage::Respond {
            message,
            history,
            config,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?;
        timeout(RESPOND_TIMEOUT, recv)
            .await?
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?
    }
}

// --- Actor Runner ---
struct ComposerRunner<C>
where
    C: CompletionActor,
{
    receiver: mpsc::Receiver<ComposerMessage>,
    completion: Arc<C>,
    scorer: RiskScorer,
    knowledge: KnowledgeBase,
}

impl<C> ComposerRunner<C>
where
    C: CompletionActor,
{
    fn new(receiver: mpsc::Receiver<ComposerMessage>, completion: Arc<C>) -> Self {
        Self {
            receiver,
            completion,
            scorer: RiskScorer::new(),
            knowledge: KnowledgeBase::new(),
        }
    }

    async fn run(mut self) {
        info!("Composer started");
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }
        info!("Composer stopped");
    }

    async fn handle_message(&mut self, msg: ComposerMessage) {
        match msg {
            ComposerMessage::Respond {
                message,
                history,
                config,
                responder,
            } => {
                let result = self.handle_respond(message, history, config).await;
                if let Err(e) = &result {
                    error!("Error composing reply: {:?}", e);
                }
                let _ = responder.send(result);
            }
        }
    }

    #[instrument(skip(self, history, config))]
    async fn handle_respond(
        &mut self,
        message: String,
        history: Vec<Turn>,
        config: CompletionConfig,
    ) -> Result<String, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::Validation("Message text is empty".to_string()));
        }

        // Both are local, total computations; the banner is available even
        // when the completion service is not.
        let assessment = self.scorer.score(&message);
        info!(score = assessment.score, level = %assessment.level, "Message scored");

        if let Some(entry) = self.knowledge.lookup(&message) {
            info!(topic = entry.topic, "Knowledge base hit");
            return Ok(compose_knowledge_reply(&assessment, entry));
        }

        match self
            .completion
            .complete(SYSTEM_PROMPT.to_string(), history, message, config)
            .await
        {
            Ok(body) => Ok(compose_model_reply(&assessment, &body)),
            Err(e) if e.is_completion_failure() => {
                error!("Completion service failed, degrading to fallback reply: {}", e);
                Ok(compose_fallback_reply(&assessment))
            }
            Err(e) => Err(e),
        }
    }
}

fn compose_knowledge_reply(assessment: &RiskAssessment, entry: &KnowledgeEntry) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        assessment.banner(),
        entry.render(),
        AWARENESS_FOOTER
    )
}

fn compose_model_reply(assessment: &RiskAssessment, body: &str) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        assessment.banner(),
        body.trim(),
        PROTECTION_CHECKLIST
    )
}

fn compose_fallback_reply(assessment: &RiskAssessment) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        assessment.banner(),
        FALLBACK_BODY,
        PROTECTION_CHECKLIST
    )
}
