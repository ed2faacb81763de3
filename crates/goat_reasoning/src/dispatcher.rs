//! Session context: owns every store and routes one command at a time.

use crate::command::Command;
use crate::error::DispatchError;
use crate::learning::{self, Discipline};
use crate::prompts;
use crate::sandbox::ArithmeticSandbox;
use crate::tool_registry::ToolRegistry;
use crate::tools::{self, register_builtins};
use goat_core::config::GoatConfig;
use goat_core::safety::CapabilityGuard;
use goat_core::tools::ToolError;
use goat_limbic::{Consciousness, MoodModel};
use goat_memory::{GoalTracker, MemoryRecord, MemoryStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const CONVERSATION_IMPORTANCE: f64 = 0.4;
const TOOL_USE_IMPORTANCE: f64 = 0.5;
/// Chars of tool input and output kept in a `tool_use` record.
const TOOL_RECORD_PREVIEW: usize = 200;
const RECALL_TOP_K: usize = 5;
const PROGRESS_BAR_CELLS: usize = 20;

/// What the shell should do with a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// Hand the text to the speech sink.
    pub speak: bool,
    /// End the session after printing.
    pub exit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speak: false,
            exit: false,
        }
    }

    fn spoken(text: impl Into<String>) -> Self {
        Self {
            speak: true,
            ..Self::text(text)
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

pub struct Dispatcher {
    config: GoatConfig,
    tools: ToolRegistry,
    memory: MemoryStore,
    goals: GoalTracker,
    mood: MoodModel,
    consciousness: Consciousness,
    learning_episodes: u64,
    successful_episodes: u64,
    rng: StdRng,
}

impl Dispatcher {
    /// Build a session with the built-in tools and an entropy-seeded RNG.
    pub fn new(config: GoatConfig) -> Result<Self, ToolError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Build a session with the built-in tools and a caller-supplied RNG.
    pub fn with_rng(config: GoatConfig, rng: StdRng) -> Result<Self, ToolError> {
        let guard = Arc::new(CapabilityGuard::new(config.safety.clone()));
        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry, guard, Box::new(ArithmeticSandbox::new()))?;
        Ok(Self::with_parts(config, registry, rng))
    }

    /// Build a session around an already-populated registry.
    pub fn with_parts(config: GoatConfig, tools: ToolRegistry, rng: StdRng) -> Self {
        tracing::info!(
            name = %config.ai_name,
            tools = tools.len(),
            max_goals = config.max_goals,
            memory_size = config.memory_size,
            "dispatcher ready"
        );
        Self {
            memory: MemoryStore::with_capacity(config.memory_size),
            goals: GoalTracker::new(config.max_goals),
            mood: MoodModel::new(),
            consciousness: Consciousness::new(),
            learning_episodes: 0,
            successful_episodes: 0,
            tools,
            config,
            rng,
        }
    }

    /// Handle one line of input and return the reply text.
    pub fn handle(&mut self, input: &str) -> String {
        self.handle_turn(input).text
    }

    /// Handle one line of input. Errors become a `⚠️` reply.
    pub fn handle_turn(&mut self, input: &str) -> Reply {
        match Command::parse(input).and_then(|command| self.execute(command)) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("command failed: {}", e);
                Reply::text(format!("⚠️ {}", e))
            }
        }
    }

    /// Run a parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Reply, DispatchError> {
        tracing::debug!(?command, "dispatch");
        if command.is_tool() && !self.config.tools_enabled {
            return Err(DispatchError::ToolsDisabled);
        }

        let reply = match command {
            Command::Search(query) => Reply::text(self.use_tool(tools::WEB_SEARCH, vec![query])?),
            Command::Calculate(expr) => Reply::text(self.use_tool(tools::CALCULATE, vec![expr])?),
            Command::WriteFile { name, content } => {
                Reply::text(self.use_tool(tools::WRITE_FILE, vec![name, content])?)
            }
            Command::ReadFile(name) => Reply::text(self.use_tool(tools::READ_FILE, vec![name])?),
            Command::Run(code) => Reply::text(self.use_tool(tools::RUN_CODE, vec![code])?),

            Command::AddGoal(description) => {
                let id = self.goals.add_goal(&description, 1)?;
                Reply::text(format!("Goal added: {} (id {})", description, id))
            }
            Command::Progress { id, value } => {
                let update = self.goals.update_progress(id, value)?;
                if update.completed {
                    let description = self
                        .goals
                        .get(id)
                        .map(|g| g.description.as_str())
                        .unwrap_or_default();
                    Reply::text(format!("Goal completed: {}", description))
                } else {
                    Reply::text(format!(
                        "Progress updated for goal {}: {:.1}%",
                        id,
                        update.progress * 100.0
                    ))
                }
            }
            Command::Complete(id) => {
                let goal = self.goals.complete_goal(id)?;
                Reply::text(format!("Goal completed: {}", goal.description))
            }

            Command::Recall(query) => Reply::text(self.recall_view(&query)),
            Command::Learn(discipline) => Reply::text(self.learn(discipline)),
            Command::Status => Reply::text(self.status_view()),
            Command::Goals => Reply::text(self.goals_view()),
            Command::Memory => Reply::text(self.memory_view()),
            Command::Help => Reply::text(self.help_view()),
            Command::Exit => Reply {
                exit: true,
                ..Reply::spoken(prompts::FAREWELL)
            },
            Command::Chat(message) => Reply::spoken(self.converse(&message)),
        };
        Ok(reply)
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    /// Invoke a tool and log the successful use. Failures leave the stores untouched.
    fn use_tool(&mut self, name: &str, args: Vec<String>) -> Result<String, ToolError> {
        let output = self.tools.invoke(name, &args)?;
        self.memory.append(
            MemoryRecord::new("tool_use", TOOL_USE_IMPORTANCE)
                .with_field("tool", name)
                .with_field("input", preview(&args.join(" ")))
                .with_field("output", preview(&output)),
        );
        Ok(output)
    }

    fn learn(&mut self, discipline: Discipline) -> String {
        let outcome = learning::practice(discipline, self.config.learning_rate, &mut self.rng);
        self.mood.react(outcome.reward);
        self.learning_episodes += 1;
        if outcome.success {
            self.successful_episodes += 1;
        }
        self.consciousness.reflect(self.success_rate());
        self.memory.append(outcome.to_record());
        tracing::info!(
            %discipline,
            success = outcome.success,
            episodes = self.learning_episodes,
            "learning session finished"
        );
        outcome.message()
    }

    fn converse(&mut self, message: &str) -> String {
        let lowered = message.to_lowercase();
        let mood = self.mood.current_mood();

        let response = if lowered.contains("hello") || lowered.split_whitespace().any(is_hi) {
            self.pick(&prompts::GREETING_REPLIES).to_string()
        } else if lowered.contains("how are you") {
            let replies = prompts::wellbeing_replies(
                mood.as_str(),
                self.consciousness.self_awareness(),
                self.learning_episodes,
            );
            let idx = self.rng.gen_range(0..replies.len());
            replies[idx].clone()
        } else if lowered.contains("learn") {
            self.pick(&prompts::LEARNING_REPLIES).to_string()
        } else {
            self.pick(&prompts::GENERIC_REPLIES).to_string()
        };

        self.memory.append(
            MemoryRecord::new("conversation", CONVERSATION_IMPORTANCE)
                .with_field("user_message", message)
                .with_field("ai_response", response.as_str())
                .with_field("mood", mood.as_str()),
        );
        response
    }

    fn pick(&mut self, options: &[&'static str]) -> &'static str {
        options[self.rng.gen_range(0..options.len())]
    }

    fn success_rate(&self) -> Option<f64> {
        (self.learning_episodes > 0)
            .then(|| self.successful_episodes as f64 / self.learning_episodes as f64)
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    pub fn greeting(&self) -> String {
        prompts::greeting(&self.config.ai_name)
    }

    pub fn status_view(&self) -> String {
        [
            format!("🤖 {} Status:", self.config.ai_name),
            format!("📊 Learning Episodes: {}", self.learning_episodes),
            format!(
                "🎯 Active Goals: {}/{}",
                self.goals.active_count(),
                self.goals.max_active()
            ),
            format!("💾 Memories: {}", self.memory.len()),
            format!("😊 Mood: {}", self.mood.current_mood()),
            format!(
                "🧠 Consciousness: {:.3} (focus: {})",
                self.consciousness.self_awareness(),
                self.consciousness.focus()
            ),
            format!("🔧 Tools: {} available", self.tools.len()),
        ]
        .join("\n")
    }

    pub fn goals_view(&self) -> String {
        let active = self.goals.active();
        if active.is_empty() {
            return "No active goals. Use 'add_goal <description>' to create one.".to_string();
        }

        let mut lines = vec![format!("🎯 Active Goals ({}):", active.len())];
        for goal in active {
            let filled = ((goal.progress * PROGRESS_BAR_CELLS as f64) as usize).min(PROGRESS_BAR_CELLS);
            let bar = format!(
                "{}{}",
                "█".repeat(filled),
                "░".repeat(PROGRESS_BAR_CELLS - filled)
            );
            lines.push(format!("  {}. {}", goal.id, goal.description));
            lines.push(format!(
                "     Progress: [{}] {:.1}%",
                bar,
                goal.progress * 100.0
            ));
        }
        lines.join("\n")
    }

    pub fn memory_view(&self) -> String {
        let mut lines = vec!["💾 Memory Statistics:".to_string()];
        for (kind, count) in self.memory.stats() {
            lines.push(format!("  {}: {}", kind, count));
        }
        lines.push(format!("  Total: {} memories", self.memory.len()));
        lines.join("\n")
    }

    pub fn recall_view(&self, query: &str) -> String {
        let hits = self.memory.search_similar(query, RECALL_TOP_K);
        if hits.is_empty() {
            return format!("No memories match '{}'.", query);
        }

        let mut lines = vec![format!("🔎 Recall for '{}':", query)];
        for hit in hits {
            let fields = serde_json::to_string(hit.record.fields()).unwrap_or_default();
            lines.push(format!(
                "  [{:.2}] {}: {}",
                hit.score,
                hit.record.kind(),
                fields
            ));
        }
        lines.join("\n")
    }

    pub fn help_view(&self) -> String {
        [
            format!("🤖 {} - Available Commands:", self.config.ai_name),
            String::new(),
            "🔧 TOOLS:".into(),
            "  search <query>              - Search the web (simulated)".into(),
            "  calculate <expression>      - Do math calculations".into(),
            "  write_file <name> <content> - Write to file".into(),
            "  read_file <name>            - Read from file".into(),
            "  run <code>                  - Run code in the sandbox".into(),
            String::new(),
            "🎯 GOALS:".into(),
            "  add_goal <description>      - Add new goal".into(),
            "  progress <id> <value>       - Update goal progress (0.0-1.0)".into(),
            "  complete <id>               - Mark a goal completed".into(),
            "  goals                       - Show active goals".into(),
            String::new(),
            "📚 LEARNING:".into(),
            "  learn code                  - Practice coding".into(),
            "  learn logic                 - Solve logic puzzles".into(),
            "  memory                      - Show memory stats".into(),
            "  recall <query>              - Search memories".into(),
            String::new(),
            "ℹ️  INFO:".into(),
            "  status                      - System status".into(),
            "  help                        - This message".into(),
            "  exit | quit | bye           - End the session".into(),
            String::new(),
            "💬 CHAT:".into(),
            "  Just type normally to chat!".into(),
            String::new(),
            "Example: 'search artificial intelligence' or 'calculate 2+2*3'".into(),
        ]
        .join("\n")
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &GoatConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn goals(&self) -> &GoalTracker {
        &self.goals
    }

    pub fn mood(&self) -> &MoodModel {
        &self.mood
    }

    pub fn consciousness(&self) -> &Consciousness {
        &self.consciousness
    }

    pub fn learning_episodes(&self) -> u64 {
        self.learning_episodes
    }
}

/// Whole-word "hi", ignoring trailing punctuation.
fn is_hi(word: &str) -> bool {
    word.trim_matches(|c: char| !c.is_alphanumeric()) == "hi"
}

fn preview(text: &str) -> String {
    text.chars().take(TOOL_RECORD_PREVIEW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::with_rng(GoatConfig::default(), StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn test_hi_is_whole_word() {
        assert!(is_hi("hi"));
        assert!(is_hi("hi!"));
        assert!(!is_hi("this"));
        assert!(!is_hi("high"));
    }

    #[test]
    fn test_greeting_reply() {
        let mut d = dispatcher();
        let reply = d.handle_turn("hi there");
        assert!(reply.speak);
        assert!(prompts::GREETING_REPLIES.contains(&reply.text.as_str()));
    }

    #[test]
    fn test_this_is_not_a_greeting() {
        let mut d = dispatcher();
        let reply = d.handle("this is nice");
        assert!(prompts::GENERIC_REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn test_conversation_record_fields() {
        let mut d = dispatcher();
        d.handle("Tell me about Goats");
        let record = d.memory().iter().last().unwrap();
        assert_eq!(record.kind(), "conversation");
        assert_eq!(record.importance(), CONVERSATION_IMPORTANCE);
        assert_eq!(record.field("user_message").unwrap(), "Tell me about Goats");
        assert_eq!(record.field("mood").unwrap(), "calm");
        assert!(record.field("ai_response").is_some());
    }

    #[test]
    fn test_goals_view_bar() {
        let mut d = dispatcher();
        d.handle("add_goal write tests");
        d.handle("progress 1 0.5");
        let view = d.goals_view();
        assert!(view.contains("1. write tests"));
        assert!(view.contains(&format!("[{}{}] 50.0%", "█".repeat(10), "░".repeat(10))));
    }

    #[test]
    fn test_exit_reply() {
        let mut d = dispatcher();
        let reply = d.handle_turn("exit");
        assert!(reply.exit);
        assert!(reply.speak);
        assert_eq!(reply.text, prompts::FAREWELL);
    }
}
