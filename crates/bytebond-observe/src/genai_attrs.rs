//! OpenTelemetry GenAI semantic convention attribute names and the
//! operation values ByteBond records under them.
//!
//! `tracing` field names must be literal identifiers, so spans spell these
//! out inline; the constants are the single place that lists them.

/// The name of the operation being performed (e.g., "generate").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "gemini").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model ID requested (e.g., "gemini-1.5-flash").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The display name of the companion.
pub const GEN_AI_AGENT_NAME: &str = "gen_ai.agent.name";

// --- Operation name values ---

/// One generation attempt against the backend.
pub const OP_GENERATE: &str = "generate";

/// A full orchestrated turn (retrieve, generate, persist).
pub const OP_TURN: &str = "turn";

/// A single `say` invocation from the command line.
pub const OP_SAY: &str = "say";

/// An interactive chat session.
pub const OP_CHAT: &str = "chat";

// --- Provider name values ---

pub const PROVIDER_GEMINI: &str = "gemini";
