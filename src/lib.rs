pub mod io;
pub mod llm;
pub mod models;
pub mod query;
pub mod segment;

pub use io::{load_transcript_file, AnalysisExport, TranscriptStatistics};
pub use llm::{AnthropicClient, AnthropicConfig, GatewayError, ModelGateway, ParseFailure};
pub use models::{DecisionRecord, MemberProfile, Message, Progress, QueryKind, TranscriptIndex, Week};
pub use query::{select_context, QueryError, QueryOrchestrator, QueryRequest, QueryResponse};
pub use segment::{parse_messages, segment_transcript, SegmentError};
