//! Log ingestion: cursor, line rules, classifier, audit archive.
//!
//! ## Key Types
//!
//! - `LogCursor`: Byte offset that never splits a line
//! - `RuleSet`: Ordered line patterns, first match wins
//! - `Classifier`: Phase machine applying events to `MatchState`
//! - `AuditSink`: Verbatim archive of in-game lines

pub mod audit;
pub mod classifier;
pub mod event;
pub mod reader;
pub mod rules;

pub use audit::{AuditSink, NullSink, WriterSink};
pub use classifier::{Classifier, Phase};
pub use event::{EntityDescriptor, LogEvent};
pub use reader::{LineSource, LogCursor, LogTail, MemoryLog};
pub use rules::{RuleKind, RuleSet};
