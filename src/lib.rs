//! Probing the hidden layer of a prisoner's dilemma network: record what its
//! neurons do over a match, summarise each neuron in feature space, and ask a
//! language model to explain them.

pub mod action;
pub mod aggregate;
pub mod cli;
pub mod correlation;
pub mod error;
pub mod explain;
pub mod features;
pub mod game;
pub mod log;
pub mod manifest;
pub mod metrics;
pub mod network;
pub mod prompt;
pub mod recorder;
pub mod report;
pub mod session;
pub mod strategies;
pub mod utils;
pub mod weights;

pub use action::{Action, History};
pub use aggregate::{AggregationPolicy, ProfileMatrix};
pub use correlation::correlation_matrix;
pub use error::{Error, Result};
pub use explain::{CompletionService, OpenAiClient, explain_all};
pub use game::{Match, MatchResult, Strategy};
pub use network::{Network, WeightSet};
pub use recorder::{ActivationLog, ActivationRecorder};
pub use session::{OutputPaths, RecordingSession};
pub use weights::{WeightCatalog, WeightSource};
