pub mod cli;
pub mod codec;
pub mod constants;
pub mod convert;
pub mod error;
pub mod formats;
pub mod logger;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod retrieval;
pub mod selection;
pub mod session;
pub mod size;
pub mod stats;

pub use codec::{ImageCodec, RasterCodec};
pub use convert::{convert_item, output_name_for, ConversionOptions};
pub use error::{Result, SqueezeError};
pub use formats::TargetFormat;
pub use model::{ConversionResult, SourceId, SourceItem};
pub use pipeline::{run_batch, BatchOutcome, CancelToken, ConversionFailure};
pub use progress::{ConsoleProgressReporter, NoOpProgressReporter, Progress, ProgressReporter};
pub use retrieval::{retrieve_all, retrieve_one, DirectorySink, RetrievalOptions, SaveSink};
pub use selection::{accept_candidates, gather_candidates, CandidateFile, IdAllocator};
pub use session::{BatchState, Session, SessionSnapshot};
pub use size::format_file_size;
pub use stats::BatchStats;
