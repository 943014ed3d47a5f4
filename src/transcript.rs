//! Whole-transcript decoding.
//!
//! [`TranscriptDecoder`] turns an ordered sequence of JSON records into
//! ordered entries. Large inputs are split into contiguous chunks decoded on
//! scoped worker threads; output order always equals input order.

use crate::model::{DecodeError, TranscriptEntry, TranscriptError};
use crate::parser::decode_entry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroUsize;
use std::thread;
use tracing::{debug, warn};

/// Default record count at which decoding goes parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// What to do with a record that fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Drop the record, report it in [`DecodedTranscript::skipped`].
    #[default]
    Skip,
    /// Fail the whole transcript on the first (lowest index) bad record.
    Abort,
}

/// Tuning knobs for [`TranscriptDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Handling of records that fail to decode.
    pub on_error: ErrorPolicy,
    /// Inputs shorter than this are decoded on the calling thread.
    pub parallel_threshold: usize,
    /// Worker count; 0 means the available parallelism.
    pub worker_threads: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            on_error: ErrorPolicy::Skip,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            worker_threads: 0,
        }
    }
}

/// A record dropped under [`ErrorPolicy::Skip`].
#[derive(Debug)]
pub struct SkippedRecord {
    /// 0-based position in the input.
    pub index: usize,
    /// Why the record was dropped.
    pub error: DecodeError,
}

/// Output of [`TranscriptDecoder::decode`].
#[derive(Debug, Default)]
pub struct DecodedTranscript {
    /// Decoded entries in input order.
    pub entries: Vec<TranscriptEntry>,
    /// Records dropped under [`ErrorPolicy::Skip`], by ascending index.
    pub skipped: Vec<SkippedRecord>,
}

/// Decodes whole transcripts according to [`DecoderOptions`].
#[derive(Debug, Clone, Default)]
pub struct TranscriptDecoder {
    options: DecoderOptions,
}

impl TranscriptDecoder {
    /// Create a decoder with the given options.
    pub fn new(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Options this decoder was built with.
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decode `records` in order.
    ///
    /// # Errors
    ///
    /// Under [`ErrorPolicy::Abort`], returns [`TranscriptError::Record`] for
    /// the lowest failing index. Under [`ErrorPolicy::Skip`] this never fails.
    pub fn decode(&self, records: Vec<Value>) -> Result<DecodedTranscript, TranscriptError> {
        let total = records.len();
        let workers = self.worker_count().min(total.max(1));

        let results = if total < self.options.parallel_threshold || workers <= 1 {
            decode_sequential(records, self.options.on_error)
        } else {
            debug!("Decoding {} records on {} workers", total, workers);
            decode_parallel(records, workers)
        };

        let mut decoded = DecodedTranscript {
            entries: Vec::with_capacity(results.len()),
            skipped: Vec::new(),
        };

        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(entry) => decoded.entries.push(entry),
                Err(source) => match self.options.on_error {
                    ErrorPolicy::Abort => return Err(TranscriptError::Record { index, source }),
                    ErrorPolicy::Skip => {
                        warn!("Skipping record {}: {}", index, source);
                        decoded.skipped.push(SkippedRecord {
                            index,
                            error: source,
                        });
                    }
                },
            }
        }

        debug!(
            decoded = decoded.entries.len(),
            skipped = decoded.skipped.len(),
            "transcript decoded"
        );
        Ok(decoded)
    }

    fn worker_count(&self) -> usize {
        match self.options.worker_threads {
            0 => thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            n => n,
        }
    }
}

/// Decode on the calling thread, stopping at the first failure under abort.
fn decode_sequential(
    records: Vec<Value>,
    on_error: ErrorPolicy,
) -> Vec<Result<TranscriptEntry, DecodeError>> {
    let mut results = Vec::with_capacity(records.len());
    for record in records {
        let result = decode_entry(record);
        let failed = result.is_err();
        results.push(result);
        if failed && on_error == ErrorPolicy::Abort {
            break;
        }
    }
    results
}

/// Decode contiguous chunks on scoped threads and concatenate them in
/// chunk order, so result `i` belongs to record `i`.
fn decode_parallel(
    records: Vec<Value>,
    workers: usize,
) -> Vec<Result<TranscriptEntry, DecodeError>> {
    let total = records.len();
    let chunk_size = total.div_ceil(workers);

    let mut chunks = Vec::with_capacity(workers);
    let mut remaining = records.into_iter();
    loop {
        let chunk: Vec<Value> = remaining.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }

    let decoded: Vec<Vec<Result<TranscriptEntry, DecodeError>>> = thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                scope.spawn(move || chunk.into_iter().map(decode_entry).collect::<Vec<_>>())
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    });

    let mut results = Vec::with_capacity(total);
    for chunk in decoded {
        results.extend(chunk);
    }
    results
}
