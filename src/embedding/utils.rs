use std::io;
use std::path::Path;

use tokenizers::{Tokenizer, TruncationParams};

/// Loads `tokenizer.json` from a model directory with truncation at `max_len`.
pub(crate) fn load_tokenizer(model_dir: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let path = model_dir.join("tokenizer.json");
    let mut tokenizer = Tokenizer::from_file(&path).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };
    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("failed to configure truncation: {e}")))?;
    // Padding stays off: texts are encoded one at a time.
    tokenizer.with_padding(None);

    Ok(tokenizer)
}
