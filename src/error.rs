/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, AnnError>;

/// Everything that can go wrong while building, copying or persisting a network.
#[derive(Debug, thiserror::Error)]
pub enum AnnError {
    /// The requested shape violates a layout constraint, or its derived
    /// totals do not fit in `usize`.
    #[error(
        "invalid shape: inputs={inputs} hidden_layers={hidden_layers} \
         hidden={hidden} outputs={outputs}"
    )]
    InvalidShape {
        inputs: usize,
        hidden_layers: usize,
        hidden: usize,
        outputs: usize,
    },

    /// A buffer of `len` values could not be reserved.
    #[error("could not allocate a buffer of {len} values")]
    Allocation { len: usize },

    /// A text model was malformed or truncated.
    #[error("parse error: expected {what}, found {found:?}")]
    Parse { what: String, found: String },

    /// A JSON snapshot decoded but its buffers disagree with its shape.
    #[error("inconsistent snapshot: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Reserves exactly `len` zeroed values, surfacing allocation failure
/// instead of aborting.
pub(crate) fn alloc_zeroed(len: usize) -> Result<Vec<f64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| AnnError::Allocation { len })?;
    buf.resize(len, 0.0);
    Ok(buf)
}
