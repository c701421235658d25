/// Batch size used when nothing else is configured; one below the service's per-call limit.
pub const DEFAULT_BATCH_SIZE: usize = 99;

/// Most mints the token-metadata endpoint accepts in one request.
pub const MAX_BATCH_SIZE: usize = 100;

/// Splits `mints` into contiguous chunks of at most `size` identifiers, in input order.
///
/// A `size` of zero is treated as one.
pub fn batches(mints: &[String], size: usize) -> impl Iterator<Item = &[String]> {
    mints.chunks(size.max(1))
}
