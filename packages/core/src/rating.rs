//! Aggregate rating computation.
//!
//! The mean is computed exactly over the integer sum and count and then
//! rounded half-up to one decimal place, so the result depends only on the
//! current set of ratings and never on the order they arrived in.

/// Lowest accepted review rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted review rating.
pub const MAX_RATING: u8 = 5;

/// Mean of `ratings` rounded half-up to one decimal. Returns `0.0` for an
/// empty input.
pub fn average_rating<I>(ratings: I) -> f64
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), r| (sum + u64::from(r), count + 1));

    if count == 0 {
        return 0.0;
    }

    // floor(10 * sum / count + 1/2) == floor((20 * sum + count) / (2 * count))
    let tenths = (20 * sum + count) / (2 * count);
    tenths as f64 / 10.0
}
