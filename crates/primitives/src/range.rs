/// A position in the text, measured in characters (not bytes).
///
/// This is the canonical coordinate space for cloak. Buffer offsets, trivia
/// boundaries and composite positions all use it.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// A half-open character range `[start, end)`.
pub type CharRange = std::ops::Range<CharIdx>;

/// Returns true if `inner` lies entirely within `outer`.
///
/// Empty ranges are contained when their position is inside `outer` or at
/// its end.
#[inline]
pub fn contains(outer: &CharRange, inner: &CharRange) -> bool {
	inner.start >= outer.start && inner.end <= outer.end && inner.start <= inner.end
}
