/// Returns the id following the largest one in `existing`, or 1 when there is none.
///
/// Ids handed out this way are strictly increasing for as long as the
/// largest id stays in the collection. Returns `None` once the largest id is
/// `usize::MAX`.
pub fn next_id<I>(existing: I) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    match existing.into_iter().max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}
