/// Specifies the direction for sorting documents.
///
/// Used with [`crate::collection::order_by`] and the aggregation `Sort` stage
/// to control result ordering.
///
/// ```text
/// let options = order_by("price", SortOrder::Descending);
/// let cursor = collection.find_with_options(all(), &options)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest, A-Z)
    Ascending,
    /// Sort in descending order (largest to smallest, Z-A)
    Descending,
}
