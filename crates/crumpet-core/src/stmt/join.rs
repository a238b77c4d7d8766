/// A resolved join entry on a select.
///
/// Only owning-side (to-one) references can be joined; the builder resolves
/// the reference into concrete table and column names so the serializer can
/// emit `JOIN target ON base.fk = target.pk` without schema access.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Reference name; joined columns are aliased `"<reference>.<column>"`
    pub reference: String,

    /// Target table
    pub table: String,

    /// Foreign-key column on the base table
    pub owning_column: String,

    /// Primary-key column on the target table
    pub target_pk_column: String,

    /// Target storage columns to project (the join's `select` subset, or
    /// every target column when no subset was given)
    pub columns: Vec<String>,
}
