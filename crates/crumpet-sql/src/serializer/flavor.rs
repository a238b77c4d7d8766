/// SQL dialect differences the serializer has to care about: placeholder
/// syntax and identifier quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Mysql,
    Postgresql,
    Sqlite,
}
