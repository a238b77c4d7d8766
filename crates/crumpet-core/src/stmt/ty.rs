#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    I64,
    F64,
    String,
    Bytes,
}

impl Type {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::I64 => "I64",
            Self::F64 => "F64",
            Self::String => "String",
            Self::Bytes => "Bytes",
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_i64(&self) -> bool {
        matches!(self, Self::I64)
    }

    pub fn is_f64(&self) -> bool {
        matches!(self, Self::F64)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes)
    }
}
