use std::{fmt::Display, sync::Arc};

/// Integer widths known to the checker.
///
/// `Int` is the generic integer every integer literal starts out as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
}

/// Float widths known to the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    Float32,
    Float64,
}

/// The kind of a type, ignoring any element or field structure.
///
/// Used for same-kind comparisons and for the caller's expected result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Int(IntKind),
    Float(FloatKind),
    String,
    Array,
    Map,
    Struct,
    Func,
    Pointer,
    Interface,
    Time,
    Duration,
    Error,
}

impl Kind {
    pub fn is_number(&self) -> bool {
        matches!(self, Kind::Int(_) | Kind::Float(_))
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Nil => write!(f, "nil"),
            Kind::Bool => write!(f, "bool"),
            Kind::Int(kind) => write!(f, "{}", Type::Int(*kind)),
            Kind::Float(kind) => write!(f, "{}", Type::Float(*kind)),
            Kind::String => write!(f, "string"),
            Kind::Array => write!(f, "array"),
            Kind::Map => write!(f, "map"),
            Kind::Struct => write!(f, "struct"),
            Kind::Func => write!(f, "func"),
            Kind::Pointer => write!(f, "ptr"),
            Kind::Interface => write!(f, "interface"),
            Kind::Time => write!(f, "time.Time"),
            Kind::Duration => write!(f, "time.Duration"),
            Kind::Error => write!(f, "error"),
        }
    }
}

/// A static type.
///
/// Primitive variants are unit-like so comparing them is a tag comparison;
/// `Array`, `Map`, `Func` and `Pointer` compare by structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Nil,
    Bool,
    Int(IntKind),
    Float(FloatKind),
    String,
    Array(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Struct(Arc<StructType>),
    Func(Arc<FuncType>),
    Pointer(Box<Type>),
    Time,
    Duration,
    Error,
    /// A named interface with a method set.
    Interface(Arc<InterfaceType>),
    /// The empty interface: matches everything.
    Any,
}

impl Type {
    pub const INTEGER: Type = Type::Int(IntKind::Int);
    pub const FLOAT: Type = Type::Float(FloatKind::Float64);

    pub fn array_of(elem: Type) -> Type {
        Type::Array(Box::new(elem))
    }

    /// The generic array type produced by array literals.
    pub fn any_array() -> Type {
        Type::Array(Box::new(Type::Any))
    }

    pub fn map_of(key: Type, elem: Type) -> Type {
        Type::Map(Box::new(key), Box::new(elem))
    }

    /// The generic map type produced by map literals.
    pub fn any_map() -> Type {
        Type::Map(Box::new(Type::String), Box::new(Type::Any))
    }

    pub fn pointer_to(elem: Type) -> Type {
        Type::Pointer(Box::new(elem))
    }

    pub fn func(ins: Vec<Type>, outs: Vec<Type>, variadic: bool) -> Type {
        Type::Func(Arc::new(FuncType { ins, outs, variadic }))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Type::Nil => Kind::Nil,
            Type::Bool => Kind::Bool,
            Type::Int(kind) => Kind::Int(*kind),
            Type::Float(kind) => Kind::Float(*kind),
            Type::String => Kind::String,
            Type::Array(_) => Kind::Array,
            Type::Map(_, _) => Kind::Map,
            Type::Struct(_) => Kind::Struct,
            Type::Func(_) => Kind::Func,
            Type::Pointer(_) => Kind::Pointer,
            Type::Time => Kind::Time,
            Type::Duration => Kind::Duration,
            Type::Error => Kind::Error,
            Type::Interface(_) | Type::Any => Kind::Interface,
        }
    }

    /// Element type of arrays, maps and pointers.
    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) | Type::Map(_, elem) | Type::Pointer(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&Type> {
        match self {
            Type::Map(key, _) => Some(key),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncType> {
        match self {
            Type::Func(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Type::Struct(st) => Some(st),
            _ => None,
        }
    }

    /// The name methods are registered under: the struct or interface
    /// name, seen through any pointer layers.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Type::Struct(st) => Some(&st.name),
            Type::Interface(iface) => Some(&iface.name),
            Type::Pointer(elem) => elem.type_name(),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Nil => write!(f, "nil"),
            Type::Bool => write!(f, "bool"),
            Type::Int(kind) => write!(
                f,
                "{}",
                match kind {
                    IntKind::Int => "int",
                    IntKind::Int8 => "int8",
                    IntKind::Int16 => "int16",
                    IntKind::Int32 => "int32",
                    IntKind::Int64 => "int64",
                    IntKind::Uint => "uint",
                    IntKind::Uint8 => "uint8",
                    IntKind::Uint16 => "uint16",
                    IntKind::Uint32 => "uint32",
                    IntKind::Uint64 => "uint64",
                }
            ),
            Type::Float(FloatKind::Float32) => write!(f, "float32"),
            Type::Float(FloatKind::Float64) => write!(f, "float64"),
            Type::String => write!(f, "string"),
            Type::Array(elem) => write!(f, "[]{}", elem),
            Type::Map(key, elem) => write!(f, "map[{}]{}", key, elem),
            Type::Struct(st) => write!(f, "{}", st.name),
            Type::Func(func) => write!(f, "{}", func),
            Type::Pointer(elem) => write!(f, "*{}", elem),
            Type::Time => write!(f, "time.Time"),
            Type::Duration => write!(f, "time.Duration"),
            Type::Error => write!(f, "error"),
            Type::Interface(iface) => write!(f, "{}", iface.name),
            Type::Any => write!(f, "interface {{}}"),
        }
    }
}

/// A struct field as declared, before any embedding is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
    /// Embedded (anonymous) member whose fields are promoted.
    pub anonymous: bool,
}

impl StructField {
    pub fn new(name: &str, ty: Type) -> Self {
        StructField {
            name: name.to_string(),
            ty,
            anonymous: false,
        }
    }

    /// An embedded member; its name is the embedded type's name.
    pub fn embedded(ty: Type) -> Self {
        StructField {
            name: ty.type_name().unwrap_or_default().to_string(),
            ty,
            anonymous: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<StructField>,
}

impl StructType {
    pub fn new(name: &str, fields: Vec<StructField>) -> Self {
        StructType {
            name: name.to_string(),
            fields,
        }
    }

    pub fn into_type(self) -> Type {
        Type::Struct(Arc::new(self))
    }
}

/// A resolved field: its type and the index path from the outer struct
/// through any embedded members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub ty: Type,
    pub index: Vec<usize>,
}

/// Function signature. When `variadic` is set the last input is an
/// `Array` whose element type every trailing argument must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    pub ins: Vec<Type>,
    pub outs: Vec<Type>,
    pub variadic: bool,
}

impl FuncType {
    pub fn new(ins: Vec<Type>, outs: Vec<Type>, variadic: bool) -> Self {
        FuncType { ins, outs, variadic }
    }

    pub fn into_type(self) -> Type {
        Type::Func(Arc::new(self))
    }
}

impl Display for FuncType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "func(")?;
        for (i, input) in self.ins.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match (self.variadic && i + 1 == self.ins.len(), input.elem()) {
                (true, Some(elem)) => write!(f, "...{}", elem)?,
                _ => write!(f, "{}", input)?,
            }
        }
        write!(f, ")")?;
        match self.outs.as_slice() {
            [] => Ok(()),
            [out] => write!(f, " {}", out),
            outs => {
                write!(f, " (")?;
                for (i, out) in outs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", out)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub name: String,
    /// Methods without a receiver input.
    pub methods: Vec<(String, FuncType)>,
}

impl InterfaceType {
    pub fn new(name: &str, methods: Vec<(String, FuncType)>) -> Self {
        InterfaceType {
            name: name.to_string(),
            methods,
        }
    }

    pub fn into_type(self) -> Type {
        Type::Interface(Arc::new(self))
    }
}

/// A method resolved on some type.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub ty: Type,
    pub index: usize,
}
