//! Messages from Avatica's `common.proto`.

/// Envelope around every request and response body.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WireMessage {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub wrapped_message: ::prost::alloc::vec::Vec<u8>,
}

/// Details about a connection.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConnectionProperties {
    #[prost(bool, tag = "1")]
    pub is_dirty: bool,
    #[prost(bool, tag = "2")]
    pub auto_commit: bool,
    #[prost(bool, tag = "7")]
    pub has_auto_commit: bool,
    #[prost(bool, tag = "3")]
    pub read_only: bool,
    #[prost(bool, tag = "8")]
    pub has_read_only: bool,
    #[prost(uint32, tag = "4")]
    pub transaction_isolation: u32,
    #[prost(string, tag = "5")]
    pub catalog: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub schema: ::prost::alloc::string::String,
}

/// Statement handle.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatementHandle {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub id: u32,
    #[prost(message, optional, tag = "3")]
    pub signature: ::core::option::Option<Signature>,
}

/// Results of preparing a statement.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Signature {
    #[prost(message, repeated, tag = "1")]
    pub columns: ::prost::alloc::vec::Vec<ColumnMetaData>,
    #[prost(string, tag = "2")]
    pub sql: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub parameters: ::prost::alloc::vec::Vec<AvaticaParameter>,
    #[prost(message, optional, tag = "4")]
    pub cursor_factory: ::core::option::Option<CursorFactory>,
    #[prost(enumeration = "StatementType", tag = "5")]
    pub statement_type: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ColumnMetaData {
    #[prost(uint32, tag = "1")]
    pub ordinal: u32,
    #[prost(bool, tag = "2")]
    pub auto_increment: bool,
    #[prost(bool, tag = "3")]
    pub case_sensitive: bool,
    #[prost(bool, tag = "4")]
    pub searchable: bool,
    #[prost(bool, tag = "5")]
    pub currency: bool,
    #[prost(uint32, tag = "6")]
    pub nullable: u32,
    #[prost(bool, tag = "7")]
    pub signed: bool,
    #[prost(uint32, tag = "8")]
    pub display_size: u32,
    #[prost(string, tag = "9")]
    pub label: ::prost::alloc::string::String,
    #[prost(string, tag = "10")]
    pub column_name: ::prost::alloc::string::String,
    #[prost(string, tag = "11")]
    pub schema_name: ::prost::alloc::string::String,
    #[prost(uint32, tag = "12")]
    pub precision: u32,
    #[prost(uint32, tag = "13")]
    pub scale: u32,
    #[prost(string, tag = "14")]
    pub table_name: ::prost::alloc::string::String,
    #[prost(string, tag = "15")]
    pub catalog_name: ::prost::alloc::string::String,
    #[prost(bool, tag = "16")]
    pub read_only: bool,
    #[prost(bool, tag = "17")]
    pub writable: bool,
    #[prost(bool, tag = "18")]
    pub definitely_writable: bool,
    #[prost(string, tag = "19")]
    pub column_class_name: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "20")]
    pub r#type: ::core::option::Option<AvaticaType>,
}

/// Base class for a column type.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AvaticaType {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(enumeration = "Rep", tag = "3")]
    pub rep: i32,
    #[prost(message, repeated, tag = "4")]
    pub columns: ::prost::alloc::vec::Vec<ColumnMetaData>,
    #[prost(message, optional, boxed, tag = "5")]
    pub component: ::core::option::Option<::prost::alloc::boxed::Box<AvaticaType>>,
}

/// Metadata for a parameter of a prepared statement.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AvaticaParameter {
    #[prost(bool, tag = "1")]
    pub signed: bool,
    #[prost(uint32, tag = "2")]
    pub precision: u32,
    #[prost(uint32, tag = "3")]
    pub scale: u32,
    #[prost(uint32, tag = "4")]
    pub parameter_type: u32,
    #[prost(string, tag = "5")]
    pub type_name: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub class_name: ::prost::alloc::string::String,
    #[prost(string, tag = "7")]
    pub name: ::prost::alloc::string::String,
}

/// Information necessary to convert an Iterable into a Calcite Cursor.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CursorFactory {
    #[prost(enumeration = "cursor_factory::Style", tag = "1")]
    pub style: i32,
    #[prost(string, tag = "2")]
    pub class_name: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "3")]
    pub field_names: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

pub mod cursor_factory {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Style {
        Object = 0,
        Record = 1,
        RecordProjection = 2,
        Array = 3,
        List = 4,
        Map = 5,
    }
}

/// A collection of rows.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Frame {
    #[prost(uint64, tag = "1")]
    pub offset: u64,
    #[prost(bool, tag = "2")]
    pub done: bool,
    #[prost(message, repeated, tag = "3")]
    pub rows: ::prost::alloc::vec::Vec<Row>,
}

/// A row is a collection of values.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Row {
    #[prost(message, repeated, tag = "1")]
    pub value: ::prost::alloc::vec::Vec<ColumnValue>,
}

/// A value might be a TypedValue or an Array of TypedValue's.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ColumnValue {
    /// Deprecated, kept for servers that still fill it.
    #[prost(message, repeated, tag = "1")]
    pub value: ::prost::alloc::vec::Vec<TypedValue>,
    #[prost(message, repeated, tag = "2")]
    pub array_value: ::prost::alloc::vec::Vec<TypedValue>,
    #[prost(bool, tag = "3")]
    pub has_array_value: bool,
    #[prost(message, optional, tag = "4")]
    pub scalar_value: ::core::option::Option<TypedValue>,
}

/// Generic wrapper to support any SQL type. Struct-like to work around no polymorphism construct.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TypedValue {
    #[prost(enumeration = "Rep", tag = "1")]
    pub r#type: i32,
    #[prost(bool, tag = "2")]
    pub bool_value: bool,
    #[prost(string, tag = "3")]
    pub string_value: ::prost::alloc::string::String,
    #[prost(sint64, tag = "4")]
    pub number_value: i64,
    #[prost(bytes = "vec", tag = "5")]
    pub bytes_value: ::prost::alloc::vec::Vec<u8>,
    #[prost(double, tag = "6")]
    pub double_value: f64,
    #[prost(bool, tag = "7")]
    pub null: bool,
    #[prost(message, repeated, tag = "8")]
    pub array_value: ::prost::alloc::vec::Vec<TypedValue>,
    #[prost(enumeration = "Rep", tag = "9")]
    pub component_type: i32,
    #[prost(bool, tag = "10")]
    pub implicitly_null: bool,
}

/// Generic metadata for the server to return with each response.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RpcMetadata {
    /// The host:port of the server
    #[prost(string, tag = "1")]
    pub server_address: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum StatementType {
    Select = 0,
    Insert = 1,
    Update = 2,
    Delete = 3,
    Upsert = 4,
    Merge = 5,
    OtherDml = 6,
    Create = 7,
    Drop = 8,
    Alter = 9,
    OtherDdl = 10,
    Call = 11,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Rep {
    PrimitiveBoolean = 0,
    PrimitiveByte = 1,
    PrimitiveChar = 2,
    PrimitiveShort = 3,
    PrimitiveInt = 4,
    PrimitiveLong = 5,
    PrimitiveFloat = 6,
    PrimitiveDouble = 7,
    Boolean = 8,
    Byte = 9,
    Character = 10,
    Short = 11,
    Integer = 12,
    Long = 13,
    Float = 14,
    Double = 15,
    JavaSqlTime = 16,
    JavaSqlTimestamp = 17,
    JavaSqlDate = 18,
    JavaUtilDate = 19,
    ByteString = 20,
    String = 21,
    Number = 22,
    Object = 23,
    Null = 24,
    BigInteger = 25,
    BigDecimal = 26,
    Array = 27,
    Struct = 28,
    Multiset = 29,
}

/// The severity of some unexpected outcome to an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Severity {
    UnknownSeverity = 0,
    FatalSeverity = 1,
    ErrorSeverity = 2,
    WarningSeverity = 3,
}
