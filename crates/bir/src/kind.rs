// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The closed instruction-kind space.
//!
//! Kinds are numbered so that each family occupies its own range:
//!
//! | range    | family                                   |
//! |----------|------------------------------------------|
//! | 1..=19   | control and concurrency terminators      |
//! | 20..=60  | structural value construction and access |
//! | 61..=79  | binary operators                         |
//! | 80..=127 | unary and bitwise operators              |
//! | 128      | platform extension                       |

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum InstructionKind {
    Goto = 1,
    Call = 2,
    Branch = 3,
    Return = 4,
    AsyncCall = 5,
    Wait = 6,
    FpCall = 7,
    WorkerReceive = 8,
    WorkerSend = 9,
    Flush = 10,
    Lock = 11,
    FieldLock = 12,
    Unlock = 13,
    WaitAll = 14,
    WorkerAlternateReceive = 15,
    WorkerMultipleReceive = 16,

    Move = 20,
    ConstLoad = 21,
    NewStructure = 22,
    MapStore = 23,
    MapLoad = 24,
    NewArray = 25,
    ArrayStore = 26,
    ArrayLoad = 27,
    NewError = 28,
    TypeCast = 29,
    IsLike = 30,
    TypeTest = 31,
    NewInstance = 32,
    ObjectStore = 33,
    ObjectLoad = 34,
    Panic = 35,
    FpLoad = 36,
    StringLoad = 37,
    NewXmlElement = 38,
    NewXmlText = 39,
    NewXmlComment = 40,
    NewXmlPi = 41,
    NewXmlSequence = 42,
    NewXmlQName = 43,
    NewStringXmlQName = 44,
    XmlSeqStore = 45,
    XmlSeqLoad = 46,
    XmlLoad = 47,
    XmlLoadAll = 48,
    XmlAttributeLoad = 49,
    XmlAttributeStore = 50,
    NewTable = 51,
    NewTypedesc = 52,
    NewStream = 53,
    TableStore = 54,
    TableLoad = 55,

    Add = 61,
    Sub = 62,
    Mul = 63,
    Div = 64,
    Mod = 65,
    Equal = 66,
    NotEqual = 67,
    GreaterThan = 68,
    GreaterEqual = 69,
    LessThan = 70,
    LessEqual = 71,
    And = 72,
    Or = 73,
    RefEqual = 74,
    RefNotEqual = 75,
    ClosedRange = 76,
    HalfOpenRange = 77,
    AnnotAccess = 78,

    Typeof = 80,
    Not = 81,
    Negate = 82,
    BitwiseAnd = 83,
    BitwiseOr = 84,
    BitwiseXor = 85,
    BitwiseLeftShift = 86,
    BitwiseRightShift = 87,
    BitwiseUnsignedRightShift = 88,

    Platform = 128,
}

/// Family a kind belongs to, derived from its numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindFamily {
    Terminator,
    Structural,
    Binary,
    Unary,
    Platform,
}

const ALL_KINDS: &[InstructionKind] = &[
    InstructionKind::Goto,
    InstructionKind::Call,
    InstructionKind::Branch,
    InstructionKind::Return,
    InstructionKind::AsyncCall,
    InstructionKind::Wait,
    InstructionKind::FpCall,
    InstructionKind::WorkerReceive,
    InstructionKind::WorkerSend,
    InstructionKind::Flush,
    InstructionKind::Lock,
    InstructionKind::FieldLock,
    InstructionKind::Unlock,
    InstructionKind::WaitAll,
    InstructionKind::WorkerAlternateReceive,
    InstructionKind::WorkerMultipleReceive,
    InstructionKind::Move,
    InstructionKind::ConstLoad,
    InstructionKind::NewStructure,
    InstructionKind::MapStore,
    InstructionKind::MapLoad,
    InstructionKind::NewArray,
    InstructionKind::ArrayStore,
    InstructionKind::ArrayLoad,
    InstructionKind::NewError,
    InstructionKind::TypeCast,
    InstructionKind::IsLike,
    InstructionKind::TypeTest,
    InstructionKind::NewInstance,
    InstructionKind::ObjectStore,
    InstructionKind::ObjectLoad,
    InstructionKind::Panic,
    InstructionKind::FpLoad,
    InstructionKind::StringLoad,
    InstructionKind::NewXmlElement,
    InstructionKind::NewXmlText,
    InstructionKind::NewXmlComment,
    InstructionKind::NewXmlPi,
    InstructionKind::NewXmlSequence,
    InstructionKind::NewXmlQName,
    InstructionKind::NewStringXmlQName,
    InstructionKind::XmlSeqStore,
    InstructionKind::XmlSeqLoad,
    InstructionKind::XmlLoad,
    InstructionKind::XmlLoadAll,
    InstructionKind::XmlAttributeLoad,
    InstructionKind::XmlAttributeStore,
    InstructionKind::NewTable,
    InstructionKind::NewTypedesc,
    InstructionKind::NewStream,
    InstructionKind::TableStore,
    InstructionKind::TableLoad,
    InstructionKind::Add,
    InstructionKind::Sub,
    InstructionKind::Mul,
    InstructionKind::Div,
    InstructionKind::Mod,
    InstructionKind::Equal,
    InstructionKind::NotEqual,
    InstructionKind::GreaterThan,
    InstructionKind::GreaterEqual,
    InstructionKind::LessThan,
    InstructionKind::LessEqual,
    InstructionKind::And,
    InstructionKind::Or,
    InstructionKind::RefEqual,
    InstructionKind::RefNotEqual,
    InstructionKind::ClosedRange,
    InstructionKind::HalfOpenRange,
    InstructionKind::AnnotAccess,
    InstructionKind::Typeof,
    InstructionKind::Not,
    InstructionKind::Negate,
    InstructionKind::BitwiseAnd,
    InstructionKind::BitwiseOr,
    InstructionKind::BitwiseXor,
    InstructionKind::BitwiseLeftShift,
    InstructionKind::BitwiseRightShift,
    InstructionKind::BitwiseUnsignedRightShift,
    InstructionKind::Platform,
];

impl InstructionKind {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn all() -> &'static [InstructionKind] {
        ALL_KINDS
    }

    pub fn family(self) -> KindFamily {
        match self.value() {
            1..=19 => KindFamily::Terminator,
            20..=60 => KindFamily::Structural,
            61..=79 => KindFamily::Binary,
            80..=127 => KindFamily::Unary,
            _ => KindFamily::Platform,
        }
    }

    /// Whether an instruction of this kind ends a basic block.
    ///
    /// `Panic` sits in the structural range but transfers control.
    pub fn is_terminator(self) -> bool {
        self.family() == KindFamily::Terminator || self == InstructionKind::Panic
    }

    /// Kinds carried by a two-operand [`BinaryOp`](crate::NonTerminatorKind::BinaryOp).
    pub fn is_binary_operator(self) -> bool {
        self.family() == KindFamily::Binary
            || matches!(
                self,
                InstructionKind::BitwiseAnd
                    | InstructionKind::BitwiseOr
                    | InstructionKind::BitwiseXor
                    | InstructionKind::BitwiseLeftShift
                    | InstructionKind::BitwiseRightShift
                    | InstructionKind::BitwiseUnsignedRightShift
            )
    }

    pub fn is_unary_operator(self) -> bool {
        matches!(
            self,
            InstructionKind::Typeof | InstructionKind::Not | InstructionKind::Negate
        )
    }

    /// Printed form: operator symbol for operators, a name otherwise.
    pub fn symbol(self) -> &'static str {
        use InstructionKind::*;
        match self {
            Goto => "GOTO",
            Call => "call",
            Branch => "branch",
            Return => "return",
            AsyncCall => "async",
            Wait => "wait",
            FpCall => "fpcall",
            WorkerReceive => "wrk_receive",
            WorkerSend => "wrk_send",
            Flush => "flush",
            Lock => "lock",
            FieldLock => "field_lock",
            Unlock => "unlock",
            WaitAll => "wait_all",
            WorkerAlternateReceive => "wrk_alt_receive",
            WorkerMultipleReceive => "wrk_mul_receive",
            Move => "move",
            ConstLoad => "ConstantLoad",
            NewStructure => "newMap",
            MapStore => "mapStore",
            MapLoad => "mapLoad",
            NewArray => "newArray",
            ArrayStore => "arrayStore",
            ArrayLoad => "arrayLoad",
            NewError => "newError",
            TypeCast => "typeCast",
            IsLike => "isLike",
            TypeTest => "typeTest",
            NewInstance => "newObject",
            ObjectStore => "objectStore",
            ObjectLoad => "objectLoad",
            Panic => "panic",
            FpLoad => "fpLoad",
            StringLoad => "stringLoad",
            NewXmlElement => "newXMLElement",
            NewXmlText => "newXMLText",
            NewXmlComment => "newXMLComment",
            NewXmlPi => "newXMLPI",
            NewXmlSequence => "newXMLSequence",
            NewXmlQName => "newXMLQName",
            NewStringXmlQName => "newStringXMLQName",
            XmlSeqStore => "xmlSeqStore",
            XmlSeqLoad => "xmlSeqLoad",
            XmlLoad => "xmlLoad",
            XmlLoadAll => "xmlLoadAll",
            XmlAttributeLoad => "xmlAttrLoad",
            XmlAttributeStore => "xmlAttrStore",
            NewTable => "newTable",
            NewTypedesc => "newTypedesc",
            NewStream => "newStream",
            TableStore => "tableStore",
            TableLoad => "tableLoad",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            GreaterEqual => ">=",
            LessThan => "<",
            LessEqual => "<=",
            And => "&&",
            Or => "||",
            RefEqual => "===",
            RefNotEqual => "!==",
            ClosedRange => "...",
            HalfOpenRange => "..<",
            AnnotAccess => ".@",
            Typeof => "typeof",
            Not => "!",
            Negate => "-",
            BitwiseAnd => "&",
            BitwiseOr => "|",
            BitwiseXor => "^",
            BitwiseLeftShift => "<<",
            BitwiseRightShift => ">>",
            BitwiseUnsignedRightShift => ">>>",
            Platform => "platform",
        }
    }
}

impl TryFrom<u8> for InstructionKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|k| k.value() == value)
            .ok_or(value)
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
