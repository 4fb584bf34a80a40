//! Token representation produced by the lexer.
//!
//! A [`Token`] carries its own payload (identifier/number/string text as an
//! interned [`Symbol`]) rather than pointing back into the source slice -
//! this is what lets the preprocessor copy, re-mark, and re-emit tokens
//! without tracking lifetimes back to the original file buffer.

use cc_util::Symbol;

/// String/char literal encoding prefix, per C23 6.4.5/6.4.4.4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StringPrefix {
    /// No prefix: `char[]` / `int`.
    None,
    /// `u8"..."`: UTF-8 string literal.
    Utf8,
    /// `u"..."` / `u'...'`: UTF-16 literal.
    Utf16,
    /// `U"..."` / `U'...'`: UTF-32 literal.
    Utf32,
    /// `L"..."` / `L'...'`: wide literal.
    Wide,
}

impl StringPrefix {
    /// The prefix spelled out by `s`, if `s` begins with a recognized
    /// string/char literal prefix immediately followed by `"` or `'`.
    pub fn from_lead(s: &str) -> (StringPrefix, &str) {
        if let Some(rest) = s.strip_prefix("u8") {
            return (StringPrefix::Utf8, rest);
        }
        if let Some(rest) = s.strip_prefix('u') {
            return (StringPrefix::Utf16, rest);
        }
        if let Some(rest) = s.strip_prefix('U') {
            return (StringPrefix::Utf32, rest);
        }
        if let Some(rest) = s.strip_prefix('L') {
            return (StringPrefix::Wide, rest);
        }
        (StringPrefix::None, s)
    }
}

/// A lexical token.
///
/// Keyword and punctuator variants carry no payload: the lexeme is fully
/// recoverable from the discriminant, which is what lets the serialized
/// token stream skip a payload for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Eof,
    Invalid,

    /// Plain identifier, already UCN-folded and interned.
    Ident(Symbol),
    /// A preprocessing-number, exactly as it appeared in source (not yet
    /// classified as integer/float/suffix - see `cc-tokstream`'s classifier).
    PpNumber(Symbol),
    /// String literal: decoded payload (escapes processed) plus prefix.
    StringLiteral(StringPrefix, Symbol),
    /// Character constant: decoded payload plus prefix.
    CharConstant(StringPrefix, Symbol),

    // Keywords
    KwAuto,
    KwBreak,
    KwCase,
    KwChar,
    KwConst,
    KwContinue,
    KwDefault,
    KwDo,
    KwDouble,
    KwElse,
    KwEnum,
    KwExtern,
    KwFloat,
    KwFor,
    KwGoto,
    KwIf,
    KwInline,
    KwInt,
    KwLong,
    KwRegister,
    KwRestrict,
    KwReturn,
    KwShort,
    KwSigned,
    KwSizeof,
    KwStatic,
    KwStruct,
    KwSwitch,
    KwTypedef,
    KwUnion,
    KwUnsigned,
    KwVoid,
    KwVolatile,
    KwWhile,
    KwAlignas,
    KwAlignof,
    KwAtomic,
    KwBitInt,
    KwBool,
    KwComplex,
    KwDecimal128,
    KwDecimal32,
    KwDecimal64,
    KwGeneric,
    KwImaginary,
    KwNoreturn,
    KwStaticAssert,
    KwThreadLocal,
    KwNullptr,
    KwTypeof,
    KwTypeofUnqual,
    KwConstexpr,
    KwTrue,
    KwFalse,

    // Punctuators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Question,
    Tilde,
    At,

    Eq,
    EqEq,
    Bang,
    BangEq,
    Slash,
    SlashEq,
    Caret,
    CaretEq,
    Percent,
    PercentEq,
    Star,
    StarEq,
    Colon,

    Hash,
    HashHash,

    Plus,
    PlusPlus,
    PlusEq,
    Minus,
    MinusMinus,
    MinusEq,
    Arrow,

    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,

    Lt,
    LtEq,
    LtLt,
    LtLtEq,
    Gt,
    GtEq,
    GtGt,
    GtGtEq,

    Dot,
    DotDotDot,
}

impl Token {
    /// Whether this kind carries no payload in the serialized token stream
    /// (its lexeme is implied by the discriminant alone).
    pub fn is_payload_free(&self) -> bool {
        !matches!(
            self,
            Token::Ident(_) | Token::PpNumber(_) | Token::StringLiteral(..) | Token::CharConstant(..)
        )
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword_spelling().is_some()
    }

    /// The canonical spelling of a keyword token, for diagnostics and
    /// re-serialization. `None` for non-keyword tokens.
    pub fn keyword_spelling(&self) -> Option<&'static str> {
        use Token::*;
        Some(match self {
            KwAuto => "auto",
            KwBreak => "break",
            KwCase => "case",
            KwChar => "char",
            KwConst => "const",
            KwContinue => "continue",
            KwDefault => "default",
            KwDo => "do",
            KwDouble => "double",
            KwElse => "else",
            KwEnum => "enum",
            KwExtern => "extern",
            KwFloat => "float",
            KwFor => "for",
            KwGoto => "goto",
            KwIf => "if",
            KwInline => "inline",
            KwInt => "int",
            KwLong => "long",
            KwRegister => "register",
            KwRestrict => "restrict",
            KwReturn => "return",
            KwShort => "short",
            KwSigned => "signed",
            KwSizeof => "sizeof",
            KwStatic => "static",
            KwStruct => "struct",
            KwSwitch => "switch",
            KwTypedef => "typedef",
            KwUnion => "union",
            KwUnsigned => "unsigned",
            KwVoid => "void",
            KwVolatile => "volatile",
            KwWhile => "while",
            KwAlignas => "alignas",
            KwAlignof => "alignof",
            KwAtomic => "_Atomic",
            KwBitInt => "_BitInt",
            KwBool => "bool",
            KwComplex => "_Complex",
            KwDecimal128 => "_Decimal128",
            KwDecimal32 => "_Decimal32",
            KwDecimal64 => "_Decimal64",
            KwGeneric => "_Generic",
            KwImaginary => "_Imaginary",
            KwNoreturn => "_Noreturn",
            KwStaticAssert => "static_assert",
            KwThreadLocal => "thread_local",
            KwNullptr => "nullptr",
            KwTypeof => "typeof",
            KwTypeofUnqual => "typeof_unqual",
            KwConstexpr => "constexpr",
            KwTrue => "true",
            KwFalse => "false",
            _ => return None,
        })
    }
}

/// The stable `u32` discriminant the serialized token stream (spec §6) uses
/// for `Token::kind`. Identifiers/numbers/literals carry a length-prefixed
/// payload after this; keywords and punctuators carry none. The numbering
/// is an implementation detail private to the writer (`cc-cpp::output`) and
/// reader (`cc-tokstream::reader`) - it need not match any external ABI, it
/// only needs to round-trip.
impl Token {
    pub fn kind_id(&self) -> u32 {
        use Token::*;
        match self {
            Eof => 0,
            Invalid => 1,
            Ident(_) => 2,
            PpNumber(_) => 3,
            StringLiteral(..) => 4,
            CharConstant(..) => 5,

            KwAuto => 100,
            KwBreak => 101,
            KwCase => 102,
            KwChar => 103,
            KwConst => 104,
            KwContinue => 105,
            KwDefault => 106,
            KwDo => 107,
            KwDouble => 108,
            KwElse => 109,
            KwEnum => 110,
            KwExtern => 111,
            KwFloat => 112,
            KwFor => 113,
            KwGoto => 114,
            KwIf => 115,
            KwInline => 116,
            KwInt => 117,
            KwLong => 118,
            KwRegister => 119,
            KwRestrict => 120,
            KwReturn => 121,
            KwShort => 122,
            KwSigned => 123,
            KwSizeof => 124,
            KwStatic => 125,
            KwStruct => 126,
            KwSwitch => 127,
            KwTypedef => 128,
            KwUnion => 129,
            KwUnsigned => 130,
            KwVoid => 131,
            KwVolatile => 132,
            KwWhile => 133,
            KwAlignas => 134,
            KwAlignof => 135,
            KwAtomic => 136,
            KwBitInt => 137,
            KwBool => 138,
            KwComplex => 139,
            KwDecimal128 => 140,
            KwDecimal32 => 141,
            KwDecimal64 => 142,
            KwGeneric => 143,
            KwImaginary => 144,
            KwNoreturn => 145,
            KwStaticAssert => 146,
            KwThreadLocal => 147,
            KwNullptr => 148,
            KwTypeof => 149,
            KwTypeofUnqual => 150,
            KwConstexpr => 151,
            KwTrue => 152,
            KwFalse => 153,

            LParen => 200,
            RParen => 201,
            LBrace => 202,
            RBrace => 203,
            LBracket => 204,
            RBracket => 205,
            Semi => 206,
            Comma => 207,
            Question => 208,
            Tilde => 209,
            At => 210,
            Eq => 211,
            EqEq => 212,
            Bang => 213,
            BangEq => 214,
            Slash => 215,
            SlashEq => 216,
            Caret => 217,
            CaretEq => 218,
            Percent => 219,
            PercentEq => 220,
            Star => 221,
            StarEq => 222,
            Colon => 223,
            Hash => 224,
            HashHash => 225,
            Plus => 226,
            PlusPlus => 227,
            PlusEq => 228,
            Minus => 229,
            MinusMinus => 230,
            MinusEq => 231,
            Arrow => 232,
            Amp => 233,
            AmpAmp => 234,
            AmpEq => 235,
            Pipe => 236,
            PipePipe => 237,
            PipeEq => 238,
            Lt => 239,
            LtEq => 240,
            LtLt => 241,
            LtLtEq => 242,
            Gt => 243,
            GtEq => 244,
            GtGt => 245,
            GtGtEq => 246,
            Dot => 247,
            DotDotDot => 248,
        }
    }

    /// Reconstruct a payload-free token (keyword or punctuator) from its
    /// `kind_id`. Returns `None` for ids that require a payload (those are
    /// reconstructed by the reader directly) or are unknown.
    pub fn from_kind_id_payload_free(id: u32) -> Option<Token> {
        use Token::*;
        Some(match id {
            0 => Eof,
            1 => Invalid,
            100 => KwAuto,
            101 => KwBreak,
            102 => KwCase,
            103 => KwChar,
            104 => KwConst,
            105 => KwContinue,
            106 => KwDefault,
            107 => KwDo,
            108 => KwDouble,
            109 => KwElse,
            110 => KwEnum,
            111 => KwExtern,
            112 => KwFloat,
            113 => KwFor,
            114 => KwGoto,
            115 => KwIf,
            116 => KwInline,
            117 => KwInt,
            118 => KwLong,
            119 => KwRegister,
            120 => KwRestrict,
            121 => KwReturn,
            122 => KwShort,
            123 => KwSigned,
            124 => KwSizeof,
            125 => KwStatic,
            126 => KwStruct,
            127 => KwSwitch,
            128 => KwTypedef,
            129 => KwUnion,
            130 => KwUnsigned,
            131 => KwVoid,
            132 => KwVolatile,
            133 => KwWhile,
            134 => KwAlignas,
            135 => KwAlignof,
            136 => KwAtomic,
            137 => KwBitInt,
            138 => KwBool,
            139 => KwComplex,
            140 => KwDecimal128,
            141 => KwDecimal32,
            142 => KwDecimal64,
            143 => KwGeneric,
            144 => KwImaginary,
            145 => KwNoreturn,
            146 => KwStaticAssert,
            147 => KwThreadLocal,
            148 => KwNullptr,
            149 => KwTypeof,
            150 => KwTypeofUnqual,
            151 => KwConstexpr,
            152 => KwTrue,
            153 => KwFalse,
            200 => LParen,
            201 => RParen,
            202 => LBrace,
            203 => RBrace,
            204 => LBracket,
            205 => RBracket,
            206 => Semi,
            207 => Comma,
            208 => Question,
            209 => Tilde,
            210 => At,
            211 => Eq,
            212 => EqEq,
            213 => Bang,
            214 => BangEq,
            215 => Slash,
            216 => SlashEq,
            217 => Caret,
            218 => CaretEq,
            219 => Percent,
            220 => PercentEq,
            221 => Star,
            222 => StarEq,
            223 => Colon,
            224 => Hash,
            225 => HashHash,
            226 => Plus,
            227 => PlusPlus,
            228 => PlusEq,
            229 => Minus,
            230 => MinusMinus,
            231 => MinusEq,
            232 => Arrow,
            233 => Amp,
            234 => AmpAmp,
            235 => AmpEq,
            236 => Pipe,
            237 => PipePipe,
            238 => PipeEq,
            239 => Lt,
            240 => LtEq,
            241 => LtLt,
            242 => LtLtEq,
            243 => Gt,
            244 => GtEq,
            245 => GtGt,
            246 => GtGtEq,
            247 => Dot,
            248 => DotDotDot,
            _ => return None,
        })
    }

    /// The `kind_id` reserved for each payload-carrying variant, independent
    /// of the payload itself - used by the reader to know which payload
    /// shape to parse next.
    pub fn payload_kind_id(id: u32) -> Option<PayloadKind> {
        Some(match id {
            2 => PayloadKind::Ident,
            3 => PayloadKind::PpNumber,
            4 => PayloadKind::StringLiteral,
            5 => PayloadKind::CharConstant,
            _ => return None,
        })
    }
}

/// Which payload-carrying variant a `kind_id` denotes, and (for string/char
/// literals) which prefix byte precedes the length-prefixed payload in the
/// serialized stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    Ident,
    PpNumber,
    StringLiteral,
    CharConstant,
}

impl StringPrefix {
    pub fn to_tag(self) -> u8 {
        match self {
            StringPrefix::None => 0,
            StringPrefix::Utf8 => 1,
            StringPrefix::Utf16 => 2,
            StringPrefix::Utf32 => 3,
            StringPrefix::Wide => 4,
        }
    }

    pub fn from_tag(tag: u8) -> Option<StringPrefix> {
        Some(match tag {
            0 => StringPrefix::None,
            1 => StringPrefix::Utf8,
            2 => StringPrefix::Utf16,
            3 => StringPrefix::Utf32,
            4 => StringPrefix::Wide,
            _ => return None,
        })
    }
}

/// Classify a scanned identifier spelling as a keyword token, or `None` if
/// it is an ordinary identifier. Underscore-prefixed spellings (`_Bool`) and
/// their C23 lowercase aliases (`bool`) both map to the same token kind.
pub fn keyword_from_ident(text: &str) -> Option<Token> {
    use Token::*;
    Some(match text {
        "auto" => KwAuto,
        "break" => KwBreak,
        "case" => KwCase,
        "char" => KwChar,
        "const" => KwConst,
        "continue" => KwContinue,
        "default" => KwDefault,
        "do" => KwDo,
        "double" => KwDouble,
        "else" => KwElse,
        "enum" => KwEnum,
        "extern" => KwExtern,
        "float" => KwFloat,
        "for" => KwFor,
        "goto" => KwGoto,
        "if" => KwIf,
        "inline" => KwInline,
        "int" => KwInt,
        "long" => KwLong,
        "register" => KwRegister,
        "restrict" => KwRestrict,
        "return" => KwReturn,
        "short" => KwShort,
        "signed" => KwSigned,
        "sizeof" => KwSizeof,
        "static" => KwStatic,
        "struct" => KwStruct,
        "switch" => KwSwitch,
        "typedef" => KwTypedef,
        "union" => KwUnion,
        "unsigned" => KwUnsigned,
        "void" => KwVoid,
        "volatile" => KwVolatile,
        "while" => KwWhile,
        "_Alignas" | "alignas" => KwAlignas,
        "_Alignof" | "alignof" => KwAlignof,
        "_Atomic" => KwAtomic,
        "_BitInt" => KwBitInt,
        "_Bool" | "bool" => KwBool,
        "_Complex" => KwComplex,
        "_Decimal128" => KwDecimal128,
        "_Decimal32" => KwDecimal32,
        "_Decimal64" => KwDecimal64,
        "_Generic" => KwGeneric,
        "_Imaginary" => KwImaginary,
        "_Noreturn" => KwNoreturn,
        "_Static_assert" | "static_assert" => KwStaticAssert,
        "_Thread_local" | "thread_local" => KwThreadLocal,
        "nullptr" => KwNullptr,
        "typeof" => KwTypeof,
        "typeof_unqual" => KwTypeofUnqual,
        "constexpr" => KwConstexpr,
        "true" => KwTrue,
        "false" => KwFalse,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_roundtrip() {
        assert_eq!(keyword_from_ident("int"), Some(Token::KwInt));
        assert_eq!(Token::KwInt.keyword_spelling(), Some("int"));
        assert_eq!(keyword_from_ident("alignas"), Some(Token::KwAlignas));
        assert_eq!(keyword_from_ident("_Alignas"), Some(Token::KwAlignas));
        assert_eq!(keyword_from_ident("banana"), None);
    }

    #[test]
    fn payload_free_kinds() {
        assert!(Token::KwInt.is_payload_free());
        assert!(Token::LParen.is_payload_free());
        assert!(!Token::Ident(Symbol::intern("x")).is_payload_free());
        assert!(!Token::PpNumber(Symbol::intern("42")).is_payload_free());
    }

    #[test]
    fn string_prefix_from_lead() {
        assert_eq!(StringPrefix::from_lead("u8\"hi\""), (StringPrefix::Utf8, "\"hi\""));
        assert_eq!(StringPrefix::from_lead("L'x'"), (StringPrefix::Wide, "'x'"));
        assert_eq!(StringPrefix::from_lead("\"hi\""), (StringPrefix::None, "\"hi\""));
    }
}
