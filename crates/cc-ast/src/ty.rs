//! The built-in integer type table spec.md §4.5 requires be installed in
//! file scope before parsing begins: "entries for `void`, `_Bool`, `char`,
//! `short`, `int`, `long`, `long long` ... with their bit-width, precision,
//! padding, and alignment; these are what user typedefs ultimately resolve
//! against."

use cc_util::Symbol;

/// A built-in type's physical layout, as installed into file scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltinType {
    pub name: &'static str,
    /// Total storage width in bits, including any padding bits.
    pub bit_width: u32,
    /// Value-carrying (precision) bits, `<=  bit_width`.
    pub precision: u32,
    /// `bit_width - precision`.
    pub padding: u32,
    pub alignment: u32,
    pub is_signed: bool,
}

impl BuiltinType {
    pub const VOID: BuiltinType =
        BuiltinType { name: "void", bit_width: 0, precision: 0, padding: 0, alignment: 1, is_signed: false };
    pub const BOOL: BuiltinType =
        BuiltinType { name: "_Bool", bit_width: 8, precision: 1, padding: 7, alignment: 1, is_signed: false };
    pub const CHAR: BuiltinType =
        BuiltinType { name: "char", bit_width: 8, precision: 8, padding: 0, alignment: 1, is_signed: true };
    pub const SIGNED_CHAR: BuiltinType = BuiltinType {
        name: "signed char",
        bit_width: 8,
        precision: 8,
        padding: 0,
        alignment: 1,
        is_signed: true,
    };
    pub const UNSIGNED_CHAR: BuiltinType = BuiltinType {
        name: "unsigned char",
        bit_width: 8,
        precision: 8,
        padding: 0,
        alignment: 1,
        is_signed: false,
    };
    pub const SHORT: BuiltinType =
        BuiltinType { name: "short", bit_width: 16, precision: 16, padding: 0, alignment: 2, is_signed: true };
    pub const UNSIGNED_SHORT: BuiltinType = BuiltinType {
        name: "unsigned short",
        bit_width: 16,
        precision: 16,
        padding: 0,
        alignment: 2,
        is_signed: false,
    };
    pub const INT: BuiltinType =
        BuiltinType { name: "int", bit_width: 32, precision: 32, padding: 0, alignment: 4, is_signed: true };
    pub const UNSIGNED_INT: BuiltinType = BuiltinType {
        name: "unsigned int",
        bit_width: 32,
        precision: 32,
        padding: 0,
        alignment: 4,
        is_signed: false,
    };
    pub const LONG: BuiltinType =
        BuiltinType { name: "long", bit_width: 64, precision: 64, padding: 0, alignment: 8, is_signed: true };
    pub const UNSIGNED_LONG: BuiltinType = BuiltinType {
        name: "unsigned long",
        bit_width: 64,
        precision: 64,
        padding: 0,
        alignment: 8,
        is_signed: false,
    };
    pub const LONG_LONG: BuiltinType = BuiltinType {
        name: "long long",
        bit_width: 64,
        precision: 64,
        padding: 0,
        alignment: 8,
        is_signed: true,
    };
    pub const UNSIGNED_LONG_LONG: BuiltinType = BuiltinType {
        name: "unsigned long long",
        bit_width: 64,
        precision: 64,
        padding: 0,
        alignment: 8,
        is_signed: false,
    };

    /// The table installed into file scope before parsing: `void`, `_Bool`,
    /// `char`, `short`, `int`, `long`, `long long` (spec.md §4.5), each
    /// keyed by its canonical spelling as an interned [`Symbol`].
    pub fn builtin_table() -> Vec<(Symbol, BuiltinType)> {
        vec![
            (Symbol::intern("void"), BuiltinType::VOID),
            (Symbol::intern("_Bool"), BuiltinType::BOOL),
            (Symbol::intern("char"), BuiltinType::CHAR),
            (Symbol::intern("short"), BuiltinType::SHORT),
            (Symbol::intern("int"), BuiltinType::INT),
            (Symbol::intern("long"), BuiltinType::LONG),
            (Symbol::intern("long long"), BuiltinType::LONG_LONG),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_long_doubles_long_width() {
        assert_eq!(BuiltinType::LONG.bit_width, 64);
        assert_eq!(BuiltinType::LONG_LONG.bit_width, 64);
        assert_eq!(BuiltinType::LONG_LONG.alignment, 8);
    }

    #[test]
    fn builtin_table_has_seven_entries() {
        assert_eq!(BuiltinType::builtin_table().len(), 7);
    }
}
