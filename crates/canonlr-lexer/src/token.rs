//! Token kinds and their grammar terminals.

use phf::phf_map;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Number,
    Hex,
    Octal,
    Binary,
    Float,
    Char,
    String,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Assign,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Lte,
    Gte,
    Eq,
    Neq,
    And,
    Or,
    Not,
    PlusAssign,
    MinusAssign,
    AsteriskAssign,
    SlashAssign,
    Unknown,
    If,
    Else,
    While,
    Do,
    Main,
    Int,
    FloatType,
    Double,
    Return,
    Const,
    Void,
    Continue,
    Break,
    CharType,
    Unsigned,
    Enum,
    Long,
    Switch,
    Case,
    Auto,
    Static,
}

/// Reserved words recognized in place of identifiers.
pub(crate) static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "while" => TokenKind::While,
    "do" => TokenKind::Do,
    "main" => TokenKind::Main,
    "int" => TokenKind::Int,
    "float" => TokenKind::FloatType,
    "double" => TokenKind::Double,
    "return" => TokenKind::Return,
    "const" => TokenKind::Const,
    "void" => TokenKind::Void,
    "continue" => TokenKind::Continue,
    "break" => TokenKind::Break,
    "char" => TokenKind::CharType,
    "unsigned" => TokenKind::Unsigned,
    "enum" => TokenKind::Enum,
    "long" => TokenKind::Long,
    "switch" => TokenKind::Switch,
    "case" => TokenKind::Case,
    "auto" => TokenKind::Auto,
    "static" => TokenKind::Static,
};

impl TokenKind {
    /// Look up the reserved word spelled by `ident`, if any.
    pub fn keyword(ident: &str) -> Option<Self> {
        KEYWORDS.get(ident).copied()
    }

    /// The display name of this kind, e.g. `IDENTIFIER` or `LPAREN`.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Ident => "IDENTIFIER",
            Number => "NUMBER",
            Hex => "HEX_NUMBER",
            Octal => "OCTAL_NUMBER",
            Binary => "BINARY_NUMBER",
            Float => "FLOAT_NUMBER",
            Char => "CHAR_CONSTANT",
            String => "STRING_CONSTANT",
            LParen => "LPAREN",
            RParen => "RPAREN",
            LBrace => "LBRACE",
            RBrace => "RBRACE",
            Semicolon => "SEMICOLON",
            Assign => "ASSIGN",
            Plus => "PLUS",
            Minus => "MINUS",
            Asterisk => "ASTERISK",
            Slash => "SLASH",
            Lt => "LT",
            Gt => "GT",
            Lte => "LTE",
            Gte => "GTE",
            Eq => "EQ",
            Neq => "NEQ",
            And => "AND",
            Or => "OR",
            Not => "NOT",
            PlusAssign => "PLUS_ASSIGN",
            MinusAssign => "MINUS_ASSIGN",
            AsteriskAssign => "ASTERISK_ASSIGN",
            SlashAssign => "SLASH_ASSIGN",
            Unknown => "UNKNOWN",
            If => "IF",
            Else => "ELSE",
            While => "WHILE",
            Do => "DO",
            Main => "MAIN",
            Int => "INT",
            FloatType => "FLOAT",
            Double => "DOUBLE",
            Return => "RETURN",
            Const => "CONST",
            Void => "VOID",
            Continue => "CONTINUE",
            Break => "BREAK",
            CharType => "CHAR",
            Unsigned => "UNSIGNED",
            Enum => "ENUM",
            Long => "LONG",
            Switch => "SWITCH",
            Case => "CASE",
            Auto => "AUTO",
            Static => "STATIC",
        }
    }

    /// The grammar terminal this kind is fed to the parser as.
    ///
    /// Kinds without a dedicated terminal fall back to their own name.
    pub fn terminal(self) -> &'static str {
        use TokenKind::*;
        match self {
            Main => "main",
            Ident => "id",
            Number => "num",
            LBrace => "{",
            RBrace => "}",
            LParen => "(",
            RParen => ")",
            Assign => "=",
            Semicolon => ";",
            While => "while",
            Lte => "<=",
            Gte => ">=",
            Plus => "+",
            Asterisk => "*",
            kind => kind.name(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_terminals() {
        let expected = [
            (TokenKind::Ident, "id"),
            (TokenKind::Number, "num"),
            (TokenKind::LBrace, "{"),
            (TokenKind::RBrace, "}"),
            (TokenKind::LParen, "("),
            (TokenKind::RParen, ")"),
            (TokenKind::Assign, "="),
            (TokenKind::Semicolon, ";"),
            (TokenKind::While, "while"),
            (TokenKind::Lte, "<="),
            (TokenKind::Gte, ">="),
            (TokenKind::Plus, "+"),
            (TokenKind::Asterisk, "*"),
            (TokenKind::Main, "main"),
        ];
        for (kind, terminal) in expected {
            assert_eq!(kind.terminal(), terminal, "{:?}", kind);
        }
    }

    #[test]
    fn unmapped_kinds_use_their_name() {
        assert_eq!(TokenKind::If.terminal(), "IF");
        assert_eq!(TokenKind::Minus.terminal(), "MINUS");
        assert_eq!(TokenKind::Hex.terminal(), "HEX_NUMBER");
        assert_eq!(TokenKind::Unknown.terminal(), "UNKNOWN");
    }

    #[test]
    fn keyword_table() {
        assert_eq!(TokenKind::keyword("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::keyword("float"), Some(TokenKind::FloatType));
        assert_eq!(TokenKind::keyword("whilst"), None);
    }
}
