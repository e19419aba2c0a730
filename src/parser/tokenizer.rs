//! Whitespace tokenizer for content streams.

/// Content stream operators that affect shape geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `BT`
    BeginText,
    /// `ET`
    EndText,
    /// `cm`
    ConcatMatrix,
    /// `g` / `G`
    SetGray,
    /// `rg` / `RG`
    SetRgb,
    /// `q`
    Save,
    /// `Q`
    Restore,
    /// `re`
    Rectangle,
    /// `f`, `F` or `f*`
    Fill,
    /// `m`
    MoveTo,
    /// `l`
    LineTo,
}

impl Operator {
    /// Look up an operator mnemonic.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Some(match s {
            "BT" => Operator::BeginText,
            "ET" => Operator::EndText,
            "cm" => Operator::ConcatMatrix,
            "g" | "G" => Operator::SetGray,
            "rg" | "RG" => Operator::SetRgb,
            "q" => Operator::Save,
            "Q" => Operator::Restore,
            "re" => Operator::Rectangle,
            "f" | "F" | "f*" => Operator::Fill,
            "m" => Operator::MoveTo,
            "l" => Operator::LineTo,
            _ => return None,
        })
    }
}

/// Classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number(f32),
    Operator(Operator),
    /// Anything else: names, strings, unknown operators
    Other,
}

/// A token together with its source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    fn classify(text: &'a str) -> Self {
        let kind = if looks_numeric(text) {
            match text.parse::<f32>() {
                Ok(n) if n.is_finite() => TokenKind::Number(n),
                _ => TokenKind::Other,
            }
        } else {
            Operator::from_mnemonic(text)
                .map(TokenKind::Operator)
                .unwrap_or(TokenKind::Other)
        };
        Self { text, kind }
    }

    pub fn number(&self) -> Option<f32> {
        match self.kind {
            TokenKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }
}

// Keeps words like "inf" or "NaN" from parsing as floats; signed or
// overflowing spellings are rejected after parsing.
fn looks_numeric(text: &str) -> bool {
    matches!(text.as_bytes().first(), Some(b'0'..=b'9' | b'-' | b'+' | b'.'))
}

/// Split a content stream on ASCII whitespace and classify every token.
pub fn tokenize(stream: &str) -> Vec<Token<'_>> {
    stream.split_ascii_whitespace().map(Token::classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_classifies() {
        let tokens = tokenize("q 1 0 0 -1 0 792 cm\n/F1 12 Tf f* Q");
        assert_eq!(tokens.len(), 13);
        assert_eq!(tokens[0].operator(), Some(Operator::Save));
        assert_eq!(tokens[4].number(), Some(-1.0));
        assert_eq!(tokens[7].operator(), Some(Operator::ConcatMatrix));
        assert_eq!(tokens[8].kind, TokenKind::Other);
        assert_eq!(tokens[10].kind, TokenKind::Other);
        assert_eq!(tokens[11].operator(), Some(Operator::Fill));
    }

    #[test]
    fn test_number_forms() {
        let tokens = tokenize(".5 -3. +2 1e2 inf");
        assert_eq!(tokens[0].number(), Some(0.5));
        assert_eq!(tokens[1].number(), Some(-3.0));
        assert_eq!(tokens[2].number(), Some(2.0));
        assert_eq!(tokens[3].number(), Some(100.0));
        assert_eq!(tokens[4].number(), None);
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for text in ["-inf", "+nan", "+infinity", "1e40", "-1e40"] {
            assert_eq!(tokenize(text)[0].kind, TokenKind::Other, "{}", text);
        }
        assert_eq!(tokenize("3e2")[0].number(), Some(300.0));
    }

    #[test]
    fn test_stroke_and_fill_variants() {
        for m in ["g", "G"] {
            assert_eq!(Operator::from_mnemonic(m), Some(Operator::SetGray));
        }
        for m in ["f", "F", "f*"] {
            assert_eq!(Operator::from_mnemonic(m), Some(Operator::Fill));
        }
        assert_eq!(Operator::from_mnemonic("S"), None);
    }
}
