//! Round-trip checking
//!
//! Runs forward then reverse over host source and compares the leaf tokens
//! of the original and reconstructed programs. Whitespace and comments are
//! ignored; every other token must match in kind and text.

use crate::parser::{parse_source, tokens, Dialect, Token};
use crate::transpiler::{TranspileResult, Transpiler};
use serde::Serialize;

/// First position where the two token streams disagree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMismatch {
    pub index: usize,
    /// Token of the original program, `None` past its end
    pub expected: Option<Token>,
    /// Token of the reconstructed program, `None` past its end
    pub actual: Option<Token>,
}

impl TokenMismatch {
    pub fn describe(&self) -> String {
        let show = |token: &Option<Token>| match token {
            Some(t) => format!("`{}` at {}", t.text, t.position),
            None => "end of input".to_string(),
        };
        format!(
            "token {} differs: expected {}, found {}",
            self.index,
            show(&self.expected),
            show(&self.actual)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundTripReport {
    pub forward: TranspileResult,
    /// Absent when the forward pass failed
    pub reverse: Option<TranspileResult>,
    #[serde(skip)]
    pub mismatch: Option<TokenMismatch>,
}

impl RoundTripReport {
    pub fn is_lawful(&self) -> bool {
        !self.forward.has_errors()
            && self.reverse.as_ref().is_some_and(|r| !r.has_errors())
            && self.mismatch.is_none()
    }
}

/// Forward-transform `source`, reverse the output and compare token streams
pub fn check_round_trip(transpiler: &Transpiler, source: &str) -> RoundTripReport {
    let forward = transpiler.transform_forward(source);
    if forward.has_errors() {
        return RoundTripReport {
            forward,
            reverse: None,
            mismatch: None,
        };
    }

    let reverse = transpiler.transform_reverse(&forward.code);
    let mismatch = if reverse.has_errors() {
        None
    } else {
        compare_programs(transpiler, source, &reverse.code)
    };

    RoundTripReport {
        forward,
        reverse: Some(reverse),
        mismatch,
    }
}

fn compare_programs(transpiler: &Transpiler, original: &str, reconstructed: &str) -> Option<TokenMismatch> {
    let parse = |text: &str| {
        let dialect = transpiler.options().dialect.unwrap_or_else(|| Dialect::sniff(text));
        parse_source(text, dialect).map(|tree| tokens(&tree, text)).unwrap_or_default()
    };
    first_mismatch(&parse(original), &parse(reconstructed))
}

/// Compare by kind and text; positions may differ
pub fn first_mismatch(expected: &[Token], actual: &[Token]) -> Option<TokenMismatch> {
    let len = expected.len().max(actual.len());
    (0..len).find_map(|index| {
        let (e, a) = (expected.get(index), actual.get(index));
        let same = match (e, a) {
            (Some(e), Some(a)) => e.kind == a.kind && e.text == a.text,
            _ => false,
        };
        (!same).then(|| TokenMismatch {
            index,
            expected: e.cloned(),
            actual: a.cloned(),
        })
    })
}
