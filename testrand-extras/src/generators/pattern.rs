//! Pattern-driven string synthesis.
//!
//! Parses a practical subset of regular-expression syntax and produces
//! strings that match it. Supported constructs: literals, `.`, escape
//! classes (`\d`, `\w`, `\s`, `\t`, `\n` and escaped metacharacters),
//! character classes with ranges and negation, groups (capturing and
//! `(?:`), alternation, and the quantifiers `?`, `*`, `+`, `{n}`, `{n,}`
//! and `{n,m}`. Anchors are accepted at the pattern edges and ignored —
//! synthesis always produces a full match.
//!
//! Backreferences, lookarounds and negated escape classes are not
//! supported and fail at parse time.

use std::fmt;

use rand::Rng;

/// Unbounded quantifiers (`*`, `+`, `{n,}`) expand to at most this many
/// extra repetitions beyond their minimum.
const MAX_UNBOUNDED_EXTRA: usize = 8;

/// Printable ASCII range used for `.` and negated classes.
const PRINTABLE: (u8, u8) = (0x20, 0x7e);

/// A pattern construct outside the supported synthesis subset, or a
/// syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    pattern: String,
    position: usize,
    message: String,
}

impl PatternError {
    fn new(pattern: &str, position: usize, message: impl Into<String>) -> Self {
        Self {
            pattern: pattern.to_string(),
            position,
            message: message.into(),
        }
    }

    /// The pattern source that failed to parse.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// What went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot synthesize from /{}/ at position {}: {}",
            self.pattern, self.position, self.message
        )
    }
}

impl std::error::Error for PatternError {}

#[derive(Debug, Clone)]
enum Node {
    Literal(char),
    /// One character out of an explicit set.
    Class(Vec<char>),
    Sequence(Vec<Node>),
    Alternation(Vec<Node>),
    Repeat {
        node: Box<Node>,
        min: usize,
        max: Option<usize>,
    },
}

/// A parsed pattern, ready to synthesize matching strings.
#[derive(Debug, Clone)]
pub struct ParsedPattern {
    root: Node,
}

impl ParsedPattern {
    /// Parse a pattern source.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut parser = Parser {
            pattern,
            chars: pattern.chars().collect(),
            pos: 0,
        };
        // Leading/trailing anchors are redundant for synthesis.
        if parser.peek() == Some('^') {
            parser.pos += 1;
        }
        let root = parser.alternation()?;
        if parser.peek() == Some('$') {
            parser.pos += 1;
        }
        if parser.pos != parser.chars.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(Self { root })
    }

    /// Produce one string matching the pattern.
    pub fn sample(&self, rng: &mut dyn rand::RngCore) -> String {
        let mut out = String::new();
        Self::emit(&self.root, rng, &mut out);
        out
    }

    fn emit(node: &Node, rng: &mut dyn rand::RngCore, out: &mut String) {
        match node {
            Node::Literal(c) => out.push(*c),
            Node::Class(choices) => {
                let index = rng.r#gen_range(0..choices.len());
                out.push(choices[index]);
            }
            Node::Sequence(nodes) => {
                for node in nodes {
                    Self::emit(node, rng, out);
                }
            }
            Node::Alternation(branches) => {
                let index = rng.r#gen_range(0..branches.len());
                Self::emit(&branches[index], rng, out);
            }
            Node::Repeat { node, min, max } => {
                let upper = max.unwrap_or(min + MAX_UNBOUNDED_EXTRA);
                let count = if upper > *min {
                    rng.r#gen_range(*min..=upper)
                } else {
                    *min
                };
                for _ in 0..count {
                    Self::emit(node, rng, out);
                }
            }
        }
    }
}

struct Parser<'a> {
    pattern: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn error(&self, message: impl Into<String>) -> PatternError {
        PatternError::new(self.pattern, self.pos, message)
    }

    fn alternation(&mut self) -> Result<Node, PatternError> {
        let mut branches = vec![self.sequence()?];
        while self.peek() == Some('|') {
            self.pos += 1;
            branches.push(self.sequence()?);
        }
        if branches.len() == 1 {
            Ok(branches.pop().unwrap_or(Node::Sequence(Vec::new())))
        } else {
            Ok(Node::Alternation(branches))
        }
    }

    fn sequence(&mut self) -> Result<Node, PatternError> {
        let mut nodes = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' || c == '$' {
                break;
            }
            let atom = self.atom()?;
            nodes.push(self.quantified(atom)?);
        }
        Ok(Node::Sequence(nodes))
    }

    fn atom(&mut self) -> Result<Node, PatternError> {
        match self.bump() {
            Some('(') => {
                // Tolerate the non-capturing marker; groups are not captured
                // during synthesis anyway.
                if self.peek() == Some('?') {
                    self.pos += 1;
                    match self.bump() {
                        Some(':') => {}
                        _ => return Err(self.error("only (?: groups are supported")),
                    }
                }
                let inner = self.alternation()?;
                match self.bump() {
                    Some(')') => Ok(inner),
                    _ => Err(self.error("unclosed group")),
                }
            }
            Some('[') => self.class(),
            Some('\\') => self.escape(),
            Some('.') => Ok(Node::Class(ascii_range(PRINTABLE.0, PRINTABLE.1))),
            Some(c @ ('*' | '+' | '?')) => {
                Err(self.error(format!("dangling quantifier '{}'", c)))
            }
            Some('^') => Err(self.error("'^' is only supported as a leading anchor")),
            Some(c) => Ok(Node::Literal(c)),
            None => Err(self.error("unexpected end of pattern")),
        }
    }

    fn escape(&mut self) -> Result<Node, PatternError> {
        match self.bump() {
            Some('d') => Ok(Node::Class(ascii_range(b'0', b'9'))),
            Some('w') => {
                let mut choices = ascii_range(b'a', b'z');
                choices.extend(ascii_range(b'A', b'Z'));
                choices.extend(ascii_range(b'0', b'9'));
                choices.push('_');
                Ok(Node::Class(choices))
            }
            Some('s') => Ok(Node::Class(vec![' ', '\t'])),
            Some('t') => Ok(Node::Literal('\t')),
            Some('n') => Ok(Node::Literal('\n')),
            Some(c @ ('\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
                | '^' | '$' | '-' | '/')) => Ok(Node::Literal(c)),
            Some(c) => Err(self.error(format!("unsupported escape '\\{}'", c))),
            None => Err(self.error("dangling escape")),
        }
    }

    fn class(&mut self) -> Result<Node, PatternError> {
        let negated = if self.peek() == Some('^') {
            self.pos += 1;
            true
        } else {
            false
        };

        let mut choices = Vec::new();
        loop {
            match self.bump() {
                Some(']') => break,
                Some('\\') => match self.escape()? {
                    Node::Literal(c) => choices.push(c),
                    Node::Class(inner) => choices.extend(inner),
                    _ => return Err(self.error("unsupported escape in class")),
                },
                Some(start) => {
                    // A '-' between two chars is a range; elsewhere a literal.
                    if self.peek() == Some('-')
                        && self.chars.get(self.pos + 1).is_some_and(|c| *c != ']')
                    {
                        self.pos += 1;
                        let Some(end) = self.bump() else {
                            return Err(self.error("unterminated class range"));
                        };
                        if end < start {
                            return Err(self.error(format!(
                                "inverted class range {}-{}",
                                start, end
                            )));
                        }
                        for c in start..=end {
                            choices.push(c);
                        }
                    } else {
                        choices.push(start);
                    }
                }
                None => return Err(self.error("unclosed character class")),
            }
        }

        if choices.is_empty() {
            return Err(self.error("empty character class"));
        }

        if negated {
            let excluded: Vec<char> = choices;
            let complement: Vec<char> = ascii_range(PRINTABLE.0, PRINTABLE.1)
                .into_iter()
                .filter(|c| !excluded.contains(c))
                .collect();
            if complement.is_empty() {
                return Err(self.error("negated class excludes every printable character"));
            }
            Ok(Node::Class(complement))
        } else {
            Ok(Node::Class(choices))
        }
    }

    fn quantified(&mut self, atom: Node) -> Result<Node, PatternError> {
        let (min, max) = match self.peek() {
            Some('?') => (0, Some(1)),
            Some('*') => (0, None),
            Some('+') => (1, None),
            Some('{') => {
                self.pos += 1;
                let min = self.number()?;
                let (max, closed) = match self.bump() {
                    Some('}') => (Some(min), true),
                    Some(',') => {
                        if self.peek() == Some('}') {
                            (None, false)
                        } else {
                            (Some(self.number()?), false)
                        }
                    }
                    _ => return Err(self.error("malformed repetition")),
                };
                if !closed {
                    match self.bump() {
                        Some('}') => {}
                        _ => return Err(self.error("unclosed repetition")),
                    }
                }
                if let Some(max) = max {
                    if max < min {
                        return Err(self.error(format!("inverted repetition {{{},{}}}", min, max)));
                    }
                }
                return Ok(Node::Repeat {
                    node: Box::new(atom),
                    min,
                    max,
                });
            }
            _ => return Ok(atom),
        };
        self.pos += 1;
        Ok(Node::Repeat {
            node: Box::new(atom),
            min,
            max,
        })
    }

    fn number(&mut self) -> Result<usize, PatternError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a number"));
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse()
            .map_err(|_| self.error("repetition count out of range"))
    }
}

fn ascii_range(start: u8, end: u8) -> Vec<char> {
    (start..=end).map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use testrand::create_seeded_rng;

    fn samples(pattern: &str, count: usize) -> Vec<String> {
        let parsed = ParsedPattern::parse(pattern).unwrap();
        let mut rng = create_seeded_rng(1234);
        (0..count).map(|_| parsed.sample(&mut rng)).collect()
    }

    #[test]
    fn test_literal_sequences() {
        assert_eq!(samples("abc", 3), vec!["abc", "abc", "abc"]);
    }

    #[test]
    fn test_anchors_are_accepted() {
        assert_eq!(samples("^abc$", 1), vec!["abc"]);
    }

    #[test]
    fn test_exact_repetition_of_a_class() {
        for sample in samples("^[A-Z]{3}$", 100) {
            assert_eq!(sample.len(), 3);
            assert!(sample.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_bounded_repetition_range() {
        for sample in samples("[0-9]{2,4}", 100) {
            assert!((2..=4).contains(&sample.len()));
            assert!(sample.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_unbounded_repetition_is_capped() {
        for sample in samples("a+", 100) {
            assert!((1..=1 + MAX_UNBOUNDED_EXTRA).contains(&sample.len()));
        }
    }

    #[test]
    fn test_alternation_covers_both_branches() {
        let all = samples("cat|dog", 100);
        assert!(all.iter().any(|s| s == "cat"));
        assert!(all.iter().any(|s| s == "dog"));
        assert!(all.iter().all(|s| s == "cat" || s == "dog"));
    }

    #[test]
    fn test_groups_with_quantifiers() {
        for sample in samples("(ab){2}", 10) {
            assert_eq!(sample, "abab");
        }
        for sample in samples("(?:xy)?z", 50) {
            assert!(sample == "z" || sample == "xyz");
        }
    }

    #[test]
    fn test_escape_classes() {
        for sample in samples(r"\d\w\.", 50) {
            let chars: Vec<char> = sample.chars().collect();
            assert_eq!(chars.len(), 3);
            assert!(chars[0].is_ascii_digit());
            assert!(chars[1].is_ascii_alphanumeric() || chars[1] == '_');
            assert_eq!(chars[2], '.');
        }
    }

    #[test]
    fn test_negated_class() {
        for sample in samples("[^0-9]{5}", 50) {
            assert_eq!(sample.len(), 5);
            assert!(sample.chars().all(|c| !c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_optional_atom() {
        let all = samples("ab?", 50);
        assert!(all.iter().any(|s| s == "a"));
        assert!(all.iter().any(|s| s == "ab"));
    }

    #[test]
    fn test_unsupported_constructs_fail_to_parse() {
        for pattern in ["[unclosed", "(open", "a{3", "a**", r"\k", "a{5,2}", "ab^c"] {
            assert!(
                ParsedPattern::parse(pattern).is_err(),
                "expected /{}/ to be rejected",
                pattern
            );
        }
    }

    #[test]
    fn test_samples_match_the_real_regex_engine() {
        for pattern in ["^[A-Z]{3}$", "[0-9]{2,4}", "cat|dog", r"\w+@example\.(com|org)"] {
            let checker = regex_lite::Regex::new(pattern).unwrap();
            let parsed = ParsedPattern::parse(pattern).unwrap();
            let mut rng = create_seeded_rng(99);
            for _ in 0..100 {
                let sample = parsed.sample(&mut rng);
                assert!(
                    checker.is_match(&sample),
                    "/{}/ rejected sample {:?}",
                    pattern,
                    sample
                );
            }
        }
    }
}
