use crate::selector::selector_model::{
    AttrOp, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Nth, PseudoClass,
    SelectorError, SelectorList, SimpleSelector,
};

/// Parse a selector group.
///
/// Supports type/universal, `#id`, `.class`, attribute selectors (all six
/// operators, quoted or bare values, `i`/`s` flags), the structural
/// pseudo-classes used by generated selectors plus `:not()`, and all four
/// combinators. Anything else is reported as an error, never a panic.
pub fn parse_selector(input: &str) -> Result<SelectorList, SelectorError> {
    let mut parser = Parser::new(input);
    let list = parser.parse_list(false)?;
    match parser.peek() {
        None => Ok(list),
        Some(_) => Err(parser.unexpected("end of selector")),
    }
}

/// Deepest `:not()` nesting accepted; parsing and matching both recurse per level.
pub const MAX_NOT_NESTING: usize = 32;

struct Parser {
    chars: Vec<char>,
    pos: usize,
    not_depth: usize,
}

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}')
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            not_depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ws(c)) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self, expected: &'static str) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                found,
                offset: self.pos,
            },
            None => SelectorError::UnexpectedEnd { expected },
        }
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), SelectorError> {
        if self.peek() == Some(want) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn parse_list(&mut self, nested: bool) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_ws();
            if self.peek().is_none() && selectors.is_empty() {
                return Err(if nested {
                    SelectorError::UnexpectedEnd { expected: "selector" }
                } else {
                    SelectorError::Empty
                });
            }
            selectors.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some(')') if nested => break,
                None => break,
                Some(_) => return Err(self.unexpected("',' or end of selector")),
            }
        }
        Ok(SelectorList(selectors))
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected("combinator")),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_ws();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::default();
        let mut has_type = false;

        if self.peek() == Some('*') {
            self.pos += 1;
            has_type = true;
        } else if self.starts_ident() {
            compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
            has_type = true;
        }

        loop {
            let simple = match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    SimpleSelector::Id(self.parse_ident()?)
                }
                Some('.') => {
                    self.pos += 1;
                    SimpleSelector::Class(self.parse_ident()?)
                }
                Some('[') => SimpleSelector::Attribute(self.parse_attribute()?),
                Some(':') => SimpleSelector::Pseudo(self.parse_pseudo()?),
                _ => break,
            };
            compound.simples.push(simple);
        }

        if !has_type && compound.simples.is_empty() {
            return Err(self.unexpected("selector"));
        }
        Ok(compound)
    }

    fn starts_ident(&self) -> bool {
        match self.peek() {
            Some(c) if is_name_start(c) => true,
            Some('\\') => !matches!(self.peek_at(1), None | Some('\n')),
            Some('-') => match self.peek_at(1) {
                Some(n) if is_name_start(n) || n == '-' => true,
                Some('\\') => true,
                _ => false,
            },
            _ => false,
        }
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        if !self.starts_ident() {
            return Err(SelectorError::InvalidIdentifier { offset: self.pos });
        }

        let mut out = String::new();
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                out.push(c);
                self.pos += 1;
            } else if c == '\\' && !matches!(self.peek_at(1), None | Some('\n')) {
                self.pos += 1;
                out.push(self.parse_escape());
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// Consume an escape body; the backslash is already consumed.
    fn parse_escape(&mut self) -> char {
        let mut hex = String::new();
        while hex.len() < 6 {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.pos += 1;
                }
                _ => break,
            }
        }

        if hex.is_empty() {
            return self.bump().unwrap_or('\u{FFFD}');
        }

        if matches!(self.peek(), Some(c) if is_ws(c)) {
            self.pos += 1;
        }

        match u32::from_str_radix(&hex, 16) {
            Ok(0) | Err(_) => '\u{FFFD}',
            Ok(cp) => char::from_u32(cp).unwrap_or('\u{FFFD}'),
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        let offset = self.pos;
        self.pos += 1;

        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(SelectorError::UnterminatedString { offset }),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.peek() {
                    None => return Err(SelectorError::UnterminatedString { offset }),
                    // escaped newline is a line continuation
                    Some('\n') => {
                        self.pos += 1;
                    }
                    Some(_) => out.push(self.parse_escape()),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.pos += 1; // '['
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();

        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttributeSelector {
                    name,
                    matcher: None,
                    case_insensitive: false,
                });
            }
            Some('=') => {
                self.pos += 1;
                AttrOp::Equals
            }
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.pos += 1;
                self.expect('=', "'='")?;
                match c {
                    '~' => AttrOp::Includes,
                    '|' => AttrOp::DashMatch,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Substring,
                }
            }
            _ => return Err(self.unexpected("attribute operator or ']'")),
        };

        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => self.parse_string(q)?,
            _ => self.parse_ident()?,
        };
        self.skip_ws();

        let mut case_insensitive = false;
        match self.peek() {
            Some('i' | 'I') => {
                self.pos += 1;
                case_insensitive = true;
                self.skip_ws();
            }
            Some('s' | 'S') => {
                self.pos += 1;
                self.skip_ws();
            }
            _ => {}
        }
        self.expect(']', "']'")?;

        Ok(AttributeSelector {
            name,
            matcher: Some((op, value)),
            case_insensitive,
        })
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, SelectorError> {
        self.pos += 1; // ':'
        if self.peek() == Some(':') {
            self.pos += 1;
            let name = self.parse_ident()?;
            return Err(SelectorError::UnsupportedPseudo(format!(":{name}")));
        }

        let name = self.parse_ident()?.to_ascii_lowercase();
        if self.peek() != Some('(') {
            return match name.as_str() {
                "first-child" => Ok(PseudoClass::FirstChild),
                "last-child" => Ok(PseudoClass::LastChild),
                "only-child" => Ok(PseudoClass::OnlyChild),
                _ => Err(SelectorError::UnsupportedPseudo(name)),
            };
        }

        self.pos += 1; // '('
        match name.as_str() {
            "nth-child" => Ok(PseudoClass::NthChild(parse_nth(&self.take_argument()?)?)),
            "nth-of-type" => Ok(PseudoClass::NthOfType(parse_nth(&self.take_argument()?)?)),
            "not" => {
                if self.not_depth >= MAX_NOT_NESTING {
                    return Err(SelectorError::NestingTooDeep {
                        limit: MAX_NOT_NESTING,
                    });
                }
                self.not_depth += 1;
                let inner = self.parse_list(true);
                self.not_depth -= 1;
                let inner = inner?;
                self.skip_ws();
                self.expect(')', "')'")?;
                Ok(PseudoClass::Not(inner))
            }
            _ => Err(SelectorError::UnsupportedPseudo(name)),
        }
    }

    fn take_argument(&mut self) -> Result<String, SelectorError> {
        let mut arg = String::new();
        loop {
            match self.bump() {
                Some(')') => return Ok(arg),
                Some(c) => arg.push(c),
                None => return Err(SelectorError::UnexpectedEnd { expected: "')'" }),
            }
        }
    }
}

/// Parse an `An+B` microsyntax argument (`odd`, `even`, `3`, `2n+1`, `-n+3`).
fn parse_nth(arg: &str) -> Result<Nth, SelectorError> {
    let compact: String = arg
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    let invalid = || SelectorError::InvalidNth(arg.trim().to_string());

    match compact.as_str() {
        "odd" => return Ok(Nth { a: 2, b: 1 }),
        "even" => return Ok(Nth { a: 2, b: 0 }),
        "" => return Err(invalid()),
        _ => {}
    }

    let Some(n_pos) = compact.find('n') else {
        let b = compact.parse::<i64>().map_err(|_| invalid())?;
        return Ok(Nth { a: 0, b });
    };

    let (a_part, rest) = (&compact[..n_pos], &compact[n_pos + 1..]);
    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        other => other.parse::<i64>().map_err(|_| invalid())?,
    };
    let b = if rest.is_empty() {
        0
    } else if rest.starts_with('+') || rest.starts_with('-') {
        rest.parse::<i64>().map_err(|_| invalid())?
    } else {
        return Err(invalid());
    };

    Ok(Nth { a, b })
}
