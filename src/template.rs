//! Run path templates
//!
//! A run format such as `{POP}/{SM}/{BATCH}/{PU}/{SM}_{PU}` names the
//! destination of every sequence file in a sample layout. Placeholders are
//! drawn from a closed set of fields; fields without a value are elided
//! together with one separator so that no dangling `_` or empty directory
//! is left behind.

use crate::error::{FixtureError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub(crate) static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

const SEPARATORS: [char; 3] = ['_', '-', '.'];

/// Fields that may appear in a run format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Sample name (`{SM}`)
    Sm,
    /// Platform unit (`{PU}`)
    Pu,
    /// Batch or project (`{BATCH}`)
    Batch,
    /// Population (`{POP}`)
    Pop,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Sm, Field::Pu, Field::Batch, Field::Pop];

    pub fn token(&self) -> &'static str {
        match self {
            Field::Sm => "SM",
            Field::Pu => "PU",
            Field::Batch => "BATCH",
            Field::Pop => "POP",
        }
    }

    fn from_token(token: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.token() == token)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.token())
    }
}

/// Values substituted into a template. `None` (or an empty string) elides the field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fields<'a> {
    pub sm: Option<&'a str>,
    pub pu: Option<&'a str>,
    pub batch: Option<&'a str>,
    pub pop: Option<&'a str>,
}

impl<'a> Fields<'a> {
    pub fn get(&self, field: Field) -> Option<&'a str> {
        let value = match field {
            Field::Sm => self.sm,
            Field::Pu => self.pu,
            Field::Batch => self.batch,
            Field::Pop => self.pop,
        };
        value.filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Placeholder(Field),
}

enum Piece<'a> {
    Literal(&'a str),
    Value(&'a str),
    Gap,
}

/// A parsed run format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    components: Vec<Vec<Token>>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        if template.trim().is_empty() {
            return Err(FixtureError::template(template, "template is empty"));
        }
        if template.starts_with('/') {
            return Err(FixtureError::template(template, "template must be a relative path"));
        }

        let mut components = Vec::new();
        for component in template.split('/') {
            if component == ".." {
                return Err(FixtureError::template(template, "'..' components are not allowed"));
            }
            components.push(parse_component(template, component)?);
        }

        Ok(PathTemplate {
            source: template.to_string(),
            components,
        })
    }

    pub fn render(&self, fields: &Fields) -> Result<String> {
        let rendered: Vec<String> = self
            .components
            .iter()
            .map(|tokens| render_component(tokens, fields))
            .filter(|c| !c.is_empty())
            .collect();

        if rendered.is_empty() {
            return Err(FixtureError::template(
                &self.source,
                "template renders to an empty path",
            ));
        }
        Ok(rendered.join("/"))
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse `template` and render it in one step
pub fn render(template: &str, fields: &Fields) -> Result<String> {
    PathTemplate::parse(template)?.render(fields)
}

fn parse_component(template: &str, component: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(component) {
        let whole = caps.get(0).expect("capture 0 always present");
        push_literal(template, &component[last..whole.start()], &mut tokens)?;

        let name = &caps[1];
        if name.is_empty() {
            return Err(FixtureError::template(template, "empty placeholder '{}'"));
        }
        let field = Field::from_token(name).ok_or_else(|| {
            FixtureError::template(
                template,
                format!("unknown placeholder '{{{name}}}' (expected SM, PU, BATCH or POP)"),
            )
        })?;
        tokens.push(Token::Placeholder(field));
        last = whole.end();
    }
    push_literal(template, &component[last..], &mut tokens)?;

    Ok(tokens)
}

fn push_literal(template: &str, text: &str, tokens: &mut Vec<Token>) -> Result<()> {
    if text.contains('{') || text.contains('}') {
        return Err(FixtureError::template(template, "unbalanced braces"));
    }
    if !text.is_empty() {
        tokens.push(Token::Literal(text.to_string()));
    }
    Ok(())
}

fn render_component(tokens: &[Token], fields: &Fields) -> String {
    let mut pieces: Vec<Piece> = tokens
        .iter()
        .map(|t| match t {
            Token::Literal(s) => Piece::Literal(s.as_str()),
            Token::Placeholder(f) => match fields.get(*f) {
                Some(v) => Piece::Value(v),
                None => Piece::Gap,
            },
        })
        .collect();

    // Each gap swallows one separator: the one before it if there is one,
    // otherwise the one after it.
    for i in 0..pieces.len() {
        if !matches!(pieces[i], Piece::Gap) {
            continue;
        }
        if i > 0 {
            if let Piece::Literal(s) = pieces[i - 1] {
                if s.ends_with(SEPARATORS) {
                    pieces[i - 1] = Piece::Literal(&s[..s.len() - 1]);
                    continue;
                }
            }
        }
        if let Some(Piece::Literal(s)) = pieces.get(i + 1) {
            if s.starts_with(SEPARATORS) {
                let s = *s;
                pieces[i + 1] = Piece::Literal(&s[1..]);
            }
        }
    }

    pieces
        .iter()
        .map(|p| match p {
            Piece::Literal(s) | Piece::Value(s) => *s,
            Piece::Gap => "",
        })
        .collect()
}
