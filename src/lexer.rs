use chumsky::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Number literal, kept as written. Range is checked at evaluation,
    /// not here.
    Number(String),
    /// A word that is not a known operator
    Ident(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Min,
    Max,

    // Delimiters
    LParen,
    RParen,
}

impl Token {
    /// Human-readable rendering for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Token::Number(text) => format!("number `{}`", text),
            Token::Ident(name) => format!("`{}`", name),
            Token::Plus => "`+`".to_string(),
            Token::Minus => "`-`".to_string(),
            Token::Star => "`*`".to_string(),
            Token::Slash => "`/`".to_string(),
            Token::Percent => "`%`".to_string(),
            Token::Caret => "`^`".to_string(),
            Token::Min => "`min`".to_string(),
            Token::Max => "`max`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
        }
    }
}

pub fn lexer<'a>()
-> impl Parser<'a, &'a str, Vec<(Token, SimpleSpan)>, extra::Err<Simple<'a, char>>> {
    // Optional minus glued to the digits, so `-5` is one literal while
    // `- 5` is an operator and a literal. Leading zeros are accepted.
    let number = just('-')
        .or_not()
        .then(text::digits(10))
        .to_slice()
        .map(|s: &str| Token::Number(s.to_string()));

    let word = text::ident().map(|s: &str| match s {
        "min" => Token::Min,
        "max" => Token::Max,
        _ => Token::Ident(s.to_string()),
    });

    let op = choice((
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('%').to(Token::Percent),
        just('^').to(Token::Caret),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
    ));

    let token = number
        .or(word)
        .or(op)
        .map_with(|tok, e| (tok, e.span()))
        .padded();

    token.repeated().collect().then_ignore(end())
}
